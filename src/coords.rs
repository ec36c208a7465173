use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Cells per zig-zag row; the path turns after the third and sixth cell.
pub const ROW_LEN: usize = 6;

/// Default token pace, in pixels per millisecond.
pub const DEFAULT_STEP_SPEED: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One piece of the drawn path between two consecutive cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub length: f64,
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn line(start: Point, end: Point) -> Self {
        Self {
            length: start.distance(end),
            start,
            end,
        }
    }

    /// A half-circle whose diameter is the chord between the two points.
    pub fn arc(start: Point, end: Point) -> Self {
        Self {
            length: PI * start.distance(end) / 2.0,
            start,
            end,
        }
    }

    fn is_usable(&self) -> bool {
        self.length.is_finite() && self.length > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub cell_width: f64,
    pub cell_height: f64,
    pub board_width: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            cell_width: 60.0,
            cell_height: 60.0,
            board_width: 400.0,
        }
    }
}

/// Center of `cell` in the reference zig-zag layout.
pub fn cell_center(cell: usize, metrics: &LayoutMetrics) -> Point {
    let LayoutMetrics {
        cell_width: w,
        cell_height: h,
        board_width: bw,
    } = *metrics;
    let column = cell % ROW_LEN;
    let row = (cell / ROW_LEN) as f64;
    let x = match column {
        0 | 5 => w * 1.5,
        1 | 4 => bw / 2.0 - w / 2.0,
        _ => bw - w * 2.5,
    };
    let y_offset = [0.0, 0.5, 1.0, 2.5, 3.0, 3.5][column];
    let y = row * h * 5.0 + y_offset * h;
    Point::new(x + w / 2.0, y + h / 2.0)
}

/// Segments of the reference layout for a board of `cell_count` cells.
/// Segment `i` joins cell `i` to cell `i + 1`.
pub fn zigzag_segments(cell_count: usize, metrics: &LayoutMetrics) -> Vec<Segment> {
    (1..cell_count)
        .map(|i| {
            let start = cell_center(i - 1, metrics);
            let end = cell_center(i, metrics);
            let turning = matches!((i - 1) % ROW_LEN, 2 | 5);
            if turning {
                Segment::arc(start, end)
            } else {
                Segment::line(start, end)
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraversalStep {
    pub from_cell: usize,
    pub to_cell: usize,
    pub arc_length: f64,
    pub duration_ms: f64,
    pub start: Point,
    pub end: Point,
}

/// Per-cell pacing derived from the collaborator's path segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalPlan {
    steps: Vec<Option<TraversalStep>>,
}

impl TraversalPlan {
    pub fn from_segments(segments: &[Segment], speed: f64) -> Self {
        let steps = segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                if !segment.is_usable() || speed <= 0.0 {
                    return None;
                }
                Some(TraversalStep {
                    from_cell: index,
                    to_cell: index + 1,
                    arc_length: segment.length,
                    duration_ms: segment.length / speed,
                    start: segment.start,
                    end: segment.end,
                })
            })
            .collect();
        Self { steps }
    }

    /// The step leaving `from_cell`, if the layout provided a usable one.
    pub fn step(&self, from_cell: usize) -> Option<&TraversalStep> {
        self.steps.get(from_cell).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_length(&self) -> f64 {
        self.steps.iter().flatten().map(|s| s.arc_length).sum()
    }
}
