use crate::game::dice::RollGesture;
use crate::game::game::Game;
use crate::game::players::PlayerState;
use crate::players::BasePlayer;

/// Same throw every time. Softer throws lose fewer dice over the rim.
#[derive(Clone)]
pub struct SteadyPlayer {
    pub intensity: f32,
}

impl SteadyPlayer {
    pub fn new(intensity: Option<f32>) -> Self {
        Self {
            intensity: intensity.unwrap_or(0.25).clamp(0.0, 1.0),
        }
    }
}

impl Default for SteadyPlayer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl BasePlayer for SteadyPlayer {
    fn gesture(&self, _game: &Game, _player: &PlayerState) -> RollGesture {
        RollGesture {
            intensity: self.intensity,
            spin: 0.0,
        }
    }
}
