use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::game::dice::RollGesture;
use crate::game::game::Game;
use crate::game::players::PlayerState;
use crate::players::{BasePlayer, RandomPlayer, SteadyPlayer};

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "R",
        name: "RandomPlayer",
        description: "Throws with a random intensity and spin.",
    },
    CliPlayer {
        code: "S",
        name: "SteadyPlayer",
        description: "Same soft throw every time. First param is the intensity in [0, 1].",
    },
];

static PLAYERS_BY_CODE: Lazy<HashMap<&'static str, &'static CliPlayer>> =
    Lazy::new(|| CLI_PLAYERS.iter().map(|p| (p.code, p)).collect());

pub fn lookup_player(code: &str) -> Option<&'static CliPlayer> {
    PLAYERS_BY_CODE.get(code.to_uppercase().as_str()).copied()
}

#[derive(Clone)]
pub enum PlayerInstance {
    Random(RandomPlayer),
    Steady(SteadyPlayer),
}

impl PlayerInstance {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerInstance::Random(_) => "Random",
            PlayerInstance::Steady(_) => "Steady",
        }
    }
}

impl BasePlayer for PlayerInstance {
    fn gesture(&self, game: &Game, player: &PlayerState) -> RollGesture {
        match self {
            PlayerInstance::Random(p) => p.gesture(game, player),
            PlayerInstance::Steady(p) => p.gesture(game, player),
        }
    }
}

pub fn create_player(code: &str, params: Vec<&str>) -> Option<PlayerInstance> {
    match lookup_player(code)?.code {
        "R" => Some(PlayerInstance::Random(RandomPlayer)),
        "S" => {
            let intensity = params.first().and_then(|s| s.parse::<f32>().ok());
            Some(PlayerInstance::Steady(SteadyPlayer::new(intensity)))
        }
        _ => None,
    }
}

pub fn print_player_help() {
    println!("Player Legend:");
    println!("{:<5} {:<25} {}", "CODE", "PLAYER", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for player in CLI_PLAYERS {
        println!("{:<5} {:<25} {}", player.code, player.name, player.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_case_insensitive() {
        assert_eq!(lookup_player("s").map(|p| p.name), Some("SteadyPlayer"));
        assert!(lookup_player("M").is_none());
    }

    #[test]
    fn steady_params_set_intensity() {
        match create_player("S", vec!["0.6"]) {
            Some(PlayerInstance::Steady(p)) => assert_eq!(p.intensity, 0.6),
            _ => panic!("expected a steady player"),
        }
        assert!(create_player("X", Vec::new()).is_none());
    }
}
