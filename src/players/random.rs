use rand::Rng;

use crate::game::dice::RollGesture;
use crate::game::game::Game;
use crate::game::players::PlayerState;
use crate::players::BasePlayer;

#[derive(Clone)]
pub struct RandomPlayer;

impl BasePlayer for RandomPlayer {
    fn gesture(&self, _game: &Game, _player: &PlayerState) -> RollGesture {
        let mut rng = rand::thread_rng();
        RollGesture {
            intensity: rng.gen_range(0.0..=1.0),
            spin: rng.gen_range(-1.0..=1.0),
        }
    }
}
