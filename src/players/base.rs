use crate::game::dice::RollGesture;
use crate::game::game::Game;
use crate::game::players::PlayerState;

/// A seat's throwing style. The only choice a player makes is how hard to
/// fling the dice.
pub trait BasePlayer {
    fn gesture(&self, game: &Game, player: &PlayerState) -> RollGesture;
}
