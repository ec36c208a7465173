pub mod base;
pub mod random;
pub mod steady;

pub use base::BasePlayer;
pub use random::RandomPlayer;
pub use steady::SteadyPlayer;
