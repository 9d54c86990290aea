use rand::rngs::SmallRng;

use crate::common::{Coord, GuessResult};

/// Interface implemented by anything that chooses where to fire.
pub trait Player {
    /// Choose the next target coordinate. `None` means the player has
    /// nothing left to fire at (or, for an interactive player, quit).
    fn select_target(&mut self, rng: &mut SmallRng) -> Option<Coord>;

    /// Inform the player of the result of its last attack.
    fn handle_guess_result(&mut self, _coord: Coord, _result: GuessResult) {}

    /// Inform the player of an opponent attack against its board.
    fn handle_opponent_guess(&mut self, _coord: Coord, _result: GuessResult) {}

    /// Forget everything learned in the previous match.
    fn reset(&mut self) {}
}
