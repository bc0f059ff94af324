//! How the computer picks its move.
use crate::rules::Move;

/// Source of the computer's moves, one call per captured round.
pub trait MovePicker: Send + Sync {
    fn pick(&mut self) -> Move;
}

/// Uniform pick among [`Move::ALL`].
///
/// Only the generator state is kept, `fastrand::Rng` itself is not `Sync` and
/// the picker lives in a bevy resource.
pub struct RandomPicker {
    state: u64,
}
impl RandomPicker {
    pub fn new() -> Self {
        Self { state: fastrand::u64(..) }
    }
    /// Same seed, same sequence of moves.
    pub fn with_seed(seed: u64) -> Self {
        Self { state: seed }
    }
}
impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}
impl MovePicker for RandomPicker {
    fn pick(&mut self) -> Move {
        let rng = fastrand::Rng::with_seed(self.state);
        let picked = Move::ALL[rng.usize(..Move::ALL.len())];
        self.state = rng.u64(..);
        picked
    }
}

/// Plays the given moves in order, then loops.
#[cfg(test)]
pub struct Scripted {
    moves: Vec<Move>,
    next: usize,
}
#[cfg(test)]
impl Scripted {
    pub fn new(moves: &[Move]) -> Self {
        assert!(!moves.is_empty());
        Self { moves: moves.to_vec(), next: 0 }
    }
}
#[cfg(test)]
impl MovePicker for Scripted {
    fn pick(&mut self) -> Move {
        let picked = self.moves[self.next % self.moves.len()];
        self.next += 1;
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_pickers_agree() {
        let mut left = RandomPicker::with_seed(7);
        let mut right = RandomPicker::with_seed(7);
        for _ in 0..50 {
            assert_eq!(left.pick(), right.pick());
        }
    }
    #[test]
    fn random_picker_covers_every_move() {
        let mut picker = RandomPicker::with_seed(42);
        let picked: Vec<_> = (0..300).map(|_| picker.pick()).collect();
        for mv in Move::ALL {
            assert!(picked.contains(&mv), "{mv} never picked");
        }
    }
    #[test]
    fn scripted_loops() {
        use Move::*;
        let mut picker = Scripted::new(&[Rock, Paper]);
        assert_eq!([Rock, Paper, Rock], [picker.pick(), picker.pick(), picker.pick()]);
    }
}
