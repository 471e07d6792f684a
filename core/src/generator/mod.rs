use crate::*;
pub use random::*;

mod random;

/// Source of candidate mine positions.
///
/// The board decides whether a candidate is acceptable and keeps asking until it has placed every
/// mine, so implementations only need to propose cells uniformly.
pub trait MinePlacer {
    fn next_candidate(&mut self, size: Coord2) -> Coord2;
}

impl<P: MinePlacer + ?Sized> MinePlacer for &mut P {
    fn next_candidate(&mut self, size: Coord2) -> Coord2 {
        (**self).next_candidate(size)
    }
}
