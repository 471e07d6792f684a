use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placer backed by a seeded `SmallRng`, so a seed always reproduces the same board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomPlacer {
    seed: u64,
    rng: SmallRng,
}

impl RandomPlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinePlacer for RandomPlacer {
    fn next_candidate(&mut self, (rows, cols): Coord2) -> Coord2 {
        (self.rng.random_range(0..rows), self.rng.random_range(0..cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_stay_in_bounds() {
        let mut placer = RandomPlacer::new(7);

        for _ in 0..1000 {
            let (row, col) = placer.next_candidate((16, 30));
            assert!(row < 16);
            assert!(col < 30);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomPlacer::new(42);
        let mut b = RandomPlacer::new(42);

        for _ in 0..32 {
            assert_eq!(a.next_candidate((9, 9)), b.next_candidate((9, 9)));
        }
    }
}
