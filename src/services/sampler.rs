//! Discrete distribution sampling
//!
//! Weighted categorical draws over small fixed tables (symbols, sides,
//! notional tiers). Backed by `WeightedIndex`, which keeps cumulative
//! weights and binary searches a uniform draw.

use super::generator::SimulationError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// A categorical distribution over a fixed set of outcomes.
#[derive(Debug, Clone)]
pub struct Categorical<T> {
    outcomes: Vec<T>,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> Categorical<T> {
    /// Build from `(outcome, weight)` pairs. Weights need not sum to one.
    pub fn new(table: &[(T, f64)]) -> Result<Self, SimulationError> {
        if table.is_empty() {
            return Err(SimulationError::InvalidArgument(
                "weight table must not be empty".to_string(),
            ));
        }

        let weights: Vec<f64> = table.iter().map(|(_, w)| *w).collect();
        let index = WeightedIndex::new(&weights).map_err(|e| {
            SimulationError::InvalidArgument(format!("invalid weight table: {}", e))
        })?;

        Ok(Self {
            outcomes: table.iter().map(|(o, _)| *o).collect(),
            weights,
            index,
        })
    }

    /// Equal weight for every outcome.
    pub fn uniform(outcomes: &[T]) -> Result<Self, SimulationError> {
        let table: Vec<(T, f64)> = outcomes.iter().map(|o| (*o, 1.0)).collect();
        Self::new(&table)
    }

    /// Draw one outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.outcomes[self.index.sample(rng)]
    }

    /// Outcomes paired with their normalized probabilities.
    pub fn probabilities(&self) -> Vec<(T, f64)> {
        let total: f64 = self.weights.iter().sum();
        self.outcomes
            .iter()
            .zip(&self.weights)
            .map(|(o, w)| (*o, w / total))
            .collect()
    }

    pub fn outcomes(&self) -> &[T] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_empty_table() {
        let table: [(u8, f64); 0] = [];
        assert!(Categorical::new(&table).is_err());
    }

    #[test]
    fn test_rejects_invalid_weights() {
        assert!(Categorical::new(&[('a', -1.0), ('b', 2.0)]).is_err());
        assert!(Categorical::new(&[('a', 0.0), ('b', 0.0)]).is_err());
    }

    #[test]
    fn test_probabilities_normalized() {
        let dist = Categorical::new(&[("x", 3.0), ("y", 1.0)]).unwrap();
        let probs = dist.probabilities();
        assert_eq!(probs, vec![("x", 0.75), ("y", 0.25)]);
    }

    #[test]
    fn test_zero_weight_never_sampled() {
        let dist = Categorical::new(&[(1u8, 1.0), (2u8, 0.0), (3u8, 1.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert_ne!(dist.sample(&mut rng), 2);
        }
    }

    #[test]
    fn test_uniform_covers_all_outcomes() {
        let dist = Categorical::uniform(&['a', 'b', 'c']).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let c = dist.sample(&mut rng);
            seen[(c as u8 - b'a') as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(dist.len(), 3);
    }
}
