use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use hotzone_core::models::Segment;

/// Choix d'un segment parmi les candidats d'un résultat.
///
/// Le segment réellement atteint n'est pas observable : toute implémentation
/// aléatoire injecte du bruit dans l'attribution par zone.
pub trait SegmentSampler: Send + Sync {
    fn name(&self) -> &str;
    /// `None` uniquement si `candidates` est vide.
    fn pick(&self, candidates: &[Segment]) -> Option<Segment>;
}

/// Tirage uniforme avec le générateur du thread courant.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformSampler;

impl SegmentSampler for UniformSampler {
    fn name(&self) -> &str {
        "uniform"
    }

    fn pick(&self, candidates: &[Segment]) -> Option<Segment> {
        if candidates.is_empty() {
            return None;
        }
        let mut rng = rand::rng();
        Some(candidates[rng.random_range(0..candidates.len())])
    }
}

/// Tirage uniforme reproductible : même seed, même suite d'attributions.
pub struct SeededSampler {
    seed: u64,
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SegmentSampler for SeededSampler {
    fn name(&self) -> &str {
        "seeded"
    }

    fn pick(&self, candidates: &[Segment]) -> Option<Segment> {
        if candidates.is_empty() {
            return None;
        }
        let idx = self.rng.lock().random_range(0..candidates.len());
        Some(candidates[idx])
    }
}

/// Toujours le plus petit segment candidat.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstCandidateSampler;

impl SegmentSampler for FirstCandidateSampler {
    fn name(&self) -> &str {
        "first-candidate"
    }

    fn pick(&self, candidates: &[Segment]) -> Option<Segment> {
        candidates.iter().min().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES: [Segment; 5] = [3, 11, 19, 40, 52];

    #[test]
    fn test_uniform_picks_a_candidate() {
        let sampler = UniformSampler;
        for _ in 0..200 {
            let s = sampler.pick(&CANDIDATES).unwrap();
            assert!(CANDIDATES.contains(&s));
        }
    }

    #[test]
    fn test_uniform_covers_all_candidates() {
        let sampler = UniformSampler;
        let mut seen = [false; CANDIDATES.len()];
        for _ in 0..2000 {
            let s = sampler.pick(&CANDIDATES).unwrap();
            let idx = CANDIDATES.iter().position(|&c| c == s).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&b| b), "seen = {:?}", seen);
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(UniformSampler.pick(&[]), None);
        assert_eq!(SeededSampler::new(1).pick(&[]), None);
        assert_eq!(FirstCandidateSampler.pick(&[]), None);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SeededSampler::new(20240101);
        let b = SeededSampler::new(20240101);
        let seq_a: Vec<Segment> = (0..50).map(|_| a.pick(&CANDIDATES).unwrap()).collect();
        let seq_b: Vec<Segment> = (0..50).map(|_| b.pick(&CANDIDATES).unwrap()).collect();
        assert_eq!(seq_a, seq_b);
        assert_eq!(a.seed(), 20240101);
    }

    #[test]
    fn test_first_candidate_is_minimum() {
        assert_eq!(FirstCandidateSampler.pick(&[40, 3, 19]), Some(3));
        assert_eq!(FirstCandidateSampler.pick(&CANDIDATES), Some(3));
    }
}
