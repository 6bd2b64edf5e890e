use std::collections::HashMap;

use hotzone_core::models::{Outcome, Segment, Zone, ZoneMap, WHEEL_LAYOUT, ZONE_DENSITIES};

use crate::sampler::{SegmentSampler, UniformSampler};

/// Connaissance statique de la roue : résultat → segments candidats,
/// segment → zone, zone → densité.
pub struct ZoneMapper {
    segments: HashMap<Outcome, Vec<Segment>>,
    densities: ZoneMap<u32>,
    sampler: Box<dyn SegmentSampler>,
}

impl ZoneMapper {
    pub fn new(sampler: Box<dyn SegmentSampler>) -> Self {
        let mut segments: HashMap<Outcome, Vec<Segment>> = HashMap::new();
        for (pos, outcome) in WHEEL_LAYOUT.iter().enumerate() {
            segments.entry(*outcome).or_default().push(pos as Segment);
        }
        Self {
            segments,
            densities: ZoneMap::from_array(ZONE_DENSITIES),
            sampler,
        }
    }

    pub fn sampler_name(&self) -> &str {
        self.sampler.name()
    }

    pub fn segments_for(&self, token: &str) -> Option<&[Segment]> {
        Outcome::from_token(token).and_then(|o| self.segments_of(o))
    }

    pub fn segments_of(&self, outcome: Outcome) -> Option<&[Segment]> {
        self.segments.get(&outcome).map(|v| v.as_slice())
    }

    /// Tirage non déterministe selon le sampler injecté.
    pub fn sample_segment(&self, outcome: Outcome) -> Option<Segment> {
        self.segments_of(outcome).and_then(|c| self.sampler.pick(c))
    }

    pub fn zone_for(&self, segment: Segment) -> Option<Zone> {
        Zone::containing(segment)
    }

    pub fn density_of(&self, zone: Zone) -> u32 {
        self.densities[zone]
    }

    pub fn densities(&self) -> &ZoneMap<u32> {
        &self.densities
    }

    pub fn is_valid_outcome(&self, token: &str) -> bool {
        Outcome::from_token(token).is_some()
    }
}

impl Default for ZoneMapper {
    fn default() -> Self {
        Self::new(Box::new(UniformSampler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::FirstCandidateSampler;

    #[test]
    fn test_segments_for_known_outcomes() {
        let mapper = ZoneMapper::default();
        let ones = mapper.segments_for("1").unwrap();
        assert_eq!(ones.len(), 22);
        assert_eq!(&ones[..4], &[0, 2, 4, 6]);
        assert_eq!(mapper.segments_for("4_rolls").unwrap(), &[23]);
        assert_eq!(mapper.segments_for("chance").unwrap(), &[8, 39]);
    }

    #[test]
    fn test_segments_for_unknown_outcome() {
        let mapper = ZoneMapper::default();
        assert!(mapper.segments_for("7").is_none());
        assert!(mapper.segments_for("").is_none());
    }

    #[test]
    fn test_every_outcome_has_candidates() {
        let mapper = ZoneMapper::default();
        let total: usize = Outcome::ALL
            .iter()
            .map(|&o| mapper.segments_of(o).map(|s| s.len()).unwrap_or(0))
            .sum();
        assert_eq!(total, 54);
        for o in Outcome::ALL {
            assert!(!mapper.segments_of(o).unwrap().is_empty(), "{} sans segment", o);
        }
    }

    #[test]
    fn test_sample_segment_stays_in_candidates() {
        let mapper = ZoneMapper::default();
        for o in Outcome::ALL {
            let candidates = mapper.segments_of(o).unwrap().to_vec();
            for _ in 0..50 {
                let s = mapper.sample_segment(o).unwrap();
                assert!(candidates.contains(&s));
            }
        }
    }

    #[test]
    fn test_sample_segment_with_deterministic_sampler() {
        let mapper = ZoneMapper::new(Box::new(FirstCandidateSampler));
        assert_eq!(mapper.sample_segment(Outcome::One), Some(0));
        assert_eq!(mapper.sample_segment(Outcome::TwoRolls), Some(9));
        assert_eq!(mapper.sampler_name(), "first-candidate");
    }

    #[test]
    fn test_zone_for_boundaries() {
        let mapper = ZoneMapper::default();
        assert_eq!(mapper.zone_for(8), Some(Zone::A));
        assert_eq!(mapper.zone_for(17), Some(Zone::B));
        assert_eq!(mapper.zone_for(18), Some(Zone::C));
        assert_eq!(mapper.zone_for(44), Some(Zone::E));
        assert_eq!(mapper.zone_for(54), None);
    }

    #[test]
    fn test_density_table() {
        let mapper = ZoneMapper::default();
        let d: Vec<u32> = Zone::ALL.iter().map(|&z| mapper.density_of(z)).collect();
        assert_eq!(d, vec![4, 3, 4, 3, 4, 4]);
    }

    #[test]
    fn test_is_valid_outcome() {
        let mapper = ZoneMapper::default();
        for token in ["1", "2", "5", "10", "2_rolls", "4_rolls", "chance"] {
            assert!(mapper.is_valid_outcome(token), "{}", token);
        }
        for token in ["0", "20", "crazy_time", "Chance", "1 "] {
            assert!(!mapper.is_valid_outcome(token), "{}", token);
        }
    }
}
