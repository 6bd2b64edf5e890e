use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use hotzone_core::models::{Outcome, Zone, ZoneMap};

use crate::zones::ZoneMapper;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneScore {
    pub zone: Zone,
    pub score: u32,
    pub normalized_score: f64,
    pub density: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStatistics {
    pub total: u32,
    pub average: f64,
    pub min: u32,
    pub max: u32,
    pub normalized_total: f64,
    pub normalized_average: f64,
}

/// Instantané complet d'une fenêtre.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowAnalysis {
    pub hit_counts: ZoneMap<u32>,
    pub scores: ZoneMap<u32>,
    pub dominant: ZoneScore,
    pub ranking: Vec<ZoneScore>,
    pub statistics: ScoreStatistics,
    pub window_size: usize,
}

pub trait WindowScorer: Send + Sync {
    fn hit_counts(&self, window: &[Outcome]) -> Result<ZoneMap<u32>>;
    fn scores(&self, hit_counts: &ZoneMap<u32>) -> ZoneMap<u32>;
    fn dominant_zone(&self, scores: &ZoneMap<u32>, window_size: usize) -> ZoneScore;
    fn ranking(&self, scores: &ZoneMap<u32>, window_size: usize) -> Vec<ZoneScore>;
    fn statistics(&self, scores: &ZoneMap<u32>, window_size: usize) -> ScoreStatistics;

    fn analyze_window(&self, window: &[Outcome]) -> Result<WindowAnalysis> {
        let hit_counts = self.hit_counts(window)?;
        let scores = self.scores(&hit_counts);
        let window_size = window.len();
        Ok(WindowAnalysis {
            dominant: self.dominant_zone(&scores, window_size),
            ranking: self.ranking(&scores, window_size),
            statistics: self.statistics(&scores, window_size),
            hit_counts,
            scores,
            window_size,
        })
    }
}

fn normalize(value: f64, window_size: usize) -> f64 {
    if window_size == 0 {
        0.0
    } else {
        value / window_size as f64
    }
}

/// Score d'une zone = occurrences du `1` attribuées × densité statique.
///
/// Le produit favorise les zones déjà riches en `1`.
pub struct ScoreCalculator {
    mapper: Arc<ZoneMapper>,
}

impl ScoreCalculator {
    pub fn new(mapper: Arc<ZoneMapper>) -> Self {
        Self { mapper }
    }

    fn zone_score(&self, zone: Zone, score: u32, window_size: usize) -> ZoneScore {
        ZoneScore {
            zone,
            score,
            normalized_score: normalize(score as f64, window_size),
            density: self.mapper.density_of(zone),
        }
    }
}

impl WindowScorer for ScoreCalculator {
    fn hit_counts(&self, window: &[Outcome]) -> Result<ZoneMap<u32>> {
        let mut counts: ZoneMap<u32> = ZoneMap::default();
        // Les autres résultats comptent dans la longueur mais pas dans la chaleur
        for (i, outcome) in window.iter().enumerate().filter(|(_, o)| o.is_target()) {
            let segment = self
                .mapper
                .sample_segment(*outcome)
                .with_context(|| format!("Aucun segment pour {} (position {})", outcome, i))?;
            let zone = self
                .mapper
                .zone_for(segment)
                .with_context(|| format!("Segment {} hors de la roue", segment))?;
            counts[zone] += 1;
        }
        Ok(counts)
    }

    fn scores(&self, hit_counts: &ZoneMap<u32>) -> ZoneMap<u32> {
        hit_counts.map(|zone, &hits| hits * self.mapper.density_of(zone))
    }

    fn dominant_zone(&self, scores: &ZoneMap<u32>, window_size: usize) -> ZoneScore {
        // Strictement supérieur : l'égalité garde la zone la plus tôt dans A → F
        let mut best = Zone::A;
        for zone in Zone::ALL.iter().skip(1).copied() {
            if scores[zone] > scores[best] {
                best = zone;
            }
        }
        self.zone_score(best, scores[best], window_size)
    }

    fn ranking(&self, scores: &ZoneMap<u32>, window_size: usize) -> Vec<ZoneScore> {
        let mut ranked: Vec<ZoneScore> = scores
            .iter()
            .map(|(zone, &score)| self.zone_score(zone, score, window_size))
            .collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    fn statistics(&self, scores: &ZoneMap<u32>, window_size: usize) -> ScoreStatistics {
        let values = scores.values();
        let total: u32 = values.iter().sum();
        let average = total as f64 / values.len() as f64;
        ScoreStatistics {
            total,
            average,
            min: values.iter().copied().min().unwrap_or(0),
            max: values.iter().copied().max().unwrap_or(0),
            normalized_total: normalize(total as f64, window_size),
            normalized_average: normalize(average, window_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{FirstCandidateSampler, SegmentSampler};
    use hotzone_core::models::Segment;
    use proptest::prelude::*;

    fn make_window(tokens: &[&str]) -> Vec<Outcome> {
        tokens.iter().map(|t| Outcome::from_token(t).unwrap()).collect()
    }

    fn calculator() -> ScoreCalculator {
        ScoreCalculator::new(Arc::new(ZoneMapper::new(Box::new(FirstCandidateSampler))))
    }

    fn counts(values: [u32; 6]) -> ZoneMap<u32> {
        ZoneMap::from_array(values)
    }

    struct OffWheelSampler;

    impl SegmentSampler for OffWheelSampler {
        fn name(&self) -> &str {
            "off-wheel"
        }

        fn pick(&self, _candidates: &[Segment]) -> Option<Segment> {
            Some(99)
        }
    }

    #[test]
    fn test_hit_counts_only_target() {
        let calc = calculator();
        let window = make_window(&["1", "2", "5", "1", "chance", "10", "1", "2_rolls"]);
        let hits = calc.hit_counts(&window).unwrap();
        // FirstCandidateSampler : chaque `1` tombe sur le segment 0, zone A
        assert_eq!(hits[Zone::A], 3);
        assert_eq!(hits.values().iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_hit_counts_without_target() {
        let calc = calculator();
        let window = make_window(&["2", "5", "10", "chance"]);
        let hits = calc.hit_counts(&window).unwrap();
        assert_eq!(hits, ZoneMap::default());
    }

    #[test]
    fn test_hit_counts_off_wheel_segment_fails() {
        let calc = ScoreCalculator::new(Arc::new(ZoneMapper::new(Box::new(OffWheelSampler))));
        let window = make_window(&["2", "1"]);
        let err = calc.hit_counts(&window).unwrap_err();
        assert!(err.to_string().contains("99"), "{}", err);
    }

    #[test]
    fn test_scores_multiply_by_density() {
        let calc = calculator();
        let scores = calc.scores(&counts([2, 1, 0, 1, 0, 0]));
        assert_eq!(scores.values(), &[8, 3, 0, 3, 0, 0]);
    }

    #[test]
    fn test_dominant_zone_example() {
        let calc = calculator();
        let scores = counts([8, 3, 0, 3, 0, 0]);
        let dominant = calc.dominant_zone(&scores, 20);
        assert_eq!(dominant.zone, Zone::A);
        assert_eq!(dominant.score, 8);
        assert!((dominant.normalized_score - 0.4).abs() < 1e-12);
        assert_eq!(dominant.density, 4);
    }

    #[test]
    fn test_dominant_zone_tie_keeps_earliest() {
        let calc = calculator();
        let dominant = calc.dominant_zone(&counts([0, 0, 8, 0, 8, 0]), 20);
        assert_eq!(dominant.zone, Zone::C);
        let dominant = calc.dominant_zone(&counts([0, 6, 0, 6, 0, 0]), 20);
        assert_eq!(dominant.zone, Zone::B);
    }

    #[test]
    fn test_dominant_zone_all_zero() {
        let calc = calculator();
        let dominant = calc.dominant_zone(&ZoneMap::default(), 20);
        assert_eq!(dominant.zone, Zone::A);
        assert_eq!(dominant.score, 0);
        assert_eq!(dominant.normalized_score, 0.0);
    }

    #[test]
    fn test_ranking_descending_and_stable() {
        let calc = calculator();
        let ranking = calc.ranking(&counts([4, 6, 0, 6, 4, 0]), 10);
        let zones: Vec<Zone> = ranking.iter().map(|r| r.zone).collect();
        assert_eq!(zones, vec![Zone::B, Zone::D, Zone::A, Zone::E, Zone::C, Zone::F]);
        assert!((ranking[0].normalized_score - 0.6).abs() < 1e-12);
        assert_eq!(ranking[0].density, 3);
    }

    #[test]
    fn test_statistics() {
        let calc = calculator();
        let stats = calc.statistics(&counts([8, 3, 0, 3, 0, 0]), 20);
        assert_eq!(stats.total, 14);
        assert!((stats.average - 14.0 / 6.0).abs() < 1e-12);
        assert_eq!(stats.min, 0);
        assert_eq!(stats.max, 8);
        assert!((stats.normalized_total - 0.7).abs() < 1e-12);
        assert!((stats.normalized_average - 14.0 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_window_without_target_is_all_zero() {
        let calc = calculator();
        let window = make_window(&["2"; 20]);
        let analysis = calc.analyze_window(&window).unwrap();
        assert_eq!(analysis.window_size, 20);
        assert!(analysis.scores.values().iter().all(|&s| s == 0));
        assert_eq!(analysis.statistics.total, 0);
        assert_eq!(analysis.dominant.zone, Zone::A);
    }

    fn outcome_strategy() -> impl Strategy<Value = Outcome> {
        prop::sample::select(Outcome::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_hit_sum_equals_target_count(window in prop::collection::vec(outcome_strategy(), 0..60)) {
            let calc = ScoreCalculator::new(Arc::new(ZoneMapper::default()));
            let hits = calc.hit_counts(&window).unwrap();
            let targets = window.iter().filter(|o| o.is_target()).count() as u32;
            prop_assert_eq!(hits.values().iter().sum::<u32>(), targets);
        }

        #[test]
        fn prop_score_is_hits_times_density(values in prop::array::uniform6(0u32..50)) {
            let calc = calculator();
            let hits = counts(values);
            let scores = calc.scores(&hits);
            for zone in Zone::ALL {
                prop_assert_eq!(scores[zone], hits[zone] * calc.mapper.density_of(zone));
            }
        }

        #[test]
        fn prop_ranking_head_is_dominant(values in prop::array::uniform6(0u32..200), size in 1usize..60) {
            let calc = calculator();
            let scores = counts(values);
            let ranking = calc.ranking(&scores, size);
            let dominant = calc.dominant_zone(&scores, size);
            prop_assert_eq!(ranking.len(), 6);
            prop_assert_eq!(ranking[0].zone, dominant.zone);
        }
    }
}
