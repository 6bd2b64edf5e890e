use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use hotzone_core::models::{Action, Confidence, ShiftStatus, TrendDirection};

use crate::scoring::ZoneScore;
use crate::zones::ZoneMapper;

pub const HOT_MIN_SCORE: f64 = 0.75;
pub const WARMING_MIN_SCORE: f64 = 0.5;
pub const COLD_MAX_SCORE: f64 = 0.2;
pub const COOLING_MAX_SCORE: f64 = 0.3;
pub const MIN_FAVORABLE_DENSITY: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub message: String,
    pub should_skip_bet: bool,
    pub confidence: Confidence,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAssessment {
    pub trend: TrendDirection,
    pub status: ShiftStatus,
    pub recommendation: Recommendation,
}

pub trait TrendClassifier: Send + Sync {
    fn trend_direction(&self, current: &ZoneScore, previous: Option<&ZoneScore>) -> TrendDirection;
    fn classify_shift_status(&self, dominant: &ZoneScore, trend: TrendDirection) -> ShiftStatus;
    fn recommendation(&self, status: ShiftStatus, dominant: &ZoneScore, trend: TrendDirection) -> Recommendation;

    fn assess(&self, current: &ZoneScore, previous: Option<&ZoneScore>) -> Result<TrendAssessment> {
        let trend = self.trend_direction(current, previous);
        let status = self.classify_shift_status(current, trend);
        let recommendation = self.recommendation(status, current, trend);
        Ok(TrendAssessment { trend, status, recommendation })
    }

    fn should_auto_enable_skip_bet(&self, status: ShiftStatus, confidence: Confidence) -> bool {
        matches!(status, ShiftStatus::Cold | ShiftStatus::Cooling) && confidence == Confidence::High
    }

    fn should_auto_disable_skip_bet(&self, status: ShiftStatus, confidence: Confidence) -> bool {
        status.is_favorable() && confidence == Confidence::High
    }
}

fn direction(ord: Ordering) -> TrendDirection {
    match ord {
        Ordering::Greater => TrendDirection::Up,
        Ordering::Less => TrendDirection::Down,
        Ordering::Equal => TrendDirection::Stable,
    }
}

/// Classification sans mémoire : fonction pure de l'instantané courant et de la tendance.
pub struct TrendAnalyzer {
    mapper: Arc<ZoneMapper>,
}

impl TrendAnalyzer {
    pub fn new(mapper: Arc<ZoneMapper>) -> Self {
        Self { mapper }
    }
}

impl TrendClassifier for TrendAnalyzer {
    fn trend_direction(&self, current: &ZoneScore, previous: Option<&ZoneScore>) -> TrendDirection {
        let Some(previous) = previous else {
            return TrendDirection::Stable;
        };
        if previous.zone == current.zone {
            return direction(current.score.cmp(&previous.score));
        }
        // Changement de zone : la densité prime, le score départage
        let current_density = self.mapper.density_of(current.zone);
        let previous_density = self.mapper.density_of(previous.zone);
        match current_density.cmp(&previous_density) {
            Ordering::Equal => direction(current.score.cmp(&previous.score)),
            ord => direction(ord),
        }
    }

    fn classify_shift_status(&self, dominant: &ZoneScore, trend: TrendDirection) -> ShiftStatus {
        let score = dominant.normalized_score;
        let density = dominant.density;

        // Les plages se chevauchent : l'ordre des tests fait partie du comportement
        if score >= HOT_MIN_SCORE && density >= MIN_FAVORABLE_DENSITY {
            ShiftStatus::Hot
        } else if score >= WARMING_MIN_SCORE && density >= MIN_FAVORABLE_DENSITY && trend == TrendDirection::Up {
            ShiftStatus::Warming
        } else if score < COLD_MAX_SCORE {
            ShiftStatus::Cold
        } else if score < COOLING_MAX_SCORE || trend == TrendDirection::Down {
            ShiftStatus::Cooling
        } else {
            ShiftStatus::Cold
        }
    }

    fn recommendation(&self, status: ShiftStatus, dominant: &ZoneScore, trend: TrendDirection) -> Recommendation {
        let pct = dominant.normalized_score * 100.0;
        match status {
            ShiftStatus::Hot => Recommendation {
                message: format!(
                    "Zone {} chaude ({:.0} % normalisé, densité {}) : conditions favorables, miser.",
                    dominant.zone, pct, dominant.density
                ),
                should_skip_bet: false,
                confidence: Confidence::High,
                action: Action::Bet,
            },
            ShiftStatus::Warming => Recommendation {
                message: format!(
                    "Zone {} en réchauffement ({:.0} % normalisé, tendance {}) : envisager une mise.",
                    dominant.zone, pct, trend
                ),
                should_skip_bet: false,
                confidence: Confidence::Medium,
                action: Action::Consider,
            },
            ShiftStatus::Cooling => Recommendation {
                message: format!(
                    "Zone {} en refroidissement ({:.0} % normalisé, tendance {}) : passer.",
                    dominant.zone, pct, trend
                ),
                should_skip_bet: true,
                confidence: Confidence::Medium,
                action: Action::Skip,
            },
            ShiftStatus::Cold => Recommendation {
                message: format!(
                    "Aucune zone chaude (meilleure : {}, {:.0} % normalisé) : passer.",
                    dominant.zone, pct
                ),
                should_skip_bet: true,
                confidence: Confidence::High,
                action: Action::Skip,
            },
        }
    }
}
