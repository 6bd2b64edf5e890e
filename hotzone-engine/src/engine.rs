use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use hotzone_core::config::EngineConfig;
use hotzone_core::models::{Action, Confidence, Outcome, ShiftStatus, TrendDirection, Zone, ZoneMap};

use crate::sampler::SegmentSampler;
use crate::scoring::{ScoreCalculator, ScoreStatistics, WindowScorer, ZoneScore};
use crate::trend::{TrendAnalyzer, TrendClassifier};
use crate::zones::ZoneMapper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InactiveReason {
    InvalidInput,
    InsufficientData,
    AnalysisFailed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveAnalysis {
    pub active: bool,
    pub error: bool,
    pub reason: InactiveReason,
    pub message: String,
    pub current_spins: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_spins: Option<usize>,
}

impl InactiveAnalysis {
    fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            active: false,
            error: false,
            reason: InactiveReason::InvalidInput,
            message: message.into(),
            current_spins: 0,
            required_spins: None,
        }
    }

    fn insufficient(current: usize, required: usize) -> Self {
        Self {
            active: false,
            error: false,
            reason: InactiveReason::InsufficientData,
            message: format!("Données insuffisantes : {} résultats sur {} requis", current, required),
            current_spins: current,
            required_spins: Some(required),
        }
    }

    fn failure(message: String, raw_len: usize) -> Self {
        Self {
            active: false,
            error: true,
            reason: InactiveReason::AnalysisFailed,
            message,
            current_spins: raw_len,
            required_spins: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutoSkipSuggestion {
    pub enable: bool,
    pub disable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAnalysis {
    pub active: bool,
    pub status: ShiftStatus,
    pub dominant_zone: Zone,
    pub score: u32,
    pub normalized_score: f64,
    pub density: u32,
    pub trend: TrendDirection,
    pub confidence: Confidence,
    pub action: Action,
    pub recommendation: String,
    pub should_skip_bet: bool,
    pub hit_counts: ZoneMap<u32>,
    pub zone_scores: ZoneMap<u32>,
    pub ranking: Vec<ZoneScore>,
    pub statistics: ScoreStatistics,
    pub previous_dominant: Option<ZoneScore>,
    pub window_size: usize,
    pub total_spins: usize,
    pub ignored_entries: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_skip: Option<AutoSkipSuggestion>,
}

/// Résultat externe unique du moteur, sérialisé tel quel pour la couche HTTP.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ZoneAnalysis {
    Active(Box<ActiveAnalysis>),
    Inactive(InactiveAnalysis),
}

impl ZoneAnalysis {
    pub fn is_active(&self) -> bool {
        matches!(self, ZoneAnalysis::Active(_))
    }

    pub fn as_active(&self) -> Option<&ActiveAnalysis> {
        match self {
            ZoneAnalysis::Active(a) => Some(a.as_ref()),
            ZoneAnalysis::Inactive(_) => None,
        }
    }

    pub fn as_inactive(&self) -> Option<&InactiveAnalysis> {
        match self {
            ZoneAnalysis::Inactive(i) => Some(i),
            ZoneAnalysis::Active(_) => None,
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panique sans message".to_string()
    }
}

/// Orchestrateur : filtre, découpe en fenêtres, score, classe.
///
/// Aucun état mutable entre deux appels ; `analyze` ne panique pas et ne
/// renvoie jamais d'erreur, les échecs internes deviennent un résultat inactif.
pub struct HotZoneEngine {
    config: EngineConfig,
    mapper: Arc<ZoneMapper>,
    scorer: Box<dyn WindowScorer>,
    classifier: Box<dyn TrendClassifier>,
}

impl HotZoneEngine {
    pub fn new(
        config: EngineConfig,
        mapper: Arc<ZoneMapper>,
        scorer: Box<dyn WindowScorer>,
        classifier: Box<dyn TrendClassifier>,
    ) -> Result<Self> {
        config.validate().context("Configuration du moteur invalide")?;
        Ok(Self { config, mapper, scorer, classifier })
    }

    pub fn with_sampler(config: EngineConfig, sampler: Box<dyn SegmentSampler>) -> Result<Self> {
        Self::with_mapper(config, Arc::new(ZoneMapper::new(sampler)))
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        Self::with_mapper(config, Arc::new(ZoneMapper::default()))
    }

    fn with_mapper(config: EngineConfig, mapper: Arc<ZoneMapper>) -> Result<Self> {
        let scorer = Box::new(ScoreCalculator::new(Arc::clone(&mapper)));
        let classifier = Box::new(TrendAnalyzer::new(Arc::clone(&mapper)));
        Self::new(config, mapper, scorer, classifier)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mapper(&self) -> &ZoneMapper {
        &self.mapper
    }

    /// Historique du plus ancien au plus récent.
    pub fn analyze<S: AsRef<str>>(&self, history: &[S]) -> ZoneAnalysis {
        let outcomes = self.filter(history.iter().map(|s| Some(s.as_ref())));
        self.analyze_outcomes(outcomes, history.len())
    }

    /// Point d'entrée JSON : toute valeur autre qu'un tableau est rejetée,
    /// les éléments non textuels sont traités comme des jetons inconnus.
    pub fn analyze_json(&self, history: &serde_json::Value) -> ZoneAnalysis {
        let Some(entries) = history.as_array() else {
            log::warn!("Historique rejeté : tableau attendu");
            return ZoneAnalysis::Inactive(InactiveAnalysis::invalid_input(
                "Historique invalide : une liste de résultats est attendue",
            ));
        };
        let outcomes = self.filter(entries.iter().map(|v| v.as_str()));
        self.analyze_outcomes(outcomes, entries.len())
    }

    fn filter<'a>(&self, tokens: impl Iterator<Item = Option<&'a str>>) -> Vec<Outcome> {
        tokens
            .flatten()
            .filter(|t| self.mapper.is_valid_outcome(t))
            .filter_map(Outcome::from_token)
            .collect()
    }

    fn analyze_outcomes(&self, outcomes: Vec<Outcome>, raw_len: usize) -> ZoneAnalysis {
        let ignored = raw_len - outcomes.len();
        if ignored > 0 {
            log::warn!("{} entrées inconnues ignorées sur {}", ignored, raw_len);
        }

        let required = self.config.min_spins_for_analysis;
        if outcomes.len() < required {
            log::warn!("Données insuffisantes : {}/{}", outcomes.len(), required);
            return ZoneAnalysis::Inactive(InactiveAnalysis::insufficient(outcomes.len(), required));
        }

        match catch_unwind(AssertUnwindSafe(|| self.run(&outcomes, ignored))) {
            Ok(Ok(analysis)) => ZoneAnalysis::Active(Box::new(analysis)),
            Ok(Err(e)) => {
                log::error!("Analyse échouée : {:#}", e);
                ZoneAnalysis::Inactive(InactiveAnalysis::failure(format!("{:#}", e), raw_len))
            }
            Err(payload) => {
                let message = panic_message(payload);
                log::error!("Analyse interrompue par une panique : {}", message);
                ZoneAnalysis::Inactive(InactiveAnalysis::failure(message, raw_len))
            }
        }
    }

    fn run(&self, outcomes: &[Outcome], ignored: usize) -> Result<ActiveAnalysis> {
        let window = self.config.analysis_window;
        let current_start = outcomes.len().saturating_sub(window);
        let current_window = &outcomes[current_start..];
        // Fenêtre précédente : les `window` résultats juste avant, éventuellement plus courte
        let previous_window = (outcomes.len() > window)
            .then(|| &outcomes[current_start.saturating_sub(window)..current_start]);

        let current = self
            .scorer
            .analyze_window(current_window)
            .context("Fenêtre courante")?;
        let previous = previous_window
            .map(|w| self.scorer.analyze_window(w))
            .transpose()
            .context("Fenêtre précédente")?;

        log::debug!(
            "Fenêtre courante ({}) : scores {:?}, dominante {}",
            current.window_size,
            current.scores.values(),
            current.dominant.zone
        );
        if let Some(prev) = &previous {
            log::debug!(
                "Fenêtre précédente ({}) : dominante {} score {}",
                prev.window_size,
                prev.dominant.zone,
                prev.dominant.score
            );
        }

        let assessment = self
            .classifier
            .assess(&current.dominant, previous.as_ref().map(|p| &p.dominant))
            .context("Classification de tendance")?;
        let recommendation = assessment.recommendation;

        let auto_skip = self.config.enable_auto_skip_suggestions.then(|| AutoSkipSuggestion {
            enable: self
                .classifier
                .should_auto_enable_skip_bet(assessment.status, recommendation.confidence),
            disable: self
                .classifier
                .should_auto_disable_skip_bet(assessment.status, recommendation.confidence),
        });

        log::info!(
            "Statut {} : zone {} ({:.2}), tendance {}, action {}",
            assessment.status,
            current.dominant.zone,
            current.dominant.normalized_score,
            assessment.trend,
            recommendation.action
        );

        Ok(ActiveAnalysis {
            active: true,
            status: assessment.status,
            dominant_zone: current.dominant.zone,
            score: current.dominant.score,
            normalized_score: current.dominant.normalized_score,
            density: current.dominant.density,
            trend: assessment.trend,
            confidence: recommendation.confidence,
            action: recommendation.action,
            recommendation: recommendation.message,
            should_skip_bet: recommendation.should_skip_bet,
            hit_counts: current.hit_counts,
            zone_scores: current.scores,
            ranking: current.ranking,
            statistics: current.statistics,
            previous_dominant: previous.map(|p| p.dominant),
            window_size: current.window_size,
            total_spins: outcomes.len(),
            ignored_entries: ignored,
            timestamp: Utc::now(),
            auto_skip,
        })
    }
}

impl Default for HotZoneEngine {
    fn default() -> Self {
        let mapper = Arc::new(ZoneMapper::default());
        Self {
            config: EngineConfig::default(),
            scorer: Box::new(ScoreCalculator::new(Arc::clone(&mapper))),
            classifier: Box::new(TrendAnalyzer::new(Arc::clone(&mapper))),
            mapper,
        }
    }
}
