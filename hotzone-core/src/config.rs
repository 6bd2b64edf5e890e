use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration figée à la construction du moteur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Nombre minimal de résultats valides avant une analyse active.
    pub min_spins_for_analysis: usize,
    /// Taille des fenêtres courante et précédente.
    pub analysis_window: usize,
    pub enable_auto_skip_suggestions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_spins_for_analysis: 20,
            analysis_window: 20,
            enable_auto_skip_suggestions: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.analysis_window == 0 {
            bail!("analysisWindow doit être >= 1");
        }
        if self.min_spins_for_analysis == 0 {
            bail!("minSpinsForAnalysis doit être >= 1");
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire la configuration {:?}", path))?;
        let config: EngineConfig = serde_json::from_str(&json)
            .with_context(|| format!("Configuration invalide {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire la configuration {:?}", path))?;
        Ok(())
    }
}
