use std::path::Path;

use anyhow::{Context, Result};

/// Historique brut tel que lu sur disque, du plus ancien au plus récent.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryInput {
    Json(serde_json::Value),
    Tokens(Vec<String>),
}

impl HistoryInput {
    pub fn len(&self) -> usize {
        match self {
            HistoryInput::Json(value) => value.as_array().map(|a| a.len()).unwrap_or(0),
            HistoryInput::Tokens(tokens) => tokens.len(),
        }
    }
}

/// Jetons séparés par des espaces, retours à la ligne ou virgules.
pub fn parse_tokens(content: &str) -> Vec<String> {
    content
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

pub fn parse_history(content: &str) -> Result<HistoryInput> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        let value: serde_json::Value = serde_json::from_str(trimmed).context("JSON invalide")?;
        Ok(HistoryInput::Json(value))
    } else {
        Ok(HistoryInput::Tokens(parse_tokens(content)))
    }
}

pub fn read_history(path: &Path) -> Result<HistoryInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire l'historique {:?}", path))?;
    parse_history(&content).with_context(|| format!("Historique illisible {:?}", path))
}
