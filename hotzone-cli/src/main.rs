mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use hotzone_core::config::EngineConfig;
use hotzone_engine::sampler::{FirstCandidateSampler, SeededSampler, SegmentSampler, UniformSampler};
use hotzone_engine::zones::ZoneMapper;
use hotzone_engine::HotZoneEngine;

use crate::display::{display_analysis, display_wheel};
use crate::import::{read_history, HistoryInput};

#[derive(Parser)]
#[command(name = "hotzone", about = "Détection de zones chaudes sur l'historique de la roue")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyser un historique (JSON ou jetons séparés, du plus ancien au plus récent)
    Analyze {
        /// Fichier d'historique
        file: PathBuf,

        /// Fichier de configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Taille des fenêtres courante et précédente
        #[arg(short, long)]
        window: Option<usize>,

        /// Nombre minimal de résultats valides
        #[arg(long)]
        min_spins: Option<usize>,

        /// Désactiver les suggestions automatiques de saut de mise
        #[arg(long)]
        no_auto_skip: bool,

        /// Seed pour une attribution reproductible des segments
        #[arg(long, conflicts_with = "deterministic")]
        seed: Option<u64>,

        /// Toujours attribuer le premier segment candidat
        #[arg(long)]
        deterministic: bool,

        /// Sortie JSON brute
        #[arg(long)]
        json: bool,
    },

    /// Afficher les zones, densités et segments de la roue
    Wheel,

    /// Écrire la configuration par défaut
    Config {
        /// Fichier de sortie (stdout si absent)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { file, config, window, min_spins, no_auto_skip, seed, deterministic, json } => {
            let config = resolve_config(config.as_deref(), window, min_spins, no_auto_skip)?;
            let sampler: Box<dyn SegmentSampler> = match (seed, deterministic) {
                (_, true) => Box::new(FirstCandidateSampler),
                (Some(s), false) => Box::new(SeededSampler::new(s)),
                (None, false) => Box::new(UniformSampler),
            };
            cmd_analyze(&file, config, sampler, json)
        }
        Command::Wheel => {
            display_wheel(&ZoneMapper::default());
            Ok(())
        }
        Command::Config { output } => cmd_config(output.as_deref()),
    }
}

fn resolve_config(
    path: Option<&Path>,
    window: Option<usize>,
    min_spins: Option<usize>,
    no_auto_skip: bool,
) -> Result<EngineConfig> {
    let mut config = match path {
        Some(p) => EngineConfig::load(p)?,
        None => EngineConfig::default(),
    };
    if let Some(w) = window {
        config.analysis_window = w;
    }
    if let Some(m) = min_spins {
        config.min_spins_for_analysis = m;
    }
    if no_auto_skip {
        config.enable_auto_skip_suggestions = false;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_analyze(file: &Path, config: EngineConfig, sampler: Box<dyn SegmentSampler>, json: bool) -> Result<()> {
    let input = read_history(file)?;
    log::info!("{} entrées lues depuis {:?}", input.len(), file);

    let engine = HotZoneEngine::with_sampler(config, sampler)?;
    log::debug!("Échantillonnage : {}", engine.mapper().sampler_name());

    let analysis = match &input {
        HistoryInput::Json(value) => engine.analyze_json(value),
        HistoryInput::Tokens(tokens) => engine.analyze(tokens),
    };

    if json {
        let out = serde_json::to_string_pretty(&analysis).context("Sérialisation du résultat")?;
        println!("{out}");
    } else {
        display_analysis(&analysis);
    }
    Ok(())
}

fn cmd_config(output: Option<&Path>) -> Result<()> {
    let config = EngineConfig::default();
    match output {
        Some(path) => {
            config.save(path)?;
            println!("Configuration écrite dans {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_overrides() {
        let config = resolve_config(None, Some(30), Some(40), true).unwrap();
        assert_eq!(config.analysis_window, 30);
        assert_eq!(config.min_spins_for_analysis, 40);
        assert!(!config.enable_auto_skip_suggestions);
    }

    #[test]
    fn test_resolve_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotzone.json");
        std::fs::write(&path, r#"{"minSpinsForAnalysis": 10}"#).unwrap();
        let config = resolve_config(Some(path.as_path()), None, None, false).unwrap();
        assert_eq!(config.min_spins_for_analysis, 10);
        assert_eq!(config.analysis_window, 20);
        assert!(config.enable_auto_skip_suggestions);
    }

    #[test]
    fn test_resolve_config_rejects_zero_window() {
        assert!(resolve_config(None, Some(0), None, false).is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from(["hotzone", "analyze", "spins.json", "--window", "25", "--seed", "7", "--json"]).unwrap();
        match cli.command {
            Command::Analyze { file, window, seed, json, deterministic, .. } => {
                assert_eq!(file, PathBuf::from("spins.json"));
                assert_eq!(window, Some(25));
                assert_eq!(seed, Some(7));
                assert!(json);
                assert!(!deterministic);
            }
            _ => panic!("sous-commande inattendue"),
        }
    }

    #[test]
    fn test_cli_seed_conflicts_with_deterministic() {
        assert!(Cli::try_parse_from(["hotzone", "analyze", "f", "--seed", "1", "--deterministic"]).is_err());
    }
}
