use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use hotzone_core::models::{Outcome, ShiftStatus, Zone};
use hotzone_engine::zones::ZoneMapper;
use hotzone_engine::{ActiveAnalysis, InactiveAnalysis, ZoneAnalysis};

fn status_color(status: ShiftStatus) -> Color {
    match status {
        ShiftStatus::Hot => Color::Red,
        ShiftStatus::Warming => Color::Yellow,
        ShiftStatus::Cooling => Color::Cyan,
        ShiftStatus::Cold => Color::Blue,
    }
}

pub fn display_analysis(analysis: &ZoneAnalysis) {
    match analysis {
        ZoneAnalysis::Active(active) => display_active(active),
        ZoneAnalysis::Inactive(inactive) => display_inactive(inactive),
    }
}

fn display_inactive(inactive: &InactiveAnalysis) {
    let title = if inactive.error { "Analyse en échec" } else { "Analyse inactive" };
    println!("\n== {} ==\n", title);
    println!("  {}", inactive.message);
    match inactive.required_spins {
        Some(required) => println!("  Résultats valides : {}/{}", inactive.current_spins, required),
        None => println!("  Entrées reçues    : {}", inactive.current_spins),
    }
}

fn display_active(a: &ActiveAnalysis) {
    println!("\n== Climat : {} ==\n", a.status);

    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    summary.add_row(vec![
        Cell::new("Statut"),
        Cell::new(a.status.to_string()).fg(status_color(a.status)),
    ]);
    summary.add_row(vec!["Zone dominante".to_string(), format!("{} (densité {})", a.dominant_zone, a.density)]);
    summary.add_row(vec!["Score".to_string(), format!("{} ({:.2} normalisé)", a.score, a.normalized_score)]);
    summary.add_row(vec!["Tendance".to_string(), a.trend.to_string()]);
    summary.add_row(vec!["Action".to_string(), format!("{} (confiance {})", a.action, a.confidence)]);
    summary.add_row(vec!["Passer le tour".to_string(), (if a.should_skip_bet { "oui" } else { "non" }).to_string()]);
    if let Some(prev) = &a.previous_dominant {
        summary.add_row(vec![
            "Fenêtre précédente".to_string(),
            format!("zone {} score {} ({:.2})", prev.zone, prev.score, prev.normalized_score),
        ]);
    }
    if let Some(auto) = &a.auto_skip {
        let suggestion = match (auto.enable, auto.disable) {
            (true, _) => "activer le saut de mise",
            (_, true) => "désactiver le saut de mise",
            _ => "aucune",
        };
        summary.add_row(vec!["Suggestion auto".to_string(), suggestion.to_string()]);
    }
    summary.add_row(vec![
        "Fenêtre".to_string(),
        format!("{} / {} valides ({} ignorés)", a.window_size, a.total_spins, a.ignored_entries),
    ]);
    println!("{summary}");
    println!("\n  {}\n", a.recommendation);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rang", "Zone", "Touches", "Densité", "Score", "Normalisé", ""]);

    let max = a.statistics.max.max(1) as f64;
    for (rank, entry) in a.ranking.iter().enumerate() {
        let bar = "█".repeat((entry.score as f64 / max * 20.0).round() as usize);
        let zone_cell = if entry.zone == a.dominant_zone {
            Cell::new(entry.zone.to_string()).fg(status_color(a.status))
        } else {
            Cell::new(entry.zone.to_string())
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            zone_cell,
            Cell::new(a.hit_counts[entry.zone]),
            Cell::new(entry.density),
            Cell::new(entry.score),
            Cell::new(format!("{:.3}", entry.normalized_score)),
            Cell::new(bar),
        ]);
    }
    println!("{table}");

    println!(
        "  Total {} · moyenne {:.2} · min {} · max {} · total normalisé {:.3}",
        a.statistics.total, a.statistics.average, a.statistics.min, a.statistics.max, a.statistics.normalized_total
    );
}

pub fn display_wheel(mapper: &ZoneMapper) {
    println!("\n== Zones de la roue ==\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Zone", "Segments", "Densité (1)"]);
    for zone in Zone::ALL {
        let range = zone.segments();
        table.add_row(vec![
            zone.to_string(),
            format!("{}–{}", range.start(), range.end()),
            mapper.density_of(zone).to_string(),
        ]);
    }
    println!("{table}");

    println!("\n== Segments par résultat ==\n");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Résultat", "Nb", "Segments"]);
    for outcome in Outcome::ALL {
        let segments = mapper.segments_of(outcome).unwrap_or(&[]);
        let list = segments.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ");
        let label = if outcome.is_target() {
            format!("{} (cible)", outcome)
        } else if !outcome.has_betting_value() {
            format!("{} (sans mise)", outcome)
        } else {
            outcome.to_string()
        };
        table.add_row(vec![label, segments.len().to_string(), list]);
    }
    println!("{table}");
}
