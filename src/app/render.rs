//! Plain-text rendering for CLI output.

use crate::config::Config;
use crate::core::catalog::CatalogSnapshot;
use crate::core::ledger::{RatedHash, RatingCounts};
use crate::core::mixing::{Liquid, RatedAnalysis, RatedSuggestion};
use std::fmt::Write as _;

pub fn render_status(config: &Config) -> String {
    let catalog_location = match config.catalog.source {
        crate::config::CatalogSourceKind::File => config.catalog.path.clone(),
        crate::config::CatalogSourceKind::Http => {
            config.catalog.url.clone().unwrap_or_else(|| "(unset)".into())
        }
    };
    let lines = [
        "◆ liquidmix status".to_string(),
        String::new(),
        format!("Version     {}", env!("CARGO_PKG_VERSION")),
        format!("Workspace   {}", config.workspace_dir.display()),
        format!("Config      {}", config.config_path.display()),
        String::new(),
        format!("Catalog     {} ({catalog_location})", config.catalog.source),
        format!(
            "  refresh   {}",
            match config.catalog.refresh_secs {
                0 => "every request".to_string(),
                secs => format!("every {secs}s"),
            }
        ),
        format!(
            "Ledger      {} ({})",
            config.ledger.backend,
            config.ledger.db_path(&config.workspace_dir).display()
        ),
        format!(
            "Mixing      {} suggestions, pool {}, tolerance ±{}",
            config.mixing.max_suggestions,
            config.mixing.candidate_pool,
            config.mixing.percentage_tolerance
        ),
        format!(
            "Gateway     {}:{}{}",
            config.gateway.host,
            config.gateway.port,
            if config.gateway.allow_public_bind {
                " (public bind allowed)"
            } else {
                ""
            }
        ),
        format!("Log level   {}", config.observability.log_level),
    ];
    lines.join("\n")
}

fn render_rating(counts: &RatingCounts) -> String {
    match counts.approval() {
        Some(approval) => format!(
            "👍 {} 👎 {} ({:.0}% approval)",
            counts.likes,
            counts.dislikes,
            approval * 100.0
        ),
        None => "no votes yet".to_string(),
    }
}

pub fn render_suggestions(suggestions: &[RatedSuggestion]) -> String {
    if suggestions.is_empty() {
        return "No in-stock blend matches this target.".to_string();
    }

    let mut out = String::new();
    for (rank, rated) in suggestions.iter().enumerate() {
        let s = &rated.suggestion;
        let _ = writeln!(out, "{}. {}  [{}]", rank + 1, s.name, s.difficulty);
        for component in s.composition.iter() {
            let _ = writeln!(out, "     {:>3}%  {}", component.percentage, component.liquid_id);
        }
        let p = &s.estimated_profile;
        let _ = writeln!(
            out,
            "   profile: menthol {:.1} · sweetness {:.1} · complexity {:.1} · intensity {:.1}",
            p.menthol_level, p.sweetness, p.complexity, p.intensity
        );
        let _ = writeln!(
            out,
            "   match {:.0}% · price {:.2} · {}",
            s.match_score * 100.0,
            s.estimated_price,
            render_rating(&rated.rating)
        );
        let _ = writeln!(out, "   hash {}", s.hash);
    }
    out.trim_end().to_string()
}

pub fn render_analysis(rated: &RatedAnalysis) -> String {
    let a = &rated.analysis;
    let p = &a.estimated_profile;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Compatibility {} · score {}/100 · total {}%",
        a.compatibility, a.score, a.total_percentage
    );
    let _ = writeln!(
        out,
        "Profile: menthol {:.1} · sweetness {:.1} · complexity {:.1} · intensity {:.1}",
        p.menthol_level, p.sweetness, p.complexity, p.intensity
    );
    if !a.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for warning in &a.warnings {
            let _ = writeln!(out, "  ! {warning}");
        }
    }
    let _ = writeln!(out, "\nRecommendations:");
    for rec in &a.recommendations {
        let _ = writeln!(out, "  › {rec}");
    }
    let _ = writeln!(out, "\nRatings: {}", render_rating(&rated.rating));
    let _ = write!(out, "Hash:    {}", a.hash);
    out
}

pub fn render_counts(rated: &RatedHash) -> String {
    format!("{}  {}", rated.hash, render_rating(&rated.counts))
}

pub fn render_top(top: &[RatedHash]) -> String {
    if top.is_empty() {
        return "No blends have been rated yet.".to_string();
    }
    top.iter()
        .enumerate()
        .map(|(rank, rated)| {
            format!(
                "{:>3}. {:+}  {}",
                rank + 1,
                rated.counts.net(),
                render_counts(rated)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_catalog<'a>(
    snapshot: &CatalogSnapshot,
    liquids: impl Iterator<Item = &'a Liquid>,
) -> String {
    let mut out = String::new();
    let mut shown = 0usize;
    for l in liquids {
        shown += 1;
        let _ = writeln!(
            out,
            "{} {:<12} {:<28} M{:>2} S{:>2} I{:>2} C{:>2}  VG{:>3}  stock {:>4}  {:.2}",
            l.primary_flavor.icon(),
            l.id,
            l.name,
            l.menthol_level,
            l.sweetness,
            l.intensity,
            l.complexity,
            l.vg_ratio,
            l.stock,
            l.price
        );
    }
    let _ = write!(
        out,
        "{shown} of {} liquids (fetched {})",
        snapshot.len(),
        snapshot.fetched_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    out
}
