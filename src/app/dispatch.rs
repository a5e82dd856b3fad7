use crate::cli::{Cli, Commands};
use crate::core::ledger::RatedHash;
use crate::core::mixing::{
    Composition, CompositionHash, MixEngine, TasteTarget, canonical_form, create_mix_engine,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::render;
use crate::Config;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

async fn engine(config: &Config) -> Result<Arc<dyn MixEngine>> {
    create_mix_engine(config)
        .await
        .context("Failed to initialize mix engine")
}

fn parse_hash(raw: &str) -> Result<CompositionHash> {
    Ok(CompositionHash::parse(raw)?)
}

/// Routes a parsed command line to its handler.
pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting liquidmix gateway on {host} (random port)");
            } else {
                info!("Starting liquidmix gateway on {host}:{port}");
            }
            crate::gateway::run_gateway(&host, port, config).await
        }

        Commands::Suggest {
            flavor,
            menthol,
            sweetness,
            complexity,
            max_liquids,
            json,
        } => {
            let target = TasteTarget {
                desired_flavor: flavor,
                menthol_level: menthol.into(),
                sweetness: sweetness.into(),
                complexity: complexity.into(),
                max_liquids: max_liquids.into(),
            };
            let suggestions = engine(&config).await?.suggest(&target).await?;
            if json {
                print_json(&suggestions)
            } else {
                println!("{}", render::render_suggestions(&suggestions));
                Ok(())
            }
        }

        Commands::Analyze { components, json } => {
            let composition = Composition::new(components);
            let analysis = engine(&config).await?.analyze(&composition).await?;
            if json {
                print_json(&analysis)
            } else {
                println!("{}", render::render_analysis(&analysis));
                Ok(())
            }
        }

        Commands::Hash { components } => {
            let composition = Composition::new(components);
            composition.validate(config.mixing.percentage_tolerance)?;
            println!("{}", canonical_form(&composition));
            println!("{}", composition.hash());
            Ok(())
        }

        Commands::Vote { hash, vote } => {
            let hash = parse_hash(&hash)?;
            let counts = engine(&config).await?.vote(&hash, vote).await?;
            println!("{}", render::render_counts(&RatedHash { hash, counts }));
            Ok(())
        }

        Commands::Ratings { hash } => {
            let hash = parse_hash(&hash)?;
            let counts = engine(&config).await?.ratings(&hash).await?;
            println!("{}", render::render_counts(&RatedHash { hash, counts }));
            Ok(())
        }

        Commands::Top { limit, json } => {
            let top = engine(&config).await?.top_rated(limit).await?;
            if json {
                print_json(&top)
            } else {
                println!("{}", render::render_top(&top));
                Ok(())
            }
        }

        Commands::Catalog {
            flavor,
            in_stock,
            json,
        } => {
            let snapshot = engine(&config).await?.catalog().await?;
            let selected = snapshot
                .liquids()
                .iter()
                .filter(|l| flavor.is_none_or(|f| l.primary_flavor == f))
                .filter(|l| !in_stock || l.in_stock());
            if json {
                print_json(&selected.collect::<Vec<_>>())
            } else {
                println!("{}", render::render_catalog(&snapshot, selected));
                Ok(())
            }
        }

        Commands::Status => {
            println!("{}", render::render_status(&config));
            Ok(())
        }
    }
}
