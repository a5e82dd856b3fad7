use crate::core::ledger::Vote;
use crate::core::mixing::{Component, Flavor};
use clap::{Parser, Subcommand};

/// `liquidmix` - flavor mixing suggestions, blend analysis and blend ratings.
#[derive(Parser, Debug)]
#[command(name = "liquidmix")]
#[command(author = "theonlyhennygod")]
#[command(version)]
#[command(about = "Suggest, analyze and rate flavor blends.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Suggest blends that approximate a taste target
    Suggest {
        /// Desired flavor (fruit, dessert, menthol, tobacco, beverage, cream, spice)
        #[arg(short, long)]
        flavor: Flavor,

        /// Target menthol level (0-10)
        #[arg(short, long, default_value_t = 0)]
        menthol: u8,

        /// Target sweetness (0-10)
        #[arg(short, long, default_value_t = 5)]
        sweetness: u8,

        /// Target complexity (0-10)
        #[arg(long, default_value_t = 5)]
        complexity: u8,

        /// Maximum liquids per blend (1-5)
        #[arg(long, default_value_t = 3)]
        max_liquids: u8,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Analyze a blend, e.g. `-c mango=60 -c ice=40`
    Analyze {
        /// Component as `liquid_id=percentage` (repeatable)
        #[arg(short = 'c', long = "component", required = true, value_parser = parse_component)]
        components: Vec<Component>,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical form and hash of a blend without touching the catalog
    Hash {
        /// Component as `liquid_id=percentage` (repeatable)
        #[arg(short = 'c', long = "component", required = true, value_parser = parse_component)]
        components: Vec<Component>,
    },

    /// Like or dislike a blend by its hash
    Vote {
        /// Composition hash (64 hex characters)
        hash: String,

        /// like | dislike
        vote: Vote,
    },

    /// Show like/dislike counts for a blend hash
    Ratings {
        /// Composition hash (64 hex characters)
        hash: String,
    },

    /// List the best-rated blends
    Top {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List catalog liquids as the engine sees them
    Catalog {
        /// Only show liquids of this flavor
        #[arg(short, long)]
        flavor: Option<Flavor>,

        /// Hide out-of-stock liquids
        #[arg(long)]
        in_stock: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration
    Status,
}

/// Parses `liquid_id=percentage`; the last `=` separates the share so ids
/// may themselves contain `=`.
pub fn parse_component(raw: &str) -> Result<Component, String> {
    let (id, pct) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected liquid_id=percentage, got {raw:?}"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing liquid id in {raw:?}"));
    }
    let percentage: f64 = pct
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|e| format!("invalid percentage in {raw:?}: {e}"))?;
    Ok(Component::new(id, percentage))
}
