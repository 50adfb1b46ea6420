//! `rainbow` CLI: filter a term listing, find conflicts, and generate
//! conflict-free schedules from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Every conflict-free schedule for two courses and one fixed section
//! rainbow generate --catalog ./catalog --inst MAN --term 202510 \
//!     --cid "ICS 111" --cid "MATH 241" --crn 84321
//!
//! # Morning-only, no Fridays, capped at 50 schedules
//! rainbow generate --inst MAN --term 202510 --cid "ICS 111,ICS 141" \
//!     --start-after 08:00 --end-before 12:00 --day '!F' --max-schedules 50
//!
//! # Which sections match, and which requested items matched nothing
//! rainbow filter --inst MAN --term 202510 --cid "ICS 111" --online true
//!
//! # Pairwise overlaps among hand-picked sections, from a listing file
//! rainbow conflicts -i listing.json --crn 84321,84322,84400
//! ```
//!
//! The catalog directory and search limits default to `RAINBOW_CATALOG`,
//! `RAINBOW_MAX_SCHEDULES` and `RAINBOW_MAX_NODES` (or a file named by
//! `RAINBOW_CONFIG`). Set `RUST_LOG` to see the engine's logs on stderr.

mod config;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rainbow_scheduler::{
    build_filter, find_conflicts, missing_requested, parse_listing, plan, FilterParams,
    JsonCatalog, PlanOutcome, SearchLimits, Section, SectionSource,
};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(
    name = "rainbow",
    version,
    about = "Conflict-free course schedule generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sections matching a request and any requested items that matched nothing
    Filter(RequestArgs),
    /// Generate every conflict-free schedule for a request
    Generate {
        #[command(flatten)]
        request: RequestArgs,
        /// Stop after this many schedules (overrides RAINBOW_MAX_SCHEDULES)
        #[arg(long)]
        max_schedules: Option<usize>,
        /// Stop after this many section placements (overrides RAINBOW_MAX_NODES)
        #[arg(long)]
        max_nodes: Option<usize>,
    },
    /// Print every pairwise time conflict among the matching sections
    Conflicts(RequestArgs),
}

#[derive(Args)]
struct RequestArgs {
    /// Catalog root directory holding <inst>/<term>.json (overrides RAINBOW_CATALOG)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Read one term listing from a file instead of a catalog ("-" for stdin)
    #[arg(short, long, conflicts_with = "catalog")]
    input: Option<String>,
    /// Institution id, e.g. MAN
    #[arg(long)]
    inst: Option<String>,
    /// Term id, e.g. 202510
    #[arg(long)]
    term: Option<String>,
    /// Course reference number; repeat or comma-separate
    #[arg(long)]
    crn: Vec<String>,
    /// Course id such as "ICS 101"; repeat or comma-separate
    #[arg(long)]
    cid: Vec<String>,
    /// Day code (M T W R F S U); prefix with ! to exclude
    #[arg(long)]
    day: Vec<String>,
    /// Earliest allowed start, HH:MM
    #[arg(long)]
    start_after: Option<String>,
    /// Latest allowed end, HH:MM
    #[arg(long)]
    end_before: Option<String>,
    /// Only online (true) or only in-person (false) sections
    #[arg(long)]
    online: Option<String>,
    /// Only synchronous (true) or only asynchronous (false) sections
    #[arg(long)]
    sync: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

impl RequestArgs {
    fn params(&self) -> FilterParams {
        FilterParams {
            crn: self.crn.clone(),
            cid: self.cid.clone(),
            start_after: self.start_after.clone(),
            end_before: self.end_before.clone(),
            online: self.online.clone(),
            sync: self.sync.clone(),
            day: self.day.clone(),
        }
    }
}

/// Where sections come from for one invocation.
enum Listing {
    Catalog {
        catalog: JsonCatalog,
        inst: String,
        term: String,
    },
    Inline(Vec<Section>),
}

impl Listing {
    fn open(args: &RequestArgs, config: &CliConfig) -> Result<Self> {
        if let Some(input) = args.input.as_deref() {
            let raw = read_input(input)?;
            let sections = parse_listing(&raw)
                .with_context(|| format!("Failed to parse listing: {}", input))?;
            return Ok(Listing::Inline(sections));
        }

        let Some(root) = args.catalog.clone().or_else(|| config.catalog.clone()) else {
            bail!("No catalog given: pass --catalog DIR, set RAINBOW_CATALOG, or use --input FILE");
        };
        let (Some(inst), Some(term)) = (args.inst.clone(), args.term.clone()) else {
            bail!("Reading from a catalog requires both --inst and --term");
        };
        Ok(Listing::Catalog {
            catalog: JsonCatalog::new(root),
            inst,
            term,
        })
    }

    fn source(&self) -> (&dyn SectionSource, &str, &str) {
        match self {
            Listing::Catalog {
                catalog,
                inst,
                term,
            } => (catalog as &dyn SectionSource, inst.as_str(), term.as_str()),
            Listing::Inline(sections) => (sections as &dyn SectionSource, "-", "-"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load().context("Failed to load RAINBOW_* configuration")?;
    debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Filter(args) => {
            let listing = Listing::open(&args, &config)?;
            let params = args.params();
            let filter = build_filter(&params).context("Invalid request")?;
            let (source, inst, term) = listing.source();
            let sections = source
                .fetch_sections(inst, term, &filter)
                .context("Failed to fetch sections")?;
            let missing =
                missing_requested(filter.crns(), params.requested_course_ids(), &sections);

            let body = json!({ "sections": sections, "missing": missing });
            write_output(args.output.as_deref(), &to_pretty(&body)?)?;
        }
        Commands::Generate {
            request,
            max_schedules,
            max_nodes,
        } => {
            let listing = Listing::open(&request, &config)?;
            let limits = SearchLimits {
                max_schedules: max_schedules.or(config.max_schedules),
                max_nodes: max_nodes.or(config.max_nodes),
            };
            let (source, inst, term) = listing.source();
            let outcome = plan(source, inst, term, &request.params(), limits)
                .context("Failed to plan schedules")?;

            let body = match outcome {
                PlanOutcome::Scheduled(generation) => json!({
                    "status": "ok",
                    "count": generation.schedules.len(),
                    "truncated": generation.truncated,
                    "nodes_visited": generation.nodes_visited,
                    "schedules": generation.schedules,
                }),
                other => serde_json::to_value(&other)?,
            };
            write_output(request.output.as_deref(), &to_pretty(&body)?)?;
        }
        Commands::Conflicts(args) => {
            let listing = Listing::open(&args, &config)?;
            let filter = build_filter(&args.params()).context("Invalid request")?;
            let (source, inst, term) = listing.source();
            let sections = source
                .fetch_sections(inst, term, &filter)
                .context("Failed to fetch sections")?;

            let conflicts = find_conflicts(&sections);
            let body = json!({ "count": conflicts.len(), "conflicts": conflicts });
            write_output(args.output.as_deref(), &to_pretty(&body)?)?;
        }
    }

    Ok(())
}

fn to_pretty(value: &serde_json::Value) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    out.push('\n');
    Ok(out)
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
