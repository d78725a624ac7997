//! rcextract CLI - runs RC parasitic extraction over a tagged wire
//! geometry file and prints the resulting network.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use rcextract::ingest::IngestSegment;
use rcextract::{Geometry, GeometryConfig};

#[derive(Parser)]
#[command(name = "rcextract")]
#[command(about = "RC parasitic extraction over tagged wire geometry", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract an RC network from a tagged wire geometry file
    Extract {
        /// Path to a JSON array of tagged wire segments
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write the network here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Bucket width of the capacitance spatial index
        #[arg(long)]
        partition_size: Option<f64>,

        /// Buckets scanned out from a segment's own range during a
        /// capacitance query
        #[arg(long)]
        num_bins_neighborhood: Option<i32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Ingest a geometry file and report segment/net counts without
    /// running extraction — useful for sanity-checking a driver's output
    Validate {
        /// Path to a JSON array of tagged wire segments
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// The plain-text `Resistor<...>`/`Capacitor<...>` network format
    Text,
    /// JSON summary (node/resistor/capacitor counts plus the text network)
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Extract {
            input,
            output,
            partition_size,
            num_bins_neighborhood,
            format,
        } => handle_extract(&input, output, partition_size, num_bins_neighborhood, format),
        Commands::Validate { input } => handle_validate(&input),
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_geometry(input: &PathBuf, config: GeometryConfig) -> Result<Geometry, i32> {
    let contents = fs::read_to_string(input).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", input.display());
        1
    })?;
    let entries: Vec<IngestSegment> = serde_json::from_str(&contents).map_err(|e| {
        eprintln!("Error: malformed geometry file {}: {e}", input.display());
        1
    })?;

    let mut geo = Geometry::new(config);
    geo.ingest(entries).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    Ok(geo)
}

fn handle_extract(
    input: &PathBuf,
    output: Option<PathBuf>,
    partition_size: Option<f64>,
    num_bins_neighborhood: Option<i32>,
    format: OutputFormat,
) -> i32 {
    let mut config = GeometryConfig::default();
    if let Some(size) = partition_size {
        config.partition_size = size;
    }
    if let Some(n) = num_bins_neighborhood {
        config.num_bins_neighborhood = n;
    }

    let mut geo = match load_geometry(input, config) {
        Ok(geo) => geo,
        Err(code) => return code,
    };
    tracing::info!(segments = geo.segments().len(), "geometry loaded");

    if let Err(e) = geo.generate_rc_network() {
        eprintln!("Error: {e}");
        return 1;
    }
    tracing::info!(
        resistors = geo.graph().len(),
        capacitors = geo.graph().capacitors().len(),
        "rc network generated"
    );

    let text = geo.render_to_string();
    let rendered = match format {
        OutputFormat::Text => text,
        OutputFormat::Json => serde_json::to_string_pretty(&ExtractSummary {
            segments: geo.segments().len(),
            nodes: geo.node_ids().total_nodes(),
            resistors: geo.graph().len(),
            capacitors: geo.graph().capacitors().len(),
            network: text,
        })
        .expect("summary serializes"),
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, rendered) {
                eprintln!("Error: failed to write {}: {e}", path.display());
                return 1;
            }
        }
        None => print!("{rendered}"),
    }
    0
}

fn handle_validate(input: &PathBuf) -> i32 {
    let geo = match load_geometry(input, GeometryConfig::default()) {
        Ok(geo) => geo,
        Err(code) => return code,
    };
    println!(
        "{} segments across {} nets",
        geo.segments().len(),
        geo.segments().nets_sorted().count()
    );
    0
}

#[derive(serde::Serialize)]
struct ExtractSummary {
    segments: usize,
    nodes: u64,
    resistors: usize,
    capacitors: usize,
    network: String,
}
