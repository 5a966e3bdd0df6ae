use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use slabfit::{ByteSize, CandidateTable, ReconcileConfig, SizeClassTable, SpaceFamily};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gensizeclasses")]
#[command(about = "Generate slab size classes by worst-case packing", long_about = None)]
struct Cli {
    /// Named family of space sizes
    #[arg(long, value_enum, default_value_t = FamilyArg::CacheLinesAndPages)]
    family: FamilyArg,

    /// Space size in bytes (repeatable, overrides --family)
    #[arg(long = "space", value_name = "BYTES")]
    spaces: Vec<usize>,

    /// JSON reconcile configuration (overrides --family and --space)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Largest slot size to sweep for any space
    #[arg(long, value_name = "BYTES")]
    max_slot_size: Option<usize>,

    /// Output format for the final table
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Also print each space's candidate table (text format only)
    #[arg(long, default_value_t = false)]
    candidates: bool,

    /// Report classes gained and lost relative to another family (text format only)
    #[arg(long, value_enum, value_name = "FAMILY")]
    compare: Option<FamilyArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FamilyArg {
    CacheLines,
    Pages,
    CacheLinesAndPages,
    WithDataCaches,
}

impl From<FamilyArg> for SpaceFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::CacheLines => SpaceFamily::CacheLines,
            FamilyArg::Pages => SpaceFamily::Pages,
            FamilyArg::CacheLinesAndPages => SpaceFamily::CacheLinesAndPages,
            FamilyArg::WithDataCaches => SpaceFamily::WithDataCaches,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Rust,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let (table, candidates) = config
        .reconcile_with_candidates()
        .context("failed to reconcile size classes")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.format {
        Format::Text => {
            if cli.candidates {
                for candidate in &candidates {
                    write_candidates(&mut out, candidate)?;
                }
            }
            write_table(&mut out, &config, &table)?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &table)?;
            writeln!(out)?;
        }
        Format::Rust => {
            write!(out, "{}", table.to_rust_const("SIZE_CLASSES"))?;
        }
    }

    if let Some(other) = cli.compare {
        let mut other_config = ReconcileConfig::for_family(other.into());
        other_config.max_slot_size = config.max_slot_size;
        let other_table = other_config
            .reconcile()
            .with_context(|| format!("failed to reconcile comparison family {}", SpaceFamily::from(other)))?;
        write_comparison(&mut out, SpaceFamily::from(other), &table, &other_table)?;
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<ReconcileConfig> {
    if cli.compare.is_some() && cli.format != Format::Text {
        bail!("--compare is only available with --format text");
    }

    let mut config = if let Some(path) = &cli.config {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str::<ReconcileConfig>(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?
    } else if cli.spaces.is_empty() {
        ReconcileConfig::for_family(cli.family.into())
    } else {
        ReconcileConfig::new(cli.spaces.clone())
    };

    if let Some(max) = cli.max_slot_size {
        config.max_slot_size = Some(max);
    }

    if let Err(err) = config.validate() {
        bail!("invalid configuration: {err}");
    }
    Ok(config)
}

fn write_candidates(out: &mut impl Write, table: &CandidateTable) -> Result<()> {
    writeln!(out, "# {} ({} candidates)", ByteSize(table.space_size()), table.len())?;
    writeln!(out, "{:>14} {:>12}", "slot size", "worst case")?;
    for (slot_size, worst_case) in table.iter() {
        writeln!(out, "{:>14} {:>12}", ByteSize(slot_size).to_string(), worst_case)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_table(out: &mut impl Write, config: &ReconcileConfig, table: &SizeClassTable) -> Result<()> {
    let spaces: Vec<String> = config
        .spaces()
        .into_iter()
        .map(|space| ByteSize(space).to_string())
        .collect();
    writeln!(out, "spaces: {}", spaces.join(", "))?;
    writeln!(out, "{} size classes:", table.len())?;
    writeln!(out, "{table}")?;
    Ok(())
}

fn write_comparison(
    out: &mut impl Write,
    other: SpaceFamily,
    table: &SizeClassTable,
    other_table: &SizeClassTable,
) -> Result<()> {
    let gained = table.difference(other_table);
    let lost = other_table.difference(table);
    writeln!(out, "compared with {other}: {} gained, {} lost", gained.len(), lost.len())?;
    if !gained.is_empty() {
        writeln!(out, "  gained: {gained:?}")?;
    }
    if !lost.is_empty() {
        writeln!(out, "  lost: {lost:?}")?;
    }
    Ok(())
}
