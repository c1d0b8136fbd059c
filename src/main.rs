use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use mapgen_core::{
    AdjacencyMode, AdjacencyRuleSet, Direction, GenerationConfig, Grid, MapStore, PatternLibrary,
    Symmetry,
};
use mapgen_store::{run_job, GenerationJob, JsonDirStore, LogSink};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mapgen-studio")]
#[command(about = "Generate tile maps from sample maps with overlapping wave function collapse")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a map and save it to the store
    Generate(GenerateArgs),
    /// Print pattern and adjacency statistics for sample maps
    Inspect(InspectArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Directory of `<id>.json` maps
    #[arg(long)]
    store: PathBuf,

    /// JSON job file; the flags below are ignored when given
    #[arg(long)]
    job: Option<PathBuf>,

    /// Sample map id (repeatable)
    #[arg(long = "source")]
    sources: Vec<String>,

    /// Id to save the result under
    #[arg(long)]
    target: Option<String>,

    #[arg(long, default_value_t = 16)]
    width: usize,

    #[arg(long, default_value_t = 16)]
    height: usize,

    #[arg(long, default_value_t = 3)]
    pattern_size: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Floor id for base-layer holes; 0 picks the dominant sample floor
    #[arg(long, default_value_t = 0)]
    fallback_tile: u32,

    /// Make the output tile seamlessly
    #[arg(long)]
    wrap: bool,
}

impl GenerateArgs {
    fn to_job(&self) -> anyhow::Result<GenerationJob> {
        if let Some(path) = &self.job {
            return GenerationJob::load(path)
                .with_context(|| format!("loading job {}", path.display()));
        }

        let Some(target) = self.target.clone() else {
            bail!("either --job or --target is required");
        };
        if self.sources.is_empty() {
            bail!("at least one --source is required");
        }

        Ok(GenerationJob {
            sources: self.sources.clone(),
            target,
            seed: self.seed,
            config: GenerationConfig {
                fallback_tile_id: self.fallback_tile,
                wrap: self.wrap,
                ..GenerationConfig::new(self.pattern_size, self.width, self.height)
            },
        })
    }
}

#[derive(Args)]
struct InspectArgs {
    #[arg(long)]
    store: PathBuf,

    #[arg(long = "source", required = true)]
    sources: Vec<String>,

    #[arg(long, default_value_t = 3)]
    pattern_size: usize,

    /// Count rotated/reflected windows too
    #[arg(long)]
    all_symmetries: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapgen=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::Generate(args) => generate(args),
        Command::Inspect(args) => inspect(args),
    }
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let job = args.to_job()?;
    let mut store = JsonDirStore::new(&args.store);
    let report = run_job(&mut store, &mut LogSink, &job)
        .with_context(|| format!("generating {}", job.target))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn inspect(args: InspectArgs) -> anyhow::Result<()> {
    let store = JsonDirStore::new(&args.store);
    let samples = args
        .sources
        .iter()
        .map(|id| store.load_grid(id))
        .collect::<Result<Vec<Grid>, _>>()?;

    let symmetry = if args.all_symmetries {
        Symmetry::All
    } else {
        Symmetry::Identity
    };
    let library = PatternLibrary::extract_with(&samples, args.pattern_size, symmetry)?;

    println!("samples:        {}", samples.len());
    println!("pattern size:   {}", library.pattern_size());
    println!("patterns:       {}", library.len());
    println!("total weight:   {}", library.total_weight());
    match library.dominant_floor_id() {
        Some(id) => println!("dominant floor: {}", id),
        None => println!("dominant floor: none"),
    }

    for mode in [AdjacencyMode::Border, AdjacencyMode::Overlap] {
        let rules = AdjacencyRuleSet::build_with(&library, mode);
        let per_direction: Vec<String> = Direction::ALL
            .iter()
            .map(|&dir| {
                let count: usize = library.ids().map(|id| rules.allowed(dir, id).len()).sum();
                format!("{:?}={}", dir, count)
            })
            .collect();
        println!(
            "{:?} rules: {} ({})",
            mode,
            rules.rule_count(),
            per_direction.join(", ")
        );
    }
    Ok(())
}
