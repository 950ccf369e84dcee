//! Command-line driver: load an instance, run the multi-start search and
//! print the best solution found.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vnf_placer::checkpoint::Checkpointer;
use vnf_placer::instance::parse_instance;
use vnf_placer::multistart::{BestSolution, MultiStartConfig, MultiStartRunner};
use vnf_placer::placer::PlacementStrategy;
use vnf_placer::problem::SearchConfig;
use vnf_placer::router::{AntColonyConfig, RoutingStrategy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlacerArg {
    Random,
    Greedy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RouterArg {
    Greedy,
    AntColony,
}

#[derive(Debug, Parser)]
#[command(name = "vnf-placer", version, about = "Power-aware VNF placement and routing")]
struct Args {
    /// Instance file
    instance: PathBuf,

    /// Independent construct-then-improve starts
    #[arg(long, default_value_t = 8)]
    starts: usize,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Local-search iterations per start
    #[arg(long, default_value_t = 200)]
    iterations: usize,

    #[arg(long, value_enum, default_value_t = PlacerArg::Greedy)]
    placer: PlacerArg,

    #[arg(long, value_enum, default_value_t = RouterArg::Greedy)]
    router: RouterArg,

    /// Skip dead-end hops when routing greedily
    #[arg(long)]
    lookahead: bool,

    /// Ant-colony generations per routing call
    #[arg(long, default_value_t = 100)]
    generations: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Wall-clock limit in seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Directory for scheduled snapshots of the best solution
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,

    /// Snapshot schedule as LABEL:SECONDS, repeatable
    #[arg(long = "checkpoint", value_parser = parse_offset, default_values = ["1m:60", "5m:300"])]
    checkpoints: Vec<(String, Duration)>,
}

fn parse_offset(s: &str) -> Result<(String, Duration)> {
    let Some((label, secs)) = s.split_once(':') else {
        bail!("expected LABEL:SECONDS, got {s:?}");
    };
    if label.is_empty() {
        bail!("empty checkpoint label in {s:?}");
    }
    let secs: u64 = secs
        .parse()
        .with_context(|| format!("invalid seconds in {s:?}"))?;
    Ok((label.to_string(), Duration::from_secs(secs)))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let text = fs::read_to_string(&args.instance)
        .with_context(|| format!("reading {}", args.instance.display()))?;
    let topology = parse_instance(&text)
        .with_context(|| format!("parsing {}", args.instance.display()))?;
    info!(
        nodes = topology.network().num_nodes(),
        servers = topology.network().num_servers(),
        components = topology.num_components(),
        chains = topology.chains().len(),
        "instance loaded"
    );

    let router = match args.router {
        RouterArg::Greedy => RoutingStrategy::Greedy {
            lookahead: args.lookahead,
        },
        RouterArg::AntColony => {
            RoutingStrategy::AntColony(AntColonyConfig::default().with_generations(args.generations))
        }
    };
    let placer = match args.placer {
        PlacerArg::Random => PlacementStrategy::Random,
        PlacerArg::Greedy => PlacementStrategy::Greedy,
    };
    let mut config = MultiStartConfig::default()
        .with_starts(args.starts)
        .with_threads(args.threads)
        .with_placer(placer)
        .with_router(router)
        .with_search(SearchConfig::default().with_max_iterations(args.iterations))
        .with_seed(args.seed);
    if let Some(secs) = args.time_limit {
        config = config.with_time_limit_ms(secs.saturating_mul(1000));
    }

    let best = Arc::new(BestSolution::new());
    let checkpoints = args.checkpoint_dir.as_ref().map(|dir| {
        Checkpointer::spawn(
            Arc::clone(&best),
            args.checkpoints.clone(),
            dir,
            topology.network().num_servers(),
        )
    });

    let result = MultiStartRunner::run_shared(&topology, &config, &best, None);

    if let Some(handle) = checkpoints {
        let written = handle.finish().context("writing checkpoints")?;
        info!(files = written.len(), "checkpoints done");
    }
    let result = result?;

    match result.best {
        Some(best) => {
            println!("{}", best.solution().display(topology.network().num_servers()));
            println!("power={}", best.power());
        }
        None => println!("no solution found"),
    }
    Ok(())
}
