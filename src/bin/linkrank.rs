//! Binary entry point for the linkrank link-prediction CLI.
#![forbid(unsafe_code)]

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser, ValueEnum};
use linkrank::{
    config::ScoringConfig,
    graph::{load_graph, LoadOptions},
    metrics::{CounterMetrics, MetricsSnapshot},
    output::{write_ranking, write_ranking_file, OutputFormat},
    scoring::{Metric, Scorer},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "linkrank",
    version,
    about = "Rank the most likely missing links of an undirected graph"
)]
struct Cli {
    #[arg(
        value_name = "GRAPH",
        help = "Edge list, one `u v weight` line per edge, sorted by (v, u)"
    )]
    graph: PathBuf,

    #[arg(short = 'k', long, value_name = "K", help = "Links reported per metric")]
    k: Option<usize>,

    #[arg(long, value_name = "BETA", help = "Katz decay factor (0 < beta < 1)")]
    beta: Option<f64>,

    #[arg(
        long = "metric",
        value_enum,
        action = ArgAction::Append,
        help = "Metric to run (repeatable, defaults to all)"
    )]
    metrics: Vec<MetricArg>,

    #[arg(long, value_name = "DIR", help = "Directory receiving one file per metric")]
    output_dir: Option<PathBuf>,

    #[arg(
        long,
        conflicts_with = "output_dir",
        help = "Write rankings to standard output instead of files"
    )]
    stdout: bool,

    #[arg(long, value_enum, help = "Ranking encoding")]
    format: Option<FormatArg>,

    #[arg(
        long,
        value_name = "FILE",
        env = "LINKRANK_CONFIG",
        help = "TOML configuration file"
    )]
    config: Option<PathBuf>,

    #[arg(long, help = "Sort the edge list instead of requiring (v, u) order")]
    sort_input: bool,

    #[arg(long, help = "Print every adjacency list after loading")]
    print_adjacency: bool,

    #[arg(long, help = "Print scoring counters to stderr when done")]
    stats: bool,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum MetricArg {
    Jaccard,
    Katz,
    CommuteTime,
    CommuteTimeConverged,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Jaccard => Metric::Jaccard,
            MetricArg::Katz => Metric::Katz,
            MetricArg::CommuteTime => Metric::CommuteTime,
            MetricArg::CommuteTimeConverged => Metric::CommuteTimeConverged,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = resolve_config(&cli)?;
    let graph = load_graph(
        &cli.graph,
        LoadOptions {
            sort_input: cfg.input.sort,
        },
    )?;
    if cli.print_adjacency {
        print!("{graph}");
    }

    let counters = Arc::new(CounterMetrics::default());
    let scorer = Scorer::new(&graph, cfg.k)?.with_metrics(counters.clone());
    let format = cfg.output.format;
    let output_dir = cfg
        .output
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let headers = cli.stdout && format == OutputFormat::Text && cfg.metrics.len() > 1;

    for metric in &cfg.metrics {
        let ranking = scorer.rank(*metric, &cfg.params)?;
        if cli.stdout {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if headers {
                writeln!(out, "# {metric}")?;
            }
            write_ranking(&mut out, &ranking, format)?;
        } else {
            write_ranking_file(&output_dir, &ranking, format)?;
        }
    }

    info!(
        metrics = cfg.metrics.len(),
        k = cfg.k,
        "linkrank.run.complete"
    );
    if cli.stats {
        print_stats(format, &counters.snapshot())?;
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ScoringConfig, Box<dyn Error>> {
    let mut cfg = ScoringConfig::load(cli.config.as_deref())?;
    if let Some(k) = cli.k {
        cfg.k = k;
    }
    if let Some(beta) = cli.beta {
        cfg.params.katz.beta = beta;
    }
    if !cli.metrics.is_empty() {
        cfg.metrics = cli.metrics.iter().map(|&m| m.into()).collect();
    }
    if let Some(dir) = &cli.output_dir {
        cfg.output.directory = Some(dir.clone());
    }
    if let Some(format) = cli.format {
        cfg.output.format = format.into();
    }
    if cli.sort_input {
        cfg.input.sort = true;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "linkrank=info",
        1 => "linkrank=debug",
        _ => "linkrank=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

fn print_stats(format: OutputFormat, stats: &MetricsSnapshot) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(stats)?;
            eprintln!("{json}");
        }
        OutputFormat::Text => {
            eprintln!(
                "Scoring: pairs_scored={} heap_accepted={} heap_rejected={} matrix_multiplies={}",
                stats.pairs_scored,
                stats.heap_accepted,
                stats.heap_rejected,
                stats.matrix_multiplies
            );
        }
    }
    Ok(())
}
