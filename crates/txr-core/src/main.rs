//! TXR - confidence intervals for diagnostic-test sensitivity and specificity.
//!
//! Entry point for the `txr` binary:
//! - `sweep`: interval curves over a range of sample sizes
//! - `interval`: a single point estimate
//! - `simulate`: Monte Carlo metric summary
//! - `compare`: rank comparison of two samples

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use txr_common::{format_error_human, Error, MatrixLayout, OutputFormat, Result, StructuredError};
use txr_config::{load_settings, LoadedSettings, ParamRange};
use txr_core::controls::{apply_controls, ControlInput};
use txr_core::exit_codes::ExitCode;
use txr_core::figure::plot_confidence_intervals;
use txr_core::interval::{confidence_interval_txr, SampleCounts};
use txr_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use txr_core::metrics::MetricName;
use txr_core::rank::probability_greater_equal;
use txr_core::simulate::{create_confusion_matrices, SimulationParams};
use txr_core::summary::{render_summary, summarize};

/// Confidence intervals for TPR and TNR
#[derive(Parser)]
#[command(name = "txr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to config.toml (overrides TXR_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interval bounds and widths across a range of total sample sizes
    Sweep(SweepArgs),

    /// Interval bounds at a single sample size
    Interval(IntervalArgs),

    /// Simulate confusion matrices and summarize the derived metrics
    Simulate(SimulateArgs),

    /// Probability that a draw from one sample is >= a draw from another
    Compare(CompareArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// True positive rate
    #[arg(long)]
    tpr: Option<f64>,

    /// True negative rate
    #[arg(long)]
    tnr: Option<f64>,

    /// Fraction of positives in the population
    #[arg(long)]
    prevalence: Option<f64>,

    /// Smallest total sample size
    #[arg(long)]
    ntot_min: Option<u64>,

    /// Largest total sample size
    #[arg(long)]
    ntot_max: Option<u64>,

    /// Significance level
    #[arg(long)]
    alpha: Option<f64>,

    /// Number of sample sizes in the sweep
    #[arg(long)]
    num_points: Option<usize>,
}

#[derive(Args, Debug)]
struct CountArgs {
    /// Number of actual positives
    #[arg(long)]
    n_pos: Option<u64>,

    /// Number of actual negatives
    #[arg(long)]
    n_neg: Option<u64>,

    /// Fraction of positives (used with --n-total)
    #[arg(long)]
    prevalence: Option<f64>,

    /// Total sample size (used with --prevalence)
    #[arg(long)]
    n_total: Option<u64>,
}

#[derive(Args, Debug)]
struct IntervalArgs {
    /// True positive rate
    #[arg(long)]
    tpr: Option<f64>,

    /// True negative rate
    #[arg(long)]
    tnr: Option<f64>,

    /// Significance level
    #[arg(long)]
    alpha: Option<f64>,

    #[command(flatten)]
    counts: CountArgs,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// True positive rate
    #[arg(long)]
    tpr: Option<f64>,

    /// True negative rate
    #[arg(long)]
    tnr: Option<f64>,

    #[command(flatten)]
    counts: CountArgs,

    /// Number of Monte Carlo trials
    #[arg(long)]
    trials: Option<usize>,

    /// Grid layout token ("01" or "10")
    #[arg(long)]
    layout: Option<String>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Include per-trial metric values in JSON output
    #[arg(long)]
    include_values: bool,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// First sample (comma-separated)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    v1: Vec<f64>,

    /// Second sample (comma-separated)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    v2: Vec<f64>,

    /// Metric to compare between two simulated classifiers
    #[arg(long, conflicts_with_all = ["v1", "v2"])]
    metric: Option<String>,

    /// TPR of the first simulated classifier
    #[arg(long, requires = "metric")]
    tpr1: Option<f64>,

    /// TNR of the first simulated classifier
    #[arg(long, requires = "metric")]
    tnr1: Option<f64>,

    /// TPR of the second simulated classifier
    #[arg(long, requires = "metric")]
    tpr2: Option<f64>,

    /// TNR of the second simulated classifier
    #[arg(long, requires = "metric")]
    tnr2: Option<f64>,

    #[command(flatten)]
    counts: CountArgs,

    /// Number of Monte Carlo trials per classifier
    #[arg(long)]
    trials: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved defaults and where they came from
    Show,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    init_logging(&log_config);

    let result = match &cli.command {
        Commands::Sweep(args) => run_sweep(&cli.global, args),
        Commands::Interval(args) => run_interval(&cli.global, args),
        Commands::Simulate(args) => run_simulate(&cli.global, args),
        Commands::Compare(args) => run_compare(&cli.global, args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
        },
        Commands::Version => run_version(&cli.global),
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => report_error(&cli.global, &err),
    };
    std::process::exit(exit_code.as_i32());
}

fn report_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    let use_color = !global.no_color && std::io::stderr().is_terminal();
    eprintln!("{}", format_error_human(err, use_color));
    if global.format.is_machine() {
        println!("{}", StructuredError::from(err).to_json_pretty());
    }
    tracing::debug!(code = err.code(), category = %err.category(), "command failed");
    ExitCode::from_error(err)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load(global: &GlobalOpts) -> Result<LoadedSettings> {
    Ok(load_settings(global.config.as_deref())?)
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn resolve_counts(args: &CountArgs, default_prevalence: f64) -> Result<SampleCounts> {
    SampleCounts::resolve(
        args.n_pos,
        args.n_neg,
        Some(args.prevalence.unwrap_or(default_prevalence)),
        args.n_total,
    )
}

fn run_sweep(global: &GlobalOpts, args: &SweepArgs) -> Result<()> {
    let loaded = load(global)?;
    let d = &loaded.settings.sweep;
    let input = ControlInput {
        tpr: args.tpr.unwrap_or(d.tpr),
        tnr: args.tnr.unwrap_or(d.tnr),
        prevalence: args.prevalence.unwrap_or(d.prevalence),
        ntot_min: args.ntot_min.unwrap_or(d.ntot_min),
        ntot_max: args.ntot_max.unwrap_or(d.ntot_max),
        alpha: args.alpha.unwrap_or(d.alpha),
    };
    let applied = apply_controls(input, args.num_points.unwrap_or(d.num_points))?;
    if !global.quiet {
        for warning in &applied.warnings {
            eprintln!("warning: {warning}");
        }
    }

    let figure = plot_confidence_intervals(&applied.params)?;

    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "confidence_level": applied.confidence_level,
            "warnings": applied.warnings,
            "figure": figure,
        })),
        OutputFormat::Md => {
            print!("{}", figure.to_markdown());
            Ok(())
        }
        OutputFormat::Summary => {
            let s = &figure.sweep;
            let (first, last) = (0, s.len() - 1);
            println!(
                "[{:.0}%] N {}..{}: TPR width {:.4} -> {:.4}, TNR width {:.4} -> {:.4}",
                applied.confidence_level,
                s.n_total[first],
                s.n_total[last],
                s.tpr_upper[first] - s.tpr_lower[first],
                s.tpr_upper[last] - s.tpr_lower[last],
                s.tnr_upper[first] - s.tnr_lower[first],
                s.tnr_upper[last] - s.tnr_lower[last],
            );
            Ok(())
        }
    }
}

fn run_interval(global: &GlobalOpts, args: &IntervalArgs) -> Result<()> {
    let loaded = load(global)?;
    let d = &loaded.settings.sweep;
    let tpr = args.tpr.unwrap_or(d.tpr);
    let tnr = args.tnr.unwrap_or(d.tnr);
    let alpha = args.alpha.unwrap_or(d.alpha);
    let counts = resolve_counts(&args.counts, d.prevalence)?;

    let ci = confidence_interval_txr(tpr, tnr, counts, alpha)?;
    let level = (1.0 - alpha) * 100.0;

    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "tpr": tpr,
            "tnr": tnr,
            "alpha": alpha,
            "confidence_level": level,
            "interval": ci,
        })),
        OutputFormat::Md => {
            println!("| rate | value | n | lower | upper | width |");
            println!("|---|---:|---:|---:|---:|---:|");
            println!(
                "| TPR | {} | {} | {:.4} | {:.4} | {:.4} |",
                tpr, ci.n_pos, ci.tpr.lower, ci.tpr.upper, ci.tpr.width()
            );
            println!(
                "| TNR | {} | {} | {:.4} | {:.4} | {:.4} |",
                tnr, ci.n_neg, ci.tnr.lower, ci.tnr.upper, ci.tnr.width()
            );
            Ok(())
        }
        OutputFormat::Summary => {
            println!(
                "[{:.0}%] TPR [{:.4}, {:.4}] (n={}), TNR [{:.4}, {:.4}] (n={})",
                level, ci.tpr.lower, ci.tpr.upper, ci.n_pos, ci.tnr.lower, ci.tnr.upper, ci.n_neg
            );
            Ok(())
        }
    }
}

fn run_simulate(global: &GlobalOpts, args: &SimulateArgs) -> Result<()> {
    let loaded = load(global)?;
    let s = &loaded.settings;
    let (n_pos, n_neg) = resolve_counts(&args.counts, s.sweep.prevalence)?.split()?;
    let params = SimulationParams::new(
        args.tpr.unwrap_or(s.sweep.tpr),
        args.tnr.unwrap_or(s.sweep.tnr),
        n_pos,
        n_neg,
    );
    let layout = match &args.layout {
        Some(token) => token.parse::<MatrixLayout>()?,
        None => s.simulation.layout,
    };
    let trials = args.trials.unwrap_or(s.simulation.trials);
    let seed = args.seed.or(s.simulation.seed);

    let batch = create_confusion_matrices(&params, trials, layout, &mut seeded_rng(seed))?;
    let metrics = batch.metrics();
    let summary = summarize(&metrics);

    match global.format {
        OutputFormat::Json => {
            let mut payload = serde_json::json!({
                "params": params,
                "trials": trials,
                "layout": layout,
                "seed": seed,
                "summary": summary,
            });
            if args.include_values {
                payload["values"] = serde_json::to_value(&metrics)?;
            }
            print_json(&payload)
        }
        OutputFormat::Md => {
            println!("| metric | mean | std |");
            println!("|---|---:|---:|");
            for row in &summary {
                println!("| {} | {:.6} | {:.6} |", row.metric.label(), row.mean, row.std);
            }
            Ok(())
        }
        OutputFormat::Summary => {
            print!("{}", render_summary(&summary));
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct CompareOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    metric: Option<MetricName>,
    probability: f64,
    n1: usize,
    n2: usize,
    dropped_non_finite: usize,
}

fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

fn run_compare(global: &GlobalOpts, args: &CompareArgs) -> Result<()> {
    let (metric, raw1, raw2) = match &args.metric {
        None => (None, args.v1.clone(), args.v2.clone()),
        Some(name) => {
            let metric: MetricName = name.parse()?;
            let loaded = load(global)?;
            let s = &loaded.settings;
            let (n_pos, n_neg) = resolve_counts(&args.counts, s.sweep.prevalence)?.split()?;
            let trials = args.trials.unwrap_or(s.simulation.trials);
            let layout = s.simulation.layout;
            let mut rng = seeded_rng(args.seed.or(s.simulation.seed));

            let first = SimulationParams::new(
                args.tpr1.unwrap_or(s.sweep.tpr),
                args.tnr1.unwrap_or(s.sweep.tnr),
                n_pos,
                n_neg,
            );
            let second = SimulationParams::new(
                args.tpr2.unwrap_or(s.sweep.tpr),
                args.tnr2.unwrap_or(s.sweep.tnr),
                n_pos,
                n_neg,
            );
            let a = create_confusion_matrices(&first, trials, layout, &mut rng)?.metrics();
            let b = create_confusion_matrices(&second, trials, layout, &mut rng)?.metrics();
            (Some(metric), a.get(metric).to_vec(), b.get(metric).to_vec())
        }
    };

    let v1 = finite(&raw1);
    let v2 = finite(&raw2);
    let dropped = (raw1.len() - v1.len()) + (raw2.len() - v2.len());
    if dropped > 0 {
        tracing::warn!(dropped, "ignoring non-finite values");
    }

    let output = CompareOutput {
        metric,
        probability: probability_greater_equal(&v1, &v2)?,
        n1: v1.len(),
        n2: v2.len(),
        dropped_non_finite: dropped,
    };

    match global.format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Md => {
            println!("| metric | P(v1 >= v2) | n1 | n2 |");
            println!("|---|---:|---:|---:|");
            println!(
                "| {} | {:.6} | {} | {} |",
                metric.map_or("values", MetricName::label),
                output.probability,
                output.n1,
                output.n2
            );
            Ok(())
        }
        OutputFormat::Summary => {
            println!("P(v1 >= v2) = {:.6}", output.probability);
            Ok(())
        }
    }
}

fn run_config_show(global: &GlobalOpts) -> Result<()> {
    let loaded = load(global)?;
    let path = loaded.path.as_ref().map(|p| p.display().to_string());

    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "source": loaded.source.to_string(),
            "path": path,
            "settings": loaded.settings,
            "ranges": ParamRange::ALL,
        })),
        OutputFormat::Md => {
            let text = toml::to_string_pretty(&loaded.settings)
                .map_err(|e| Error::Config(e.to_string()))?;
            println!("# txr config ({})\n", loaded.source);
            if let Some(path) = path {
                println!("Path: `{path}`\n");
            }
            println!("```toml\n{}```", text);
            Ok(())
        }
        OutputFormat::Summary => {
            println!(
                "{} ({})",
                path.as_deref().unwrap_or("built-in defaults"),
                loaded.source
            );
            Ok(())
        }
    }
}

fn run_version(global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "txr_version": env!("CARGO_PKG_VERSION"),
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        })),
        _ => {
            println!("txr {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
