//! Premium Predictor CLI Module
//!
//! Command-line interface for training, serving and the interactive client.

use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::theme::ColorfulTheme;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::inference::ModelArtifact;
use crate::schema::TARGET_COLUMN;
use crate::server::{DEFAULT_HOST, DEFAULT_MODEL_PATH, DEFAULT_PORT};
use crate::training::{ColumnSummary, TrainEngine, TrainingConfig, TrainingReport};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width
const SUMMARY_VALUES: usize = 10;

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn wait_enter() {
    println!();
    println!("  {}", dim("press enter to continue"));
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
}

/// Prompt theme shared by the launcher and the client form
pub(crate) fn theme() -> ColorfulTheme {
    ColorfulTheme {
        active_item_prefix: dialoguer::console::style("  ›".to_string()).for_stderr().cyan(),
        active_item_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        inactive_item_prefix: dialoguer::console::style("   ".to_string()).for_stderr(),
        inactive_item_style: dialoguer::console::Style::new().for_stderr().color256(245),
        prompt_prefix: dialoguer::console::style("  ?".to_string()).for_stderr().color256(111),
        prompt_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        ..ColorfulTheme::default()
    }
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "premium-predictor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Insurance premium category prediction: training, service and client")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the pipeline on a labeled CSV and save the model artifact
    Train {
        /// Input CSV file with header
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name (after header normalization)
        #[arg(short, long, default_value = TARGET_COLUMN)]
        target: String,

        /// Output model artifact
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        output: PathBuf,

        /// Number of trees in the forest
        #[arg(long, default_value = "300")]
        trees: usize,

        /// Maximum tree depth (0 for unlimited)
        #[arg(long, default_value = "20")]
        max_depth: usize,

        /// Random seed for the split, SMOTE and the forest
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Write the evaluation as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Start the prediction service
    Serve {
        /// Server host
        #[arg(long, env = "API_HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Server port
        #[arg(short, long, env = "API_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Model artifact to load
        #[arg(short, long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },

    /// Interactive terminal client for a running service
    Client {
        /// Service base URL, e.g. http://localhost:8000
        #[arg(long)]
        base_url: Option<String>,
    },
}

// ─── Train ─────────────────────────────────────────────────────────────────────

fn print_column_summary(summaries: &[ColumnSummary]) {
    section("Columns");
    println!("  {:<26} {:<8} {:>6}  {}", muted("Column"), muted("Type"), muted("Unique"), muted("Values"));
    for summary in summaries {
        let mut values = summary.values.join(", ");
        if summary.n_unique > summary.values.len() {
            values.push_str(", …");
        }
        println!(
            "  {:<26} {:<8} {:>6}  {}",
            summary.name,
            summary.dtype.truecolor(140, 140, 140),
            summary.n_unique,
            dim(&values)
        );
    }
}

fn print_training_report(report: &TrainingReport) {
    let eval = &report.evaluation;

    section("Evaluation");
    println!("  {:<16} {}", muted("Classes"), report.classes.join(", "));
    println!("  {:<16} {} train / {} test", muted("Rows"), eval.n_train, eval.n_test);
    println!("  {:<16} {}", muted("SMOTE rows"), report.n_synthetic);
    println!("  {:<16} {}", muted("Accuracy"), format!("{:.4}", eval.accuracy).white().bold());
    println!("  {:<16} {}", muted("F1 (macro)"), format!("{:.4}", eval.f1_macro).white().bold());
    println!("  {:<16} {}", muted("Time"), format!("{:.2}s", report.training_time_secs).white());

    section("Classification report");
    for line in eval.report.to_string().lines() {
        println!("  {}", line);
    }

    section("Confusion matrix (rows = true, columns = predicted)");
    for line in eval.confusion_matrix.to_string().lines() {
        println!("  {}", line);
    }

    section("Top features");
    for (name, importance) in report.feature_importances.iter().take(10) {
        println!("  {:<40} {:.4}", name, importance);
    }
    println!();
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_train(
    data_path: &Path,
    target: &str,
    output: &Path,
    trees: usize,
    max_depth: usize,
    seed: u64,
    test_size: f64,
    report_path: Option<&Path>,
) -> anyhow::Result<()> {
    section("Train");

    let config = TrainingConfig::default()
        .with_target(target)
        .with_n_estimators(trees)
        .with_max_depth(if max_depth == 0 { None } else { Some(max_depth) })
        .with_random_seed(seed)
        .with_test_size(test_size);
    config.validate()?;

    step_run("Loading data");
    let start = Instant::now();
    let df = TrainEngine::load_csv(data_path)?;
    step_done(&format!("{} rows × {} cols in {:.2?}", df.height(), df.width(), start.elapsed()));

    print_column_summary(&TrainEngine::column_summary(&df, SUMMARY_VALUES)?);

    println!();
    step_run(&format!("Training {} trees", trees.to_string().cyan()));
    let engine = TrainEngine::new(config);
    let (pipeline, report) = engine.fit(&df)?;
    step_done(&format!("{:.2}s", report.training_time_secs));

    step_run(&format!("Saving → {}", output.display()));
    ModelArtifact::new(pipeline, report.evaluation.clone()).save(output)?;
    step_done("");

    if let Some(path) = report_path {
        step_run(&format!("Writing report → {}", path.display()));
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        step_done("");
    }

    print_training_report(&report);
    Ok(())
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(host: &str, port: u16, model: &Path) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Insurance Premium Predictor".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Form    ", &format!("http://{}:{}/", host, port)));
    line_box(&kv("Predict ", &format!("http://{}:{}/predict", host, port)));
    line_box(&kv("Health  ", &format!("http://{}:{}/health", host, port)));
    line_box(&kv("Model   ", &model.display().to_string()));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    let config = ServerConfig::default()
        .with_host(host)
        .with_port(port)
        .with_model_path(model);

    run_server(config).await
}

// ─── Client ────────────────────────────────────────────────────────────────────

pub async fn cmd_client(base_url: Option<&str>) -> anyhow::Result<()> {
    crate::client::run_client(base_url).await
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

fn show_help() {
    section("Commands");

    let cmds: &[(&str, &str)] = &[
        ("premium-predictor", "Interactive launcher (default)"),
        ("premium-predictor train -d data.csv", "Train and save insurance_model.bin"),
        ("premium-predictor serve", "Start the prediction service on :8000"),
        ("premium-predictor client", "Terminal client for a running service"),
    ];

    for (cmd, desc) in cmds {
        println!("  {:<44} {}", cmd.white(), muted(desc));
    }

    section("Endpoints");

    let endpoints: &[(&str, &str)] = &[
        ("http://localhost:8000/", "Browser form"),
        ("http://localhost:8000/predict", "POST a feature record"),
        ("http://localhost:8000/health", "Health check"),
    ];

    for (url, desc) in endpoints {
        println!("  {:<44} {}", url.truecolor(120, 170, 255), muted(desc));
    }

    println!();
}

pub async fn cmd_interactive() -> anyhow::Result<()> {
    use dialoguer::{Input, Select};

    println!();
    println!("       {}", "Insurance Premium Predictor".truecolor(120, 170, 255).bold());
    println!("       {}", dim(&format!("v{}  ·  rust", env!("CARGO_PKG_VERSION"))));

    let theme = theme();

    loop {
        let items = &[
            "Train Model           fit and save insurance_model.bin",
            "Start Server          prediction api + form on :8000",
            "Start Client          terminal form for the api",
            "Help                  commands & endpoints",
            "Exit",
        ];

        println!();
        let sel = Select::with_theme(&theme)
            .with_prompt("What would you like to do")
            .items(items)
            .default(0)
            .interact_opt()?;

        match sel {
            Some(0) => {
                let data: String = Input::with_theme(&theme)
                    .with_prompt("Training CSV")
                    .default("insurance.csv".to_string())
                    .interact_text()?;
                if let Err(e) = cmd_train(
                    Path::new(&data),
                    TARGET_COLUMN,
                    Path::new(DEFAULT_MODEL_PATH),
                    300,
                    20,
                    42,
                    0.2,
                    None,
                ) {
                    println!();
                    println!("  {} {}", "training failed:".red().bold(), e);
                }
                wait_enter();
            }
            Some(1) => {
                cmd_serve(DEFAULT_HOST, DEFAULT_PORT, Path::new(DEFAULT_MODEL_PATH)).await?;
                break;
            }
            Some(2) => {
                cmd_client(None).await?;
            }
            Some(3) => {
                show_help();
                wait_enter();
            }
            _ => {
                println!();
                println!("  {}", dim("goodbye"));
                println!();
                break;
            }
        }
    }

    Ok(())
}
