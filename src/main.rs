//! labelx CLI
//!
//! Command line tool for creating GitLab labels and badges

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use labelx::{
    provision, ApplyObserver, ApplyResult, HttpTransport, ItemKind, ItemOutcome, OverrideStatus,
    ProvisionRequest, Result, Settings, SkipReason, Target,
};

/// Width of divider lines
const MAX_COL_LENGTH: usize = 88;

/// labelx CLI
///
/// GitLab label/badge creator control panel
#[derive(Parser)]
#[command(
    name = "labelx",
    version,
    about = "GitLab label/badge creator control panel",
    long_about = "Creates a standard set of labels or badges on a GitLab project or group. \
    Connection settings are read from ~/.config/labelx, ./labelx or /etc/labelx (config.yaml / config.yml).",
    infer_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Turns on DEBUG mode
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file path (replaces the default search path; repeatable)
    #[arg(short = 'c', long = "config", global = true)]
    config: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create labels for issues and merge requests
    #[command(alias = "labels")]
    CreateLabels(TargetArgs),

    /// Create badges for a project or group
    #[command(alias = "badges")]
    CreateBadges(TargetArgs),

    /// Show package information
    PkgInfo {
        /// Show author information
        #[arg(long, hide = true)]
        author: bool,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Numeric project ID
    #[arg(short = 'p', long = "project-id")]
    project_id: Option<u64>,

    /// Numeric group ID
    #[arg(short = 'g', long = "group-id")]
    group_id: Option<u64>,

    /// Definitions file (.yaml/.yml) merged over the defaults
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.debug) {
        eprintln!("{} {:#}", "[x] ERROR:".red(), e);
    }

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", format!("[x] ERROR: {}", e).red());
            1
        }
    };
    std::process::exit(code);
}

/// Install the log subscriber
fn init_logging(debug: bool) -> anyhow::Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;
    Ok(())
}

/// Dispatch a parsed command line
async fn run(cli: Cli) -> Result<()> {
    let config_paths = (!cli.config.is_empty()).then_some(cli.config);

    match cli.command {
        Commands::CreateLabels(args) => {
            run_create(ItemKind::Label, args, config_paths, cli.debug).await
        }
        Commands::CreateBadges(args) => {
            run_create(ItemKind::Badge, args, config_paths, cli.debug).await
        }
        Commands::PkgInfo { author } => {
            show_info(author);
            Ok(())
        }
    }
}

/// Execute a create command
async fn run_create(
    kind: ItemKind,
    args: TargetArgs,
    config_paths: Option<Vec<PathBuf>>,
    debug: bool,
) -> Result<()> {
    banner();
    if debug {
        println!("{}{}", "[+] ".yellow(), "DEBUG mode is ON".black().on_yellow());
    }
    initial_message();

    let target = Target::from_ids(args.project_id, args.group_id)?;
    tracing::debug!(?target, "target resolved");

    let request = ProvisionRequest {
        kind,
        target,
        config_paths,
        definitions_file: args.file,
    };

    let mut progress = ProgressPrinter;
    let report = provision(
        request,
        &Settings::default(),
        HttpTransport::new(),
        &mut progress,
    )
    .await?;

    if let OverrideStatus::Unsupported { path } = &report.override_status {
        println!(
            "{}",
            format!(
                "[!] Ignored [{}]: only .yaml and .yml definition files are allowed",
                path.display()
            )
            .yellow()
        );
    }

    goodbye(Some(&report.result));
    Ok(())
}

/// Prints per-item progress lines
struct ProgressPrinter;

impl ApplyObserver for ProgressPrinter {
    fn on_item_start(&mut self, kind: ItemKind, name: &str) {
        print!(
            "{}",
            format!("[$] Creating {} - [{}].....", kind.singular(), name).blue()
        );
        let _ = std::io::stdout().flush();
    }

    fn on_item_done(&mut self, _kind: ItemKind, outcome: &ItemOutcome) {
        println!("{}", outcome_label(outcome));
    }
}

/// Status text printed after a progress line
fn outcome_label(outcome: &ItemOutcome) -> colored::ColoredString {
    match outcome {
        ItemOutcome::Created { .. } => "DONE".green(),
        ItemOutcome::Skipped {
            reason: SkipReason::Rejected { reason, .. },
            ..
        } => format!("FAILED ({})", reason).red(),
        ItemOutcome::Skipped {
            reason: SkipReason::Serialization(e),
            ..
        } => format!("SKIPPED ({})", e).red(),
    }
}

/// Build a divider line with an optional headline
fn divider_line(text: &str, ch: char) -> String {
    let deco_len = (MAX_COL_LENGTH.saturating_sub(text.chars().count()) / 2).saturating_sub(2);
    let deco = ch.to_string().repeat(deco_len);
    let headline = if text.is_empty() {
        String::new()
    } else {
        format!(" {} ", text)
    };
    let mut line = format!("{deco}{headline}{deco}");
    let len = line.chars().count();
    if len < MAX_COL_LENGTH {
        line.push_str(&ch.to_string().repeat(MAX_COL_LENGTH - len));
    }
    line
}

fn divider(text: &str) {
    println!("{}", divider_line(text, '-').magenta());
}

fn banner() {
    let border = format!("+{}+", "-".repeat(50));
    println!("{}", border.green());
    println!("{}", format!("|{:^50}|", env!("CARGO_PKG_NAME")).green());
    println!("{}", border.green());
    println!("{}", format!("| {:<49}|", "about: GitLab label/badge creator").green());
    println!(
        "{}",
        format!("| {:<49}|", format!("version: {}", env!("CARGO_PKG_VERSION"))).green()
    );
    println!(
        "{}",
        format!("| {:<49}|", format!("license: {}", env!("CARGO_PKG_LICENSE"))).green()
    );
    println!("{}", border.green());
}

fn initial_message() {
    println!("{}", "[*] Initializing.....".cyan());
    println!(
        "{}",
        "[*] Please use 'labelx --help' to see all available options".cyan()
    );
    divider(&format!("[{}]", env!("CARGO_PKG_NAME")));
}

/// Summary rows for a finished run
///
/// Totals are always present; the skipped names only when something was skipped.
fn summary_lines(result: &ApplyResult) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("Total attempted", result.total_attempted().to_string()),
        ("Total skipped", result.total_skipped().to_string()),
    ];
    if result.has_skips() {
        lines.push(("Skipped ", format!("{:?}", result.skipped)));
    }
    lines
}

/// Package information rows
fn info_lines(author: bool) -> Vec<(&'static str, &'static str)> {
    let mut info = vec![
        ("Package Name", env!("CARGO_PKG_NAME")),
        ("Version", env!("CARGO_PKG_VERSION")),
    ];
    if author {
        info.push(("Author", env!("CARGO_PKG_AUTHORS")));
    }
    info.push(("License", env!("CARGO_PKG_LICENSE")));
    info
}

fn print_rows<V: AsRef<str>>(rows: &[(&str, V)]) {
    for (key, value) in rows {
        println!("{} {}", format!("[*] {}:", key).cyan(), value.as_ref().yellow());
    }
}

/// Display the closing summary
fn goodbye(result: Option<&ApplyResult>) {
    if let Some(result) = result {
        divider("Before we leave, Please note");
        print_rows(&summary_lines(result));
    }
    divider("Goodbye!");
}

/// Display package information
fn show_info(author: bool) {
    if author {
        divider("Author Information");
    } else {
        divider("Package Information");
    }
    print_rows(&info_lines(author));
    goodbye(None);
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- argument parsing tests ---

    #[test]
    fn test_parse_create_labels_with_project() {
        let cli = Cli::try_parse_from(["labelx", "create-labels", "-p", "1234"]).unwrap();
        match cli.command {
            Commands::CreateLabels(args) => {
                assert_eq!(args.project_id, Some(1234));
                assert_eq!(args.group_id, None);
            }
            _ => panic!("expected create-labels"),
        }
    }

    #[test]
    fn test_parse_create_badges_with_group_and_file() {
        let cli = Cli::try_parse_from([
            "labelx",
            "create-badges",
            "--group-id",
            "7",
            "-f",
            "badges.yml",
            "--debug",
        ])
        .unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::CreateBadges(args) => {
                assert_eq!(args.group_id, Some(7));
                assert_eq!(args.file, Some(PathBuf::from("badges.yml")));
            }
            _ => panic!("expected create-badges"),
        }
    }

    #[test]
    fn test_parse_aliases_and_prefixes() {
        let cli = Cli::try_parse_from(["labelx", "labels", "-p", "1"]).unwrap();
        assert!(matches!(cli.command, Commands::CreateLabels(_)));

        let cli = Cli::try_parse_from(["labelx", "create-b", "-p", "1"]).unwrap();
        assert!(matches!(cli.command, Commands::CreateBadges(_)));

        assert!(Cli::try_parse_from(["labelx", "create-", "-p", "1"]).is_err());
    }

    #[test]
    fn test_parse_repeated_config_paths() {
        let cli = Cli::try_parse_from([
            "labelx", "-c", "a.yaml", "-c", "b.yml", "pkg-info",
        ])
        .unwrap();
        assert_eq!(
            cli.config,
            vec![PathBuf::from("a.yaml"), PathBuf::from("b.yml")]
        );
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["labelx", "create-labels", "-p", "abc"]).is_err());
    }

    // --- run tests ---

    #[tokio::test]
    async fn test_run_rejects_both_ids() {
        let cli =
            Cli::try_parse_from(["labelx", "create-labels", "-p", "1", "-g", "2"]).unwrap();
        let result = run(cli).await;
        assert!(matches!(result, Err(labelx::Error::InvalidTarget(_))));
    }

    #[tokio::test]
    async fn test_run_rejects_missing_ids() {
        let cli = Cli::try_parse_from(["labelx", "create-badges"]).unwrap();
        let result = run(cli).await;
        assert!(matches!(result, Err(labelx::Error::InvalidTarget(_))));
    }

    #[tokio::test]
    async fn test_run_reports_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.yaml");
        let cli = Cli::try_parse_from([
            "labelx",
            "-c",
            missing.to_str().unwrap(),
            "create-labels",
            "-p",
            "1",
        ])
        .unwrap();
        let result = run(cli).await;
        assert!(matches!(result, Err(labelx::Error::ConfigNotFound { .. })));
    }

    // --- display tests ---

    #[test]
    fn test_divider_line_width() {
        assert_eq!(divider_line("", '-').chars().count(), MAX_COL_LENGTH);
        let line = divider_line("Goodbye!", '=');
        assert_eq!(line.chars().count(), MAX_COL_LENGTH);
        assert!(line.contains(" Goodbye! "));
        assert!(line.starts_with('='));
    }

    #[test]
    fn test_outcome_label() {
        let done = ItemOutcome::Created {
            name: "bug".to_string(),
            status: 201,
        };
        assert!(outcome_label(&done).to_string().contains("DONE"));

        let failed = ItemOutcome::Skipped {
            name: "bug".to_string(),
            reason: SkipReason::Rejected {
                status: 409,
                reason: "Conflict".to_string(),
            },
        };
        assert!(outcome_label(&failed).to_string().contains("FAILED (Conflict)"));
    }

    #[test]
    fn test_summary_of_clean_run() {
        let mut result = ApplyResult::new();
        result.record(ItemOutcome::Created {
            name: "bug".to_string(),
            status: 201,
        });
        result.record(ItemOutcome::Created {
            name: "feature".to_string(),
            status: 201,
        });

        let lines = summary_lines(&result);
        assert_eq!(
            lines,
            vec![
                ("Total attempted", "2".to_string()),
                ("Total skipped", "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_summary_with_skips() {
        let mut result = ApplyResult::new();
        result.record(ItemOutcome::Created {
            name: "feature".to_string(),
            status: 201,
        });
        result.record(ItemOutcome::Skipped {
            name: "bug".to_string(),
            reason: SkipReason::Serialization("key must be a string".to_string()),
        });

        let lines = summary_lines(&result);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], ("Total attempted", "2".to_string()));
        assert_eq!(lines[1], ("Total skipped", "1".to_string()));
        assert_eq!(lines[2], ("Skipped ", r#"["bug"]"#.to_string()));
    }

    #[test]
    fn test_info_lines() {
        let info = info_lines(false);
        let keys: Vec<&str> = info.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["Package Name", "Version", "License"]);
        assert_eq!(info[0].1, "labelx");
        assert_eq!(info[2].1, "GPL-3.0-only");

        let info = info_lines(true);
        let keys: Vec<&str> = info.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["Package Name", "Version", "Author", "License"]);
    }
}
