use clap::{CommandFactory, Parser};
use house_report::imaging::RustBackend;
use house_report::report::{self, ReportRequest};
use house_report::{config, convert, output};
use std::path::PathBuf;
use std::process::ExitCode;

/// Env var holding the `env_logger` filter, e.g. `HOUSE_REPORT_LOG=debug`.
const LOG_ENV: &str = "HOUSE_REPORT_LOG";

#[derive(Parser)]
#[command(name = "house-report")]
#[command(about = "Build a home owner's report from a folder of captioned photos")]
#[command(long_about = "\
Build a home owner's report from a folder of captioned photos

Every photo in --photo-path whose Windows \"Comments\" field (EXIF XPComment)
is filled in becomes a numbered entry, with the comment as its heading.
Photos without a comment are left out.

Writes report.md (pandoc Markdown with the photos embedded) and report.html
(converted by pandoc) to the working directory.

Settings are read from report.toml in the working directory when present.
Run 'house-report --gen-config' to print a documented report.toml.

Set HOUSE_REPORT_LOG=debug for diagnostics.")]
#[command(version)]
struct Cli {
    /// Name of the person preparing the report
    #[arg(long, default_value = "")]
    author: String,

    /// Address of the property
    #[arg(long, default_value = "")]
    property_address: String,

    /// Directory containing the captioned .jpg photos
    #[arg(long, required_unless_present = "gen_config")]
    photo_path: Option<PathBuf>,

    /// Config file [default: report.toml in the working directory, if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a stock report.toml with all options documented
    #[arg(long)]
    gen_config: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Bash `complete -C` protocol: argv is <command> <current word> <previous word>.
    if completion_requested() {
        let args: Vec<String> = std::env::args().collect();
        for flag in completion_matches(&long_flags(), completion_word(&args)) {
            println!("{}", flag);
        }
        return Ok(());
    }

    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "warn")).init();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&cwd)?,
    };
    let photo_dir = cli.photo_path.ok_or("--photo-path is required")?;

    let request = ReportRequest {
        author: cli.author,
        property_address: cli.property_address,
        photo_dir,
        effective_date: chrono::Local::now().date_naive(),
    };
    let converter = convert::converter_from_config(&config.convert, &cwd);
    let result = report::generate_report(
        &request,
        &config,
        &RustBackend::new(),
        converter.as_ref(),
        &cwd,
    )?;

    output::print_report_output(&result);
    Ok(())
}

/// Both completion variables must be set and non-empty.
fn completion_requested() -> bool {
    ["COMP_LINE", "COMP_POINT"]
        .iter()
        .all(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()))
}

/// The word being completed; empty when bash did not pass one.
fn completion_word(args: &[String]) -> &str {
    args.get(2).map(String::as_str).unwrap_or("")
}

/// Every `--flag` the CLI accepts, including clap's generated ones.
fn long_flags() -> Vec<String> {
    let mut cmd = Cli::command();
    cmd.build();
    cmd.get_arguments()
        .filter_map(|arg| arg.get_long())
        .map(|long| format!("--{long}"))
        .collect()
}

fn completion_matches<'a>(flags: &'a [String], current: &str) -> Vec<&'a str> {
    flags
        .iter()
        .map(String::as_str)
        .filter(|flag| flag.starts_with(current))
        .collect()
}
