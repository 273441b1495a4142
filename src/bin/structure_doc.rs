//! structure-doc: write a Markdown listing of the project's source directories

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

use athena_devtools::commands::structure_doc;
use athena_devtools::config::ProjectConfig;

#[derive(Parser)]
#[command(name = "structure-doc")]
#[command(about = "Write a Markdown listing of the project's source directories", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Subdirectory to list, repeatable (default: src, tests)
    #[arg(short, long = "dir", value_name = "NAME")]
    dirs: Vec<String>,

    /// Output file (default: docs/_current_code_dir_structure_.md)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the document instead of writing it
    #[arg(short = 'n', long)]
    dry_run: bool,
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ProjectConfig::discover(cli.project_root)?;
    if !cli.dirs.is_empty() {
        config.target_subdirs = cli.dirs;
    }

    structure_doc::execute(&config, cli.output.as_deref(), cli.dry_run)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.dry_run {
        println!("{}", "(DRY-RUN MODE - no changes will be made)".blue());
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red(), err);
            ExitCode::FAILURE
        }
    }
}
