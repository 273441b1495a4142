//! sync-launch: regenerate VS Code debug launches for built test executables

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

use athena_devtools::commands::sync_launch::{self, SyncOptions};
use athena_devtools::config::{
    ProjectConfig, TargetPlatform, DEFAULT_BUILD_OUTPUT_DIR, DEFAULT_PRE_LAUNCH_TASK,
};
use athena_devtools::vscode::Debugger;

#[derive(Parser)]
#[command(name = "sync-launch")]
#[command(about = "Sync .vscode/launch.json with the executables in the build directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Build output directory, relative to the project root
    #[arg(short, long, default_value = DEFAULT_BUILD_OUTPUT_DIR)]
    build_dir: PathBuf,

    /// Debugger preset: gdb or lldb
    #[arg(short, long, default_value = "gdb")]
    debugger: String,

    /// Executable format to look for: windows (.exe) or unix (execute bit)
    #[arg(short, long, default_value = "windows")]
    target: String,

    /// Task run before each debug session
    #[arg(long, default_value = DEFAULT_PRE_LAUNCH_TASK)]
    pre_launch_task: String,

    /// Show the resulting launch.json without writing it
    #[arg(short = 'n', long)]
    dry_run: bool,
}

fn run(cli: Cli) -> Result<()> {
    let debugger =
        Debugger::from_str(&cli.debugger).context("Invalid debugger. Use 'gdb' or 'lldb'")?;
    let target =
        TargetPlatform::from_str(&cli.target).context("Invalid target. Use 'windows' or 'unix'")?;

    let mut config = ProjectConfig::discover(cli.project_root)?;
    config.build_output_dir = cli.build_dir;

    let options = SyncOptions {
        debugger,
        target,
        pre_launch_task: cli.pre_launch_task,
        dry_run: cli.dry_run,
    };

    sync_launch::execute(&config, &options)?;
    Ok(())
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
            ExitCode::from(sync_launch::exit_code(&err))
        }
    }
}
