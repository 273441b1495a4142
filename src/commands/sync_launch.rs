//! Sync launch command - Regenerate debug entries for built test executables
//!
//! Entries whose program lives in the build output directory belong to this
//! tool and are rebuilt from scratch on every run. Everything else in
//! launch.json is carried through as-is.

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::utils;
use crate::config::{ProjectConfig, TargetPlatform, DEFAULT_PRE_LAUNCH_TASK};
use crate::vscode::launch::{self, LaunchFile};
use crate::vscode::preset::Debugger;
use crate::vscode::program_path;

/// Failures the caller needs to tell apart from ordinary I/O errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Build directory does not exist: {}", path.display())]
    MissingBuildOutputDirectory { path: PathBuf },
}

impl SyncError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingBuildOutputDirectory { .. } => 2,
        }
    }
}

/// Process exit status for a failed run
///
/// A [`SyncError`] anywhere in the chain decides the status; anything else is 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<SyncError>())
        .map(SyncError::exit_code)
        .unwrap_or(1)
}

/// Options for the sync launch command
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Preset used for generated entries
    pub debugger: Debugger,
    /// Decides which files in the build directory are executables
    pub target: TargetPlatform,
    /// Task referenced by every generated entry
    pub pre_launch_task: String,
    /// Report what would be written without touching launch.json
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            debugger: Debugger::default(),
            target: TargetPlatform::default(),
            pre_launch_task: DEFAULT_PRE_LAUNCH_TASK.to_string(),
            dry_run: false,
        }
    }
}

/// Outcome of a synchronization run
#[derive(Debug)]
pub struct SyncReport {
    /// The launch file as written (or as it would be written in dry-run mode)
    pub launch: LaunchFile,
    /// Existing entries kept unchanged
    pub preserved: usize,
    /// Existing entries dropped because they point into the build directory
    pub removed: usize,
    /// Executables an entry was generated for, in output order
    pub executables: Vec<String>,
    /// Whether launch.json was written
    pub written: bool,
}

/// Load launch.json, or start a fresh one if it does not exist yet
pub fn load_launch_file(path: &Path) -> Result<LaunchFile> {
    if path.exists() {
        let launch = LaunchFile::read(path)?;
        println!(
            "Loaded existing launch.json with {} configuration(s).",
            launch.configurations.len()
        );
        Ok(launch)
    } else {
        println!("{} No launch.json yet, creating a new one.", "Note:".yellow());
        Ok(LaunchFile::default())
    }
}

/// Split configurations into (preserved, stale)
///
/// Stale entries run a program inside the build output directory. Entries
/// without a string `program` are always preserved.
pub fn partition_configurations(
    configurations: Vec<Value>,
    config: &ProjectConfig,
) -> (Vec<Value>, Vec<Value>) {
    let build_path = config.build_output_path();

    configurations.into_iter().partition(|entry| {
        let stale = launch::program_of(entry).is_some_and(|program| {
            program_path::is_inside(program, &build_path, &config.project_root)
        });

        log::debug!(
            "{} {:?}",
            if stale { "drop" } else { "keep" },
            launch::name_of(entry).unwrap_or("<unnamed>")
        );
        !stale
    })
}

/// File names of the executables directly inside `build_path`, sorted
///
/// Entries that are not executables for `target` are reported and skipped,
/// including links whose target no longer exists.
pub fn find_executables(build_path: &Path, target: TargetPlatform) -> Result<Vec<String>> {
    if !build_path.is_dir() {
        return Err(SyncError::MissingBuildOutputDirectory {
            path: build_path.to_path_buf(),
        }
        .into());
    }

    let entries = fs::read_dir(build_path)
        .with_context(|| format!("Failed to read: {}", build_path.display()))?;

    let mut listing = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read: {}", build_path.display()))?;
        listing.push((entry.file_name().to_string_lossy().to_string(), entry.path()));
    }
    listing.sort();

    let names: Vec<&str> = listing.iter().map(|(name, _)| name.as_str()).collect();
    println!(
        "Found {} file(s) in {}: {:?}",
        listing.len(),
        build_path.display(),
        names
    );

    let mut executables = Vec::new();

    for (name, path) in listing {
        // Follows symlinks, so a link to a binary counts as one
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("dangling link {}", path.display());
                println!("  {} {} (dangling link)", "Skipped:".dimmed(), name);
                continue;
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to get metadata for: {}", path.display()))
            }
        };

        if target.is_executable(&path, &metadata) {
            executables.push(name);
        } else {
            println!("  {} {}", "Skipped:".dimmed(), name);
        }
    }

    Ok(executables)
}

/// `${workspaceFolder}` joined with a project-relative path
///
/// Absolute paths are returned unchanged.
fn workspace_path(relative: &str) -> String {
    if Path::new(relative).is_absolute() {
        relative.to_string()
    } else if relative.is_empty() || relative == "." {
        "${workspaceFolder}".to_string()
    } else {
        format!("${{workspaceFolder}}/{}", relative)
    }
}

fn join_relative(dir: &str, name: &str) -> String {
    if dir.is_empty() || dir == "." {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// One launch entry per executable, in the given order
pub fn generate_configurations(
    executables: &[String],
    config: &ProjectConfig,
    options: &SyncOptions,
) -> Result<Vec<Value>> {
    let preset = options.debugger.preset();
    let build_dir = config.build_output_display();
    let cwd = workspace_path(&build_dir);

    executables
        .iter()
        .map(|exe| {
            let program = workspace_path(&join_relative(&build_dir, exe));
            println!("  Generating config for: {}", program);

            preset
                .launch_configuration(
                    format!("Debug {}", exe),
                    program,
                    cwd.clone(),
                    &options.pre_launch_task,
                )
                .to_value()
        })
        .collect()
}

/// Replace the stale entries of `launch` with fresh ones
///
/// Reads the build directory but writes nothing.
pub fn synchronize(
    mut launch: LaunchFile,
    config: &ProjectConfig,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let existing = std::mem::take(&mut launch.configurations);
    let (preserved, stale) = partition_configurations(existing, config);

    println!(
        "Preserved {} configuration(s), removing {} stale.",
        preserved.len(),
        stale.len()
    );

    let executables = find_executables(&config.build_output_path(), options.target)?;
    println!(
        "{} {} test executable(s): {:?}",
        "Detected".green(),
        executables.len(),
        executables
    );

    let generated = generate_configurations(&executables, config, options)?;

    let preserved_count = preserved.len();
    launch.configurations = preserved;
    launch.configurations.extend(generated);

    Ok(SyncReport {
        launch,
        preserved: preserved_count,
        removed: stale.len(),
        executables,
        written: false,
    })
}

/// Execute the sync launch command
pub fn execute(config: &ProjectConfig, options: &SyncOptions) -> Result<SyncReport> {
    let launch_file = config.launch_file();

    println!("Workspace: {}", config.project_root.display());
    println!("Looking in build path: {}", config.build_output_path().display());

    let launch = load_launch_file(&launch_file)?;
    let mut report = synchronize(launch, config, options)?;
    let content = report.launch.to_pretty_string()?;

    println!();
    println!("{}", format_summary(&report));

    if options.dry_run {
        println!();
        println!("{}", content);
        println!();
        println!("{}", "(DRY-RUN) No changes made.".blue());
        return Ok(report);
    }

    utils::write_atomic(&launch_file, &content)?;
    report.written = true;

    println!();
    println!(
        "{} {} test debug configuration(s) to {}",
        "Wrote".green(),
        report.executables.len(),
        utils::display_relative(&launch_file, &config.project_root)
    );

    Ok(report)
}

/// Table of the resulting configurations
pub fn format_summary(report: &SyncReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Origin"), Cell::new("Name"), Cell::new("Program")]);

    for (index, entry) in report.launch.configurations.iter().enumerate() {
        let origin = if index < report.preserved {
            "preserved"
        } else {
            "generated"
        };
        table.add_row(vec![
            Cell::new(origin),
            Cell::new(launch::name_of(entry).unwrap_or("-")),
            Cell::new(launch::program_of(entry).unwrap_or("-")),
        ]);
    }

    let mut output = table.to_string();
    output.push_str(&format!(
        "\n\n{} preserved, {} removed, {} generated",
        report.preserved,
        report.removed,
        report.executables.len()
    ));
    output
}
