//! Structure doc command - Markdown listing of the project's source directories

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use walkdir::WalkDir;

use super::utils;
use crate::config::ProjectConfig;

/// First line of the generated document
pub const DOCUMENT_TITLE: &str = "# Current Code Directory Structure\n";

/// One file or directory found below a scanned target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
    /// 0 for direct children of the target
    pub depth: usize,
}

impl DirectoryEntry {
    /// `- name` for files, `- name/` for directories, two spaces per level
    pub fn render(&self) -> String {
        let indent = "  ".repeat(self.depth);
        let marker = if self.is_dir { "/" } else { "" };
        format!("{}- {}{}", indent, self.name, marker)
    }
}

/// A target subdirectory as it appears in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Listed {
        name: String,
        entries: Vec<DirectoryEntry>,
    },
    Missing {
        name: String,
    },
}

/// Recursively list `root`, depth first, siblings sorted by name
///
/// Symlinks are followed. Any traversal error aborts the listing.
pub fn scan_tree(root: &Path) -> Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to traverse: {}", root.display()))?;
        let is_dir = entry.file_type().is_dir();
        log::debug!("visit {} (dir: {})", entry.path().display(), is_dir);

        entries.push(DirectoryEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir,
            depth: entry.depth() - 1,
        });
    }

    Ok(entries)
}

/// Scan every target subdirectory of the project, in configured order
pub fn collect_sections(config: &ProjectConfig) -> Result<Vec<Section>> {
    let mut sections = Vec::with_capacity(config.target_subdirs.len());

    for name in &config.target_subdirs {
        let path = config.project_root.join(name);

        if path.is_dir() {
            let entries = scan_tree(&path)?;
            println!(
                "{} {}/ ({} entries)",
                "Found:".green(),
                name,
                entries.len()
            );
            sections.push(Section::Listed {
                name: name.clone(),
                entries,
            });
        } else {
            println!("{} {}/ not found", "Warning:".yellow(), name);
            sections.push(Section::Missing { name: name.clone() });
        }
    }

    Ok(sections)
}

/// Render the Markdown document
pub fn render_document(sections: &[Section]) -> String {
    let mut lines = vec![DOCUMENT_TITLE.to_string()];

    for section in sections {
        match section {
            Section::Listed { name, entries } => {
                lines.push(format!("## `{}/`", name));
                lines.extend(entries.iter().map(DirectoryEntry::render));
                lines.push(String::new());
            }
            Section::Missing { name } => {
                lines.push(format!("## `{}/` not found.\n", name));
            }
        }
    }

    lines.join("\n")
}

/// Execute the structure doc command
///
/// Writes to `output`, or to the project's default document path.
pub fn execute(config: &ProjectConfig, output: Option<&Path>, dry_run: bool) -> Result<()> {
    println!("Project root: {}", config.project_root.display());

    let sections = collect_sections(config)?;
    let document = render_document(&sections);

    if dry_run {
        println!();
        println!("{}", document);
        println!();
        println!("{}", "(DRY-RUN) No changes made.".blue());
        return Ok(());
    }

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => config.structure_doc_path(),
    };

    utils::write_atomic(&output_path, &document)?;

    println!(
        "{} {}",
        "Wrote:".green(),
        utils::display_relative(&output_path, &config.project_root)
    );

    Ok(())
}
