//! Project layout and tool configuration
//!
//! Every path the tools touch is derived from a [`ProjectConfig`] built once in
//! the binary, so nothing below re-reads the working directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Subdirectories listed by the structure document when none are given
pub const DEFAULT_TARGET_SUBDIRS: &[&str] = &["src", "tests"];

/// Where the C++ build drops its test executables, relative to the project root
pub const DEFAULT_BUILD_OUTPUT_DIR: &str = "build/AthenaTests";

/// Structure document location, relative to the project root
pub const STRUCTURE_DOC_PATH: &str = "docs/_current_code_dir_structure_.md";

/// VS Code launch file location, relative to the project root
pub const LAUNCH_FILE_PATH: &str = ".vscode/launch.json";

/// Task every generated launch entry runs before starting the debugger
pub const DEFAULT_PRE_LAUNCH_TASK: &str = "build";

/// Paths shared by both tools
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Root of the C++ project (the VS Code `${workspaceFolder}`)
    pub project_root: PathBuf,

    /// Subdirectories to list, in output order
    pub target_subdirs: Vec<String>,

    /// Build output directory, relative to `project_root` unless absolute
    pub build_output_dir: PathBuf,
}

impl ProjectConfig {
    /// Configuration with default targets and build directory
    pub fn new<P: AsRef<Path>>(project_root: P) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
            target_subdirs: DEFAULT_TARGET_SUBDIRS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            build_output_dir: PathBuf::from(DEFAULT_BUILD_OUTPUT_DIR),
        }
    }

    /// Resolve the project root: an explicit path, or the current directory
    pub fn discover(project_root: Option<PathBuf>) -> Result<Self> {
        let root = match project_root {
            Some(p) => p,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };

        let root = root
            .canonicalize()
            .with_context(|| format!("Project root does not exist: {}", root.display()))?;

        Ok(Self::new(strip_windows_prefix(&root)))
    }

    /// Absolute path of the build output directory
    pub fn build_output_path(&self) -> PathBuf {
        self.project_root.join(&self.build_output_dir)
    }

    /// Build output directory as written into launch.json (forward slashes)
    pub fn build_output_display(&self) -> String {
        self.build_output_dir
            .to_string_lossy()
            .replace('\\', "/")
            .trim_end_matches('/')
            .to_string()
    }

    /// Default structure document destination
    pub fn structure_doc_path(&self) -> PathBuf {
        self.project_root.join(STRUCTURE_DOC_PATH)
    }

    /// `.vscode/launch.json` of the project
    pub fn launch_file(&self) -> PathBuf {
        self.project_root.join(LAUNCH_FILE_PATH)
    }
}

/// Platform the build output targets, which decides what counts as an executable
///
/// Defaults to Windows: the Athena test build is MinGW, which is also what the
/// default gdb preset drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPlatform {
    /// `.exe` files
    #[default]
    Windows,
    /// Files with an execute permission bit
    Unix,
}

impl TargetPlatform {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "windows" | "win" => Some(Self::Windows),
            "unix" | "linux" | "macos" => Some(Self::Unix),
            _ => None,
        }
    }

    /// Whether a regular file is a runnable binary on this platform
    pub fn is_executable(self, path: &Path, metadata: &std::fs::Metadata) -> bool {
        if !metadata.is_file() {
            return false;
        }

        match self {
            Self::Windows => path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("exe")),
            Self::Unix => has_execute_bit(path, metadata),
        }
    }
}

#[cfg(unix)]
fn has_execute_bit(_path: &Path, metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

/// No permission bits to check: treat extensionless files as binaries
#[cfg(not(unix))]
fn has_execute_bit(path: &Path, _metadata: &std::fs::Metadata) -> bool {
    path.extension().is_none()
}

/// Strip Windows extended-length path prefix (\\?\)
///
/// `canonicalize()` on Windows yields `\\?\C:\...`, which would leak into
/// console output and path comparisons.
pub fn strip_windows_prefix(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(stripped) = path_str.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::new("/work/athena");
        assert_eq!(config.target_subdirs, vec!["src", "tests"]);
        assert_eq!(config.build_output_dir, PathBuf::from("build/AthenaTests"));
        assert_eq!(config.build_output_display(), "build/AthenaTests");
    }

    #[test]
    fn test_derived_paths() {
        let config = ProjectConfig::new("/work/athena");
        assert_eq!(
            config.launch_file(),
            Path::new("/work/athena").join(".vscode/launch.json")
        );
        assert_eq!(
            config.structure_doc_path(),
            Path::new("/work/athena").join("docs/_current_code_dir_structure_.md")
        );
        assert_eq!(
            config.build_output_path(),
            Path::new("/work/athena").join("build/AthenaTests")
        );
    }

    #[test]
    fn test_build_output_display_normalizes_separators() {
        let mut config = ProjectConfig::new("/work/athena");
        config.build_output_dir = PathBuf::from(r"build\Debug\");
        assert_eq!(config.build_output_display(), "build/Debug");
    }

    #[test]
    fn test_discover_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig::discover(Some(dir.path().to_path_buf())).unwrap();
        assert!(config.project_root.is_absolute());
        assert!(config.project_root.exists());
    }

    #[test]
    fn test_discover_missing_root() {
        let result = ProjectConfig::discover(Some(PathBuf::from("/nonexistent/athena/root")));
        assert!(result.is_err());
    }

    #[test]
    fn test_target_platform_from_str() {
        assert_eq!(TargetPlatform::from_str("windows"), Some(TargetPlatform::Windows));
        assert_eq!(TargetPlatform::from_str("Linux"), Some(TargetPlatform::Unix));
        assert_eq!(TargetPlatform::from_str("wasm"), None);
        assert_eq!(TargetPlatform::default(), TargetPlatform::Windows);
    }

    #[test]
    fn test_windows_executables() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["App.exe", "Tests.EXE", "App.pdb", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.exe")).unwrap();

        let check = |name: &str| {
            let path = dir.path().join(name);
            let metadata = std::fs::metadata(&path).unwrap();
            TargetPlatform::Windows.is_executable(&path, &metadata)
        };

        assert!(check("App.exe"));
        assert!(check("Tests.EXE"));
        assert!(!check("App.pdb"));
        assert!(!check("notes.txt"));
        assert!(!check("nested.exe"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_executables() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("AthenaTests");
        let data = dir.path().join("fixture.bin");
        std::fs::write(&binary, b"").unwrap();
        std::fs::write(&data, b"").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::fs::set_permissions(&data, std::fs::Permissions::from_mode(0o644)).unwrap();

        let binary_meta = std::fs::metadata(&binary).unwrap();
        let data_meta = std::fs::metadata(&data).unwrap();
        assert!(TargetPlatform::Unix.is_executable(&binary, &binary_meta));
        assert!(!TargetPlatform::Unix.is_executable(&data, &data_meta));
    }

    #[test]
    fn test_strip_windows_prefix() {
        let result = strip_windows_prefix(Path::new(r"\\?\C:\path\to\project"));
        assert_eq!(result, PathBuf::from(r"C:\path\to\project"));
    }

    #[test]
    fn test_strip_windows_prefix_unix() {
        let result = strip_windows_prefix(Path::new("/path/to/project"));
        assert_eq!(result, PathBuf::from("/path/to/project"));
    }
}
