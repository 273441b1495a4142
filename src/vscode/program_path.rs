//! Matching launch `program` strings against a directory
//!
//! Program paths in launch.json are free-form strings: they may use either
//! separator, start with `${workspaceFolder}`, be relative to the workspace,
//! or contain `.`/`..` segments. Both sides are reduced to lowercase segment
//! lists and compared segment by segment, so `build/AthenaTestsOld` never
//! matches `build/AthenaTests`.

use std::path::Path;

/// Variables VS Code expands to the workspace root
const WORKSPACE_VARIABLES: &[&str] = &["${workspaceFolder}", "${workspaceRoot}"];

/// Split a path string into normalized segments
///
/// Workspace variables are expanded to `workspace_root`, relative paths are
/// anchored at `workspace_root`, and `.`/`..` are resolved lexically. The
/// filesystem is never consulted, so the program does not need to exist.
pub fn normalized_segments(path: &str, workspace_root: &Path) -> Vec<String> {
    let root = workspace_root.to_string_lossy().replace('\\', "/");

    let mut expanded = path.replace('\\', "/");
    for var in WORKSPACE_VARIABLES {
        expanded = expanded.replace(var, &root);
    }

    if !is_absolute(&expanded) {
        expanded = format!("{}/{}", root, expanded);
    }

    let mut segments: Vec<String> = Vec::new();
    for segment in expanded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s.to_lowercase()),
        }
    }
    segments
}

/// Whether `program` names something strictly inside `dir`
pub fn is_inside(program: &str, dir: &Path, workspace_root: &Path) -> bool {
    let program = normalized_segments(program, workspace_root);
    let dir = normalized_segments(&dir.to_string_lossy(), workspace_root);

    program.len() > dir.len() && program.starts_with(&dir)
}

/// `/x`, `//server/share` or `C:/x`
fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn root() -> PathBuf {
        PathBuf::from("/work/athena")
    }

    fn build_dir() -> PathBuf {
        root().join("build/AthenaTests")
    }

    fn stale(program: &str) -> bool {
        is_inside(program, &build_dir(), &root())
    }

    #[test]
    fn test_normalized_segments() {
        assert_eq!(
            normalized_segments("${workspaceFolder}/Build/./x/../App.exe", &root()),
            vec!["work", "athena", "build", "app.exe"]
        );
    }

    #[test]
    fn test_relative_path_is_anchored_at_root() {
        assert_eq!(
            normalized_segments("build/App.exe", &root()),
            vec!["work", "athena", "build", "app.exe"]
        );
    }

    #[test]
    fn test_workspace_folder_program() {
        assert!(stale("${workspaceFolder}/build/AthenaTests/App.exe"));
        assert!(stale("${workspaceRoot}/build/AthenaTests/App.exe"));
    }

    #[test]
    fn test_backslashes_and_case() {
        assert!(stale(r"${workspaceFolder}\build\AthenaTests\App.exe"));
        assert!(stale("${workspaceFolder}/BUILD/athenatests/App.exe"));
    }

    #[test]
    fn test_absolute_and_relative_programs() {
        assert!(stale("/work/athena/build/AthenaTests/Tests.exe"));
        assert!(stale("build/AthenaTests/Tests.exe"));
        assert!(stale("./build/../build/AthenaTests/Tests.exe"));
    }

    #[test]
    fn test_partial_name_collision_is_not_inside() {
        assert!(!stale("${workspaceFolder}/build/AthenaTestsOld/App.exe"));
        assert!(!stale("${workspaceFolder}/build/Athena/App.exe"));
    }

    #[test]
    fn test_directory_itself_is_not_inside() {
        assert!(!stale("${workspaceFolder}/build/AthenaTests"));
        assert!(!stale("${workspaceFolder}/build/AthenaTests/"));
    }

    #[test]
    fn test_unrelated_programs() {
        assert!(!stale("/usr/bin/python3"));
        assert!(!stale("${workspaceFolder}/tools/run.exe"));
        assert!(!stale(""));
    }

    #[test]
    fn test_windows_drive_paths() {
        let root = PathBuf::from(r"C:\Work\Athena");
        let dir = root.join("build").join("AthenaTests");
        assert!(is_inside(
            r"c:\work\athena\build\AthenaTests\App.exe",
            &dir,
            &root
        ));
        assert!(is_inside(
            "${workspaceFolder}/build/AthenaTests/App.exe",
            &dir,
            &root
        ));
    }
}
