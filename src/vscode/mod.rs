//! VS Code workspace files

pub mod launch;
pub mod preset;
pub mod program_path;

pub use launch::{LaunchConfiguration, LaunchFile};
pub use preset::{Debugger, DebuggerPreset};
