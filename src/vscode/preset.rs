//! Debugger presets for generated launch entries
//!
//! Everything in a generated entry that depends on the debugger backend lives
//! in a [`DebuggerPreset`]; the synchronizer only fills in names and paths.

use super::launch::{LaunchConfiguration, SetupCommand};

/// Debugger backend selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Debugger {
    #[default]
    Gdb,
    Lldb,
}

impl Debugger {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gdb" => Some(Self::Gdb),
            "lldb" => Some(Self::Lldb),
            _ => None,
        }
    }

    pub fn preset(self) -> &'static DebuggerPreset {
        match self {
            Self::Gdb => &GDB,
            Self::Lldb => &LLDB,
        }
    }
}

/// Backend-specific fields of a `cppdbg` launch entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuggerPreset {
    pub debugger_type: &'static str,
    pub mi_mode: &'static str,
    pub external_console: bool,
    pub stop_at_entry: bool,
    pub setup_commands: &'static [&'static str],
}

/// MinGW gdb, each debuggee in its own console window
pub const GDB: DebuggerPreset = DebuggerPreset {
    debugger_type: "cppdbg",
    mi_mode: "gdb",
    external_console: true,
    stop_at_entry: false,
    setup_commands: &["-gdb-set new-console on", "-enable-pretty-printing"],
};

pub const LLDB: DebuggerPreset = DebuggerPreset {
    debugger_type: "cppdbg",
    mi_mode: "lldb",
    external_console: false,
    stop_at_entry: false,
    setup_commands: &[],
};

impl DebuggerPreset {
    /// Build a `launch` request for `program`, run from `cwd`
    pub fn launch_configuration(
        &self,
        name: String,
        program: String,
        cwd: String,
        pre_launch_task: &str,
    ) -> LaunchConfiguration {
        LaunchConfiguration {
            name,
            debugger_type: self.debugger_type.to_string(),
            request: "launch".to_string(),
            program,
            args: Vec::new(),
            stop_at_entry: self.stop_at_entry,
            cwd,
            environment: Vec::new(),
            external_console: self.external_console,
            mi_mode: self.mi_mode.to_string(),
            setup_commands: self
                .setup_commands
                .iter()
                .map(|text| SetupCommand::new(text))
                .collect(),
            pre_launch_task: pre_launch_task.to_string(),
        }
    }
}
