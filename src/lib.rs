//! athena-devtools library
//!
//! Developer tooling for the Athena C++ project: a Markdown listing of the
//! source tree and VS Code debug launches for the built test executables.

pub mod commands;
pub mod config;
pub mod vscode;
