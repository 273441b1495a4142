//! CLI commands

pub mod structure_doc;
pub mod sync_launch;
pub mod utils;
