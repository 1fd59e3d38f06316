//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior, helpers to load configuration from disk and the reader for the
//! newline-delimited music folder list.

mod folders;
mod load;
mod schema;

pub use folders::{read_folder_list, resolve_folders_file};
pub use load::default_state_dir;
pub use schema::*;

#[cfg(test)]
mod tests;
