//! The `settings` module loads the client configuration and parses the
//! command line. See `bin/settings_demo.rs` for a binary printing the result.

mod cli;
pub use clap::{Parser, Subcommand};
pub use cli::*;

mod settings;
pub use settings::*;
