//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod inspect;
mod map;
mod utils;
mod validate;

pub use inspect::handle_inspect;
pub use map::handle_map;
pub use validate::handle_validate;
