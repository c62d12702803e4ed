//! Command implementations for the Breeze CLI.
//!
//! - [`build`] - process the stylesheet and write it to the static destination
//! - [`install`] - download the Tailwind CLI and scaffold project defaults
//!
//! Each command provides an `execute` function that takes the parsed command
//! arguments and returns a Result.

pub mod build;
pub mod install;

pub use build::execute as build_execute;
pub use install::execute as install_execute;
