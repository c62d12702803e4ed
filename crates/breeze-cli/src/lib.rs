//! Library surface of the Breeze CLI.
//!
//! Exposes the command implementations and the installer so they can be
//! driven programmatically (and tested) without going through argument
//! parsing.

pub mod cli;
pub mod commands;
pub mod error;
pub mod installer;
pub mod logger;
pub mod scaffold;
