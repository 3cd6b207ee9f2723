//! # subscribe
//!
//! Command-line front end for `subscribe-core`: configuration, snapshot
//! files and command dispatch. `main.rs` adds logging and process exit codes.

pub mod cli;
pub mod config;
