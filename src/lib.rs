//! Core library for the tracker-tools command line application.
//!
//! The library exposes the two batch stages that power the command-line
//! interface as well as the tests. The modules are structured to keep
//! responsibilities narrow and composable: spreadsheet adapters live under
//! [`tracker::tools::io`], the canonical schema inside [`tracker::tools::model`], the
//! free-text cleanup heuristics in [`tracker::tools::normalize`], and the stage
//! orchestration under [`tracker::tools::migrate`] and [`tracker::tools::export`].

pub mod tracker;

pub use tracker::tools::{Result, ToolError, error, export, io, migrate, model, normalize};
