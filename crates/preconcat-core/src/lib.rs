#![forbid(unsafe_code)]
//! preconcat-core library.
//!
//! Turns a set of `(path, content)` pairs into a concatenation order in
//! which every file follows the files it `@require`s, or a complete report
//! of why no such order exists.
//!
//! # Conventions
//!
//! - **Errors**: [`error::GraphError`] for graph failures, `anyhow::Result`
//!   for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **I/O**: none outside [`config::load_project_config`]. File discovery and
//!   reading belong to the caller.

pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod ident;

pub use error::{Cycle, ErrorCode, GraphError};
pub use graph::{BuildOptions, DependencyGraph, DuplicateIdPolicy, Node, SourceFile};
