//! loreseek: a game-wiki query engine.
//!
//! Search items, monsters and leveling spots, then browse the results
//! through paginated drill-down screens. The core of the crate is the
//! lazy hierarchical navigation engine in [`domain`]: an arena-backed
//! tree of screens with eager and promise materialization, a single
//! cursor per session, and pluggable per-node rendering.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
