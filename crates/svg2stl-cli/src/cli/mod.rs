//! CLI command implementations.
//!
//! - `convert` - read the SVG, emit or render, report progress
//! - `summary` - JSON report printed with `--json`

pub mod convert;
pub mod summary;

pub use convert::cmd_convert;
