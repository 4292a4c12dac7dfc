//! Tickbar-specific error and configuration primitives shared by every crate
//! in the workspace.
#![warn(missing_docs)]

mod config;
mod error;
mod period;

pub use config::{AlignmentPolicy, ColumnSelection, FrequencyFilter};
pub use error::TickbarError;
pub use period::Period;
