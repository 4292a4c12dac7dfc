//! Re-export of configuration and error types from `tickbar-types`.
// Consolidated re-exports so downstream crates can depend on `tickbar-core` only

pub use tickbar_types::{AlignmentPolicy, ColumnSelection, FrequencyFilter, Period, TickbarError};
