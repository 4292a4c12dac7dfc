//! Temporal indexing and interval summarisation.
//!
//! Modules, in pipeline order:
//! - `grid`: generate a regular anchor grid over the observed range
//! - `resolve`: snap anchors to observed timestamps under an alignment policy
//! - `partition`: pair consecutive resolved timestamps into intervals
//! - `aggregate`: reduce one interval slice into a summary row
//! - `resample`: run the whole pipeline and assemble the summary table
/// Named aggregation functions and summary rows.
pub mod aggregate;
/// Anchor grid generation and calendar stepping.
pub mod grid;
/// Interval construction from resolved boundaries.
pub mod partition;
/// End-to-end interval summarisation.
pub mod resample;
/// As-of and backward-fill resolution of anchors.
pub mod resolve;
/// Axis and column helpers.
pub mod util;
