//! Image effect stages and the pipeline that runs them.
//!
//! Each stage takes a `DynamicImage` and produces a new one; the pipeline
//! applies stages in order and collects their filename tags.

pub mod adjust;
mod filter;
pub mod geometry;
pub mod halftone;
mod pipeline;
pub mod quantize;

pub use filter::ResampleFilter;
pub use pipeline::{Effect, Pipeline, StageContext};
