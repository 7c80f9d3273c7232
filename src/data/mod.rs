//! Dataset sources for the demo pipeline.

pub mod sample;

pub use sample::*;
