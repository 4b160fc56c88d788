//! fontmerge
//!
//! Kerning direction splitting, flipping and merging, and a merger that
//! combines two font sources behind one read interface.
pub mod backend;
pub mod core;
pub mod error;
pub mod font_source;
pub mod kerning;
pub mod logging;
#[cfg(test)]
mod tests;

pub use error::{FontMergeError, Result};
