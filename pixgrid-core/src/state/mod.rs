//! # State
//!
//! The editable document: an ordered stack of layers sharing one grid size.

pub mod document;
pub mod layer;

pub use document::Document;
pub use layer::{Layer, LayerID};
