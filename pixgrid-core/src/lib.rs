//! # pixgrid-core
//!
//! A layered pixel-grid editing engine: documents made of same-sized layers, tools that paint on
//! them, a compositor that flattens them, and bounded undo/redo history.
//!
//! Nothing in here is global except ID allocation. Callers own the [`state::Document`] and thread
//! it through [`paint`], [`compositor`], and [`history`], or let a [`session::Session`] do it.

pub mod blend;
pub mod color;
pub mod compositor;
pub mod error;
pub mod grid;
pub mod history;
pub mod id;
pub mod paint;
pub mod session;
pub mod state;

pub use id::UniqueID;
