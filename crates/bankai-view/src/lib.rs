//! # bankai-view — Viewer core for bankai
//!
//! This crate holds everything the viewer decides, with the terminal kept at
//! arm's length in `bankai-term`:
//!
//! - **[`document`]** — `Document` / `TextLine`, the read-only lines on screen
//! - **[`cursor`]** — `CursorState` and its viewport-clamped navigation
//! - **[`compose`]** — renders document + cursor into one frame buffer
//! - **[`session`]** — the render → decode → dispatch loop
//! - **[`error`]** — the viewer's error type

pub mod compose;
pub mod cursor;
pub mod document;
pub mod error;
pub mod session;

pub use error::{Error, Result};
