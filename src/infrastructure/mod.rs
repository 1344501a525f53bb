//! Infrastructure layer providing external service integrations.
//!
//! This module contains implementations for external concerns like
//! file I/O, CSV import/export, and the system clipboard.

pub mod clipboard;
pub mod persistence;

pub use clipboard::*;
pub use persistence::*;
