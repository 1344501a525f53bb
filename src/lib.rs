//! GRIDCALC - Terminal Grid Editor Library
//!
//! A terminal grid-based data editor with formula evaluation, built in Rust.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::*;
pub use domain::*;
