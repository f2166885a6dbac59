//! Outliner - hierarchical outline editing core
//!
//! An outline is a flat sequence of text lines whose hierarchy is implied by
//! leading spaces. This crate provides the structural edit operations over
//! it (indent and move with children, line splitting, collapse), the
//! projection into a displayed view with fold indicators, conversion to and
//! from the storage markup, and text exports.
//!
//! The binary in `main.rs` drives an [`outline::OutlineSession`] from a
//! command script; frontends embed the same session type.

pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod notifications;
pub mod outline;
pub mod storage;
pub mod string_utils;

pub use error::{Error, Result};
