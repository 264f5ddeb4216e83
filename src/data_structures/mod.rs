//! Flattened scene data structures.
//!
//! This module contains the core data types the importer produces:
//!
//! - `model` contains mesh data, flattened model data and the placeable model wrapper
//! - `texture` contains the shared texture resource and its semantic role
//! - `lighting` contains lamps and the per-draw lighting snapshot

pub mod lighting;
pub mod model;
pub mod texture;
