// src/geometry/mod.rs
//! Contour ingestion and platform extraction.

pub mod core;
pub mod ingest;
pub mod silhouette;
pub mod simplify;
pub mod assemble;
pub mod merge;
pub mod build;

pub use build::{build_platforms, BuildError};
pub use ingest::{ContourArtifact, ContourAssetPlugin};
