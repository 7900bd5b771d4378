//! pstop-core: the normalization and delta engine behind `pstop`.
//!
//! Provides:
//! - `models`: resource-kind descriptors and counter rows
//! - `normalize`: canonical names for raw file and table identifiers
//! - `aggregate`: merging rows that share a canonical name
//! - `baseline`: reset detection and relative deltas
//! - `rank`: display order and the totals row
//! - `view`: one refresh cycle per kind, plus text rendering
//! - `collector`: counter sources (scripted mock, JSON replay)
//! - `config`: TOML configuration
//! - `fmt`: shared formatting helpers (latency, percentages, amounts)

pub mod aggregate;
pub mod baseline;
pub mod collector;
pub mod config;
pub mod fmt;
pub mod models;
pub mod normalize;
pub mod rank;
pub mod view;
