//! Transformation and aggregation pipeline for Superstore order data.
//!
//! Raw CSV rows go through one cleaning pass (date derivation, targeted
//! postal imputation, exact dedup), get memoized per source file, and are
//! then sliced by a [`filter::FilterSpec`] before [`views`] computes the
//! dashboard's KPI, top-10, shipping and trend outputs. Rendering is the
//! consumer's problem; everything here is plain data.

pub mod clean;
pub mod filter;
pub mod loader;
pub mod output;
pub mod types;
pub mod util;
pub mod views;
