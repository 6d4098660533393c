//! Shared test utilities for the confmesh workspace.
//!
//! This crate provides standardised fixtures so that crate test suites do not
//! each hand-roll temporary configuration trees. It is a dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`tree`]: [`ConfTree`] builder for configuration source roots

pub mod tree;

pub use tree::ConfTree;
