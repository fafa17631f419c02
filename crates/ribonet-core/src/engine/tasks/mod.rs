//! Computational steps of the interaction pipeline.
//!
//! Each task is a free `run`-style function over a [`Structure`](crate::core::models::structure::Structure)
//! that reports progress and logs a summary. Residue- and pair-level work is spread
//! across threads when the `parallel` feature is enabled.

pub mod contact_detection;
pub mod hbond_scoring;
pub mod validation;
