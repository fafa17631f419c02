//! # Engine Module
//!
//! The engine turns a validated structure into scored hydrogen-bond candidates. It owns
//! the pipeline configuration, the pluggable candidate and acceptance seams, and the
//! computational tasks the [`workflows`](crate::workflows) layer chains together.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Contact cutoff, residue class filter, and paths to
//!   replacement registry and mixture tables
//! - **Quadruple Sources** ([`quadruples`]) - Which donor/acceptor atom quadruples are tried
//!   for a residue pair
//! - **Acceptance Policies** ([`policy`]) - Which scored candidates become hydrogen bonds
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error type wrapping every loader failure
//! - **Tasks** ([`tasks`]) - Validation, broad-phase contact detection and scoring

pub mod config;
pub mod error;
pub mod policy;
pub mod progress;
pub mod quadruples;
pub mod tasks;
