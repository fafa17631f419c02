//! # Ribonet Core Library
//!
//! Geometric contact detection and statistical hydrogen-bond classification for
//! nucleic-acid structures.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so each concern can be tested on its own.
//!
//! - **[`core`]: The Foundation.** Residue and structure models with lazily placed
//!   coordinates, the atom-set registry, implicit hydrogen and lone-pair reconstruction,
//!   rigid transforms, and the Gaussian-mixture hydrogen-bond classifier.
//!
//! - **[`engine`]: The Logic Core.** Configuration, progress reporting, the pluggable
//!   quadruple and acceptance seams, and the tasks that validate residues, sweep for
//!   contacts and score candidate bonds in parallel.
//!
//! - **[`workflows`]: The Public API.** [`workflows::annotate::InteractionPipeline`] chains
//!   the engine tasks into one call that turns a structure into accepted hydrogen bonds.

pub mod core;
pub mod engine;
pub mod workflows;
