//! # Core Module
//!
//! The stateless foundation of RiboNet: geometry, the residue model, residue
//! topology and hydrogen-bond scoring.
//!
//! ## Architecture
//!
//! - **Utilities** ([`utils`]) - Vector geometry, rigid transforms, name tables and interning
//! - **Molecular Representation** ([`models`]) - Atoms, residues, atom-set predicates and structures
//! - **Structural Knowledge** ([`topology`]) - Atom-set registry and implicit-atom templates
//! - **Hydrogen-Bond Scoring** ([`scoring`]) - Geometric features and the Gaussian-mixture classifier
//!
//! Nothing in this layer is fatal. Missing atoms, degenerate geometry and empty
//! densities surface as `None`, NaN or a [`models::residue::Validation`] outcome;
//! only resource loaders return `Result`.

pub mod models;
pub mod scoring;
pub mod topology;
pub mod utils;
