//! # Core Models Module
//!
//! Data structures describing a macromolecular structure at the level the
//! interaction pipeline needs it.
//!
//! ## Key Components
//!
//! - [`atom`] - Closed atom-kind enumeration with capability flags, and the atom record
//! - [`residue`] - Residue kinds, labels and the residue geometry model (lazy placement,
//!   implicit-atom reconstruction, validation)
//! - [`selection`] - Composable atom-set predicates
//! - [`structure`] - Ordered arena of residues
//! - [`ids`] - Stable residue identifiers
//!
//! ## Usage
//!
//! ```ignore
//! use ribonet::core::models::atom::{AtomKind, AtomRecord};
//! use ribonet::core::models::residue::{Residue, ResidueKind, ResidueLabel};
//! use ribonet::core::models::structure::Structure;
//!
//! let mut structure = Structure::new();
//! let residue = Residue::new(ResidueLabel::new('A', 1), ResidueKind::G)
//!     .with_atoms([AtomRecord::new(AtomKind::N9, Point3::new(-1.289, 4.551, 0.0))]);
//! let id = structure.add_residue(residue);
//! ```

pub mod atom;
pub mod ids;
pub mod residue;
pub mod selection;
pub mod structure;
