//! Leaf utilities shared by every other layer: vector geometry, rigid transforms,
//! name lookup tables and the string interner backing the open-ended atom and
//! residue kinds.

pub mod geometry;
pub mod identifiers;
pub mod intern;
pub mod transform;
