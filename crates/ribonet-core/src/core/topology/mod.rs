//! # Topology Module
//!
//! Structural knowledge about residue kinds: which atoms a complete residue must
//! carry, which it may carry, and how the implicit ones are rebuilt.
//!
//! ## Key Components
//!
//! - [`registry`] - Obligatory/optional atom sets per residue kind, built in or loaded
//!   from TOML
//! - [`implicit`] - Hydrogen and lone-pair reconstruction templates for the nucleobases
//!
//! ## Usage
//!
//! ```ignore
//! use ribonet::core::topology::registry::TopologyRegistry;
//!
//! let registry = TopologyRegistry::builtin();
//! let outcome = residue.validate(registry);
//! ```

pub mod implicit;
pub mod registry;
