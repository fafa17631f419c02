//! # Hydrogen-Bond Scoring
//!
//! Narrow-phase classification of candidate hydrogen bonds. A donor, hydrogen,
//! acceptor and lone pair are reduced to three geometric features ([`features`]),
//! which are scored against a seven-component trivariate Gaussian mixture
//! ([`mixture`]). The result is the posterior probability that the geometry belongs
//! to a true hydrogen bond. [`hbond`] ties a quadruple of atom kinds to a pair of
//! residues and caches its score.

pub mod features;
pub mod hbond;
pub mod mixture;
