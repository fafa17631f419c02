use crate::core::models::ids::ResidueId;
use crate::core::scoring::hbond::HBondQuadruple;

/// A scored candidate handed to an [`AcceptancePolicy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredHBond {
    pub donor_residue: ResidueId,
    pub acceptor_residue: ResidueId,
    pub quadruple: HBondQuadruple,
    pub score: f64,
}

/// Decides which scored candidates become accepted hydrogen bonds.
///
/// Only finite scores reach a policy.
pub trait AcceptancePolicy {
    fn accept(&self, bond: &ScoredHBond) -> bool;
}

impl<F> AcceptancePolicy for F
where
    F: Fn(&ScoredHBond) -> bool,
{
    fn accept(&self, bond: &ScoredHBond) -> bool {
        self(bond)
    }
}

/// Accepts candidates whose posterior reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimumScore(pub f64);

impl AcceptancePolicy for MinimumScore {
    fn accept(&self, bond: &ScoredHBond) -> bool {
        bond.score >= self.0
    }
}
