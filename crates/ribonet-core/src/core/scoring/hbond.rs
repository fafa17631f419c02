use super::features::HBondFeature;
use super::mixture::MixtureModel;
use crate::core::models::atom::AtomKind;
use crate::core::models::residue::Residue;
use std::fmt;
use std::sync::OnceLock;

/// Donor, hydrogen, acceptor and lone-pair atom kinds of one candidate bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HBondQuadruple {
    pub donor: AtomKind,
    pub hydrogen: AtomKind,
    pub acceptor: AtomKind,
    pub lone_pair: AtomKind,
}

impl HBondQuadruple {
    pub fn new(
        donor: AtomKind,
        hydrogen: AtomKind,
        acceptor: AtomKind,
        lone_pair: AtomKind,
    ) -> Self {
        Self {
            donor,
            hydrogen,
            acceptor,
            lone_pair,
        }
    }
}

impl fmt::Display for HBondQuadruple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}...{}:{}",
            self.donor, self.hydrogen, self.acceptor, self.lone_pair
        )
    }
}

/// A candidate hydrogen bond between two residues.
///
/// The relation borrows both residues and scores itself against a mixture model on
/// first request. The score is cached for the lifetime of the relation.
#[derive(Debug)]
pub struct HBond<'a> {
    donor: &'a Residue,
    acceptor: &'a Residue,
    quadruple: HBondQuadruple,
    model: &'a MixtureModel,
    score: OnceLock<Option<f64>>,
}

impl<'a> HBond<'a> {
    pub fn new(
        donor: &'a Residue,
        acceptor: &'a Residue,
        quadruple: HBondQuadruple,
        model: &'a MixtureModel,
    ) -> Self {
        Self {
            donor,
            acceptor,
            quadruple,
            model,
            score: OnceLock::new(),
        }
    }

    pub fn donor(&self) -> &'a Residue {
        self.donor
    }

    pub fn acceptor(&self) -> &'a Residue {
        self.acceptor
    }

    pub fn quadruple(&self) -> &HBondQuadruple {
        &self.quadruple
    }

    pub fn feature(&self) -> Option<HBondFeature> {
        HBondFeature::extract(self.donor, &self.quadruple, self.acceptor)
    }

    /// Posterior probability that the geometry is a true hydrogen bond.
    ///
    /// `None` when an atom of the quadruple is missing. A NaN score means no mixture
    /// component carries any density at this geometry; callers must check for it.
    pub fn score(&self) -> Option<f64> {
        *self
            .score
            .get_or_init(|| self.model.score(self.donor, &self.quadruple, self.acceptor))
    }

    pub fn is_scored(&self) -> bool {
        self.score.get().is_some()
    }
}
