use super::contact_detection::ContactCandidate;
use crate::core::models::ids::ResidueId;
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use crate::core::scoring::hbond::HBond;
use crate::core::scoring::mixture::MixtureModel;
use crate::engine::policy::ScoredHBond;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::quadruples::QuadrupleSource;
use tracing::{debug, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scored candidates of a set of contacts, in contact order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringOutcome {
    pub scored: Vec<ScoredHBond>,
    /// Quadruples naming an atom one of the residues does not hold.
    pub incomplete: usize,
    /// Quadruples whose geometry carries no mixture density (NaN posterior).
    pub degenerate: usize,
}

impl ScoringOutcome {
    fn merge(mut self, other: ScoringOutcome) -> Self {
        self.scored.extend(other.scored);
        self.incomplete += other.incomplete;
        self.degenerate += other.degenerate;
        self
    }
}

/// Scores every quadruple of every contact, trying each residue as donor in turn.
///
/// Output order is deterministic: contacts in the given order, the lower-indexed
/// residue as donor first, quadruples in source order.
#[instrument(skip_all, name = "hbond_scoring_task")]
pub fn run(
    structure: &Structure,
    contacts: &[ContactCandidate],
    source: &dyn QuadrupleSource,
    model: &MixtureModel,
    reporter: &ProgressReporter,
) -> ScoringOutcome {
    reporter.start_task(contacts.len());

    #[cfg(not(feature = "parallel"))]
    let iterator = contacts.iter();

    #[cfg(feature = "parallel")]
    let iterator = contacts.par_iter();

    let per_contact: Vec<ScoringOutcome> = iterator
        .map(|contact| {
            let mut outcome = ScoringOutcome::default();
            if let (Some(a), Some(b)) = (
                resolve(structure, contact.first),
                resolve(structure, contact.second),
            ) {
                score_direction(a, b, source, model, &mut outcome);
                score_direction(b, a, source, model, &mut outcome);
            }
            reporter.report(Progress::TaskIncrement);
            outcome
        })
        .collect();
    reporter.report(Progress::TaskFinish);

    let outcome = per_contact
        .into_iter()
        .fold(ScoringOutcome::default(), ScoringOutcome::merge);
    debug!(
        scored = outcome.scored.len(),
        incomplete = outcome.incomplete,
        degenerate = outcome.degenerate,
        "Hydrogen-bond scoring finished."
    );
    outcome
}

fn resolve(structure: &Structure, index: usize) -> Option<(ResidueId, &Residue)> {
    let id = *structure.residue_ids().get(index)?;
    structure.residue(id).map(|residue| (id, residue))
}

fn score_direction(
    (donor_id, donor): (ResidueId, &Residue),
    (acceptor_id, acceptor): (ResidueId, &Residue),
    source: &dyn QuadrupleSource,
    model: &MixtureModel,
    outcome: &mut ScoringOutcome,
) {
    for quadruple in source.quadruples(&donor.kind(), &acceptor.kind()) {
        let bond = HBond::new(donor, acceptor, quadruple, model);
        match bond.score() {
            None => outcome.incomplete += 1,
            Some(score) if score.is_nan() => {
                trace!(
                    donor = %donor.label,
                    acceptor = %acceptor.label,
                    quadruple = %quadruple,
                    "Skipping quadruple without mixture density."
                );
                outcome.degenerate += 1;
            }
            Some(score) => outcome.scored.push(ScoredHBond {
                donor_residue: donor_id,
                acceptor_residue: acceptor_id,
                quadruple,
                score,
            }),
        }
    }
}
