use crate::core::models::residue::{Residue, Validation};
use crate::core::models::structure::Structure;
use crate::core::topology::registry::TopologyRegistry;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counts of validation outcomes over a structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub complete: usize,
    pub downgraded: usize,
    pub unclassified: usize,
    /// Unexpected atoms erased from complete residues.
    pub removed_atoms: usize,
}

impl ValidationSummary {
    fn record(mut self, outcome: &Validation) -> Self {
        match outcome {
            Validation::Complete { removed } => {
                self.complete += 1;
                self.removed_atoms += removed.len();
            }
            Validation::Downgraded { .. } => self.downgraded += 1,
            Validation::Unclassified => self.unclassified += 1,
        }
        self
    }
}

/// Validates every residue against the registry and warms its placement cache.
///
/// Residues are independent of each other, so they are processed in parallel when
/// the `parallel` feature is enabled.
#[instrument(skip_all, name = "validation_task")]
pub fn run(
    structure: &mut Structure,
    registry: &TopologyRegistry,
    reporter: &ProgressReporter,
) -> ValidationSummary {
    let residues: Vec<&mut Residue> = structure.residues_mut().map(|(_, r)| r).collect();
    reporter.start_task(residues.len());

    #[cfg(not(feature = "parallel"))]
    let iterator = residues.into_iter();

    #[cfg(feature = "parallel")]
    let iterator = residues.into_par_iter();

    let outcomes: Vec<Validation> = iterator
        .map(|residue| {
            let outcome = residue.validate(registry);
            residue.refresh_placement();
            reporter.report(Progress::TaskIncrement);
            outcome
        })
        .collect();
    reporter.report(Progress::TaskFinish);

    let summary = outcomes
        .iter()
        .fold(ValidationSummary::default(), ValidationSummary::record);
    info!(
        complete = summary.complete,
        downgraded = summary.downgraded,
        unclassified = summary.unclassified,
        removed_atoms = summary.removed_atoms,
        "Residue validation finished."
    );
    summary
}
