use crate::core::models::ids::ResidueId;
use crate::core::models::structure::Structure;
use crate::core::scoring::mixture::MixtureModel;
use crate::core::topology::registry::TopologyRegistry;
use crate::engine::config::PipelineConfig;
use crate::engine::error::EngineError;
use crate::engine::policy::{AcceptancePolicy, ScoredHBond};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::quadruples::QuadrupleSource;
use crate::engine::tasks;
use crate::engine::tasks::contact_detection::ContactCandidate;
use crate::engine::tasks::validation::ValidationSummary;
use std::path::Path;
use tracing::{info, instrument};

/// Everything a pipeline run found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionReport {
    pub validation: ValidationSummary,
    /// Residue pairs in broad-phase contact, lower container index first, sorted.
    pub contacts: Vec<(ResidueId, ResidueId)>,
    /// Accepted bonds in contact order, lower-indexed donor first, then quadruple order.
    pub accepted: Vec<ScoredHBond>,
    /// Scored candidates turned down by the policy.
    pub rejected: usize,
    pub incomplete: usize,
    pub degenerate: usize,
}

/// Validates a structure, finds residue contacts and classifies hydrogen bonds.
///
/// The pipeline owns its atom-set registry and mixture model. Both start from the
/// built-in tables; a configuration may merge registry entries over them and replace
/// the mixture table outright.
#[derive(Debug, Clone)]
pub struct InteractionPipeline {
    config: PipelineConfig,
    registry: TopologyRegistry,
    model: MixtureModel,
}

impl Default for InteractionPipeline {
    fn default() -> Self {
        Self::with_resources(
            PipelineConfig::default(),
            TopologyRegistry::builtin().clone(),
            MixtureModel::builtin().clone(),
        )
    }
}

impl InteractionPipeline {
    /// Builds a pipeline, loading the resources named in `config`.
    pub fn new(config: PipelineConfig) -> Result<Self, EngineError> {
        let mut registry = TopologyRegistry::builtin().clone();
        if let Some(path) = &config.topology_path {
            registry.merge(TopologyRegistry::load(path)?);
            info!(path = %path.display(), "Merged atom-set registry overrides.");
        }
        let model = match &config.mixture_path {
            Some(path) => {
                info!(path = %path.display(), "Loading mixture model.");
                MixtureModel::load(path)?
            }
            None => MixtureModel::builtin().clone(),
        };
        Ok(Self::with_resources(config, registry, model))
    }

    pub fn from_config_file(path: &Path) -> Result<Self, EngineError> {
        Self::new(PipelineConfig::load(path)?)
    }

    pub fn with_resources(
        config: PipelineConfig,
        registry: TopologyRegistry,
        model: MixtureModel,
    ) -> Self {
        Self {
            config,
            registry,
            model,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TopologyRegistry {
        &self.registry
    }

    pub fn model(&self) -> &MixtureModel {
        &self.model
    }

    /// Runs the pipeline over `structure`.
    ///
    /// Residues are validated in place (stripped, rebuilt with implicit atoms, and
    /// downgraded when incomplete) before contacts are searched. Only residues the
    /// configured class admits take part in contact detection.
    #[instrument(skip_all, name = "annotate_workflow")]
    pub fn run(
        &self,
        structure: &mut Structure,
        quadruples: &dyn QuadrupleSource,
        policy: &dyn AcceptancePolicy,
        reporter: &ProgressReporter,
    ) -> InteractionReport {
        info!(
            residues = structure.len(),
            cutoff = self.config.cutoff,
            "Starting interaction pipeline."
        );

        // === Phase 1: Validation ===
        reporter.report(Progress::PhaseStart { name: "Validation" });
        let validation = tasks::validation::run(structure, &self.registry, reporter);
        reporter.report(Progress::PhaseFinish);

        let structure: &Structure = structure;

        // === Phase 2: Broad-phase contact detection ===
        reporter.report(Progress::PhaseStart {
            name: "Contact Detection",
        });
        let class = self.config.residue_class;
        let mut contacts: Vec<ContactCandidate> = tasks::contact_detection::find_contacts(
            structure.residues().map(|(_, residue)| residue),
            |residue| class.matches(&residue.kind()),
            self.config.cutoff,
        )
        .into_iter()
        .collect();
        contacts.sort_unstable();
        reporter.report(Progress::Message(format!(
            "{} residue pairs in contact.",
            contacts.len()
        )));
        reporter.report(Progress::PhaseFinish);

        // === Phase 3: Scoring ===
        reporter.report(Progress::PhaseStart { name: "Scoring" });
        let scoring =
            tasks::hbond_scoring::run(structure, &contacts, quadruples, &self.model, reporter);
        reporter.report(Progress::PhaseFinish);

        // === Phase 4: Acceptance ===
        let (accepted, rejected): (Vec<ScoredHBond>, Vec<ScoredHBond>) = scoring
            .scored
            .into_iter()
            .partition(|bond| policy.accept(bond));

        let ids = structure.residue_ids();
        let contacts: Vec<(ResidueId, ResidueId)> = contacts
            .iter()
            .map(|c| (ids[c.first], ids[c.second]))
            .collect();

        info!(
            contacts = contacts.len(),
            accepted = accepted.len(),
            rejected = rejected.len(),
            "Interaction pipeline complete."
        );
        InteractionReport {
            validation,
            contacts,
            accepted,
            rejected: rejected.len(),
            incomplete: scoring.incomplete,
            degenerate: scoring.degenerate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{AtomKind, AtomRecord};
    use crate::core::models::residue::{Residue, ResidueKind, ResidueLabel};
    use crate::core::scoring::hbond::HBondQuadruple;
    use crate::core::utils::transform::Transform;
    use crate::engine::config::{PipelineConfigBuilder, ResidueClass};
    use crate::engine::policy::MinimumScore;
    use crate::engine::quadruples::BaseEdgeQuadruples;
    use nalgebra::{Point3, Vector3};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    /// Ribose atoms clustered around C1', pointing away from the base along y when
    /// `outward` is positive. Only their presence matters here.
    fn ribose(c1: Point3<f64>, outward: f64) -> Vec<AtomRecord> {
        use AtomKind::*;
        let offsets = [
            (C1p, (0.0, 0.0, 0.0)),
            (O4p, (-0.6, 1.2, 0.4)),
            (C2p, (-1.2, -0.3, -0.8)),
            (O2p, (-2.4, -0.5, -0.3)),
            (C3p, (-1.5, 0.6, -1.9)),
            (O3p, (-2.6, 0.4, -2.7)),
            (C4p, (-1.1, 1.8, -1.2)),
            (C5p, (-1.8, 3.0, -1.6)),
            (O5p, (-1.4, 4.2, -1.0)),
        ];
        offsets
            .iter()
            .map(|&(kind, (x, y, z))| {
                AtomRecord::new(kind, c1 + Vector3::new(x, outward * y, outward * z))
            })
            .collect()
    }

    fn guanosine() -> Residue {
        use AtomKind::*;
        let base = [
            (N9, (-1.289, 4.551, 0.0)),
            (C8, (0.023, 4.962, 0.0)),
            (N7, (0.870, 3.969, 0.0)),
            (C5, (0.071, 2.833, 0.0)),
            (C6, (0.424, 1.460, 0.0)),
            (O6, (1.554, 0.955, 0.0)),
            (N1, (-0.700, 0.641, 0.0)),
            (C2, (-1.999, 1.087, 0.0)),
            (N2, (-2.949, 0.139, -0.001)),
            (N3, (-2.342, 2.364, 0.001)),
            (C4, (-1.265, 3.177, 0.0)),
        ];
        Residue::new(ResidueLabel::new('A', 1), ResidueKind::G)
            .with_atoms(
                base.iter()
                    .map(|&(k, (x, y, z))| AtomRecord::new(k, Point3::new(x, y, z))),
            )
            .with_atoms(ribose(Point3::new(-2.477, 5.399, 0.0), 1.0))
            .with_atoms([AtomRecord::new(P, Point3::new(-5.5, 8.0, -1.0))])
    }

    /// Cytidine paired with [`guanosine`] in the Watson-Crick geometry.
    fn cytidine() -> Residue {
        use AtomKind::*;
        let base = [
            (N1, (-1.285, 4.542, 0.0)),
            (C2, (-1.472, 3.158, 0.0)),
            (O2, (-2.628, 2.709, 0.001)),
            (N3, (-0.391, 2.344, 0.0)),
            (C4, (0.837, 2.868, 0.0)),
            (N4, (1.875, 2.027, 0.001)),
            (C5, (1.056, 4.275, 0.0)),
            (C6, (-0.023, 5.068, 0.0)),
        ];
        let flip = |x: f64, y: f64, z: f64| Point3::new(x, -y, -z);
        Residue::new(ResidueLabel::new('B', 1), ResidueKind::C)
            .with_atoms(
                base.iter()
                    .map(|&(k, (x, y, z))| AtomRecord::new(k, flip(x, y, z))),
            )
            .with_atoms(ribose(flip(-2.477, 5.402, 0.0), -1.0))
    }

    fn base_pair() -> (Structure, ResidueId, ResidueId) {
        let mut structure = Structure::new();
        let g = structure.add_residue(guanosine());
        let c = structure.add_residue(cytidine());
        (structure, g, c)
    }

    #[test]
    fn watson_crick_pair_yields_three_hydrogen_bonds() {
        init_tracing();
        let (mut structure, g, c) = base_pair();
        let pipeline = InteractionPipeline::default();

        let report = pipeline.run(
            &mut structure,
            &BaseEdgeQuadruples,
            &MinimumScore(0.5),
            &ProgressReporter::new(),
        );

        assert_eq!(report.validation.complete, 2);
        assert_eq!(report.validation.downgraded, 0);
        assert_eq!(report.contacts, vec![(g, c)]);
        assert_eq!(report.incomplete, 0);
        assert_eq!(
            report.accepted.len() + report.rejected + report.degenerate,
            4 * 3 + 4 * 4
        );

        let found: Vec<(ResidueId, ResidueId, HBondQuadruple)> = report
            .accepted
            .iter()
            .map(|b| (b.donor_residue, b.acceptor_residue, b.quadruple))
            .collect();
        use AtomKind::*;
        assert_eq!(
            found,
            vec![
                (g, c, HBondQuadruple::new(N1, H1, N3, Lp3)),
                (g, c, HBondQuadruple::new(N2, H21, O2, Lp2b)),
                (c, g, HBondQuadruple::new(N4, H41, O6, Lp6a)),
            ]
        );
        assert!(report.accepted.iter().all(|b| b.score > 0.99));
    }

    #[test]
    fn validation_rebuilds_implicit_atoms_and_strips_phosphate() {
        let (mut structure, g, _) = base_pair();
        InteractionPipeline::default().run(
            &mut structure,
            &BaseEdgeQuadruples,
            &MinimumScore(0.5),
            &ProgressReporter::new(),
        );
        let guanosine = structure.residue(g).unwrap();
        assert!(!guanosine.contains(AtomKind::P));
        for kind in [AtomKind::H1, AtomKind::H21, AtomKind::Lp6a, AtomKind::Lp6b] {
            assert!(guanosine.contains(kind), "missing {}", kind);
        }
    }

    #[test]
    fn separated_pair_has_no_contacts() {
        let (mut structure, _, c) = base_pair();
        structure
            .residue_mut(c)
            .unwrap()
            .apply_transform(&Transform::translation(Vector3::new(50.0, 0.0, 0.0)));

        let report = InteractionPipeline::default().run(
            &mut structure,
            &BaseEdgeQuadruples,
            &MinimumScore(0.5),
            &ProgressReporter::new(),
        );
        assert!(report.contacts.is_empty());
        assert!(report.accepted.is_empty());
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn closure_policies_filter_scored_candidates() {
        let (mut structure, g, _) = base_pair();
        let imino_only = |b: &ScoredHBond| b.score >= 0.5 && b.quadruple.donor == AtomKind::N1;

        let report = InteractionPipeline::default().run(
            &mut structure,
            &BaseEdgeQuadruples,
            &imino_only,
            &ProgressReporter::new(),
        );
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].donor_residue, g);
    }

    #[test]
    fn residue_class_excludes_nucleotides_from_amino_acid_runs() {
        let (mut structure, _, _) = base_pair();
        let config = PipelineConfigBuilder::new()
            .residue_class(ResidueClass::AminoAcid)
            .build()
            .unwrap();
        let report = InteractionPipeline::new(config).unwrap().run(
            &mut structure,
            &BaseEdgeQuadruples,
            &MinimumScore(0.5),
            &ProgressReporter::new(),
        );
        assert_eq!(report.validation.complete, 2);
        assert!(report.contacts.is_empty());
        assert!(report.accepted.is_empty());
    }

    #[test]
    fn incomplete_residue_is_downgraded_and_skipped() {
        init_tracing();
        let (mut structure, _, c) = base_pair();
        structure.residue_mut(c).unwrap().erase(AtomKind::O2);

        let report = InteractionPipeline::default().run(
            &mut structure,
            &BaseEdgeQuadruples,
            &MinimumScore(0.5),
            &ProgressReporter::new(),
        );
        assert_eq!(report.validation.downgraded, 1);
        assert!(structure.residue(c).unwrap().kind().is_unknown());
        assert!(report.contacts.is_empty());
        assert!(report.accepted.is_empty());
    }

    #[test]
    fn phases_are_reported_in_order() {
        let (mut structure, _, _) = base_pair();
        let phases = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                phases.lock().unwrap().push(name);
            }
        }));

        InteractionPipeline::default().run(
            &mut structure,
            &BaseEdgeQuadruples,
            &MinimumScore(0.5),
            &reporter,
        );
        drop(reporter);
        assert_eq!(
            phases.into_inner().unwrap(),
            vec!["Validation", "Contact Detection", "Scoring"]
        );
    }

    #[test]
    fn new_reports_missing_mixture_file() {
        let config = PipelineConfigBuilder::new()
            .mixture_path("/definitely/not/here.csv".into())
            .build()
            .unwrap();
        assert!(matches!(
            InteractionPipeline::new(config),
            Err(EngineError::Model { .. })
        ));
    }

    #[test]
    fn from_config_file_merges_registry_overrides() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("topology.toml"),
            "[GLY]\nobligatory = [\"N\", \"CA\", \"C\"]\n",
        )
        .unwrap();
        let config_path = dir.path().join("ribonet.toml");
        fs::write(&config_path, "cutoff = 4.0\ntopology-path = \"topology.toml\"\n").unwrap();

        let pipeline = InteractionPipeline::from_config_file(&config_path).unwrap();
        assert_eq!(pipeline.config().cutoff, 4.0);
        let gly = pipeline.registry().get(&ResidueKind::Gly).unwrap();
        assert!(!gly.obligatory.contains(&AtomKind::O));
        assert!(pipeline.registry().get(&ResidueKind::G).is_some());
    }
}
