use crate::core::models::atom::AtomKind;
use crate::core::models::residue::{Nucleobase, ResidueKind};
use crate::core::utils::identifiers::lookup_residue_kind;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Obligatory and optional atom kinds of one residue kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResidueTopology {
    pub obligatory: BTreeSet<AtomKind>,
    pub optional: BTreeSet<AtomKind>,
}

impl ResidueTopology {
    pub fn new(
        obligatory: impl IntoIterator<Item = AtomKind>,
        optional: impl IntoIterator<Item = AtomKind>,
    ) -> Self {
        Self {
            obligatory: obligatory.into_iter().collect(),
            optional: optional.into_iter().collect(),
        }
    }

    /// Whether a complete residue may hold an atom of this kind.
    pub fn permits(&self, kind: AtomKind) -> bool {
        self.obligatory.contains(&kind) || self.optional.contains(&kind)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TopologyEntry {
    obligatory: Vec<String>,
    #[serde(default)]
    optional: Vec<String>,
}

/// Atom-set registry keyed by residue kind.
#[derive(Debug, Clone, Default)]
pub struct TopologyRegistry {
    registry: HashMap<ResidueKind, ResidueTopology>,
}

impl TopologyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry for the eight standard nucleotides and twenty amino acids.
    pub fn builtin() -> &'static TopologyRegistry {
        static BUILTIN: OnceLock<TopologyRegistry> = OnceLock::new();
        BUILTIN.get_or_init(build_builtin)
    }

    /// Loads a registry from a TOML file with one table per residue name:
    ///
    /// ```toml
    /// [G]
    /// obligatory = ["C1'", "N9", "C8"]
    /// optional = ["H8", "LP7"]
    /// ```
    pub fn load(path: &Path) -> Result<Self, TopologyLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| TopologyLoadError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        let entries: HashMap<String, TopologyEntry> =
            toml::from_str(&content).map_err(|e| TopologyLoadError::Toml {
                path: path_str.clone(),
                source: e,
            })?;

        let mut registry = HashMap::with_capacity(entries.len());
        for (residue_name, entry) in entries {
            let kind = lookup_residue_kind(&residue_name).ok_or_else(|| {
                TopologyLoadError::UnknownResidue {
                    path: path_str.clone(),
                    name: residue_name.clone(),
                }
            })?;
            let resolve = |names: &[String]| -> Result<BTreeSet<AtomKind>, TopologyLoadError> {
                names
                    .iter()
                    .map(|name| {
                        AtomKind::lookup(name).ok_or_else(|| TopologyLoadError::UnknownAtom {
                            path: path_str.clone(),
                            residue: residue_name.clone(),
                            name: name.clone(),
                        })
                    })
                    .collect()
            };
            let topology = ResidueTopology {
                obligatory: resolve(&entry.obligatory)?,
                optional: resolve(&entry.optional)?,
            };
            registry.insert(kind, topology);
        }
        Ok(Self { registry })
    }

    pub fn get(&self, kind: &ResidueKind) -> Option<&ResidueTopology> {
        self.registry.get(kind)
    }

    pub fn insert(&mut self, kind: ResidueKind, topology: ResidueTopology) {
        self.registry.insert(kind, topology);
    }

    /// Replaces the entries of `self` with those of `other` where both define a kind.
    pub fn merge(&mut self, other: TopologyRegistry) {
        self.registry.extend(other.registry);
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum TopologyLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unknown residue name '{name}' in '{path}'")]
    UnknownResidue { path: String, name: String },
    #[error("Unknown atom name '{name}' for residue '{residue}' in '{path}'")]
    UnknownAtom {
        path: String,
        residue: String,
        name: String,
    },
}

use AtomKind::*;

const RIBOSE: &[AtomKind] = &[O5p, C5p, C4p, O4p, C3p, O3p, C2p, O2p, C1p];
const DEOXYRIBOSE: &[AtomKind] = &[O5p, C5p, C4p, O4p, C3p, O3p, C2p, C1p];
const PHOSPHATE: &[AtomKind] = &[P, OP1, OP2, OP3];
const RIBOSE_HYDROGENS: &[AtomKind] = &[H5p, H5pp, H4p, H3p, H2p, HO2p, H1p, HO3p, HO5p];
const DEOXYRIBOSE_HYDROGENS: &[AtomKind] = &[H5p, H5pp, H4p, H3p, H2p, H2pp, H1p, HO3p, HO5p];

const ADENINE: &[AtomKind] = &[N9, C8, N7, C5, C6, N6, N1, C2, N3, C4];
const GUANINE: &[AtomKind] = &[N9, C8, N7, C5, C6, O6, N1, C2, N2, N3, C4];
const CYTOSINE: &[AtomKind] = &[N1, C2, O2, N3, C4, N4, C5, C6];
const URACIL: &[AtomKind] = &[N1, C2, O2, N3, C4, O4, C5, C6];
const THYMINE: &[AtomKind] = &[N1, C2, O2, N3, C4, O4, C5, C6, C7];

const ADENINE_IMPLICIT: &[AtomKind] = &[H2, H8, H61, H62, Lp1, Lp3, Lp7];
const GUANINE_IMPLICIT: &[AtomKind] = &[H1, H8, H21, H22, Lp3, Lp7, Lp6a, Lp6b];
const CYTOSINE_IMPLICIT: &[AtomKind] = &[H5, H6, H41, H42, Lp3, Lp2a, Lp2b];
const URACIL_IMPLICIT: &[AtomKind] = &[H3, H5, H6, Lp2a, Lp2b, Lp4a, Lp4b];
const THYMINE_IMPLICIT: &[AtomKind] = &[H3, H6, H71, H72, H73, Lp2a, Lp2b, Lp4a, Lp4b];

const AMINO_BACKBONE: &[AtomKind] = &[N, CA, C, O];

fn nucleotide_topology(kind: ResidueKind, base: Nucleobase) -> ResidueTopology {
    let (base_atoms, implicit) = match base {
        Nucleobase::Adenine => (ADENINE, ADENINE_IMPLICIT),
        Nucleobase::Guanine => (GUANINE, GUANINE_IMPLICIT),
        Nucleobase::Cytosine => (CYTOSINE, CYTOSINE_IMPLICIT),
        Nucleobase::Uracil => (URACIL, URACIL_IMPLICIT),
        Nucleobase::Thymine => (THYMINE, THYMINE_IMPLICIT),
    };
    let (sugar, sugar_hydrogens) = if kind.is_rna() {
        (RIBOSE, RIBOSE_HYDROGENS)
    } else {
        (DEOXYRIBOSE, DEOXYRIBOSE_HYDROGENS)
    };
    ResidueTopology::new(
        sugar.iter().chain(base_atoms).copied(),
        PHOSPHATE
            .iter()
            .chain(sugar_hydrogens)
            .chain(implicit)
            .copied(),
    )
}

fn side_chain(kind: ResidueKind) -> &'static [AtomKind] {
    match kind {
        ResidueKind::Ala => &[CB],
        ResidueKind::Arg => &[CB, CG, CD, NE, CZ, NH1, NH2],
        ResidueKind::Asn => &[CB, CG, OD1, ND2],
        ResidueKind::Asp => &[CB, CG, OD1, OD2],
        ResidueKind::Cys => &[CB, SG],
        ResidueKind::Gln => &[CB, CG, CD, OE1, NE2],
        ResidueKind::Glu => &[CB, CG, CD, OE1, OE2],
        ResidueKind::His => &[CB, CG, ND1, CD2, CE1, NE2],
        ResidueKind::Ile => &[CB, CG1, CG2, CD1],
        ResidueKind::Leu => &[CB, CG, CD1, CD2],
        ResidueKind::Lys => &[CB, CG, CD, CE, NZ],
        ResidueKind::Met => &[CB, CG, SD, CE],
        ResidueKind::Phe => &[CB, CG, CD1, CD2, CE1, CE2, CZ],
        ResidueKind::Pro => &[CB, CG, CD],
        ResidueKind::Ser => &[CB, OG],
        ResidueKind::Thr => &[CB, OG1, CG2],
        ResidueKind::Trp => &[CB, CG, CD1, CD2, NE1, CE2, CE3, CZ2, CZ3, CH2],
        ResidueKind::Tyr => &[CB, CG, CD1, CD2, CE1, CE2, CZ, OH],
        ResidueKind::Val => &[CB, CG1, CG2],
        _ => &[],
    }
}

fn amino_acid_topology(kind: ResidueKind) -> ResidueTopology {
    let optional: &[AtomKind] = if kind == ResidueKind::Gly {
        &[OXT, H, HA2, HA3]
    } else {
        &[OXT, H, HA]
    };
    ResidueTopology::new(
        AMINO_BACKBONE.iter().chain(side_chain(kind)).copied(),
        optional.iter().copied(),
    )
}

fn build_builtin() -> TopologyRegistry {
    use ResidueKind as R;

    let nucleotides = [R::A, R::C, R::G, R::U, R::DA, R::DC, R::DG, R::DT];
    let amino_acids = [
        R::Ala, R::Arg, R::Asn, R::Asp, R::Cys, R::Gln, R::Glu, R::Gly, R::His, R::Ile,
        R::Leu, R::Lys, R::Met, R::Phe, R::Pro, R::Ser, R::Thr, R::Trp, R::Tyr, R::Val,
    ];

    let mut registry = HashMap::with_capacity(nucleotides.len() + amino_acids.len());
    for kind in nucleotides {
        if let Some(base) = kind.nucleobase() {
            registry.insert(kind, nucleotide_topology(kind, base));
        }
    }
    for kind in amino_acids {
        registry.insert(kind, amino_acid_topology(kind));
    }
    TopologyRegistry { registry }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn builtin_registers_all_standard_kinds() {
        let registry = TopologyRegistry::builtin();
        assert_eq!(registry.len(), 28);
        assert!(registry.get(&ResidueKind::from_name("HOH")).is_none());
        assert!(registry.get(&ResidueKind::G.downgraded()).is_none());
    }

    #[test]
    fn builtin_nucleotide_sets_split_heavy_atoms_from_implicit_ones() {
        let registry = TopologyRegistry::builtin();
        let g = registry.get(&ResidueKind::G).unwrap();
        assert!(g.obligatory.contains(&AtomKind::O2p));
        assert!(g.obligatory.contains(&AtomKind::O6));
        assert!(g.optional.contains(&AtomKind::Lp6b));
        assert!(g.optional.contains(&AtomKind::P));
        assert!(g.obligatory.is_disjoint(&g.optional));

        let dg = registry.get(&ResidueKind::DG).unwrap();
        assert!(!dg.obligatory.contains(&AtomKind::O2p));
        assert!(!dg.permits(AtomKind::O2p));
        assert!(dg.permits(AtomKind::H2pp));

        let dt = registry.get(&ResidueKind::DT).unwrap();
        assert!(dt.obligatory.contains(&AtomKind::C7));
        assert!(dt.optional.contains(&AtomKind::H73));
    }

    #[test]
    fn builtin_amino_acid_sets_cover_side_chains() {
        let registry = TopologyRegistry::builtin();
        let trp = registry.get(&ResidueKind::Trp).unwrap();
        assert_eq!(trp.obligatory.len(), 14);
        let gly = registry.get(&ResidueKind::Gly).unwrap();
        assert_eq!(gly.obligatory.len(), 4);
        assert!(gly.permits(AtomKind::HA2));
        assert!(!gly.permits(AtomKind::HA));
    }

    #[test]
    fn load_parses_valid_toml() {
        let file = write_temp_file(
            r#"
            [G]
            obligatory = ["N9", "C8", "C1*"]
            optional = ["H8"]

            [ALA]
            obligatory = ["N", "CA", "C", "O", "CB"]
            "#,
        );
        let registry = TopologyRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 2);
        let g = registry.get(&ResidueKind::G).unwrap();
        assert_eq!(
            g.obligatory,
            [AtomKind::C1p, AtomKind::C8, AtomKind::N9].into_iter().collect()
        );
        assert!(g.optional.contains(&AtomKind::H8));
        assert!(registry.get(&ResidueKind::Ala).unwrap().optional.is_empty());
    }

    #[test]
    fn load_rejects_unknown_atom_names() {
        let file = write_temp_file(
            r#"
            [C]
            obligatory = ["N1", "XQ7"]
            "#,
        );
        let result = TopologyRegistry::load(file.path());
        assert!(matches!(
            result,
            Err(TopologyLoadError::UnknownAtom { ref name, .. }) if name == "XQ7"
        ));
    }

    #[test]
    fn load_rejects_unknown_residue_names() {
        let file = write_temp_file(
            r#"
            [HOH]
            obligatory = ["O"]
            "#,
        );
        let result = TopologyRegistry::load(file.path());
        assert!(matches!(result, Err(TopologyLoadError::UnknownResidue { .. })));
    }

    #[test]
    fn load_fails_for_invalid_toml() {
        let file = write_temp_file("[G\nobligatory = ");
        let result = TopologyRegistry::load(file.path());
        assert!(matches!(result, Err(TopologyLoadError::Toml { .. })));
    }

    #[test]
    fn load_fails_for_unexpected_fields() {
        let file = write_temp_file(
            r#"
            [G]
            obligatory = ["N9"]
            sidechain_atoms = ["C8"]
            "#,
        );
        let result = TopologyRegistry::load(file.path());
        assert!(matches!(result, Err(TopologyLoadError::Toml { .. })));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let result = TopologyRegistry::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(TopologyLoadError::Io { .. })));
    }

    #[test]
    fn merge_overrides_existing_entries() {
        let mut registry = TopologyRegistry::builtin().clone();
        let mut overrides = TopologyRegistry::new();
        overrides.insert(
            ResidueKind::U,
            ResidueTopology::new([AtomKind::N1], [AtomKind::H3]),
        );
        registry.merge(overrides);
        assert_eq!(registry.len(), 28);
        assert_eq!(registry.get(&ResidueKind::U).unwrap().obligatory.len(), 1);
        assert!(registry.get(&ResidueKind::C).unwrap().obligatory.len() > 1);
    }
}
