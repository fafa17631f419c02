use super::atom::{AtomKind, AtomRecord};
use super::selection::AtomSet;
use crate::core::topology::implicit;
use crate::core::topology::registry::TopologyRegistry;
use crate::core::utils::identifiers::lookup_residue_kind;
use crate::core::utils::intern::Symbol;
use crate::core::utils::transform::Transform;
use itertools::Either;
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueKind {
    // --- Ribonucleotides ---
    A,
    C,
    G,
    U,

    // --- Deoxyribonucleotides ---
    DA,
    DC,
    DG,
    DT,

    // --- Amino acids ---
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,

    /// A residue name outside the enumeration.
    Misc(Symbol),
    /// A residue that failed validation; holds the original code.
    Unknown(Symbol),
}

/// The five nucleobases, used to pick reconstruction templates and frame atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleobase {
    Adenine,
    Cytosine,
    Guanine,
    Uracil,
    Thymine,
}

impl Nucleobase {
    pub fn is_purine(&self) -> bool {
        matches!(self, Nucleobase::Adenine | Nucleobase::Guanine)
    }
}

impl ResidueKind {
    pub fn from_name(name: &str) -> Self {
        lookup_residue_kind(name)
            .unwrap_or_else(|| ResidueKind::Misc(Symbol::intern(&name.trim().to_ascii_uppercase())))
    }

    /// The residue code as it appears in coordinate files.
    pub fn code(&self) -> &'static str {
        use ResidueKind::*;
        match self {
            A => "A",
            C => "C",
            G => "G",
            U => "U",
            DA => "DA",
            DC => "DC",
            DG => "DG",
            DT => "DT",
            Ala => "ALA",
            Arg => "ARG",
            Asn => "ASN",
            Asp => "ASP",
            Cys => "CYS",
            Gln => "GLN",
            Glu => "GLU",
            Gly => "GLY",
            His => "HIS",
            Ile => "ILE",
            Leu => "LEU",
            Lys => "LYS",
            Met => "MET",
            Phe => "PHE",
            Pro => "PRO",
            Ser => "SER",
            Thr => "THR",
            Trp => "TRP",
            Tyr => "TYR",
            Val => "VAL",
            Misc(symbol) | Unknown(symbol) => symbol.as_str(),
        }
    }

    pub fn nucleobase(&self) -> Option<Nucleobase> {
        use ResidueKind::*;
        match self {
            A | DA => Some(Nucleobase::Adenine),
            C | DC => Some(Nucleobase::Cytosine),
            G | DG => Some(Nucleobase::Guanine),
            U => Some(Nucleobase::Uracil),
            DT => Some(Nucleobase::Thymine),
            _ => None,
        }
    }

    pub fn is_nucleic_acid(&self) -> bool {
        self.nucleobase().is_some()
    }

    pub fn is_rna(&self) -> bool {
        matches!(
            self,
            ResidueKind::A | ResidueKind::C | ResidueKind::G | ResidueKind::U
        )
    }

    pub fn is_amino_acid(&self) -> bool {
        !self.is_nucleic_acid() && !matches!(self, ResidueKind::Misc(_) | ResidueKind::Unknown(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ResidueKind::Unknown(_))
    }

    /// The generic marker this kind becomes when validation fails.
    pub fn downgraded(&self) -> ResidueKind {
        match self {
            ResidueKind::Unknown(_) => *self,
            other => ResidueKind::Unknown(Symbol::intern(other.code())),
        }
    }
}

impl fmt::Display for ResidueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidueKind::Unknown(symbol) => write!(f, "unknown-{}", symbol),
            other => f.write_str(other.code()),
        }
    }
}

/// Chain, sequence number and insertion code of a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueLabel {
    pub chain: char,
    pub number: isize,
    pub insertion: Option<char>,
}

impl ResidueLabel {
    pub fn new(chain: char, number: isize) -> Self {
        Self {
            chain,
            number,
            insertion: None,
        }
    }

    pub fn with_insertion(mut self, insertion: char) -> Self {
        self.insertion = Some(insertion);
        self
    }
}

impl fmt::Display for ResidueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chain, self.number)?;
        if let Some(insertion) = self.insertion {
            write!(f, "{}", insertion)?;
        }
        Ok(())
    }
}

/// Outcome of [`Residue::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Every obligatory atom is present; `removed` lists the unexpected atoms erased.
    Complete { removed: Vec<AtomKind> },
    /// Obligatory atoms were missing and the residue kind was downgraded.
    Downgraded { missing: Vec<AtomKind> },
    /// The residue kind has no registered atom sets and was left unmodified.
    Unclassified,
}

/// A residue owning its atoms and the rigid transform that places them.
///
/// Atom positions are stored in reference (pre-transform) coordinates. Placed
/// positions are computed lazily, cached, and invalidated whenever the atoms or the
/// transform change. Atoms are always visited in [`AtomKind`] order.
#[derive(Debug, Clone)]
pub struct Residue {
    pub label: ResidueLabel,
    kind: ResidueKind,
    transform: Transform,
    atoms: BTreeMap<AtomKind, AtomRecord>,
    placed: OnceLock<BTreeMap<AtomKind, Point3<f64>>>,
}

impl Residue {
    pub fn new(label: ResidueLabel, kind: ResidueKind) -> Self {
        Self {
            label,
            kind,
            transform: Transform::identity(),
            atoms: BTreeMap::new(),
            placed: OnceLock::new(),
        }
    }

    pub fn with_atoms(mut self, atoms: impl IntoIterator<Item = AtomRecord>) -> Self {
        for atom in atoms {
            self.insert(atom);
        }
        self
    }

    pub fn kind(&self) -> ResidueKind {
        self.kind
    }

    /// Replaces the kind with its unknown marker. There is no way back.
    pub fn downgrade(&mut self) {
        self.kind = self.kind.downgraded();
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.invalidate();
    }

    /// Premultiplies the current transform by `transform`.
    pub fn apply_transform(&mut self, transform: &Transform) {
        self.transform = transform.compose(&self.transform);
        self.invalidate();
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, kind: AtomKind) -> bool {
        self.atoms.contains_key(&kind)
    }

    pub fn atom(&self, kind: AtomKind) -> Option<&AtomRecord> {
        self.atoms.get(&kind)
    }

    /// Inserts `atom`, replacing and returning any atom of the same kind.
    pub fn insert(&mut self, atom: AtomRecord) -> Option<AtomRecord> {
        self.invalidate();
        self.atoms.insert(atom.kind, atom)
    }

    pub fn erase(&mut self, kind: AtomKind) -> Option<AtomRecord> {
        self.invalidate();
        self.atoms.remove(&kind)
    }

    pub fn erase_kinds(&mut self, kinds: &[AtomKind]) {
        self.invalidate();
        for kind in kinds {
            self.atoms.remove(kind);
        }
    }

    pub fn erase_where(&mut self, set: &AtomSet) {
        self.invalidate();
        self.atoms.retain(|kind, _| !set.matches(*kind));
    }

    pub fn atoms(&self) -> impl Iterator<Item = &AtomRecord> + Clone {
        self.atoms.values()
    }

    /// Lazily yields the atoms matching `set` in atom-kind order. The iterator can be
    /// cloned to restart the walk.
    pub fn atoms_matching<'a>(
        &'a self,
        set: &'a AtomSet,
    ) -> impl Iterator<Item = &'a AtomRecord> + Clone + 'a {
        self.atoms.values().filter(move |atom| set.matches(atom.kind))
    }

    /// Position of `kind` before the residue transform is applied.
    pub fn reference(&self, kind: AtomKind) -> Option<Point3<f64>> {
        self.atoms.get(&kind).map(|atom| atom.position)
    }

    /// Position of `kind` with the residue transform applied.
    pub fn placed(&self, kind: AtomKind) -> Option<Point3<f64>> {
        if self.transform.is_identity() {
            return self.reference(kind);
        }
        self.placed_cache().get(&kind).copied()
    }

    /// Every placed position in atom-kind order.
    pub fn placed_atoms(&self) -> impl Iterator<Item = (AtomKind, Point3<f64>)> + '_ {
        if self.transform.is_identity() {
            Either::Left(self.atoms.values().map(|atom| (atom.kind, atom.position)))
        } else {
            Either::Right(self.placed_cache().iter().map(|(kind, p)| (*kind, *p)))
        }
    }

    /// Makes sure the placed cache is current.
    pub fn refresh_placement(&self) {
        if !self.transform.is_identity() {
            self.placed_cache();
        }
    }

    pub fn is_placement_cached(&self) -> bool {
        self.placed.get().is_some()
    }

    fn placed_cache(&self) -> &BTreeMap<AtomKind, Point3<f64>> {
        self.placed.get_or_init(|| {
            self.atoms
                .iter()
                .map(|(kind, atom)| (*kind, self.transform.apply(&atom.position)))
                .collect()
        })
    }

    fn invalidate(&mut self) {
        self.placed.take();
    }

    /// Moves the atoms into the residue's local frame and stores that frame as the
    /// transform. Placed positions do not change.
    ///
    /// The frame is built from N9, C4 and C8 for purines and from N1, C2 and C6 for
    /// pyrimidines. Returns `false` (and does nothing) for other residues or when a
    /// frame atom is missing.
    pub fn localize(&mut self) -> bool {
        let Some(base) = self.kind.nucleobase() else {
            return false;
        };
        let frame = if base.is_purine() {
            [AtomKind::N9, AtomKind::C4, AtomKind::C8]
        } else {
            [AtomKind::N1, AtomKind::C2, AtomKind::C6]
        };
        let (Some(p1), Some(p2), Some(p3)) = (
            self.placed(frame[0]),
            self.placed(frame[1]),
            self.placed(frame[2]),
        ) else {
            return false;
        };

        let align = Transform::align_from(&p1, &p2, &p3);
        let placed: Vec<(AtomKind, Point3<f64>)> = self.placed_atoms().collect();
        for (kind, position) in placed {
            if let Some(atom) = self.atoms.get_mut(&kind) {
                atom.position = align.apply(&position);
            }
        }
        self.set_transform(align.invert());
        true
    }

    /// Adds the implicit hydrogens and lone pairs of a nucleotide base. Atoms whose
    /// anchors are missing are skipped. Returns the number of atoms placed.
    pub fn reconstruct_implicit_atoms(&mut self) -> usize {
        implicit::reconstruct(self)
    }

    /// Erases every atom registered as optional for the current kind.
    pub fn remove_optionals(&mut self, registry: &TopologyRegistry) {
        if let Some(topology) = registry.get(&self.kind) {
            let optional: Vec<AtomKind> = topology.optional.iter().copied().collect();
            self.erase_kinds(&optional);
        }
    }

    /// Checks the residue against its registered atom sets.
    ///
    /// Nucleotides are first stripped of their optional atoms and rebuilt with
    /// implicit hydrogens and lone pairs. A residue missing an obligatory atom is
    /// downgraded and keeps its atoms; otherwise atoms that are neither obligatory nor
    /// optional are erased.
    pub fn validate(&mut self, registry: &TopologyRegistry) -> Validation {
        if self.kind.is_nucleic_acid() {
            self.remove_optionals(registry);
            self.reconstruct_implicit_atoms();
        }

        let Some(topology) = registry.get(&self.kind) else {
            return Validation::Unclassified;
        };

        let missing: Vec<AtomKind> = topology
            .obligatory
            .iter()
            .filter(|kind| !self.atoms.contains_key(*kind))
            .copied()
            .collect();
        if !missing.is_empty() {
            debug!(
                residue = %self.label,
                kind = %self.kind,
                missing = missing.len(),
                "Downgrading residue with missing obligatory atoms."
            );
            self.downgrade();
            return Validation::Downgraded { missing };
        }

        let removed: Vec<AtomKind> = self
            .atoms
            .keys()
            .filter(|kind| !topology.permits(**kind))
            .copied()
            .collect();
        if !removed.is_empty() {
            self.erase_kinds(&removed);
        }
        Validation::Complete { removed }
    }
}
