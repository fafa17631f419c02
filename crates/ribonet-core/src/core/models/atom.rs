use crate::core::utils::identifiers::{lookup_atom_kind, normalize_atom_name};
use crate::core::utils::intern::Symbol;
use bitflags::bitflags;
use nalgebra::Point3;
use std::fmt;

bitflags! {
    /// Capability mask attached to every [`AtomKind`].
    ///
    /// Capabilities replace per-kind type queries: a kind either has a capability or
    /// it does not, and the mask is fixed for the lifetime of the process.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AtomCapabilities: u16 {
        const HYDROGEN     = 1 << 0;
        const LONE_PAIR    = 1 << 1;
        const PSEUDO       = 1 << 2;
        const BACKBONE     = 1 << 3;
        const SIDE_CHAIN   = 1 << 4;
        const CARBON       = 1 << 5;
        const NITROGEN     = 1 << 6;
        const OXYGEN       = 1 << 7;
        const PHOSPHORUS   = 1 << 8;
        const SULFUR       = 1 << 9;
        /// Methyl carbon whose hydrogens rotate freely.
        const ROTOR        = 1 << 10;
        const NUCLEIC_ACID = 1 << 11;
        const AMINO_ACID   = 1 << 12;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Hydrogen,
    Carbon,
    Nitrogen,
    Oxygen,
    Phosphorus,
    Sulfur,
    Other,
}

/// Identity of an atom within a residue.
///
/// The declaration order of the variants is the canonical atom order used when a
/// residue's atoms are iterated. Names that are not part of the enumeration are kept
/// in the [`AtomKind::Misc`] extension slot and sort after every enumerated kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomKind {
    // --- Nucleotide phosphate and sugar ---
    P,
    OP1,
    OP2,
    OP3,
    O5p,
    C5p,
    C4p,
    O4p,
    C3p,
    O3p,
    C2p,
    O2p,
    C1p,

    // --- Sugar hydrogens ---
    H5p,
    H5pp,
    H4p,
    H3p,
    H2p,
    H2pp,
    HO2p,
    H1p,
    HO3p,
    HO5p,

    // --- Base heavy atoms ---
    N1,
    C2,
    N3,
    C4,
    C5,
    C6,
    N6,
    O6,
    N7,
    C8,
    N9,
    N2,
    O2,
    N4,
    O4,
    C7,

    // --- Base hydrogens ---
    H1,
    H2,
    H21,
    H22,
    H3,
    H41,
    H42,
    H5,
    H6,
    H61,
    H62,
    H71,
    H72,
    H73,
    H8,

    // --- Lone pairs ---
    Lp1,
    Lp3,
    Lp7,
    Lp2a,
    Lp2b,
    Lp4a,
    Lp4b,
    Lp6a,
    Lp6b,

    // --- Pseudo atoms ---
    PsO,
    PsX,
    PsY,
    PsZ,

    // --- Amino-acid backbone ---
    N,
    CA,
    C,
    O,
    OXT,
    H,
    HA,
    HA2,
    HA3,

    // --- Amino-acid side chains ---
    CB,
    CG,
    CG1,
    CG2,
    OG,
    OG1,
    SG,
    CD,
    CD1,
    CD2,
    ND1,
    ND2,
    OD1,
    OD2,
    SD,
    CE,
    CE1,
    CE2,
    CE3,
    NE,
    NE1,
    NE2,
    OE1,
    OE2,
    CZ,
    CZ2,
    CZ3,
    NZ,
    OH,
    CH2,
    NH1,
    NH2,

    /// Any atom name outside the enumeration.
    Misc(Symbol),
}

impl AtomKind {
    /// Resolves an atom name, falling back to the [`AtomKind::Misc`] slot for names
    /// the enumeration does not know.
    pub fn from_name(name: &str) -> Self {
        lookup_atom_kind(name).unwrap_or_else(|| AtomKind::Misc(Symbol::intern(&normalize_atom_name(name))))
    }

    /// Resolves an atom name only if it belongs to the enumeration.
    pub fn lookup(name: &str) -> Option<Self> {
        lookup_atom_kind(name)
    }

    pub fn name(&self) -> &'static str {
        use AtomKind::*;
        match self {
            P => "P",
            OP1 => "OP1",
            OP2 => "OP2",
            OP3 => "OP3",
            O5p => "O5'",
            C5p => "C5'",
            C4p => "C4'",
            O4p => "O4'",
            C3p => "C3'",
            O3p => "O3'",
            C2p => "C2'",
            O2p => "O2'",
            C1p => "C1'",
            H5p => "H5'",
            H5pp => "H5''",
            H4p => "H4'",
            H3p => "H3'",
            H2p => "H2'",
            H2pp => "H2''",
            HO2p => "HO2'",
            H1p => "H1'",
            HO3p => "HO3'",
            HO5p => "HO5'",
            N1 => "N1",
            C2 => "C2",
            N3 => "N3",
            C4 => "C4",
            C5 => "C5",
            C6 => "C6",
            N6 => "N6",
            O6 => "O6",
            N7 => "N7",
            C8 => "C8",
            N9 => "N9",
            N2 => "N2",
            O2 => "O2",
            N4 => "N4",
            O4 => "O4",
            C7 => "C7",
            H1 => "H1",
            H2 => "H2",
            H21 => "H21",
            H22 => "H22",
            H3 => "H3",
            H41 => "H41",
            H42 => "H42",
            H5 => "H5",
            H6 => "H6",
            H61 => "H61",
            H62 => "H62",
            H71 => "H71",
            H72 => "H72",
            H73 => "H73",
            H8 => "H8",
            Lp1 => "LP1",
            Lp3 => "LP3",
            Lp7 => "LP7",
            Lp2a => "1LP2",
            Lp2b => "2LP2",
            Lp4a => "1LP4",
            Lp4b => "2LP4",
            Lp6a => "1LP6",
            Lp6b => "2LP6",
            PsO => "PSO",
            PsX => "PSX",
            PsY => "PSY",
            PsZ => "PSZ",
            N => "N",
            CA => "CA",
            C => "C",
            O => "O",
            OXT => "OXT",
            H => "H",
            HA => "HA",
            HA2 => "HA2",
            HA3 => "HA3",
            CB => "CB",
            CG => "CG",
            CG1 => "CG1",
            CG2 => "CG2",
            OG => "OG",
            OG1 => "OG1",
            SG => "SG",
            CD => "CD",
            CD1 => "CD1",
            CD2 => "CD2",
            ND1 => "ND1",
            ND2 => "ND2",
            OD1 => "OD1",
            OD2 => "OD2",
            SD => "SD",
            CE => "CE",
            CE1 => "CE1",
            CE2 => "CE2",
            CE3 => "CE3",
            NE => "NE",
            NE1 => "NE1",
            NE2 => "NE2",
            OE1 => "OE1",
            OE2 => "OE2",
            CZ => "CZ",
            CZ2 => "CZ2",
            CZ3 => "CZ3",
            NZ => "NZ",
            OH => "OH",
            CH2 => "CH2",
            NH1 => "NH1",
            NH2 => "NH2",
            Misc(symbol) => symbol.as_str(),
        }
    }

    pub fn capabilities(&self) -> AtomCapabilities {
        use AtomCapabilities as Cap;
        use AtomKind::*;

        let nucleic_backbone = Cap::NUCLEIC_ACID | Cap::BACKBONE;
        let base = Cap::NUCLEIC_ACID | Cap::SIDE_CHAIN;
        let protein_backbone = Cap::AMINO_ACID | Cap::BACKBONE;
        let protein_side = Cap::AMINO_ACID | Cap::SIDE_CHAIN;

        match self {
            P => nucleic_backbone | Cap::PHOSPHORUS,
            OP1 | OP2 | OP3 | O5p | O4p | O3p | O2p => nucleic_backbone | Cap::OXYGEN,
            C5p | C4p | C3p | C2p | C1p => nucleic_backbone | Cap::CARBON,
            H5p | H5pp | H4p | H3p | H2p | H2pp | HO2p | H1p | HO3p | HO5p => {
                nucleic_backbone | Cap::HYDROGEN
            }
            N1 | N3 | N6 | N7 | N9 | N2 | N4 => base | Cap::NITROGEN,
            C2 | C4 | C5 | C6 | C8 => base | Cap::CARBON,
            C7 => base | Cap::CARBON | Cap::ROTOR,
            O6 | O2 | O4 => base | Cap::OXYGEN,
            H1 | H2 | H21 | H22 | H3 | H41 | H42 | H5 | H6 | H61 | H62 | H71 | H72 | H73
            | H8 => base | Cap::HYDROGEN,
            Lp1 | Lp3 | Lp7 | Lp2a | Lp2b | Lp4a | Lp4b | Lp6a | Lp6b => base | Cap::LONE_PAIR,
            PsO | PsX | PsY | PsZ => Cap::PSEUDO,
            N => protein_backbone | Cap::NITROGEN,
            CA | C => protein_backbone | Cap::CARBON,
            O | OXT => protein_backbone | Cap::OXYGEN,
            H | HA | HA2 | HA3 => protein_backbone | Cap::HYDROGEN,
            CB | CG | CG1 | CG2 | CD | CD1 | CD2 | CE | CE1 | CE2 | CE3 | CZ | CZ2 | CZ3
            | CH2 => protein_side | Cap::CARBON,
            ND1 | ND2 | NE | NE1 | NE2 | NZ | NH1 | NH2 => protein_side | Cap::NITROGEN,
            OG | OG1 | OD1 | OD2 | OE1 | OE2 | OH => protein_side | Cap::OXYGEN,
            SG | SD => protein_side | Cap::SULFUR,
            Misc(symbol) => misc_capabilities(symbol.as_str()),
        }
    }

    #[inline]
    pub fn has(&self, capability: AtomCapabilities) -> bool {
        self.capabilities().contains(capability)
    }

    pub fn is_hydrogen(&self) -> bool {
        self.has(AtomCapabilities::HYDROGEN)
    }

    pub fn is_lone_pair(&self) -> bool {
        self.has(AtomCapabilities::LONE_PAIR)
    }

    pub fn is_pseudo(&self) -> bool {
        self.has(AtomCapabilities::PSEUDO)
    }

    pub fn is_backbone(&self) -> bool {
        self.has(AtomCapabilities::BACKBONE)
    }

    pub fn is_side_chain(&self) -> bool {
        self.has(AtomCapabilities::SIDE_CHAIN)
    }

    pub fn is_rotor(&self) -> bool {
        self.has(AtomCapabilities::ROTOR)
    }

    pub fn element(&self) -> Element {
        let caps = self.capabilities();
        if caps.contains(AtomCapabilities::HYDROGEN) {
            Element::Hydrogen
        } else if caps.contains(AtomCapabilities::CARBON) {
            Element::Carbon
        } else if caps.contains(AtomCapabilities::NITROGEN) {
            Element::Nitrogen
        } else if caps.contains(AtomCapabilities::OXYGEN) {
            Element::Oxygen
        } else if caps.contains(AtomCapabilities::PHOSPHORUS) {
            Element::Phosphorus
        } else if caps.contains(AtomCapabilities::SULFUR) {
            Element::Sulfur
        } else {
            Element::Other
        }
    }
}

fn misc_capabilities(name: &str) -> AtomCapabilities {
    match name.chars().find(|c| c.is_ascii_alphabetic()) {
        Some('H') | Some('D') => AtomCapabilities::HYDROGEN,
        Some('C') => AtomCapabilities::CARBON,
        Some('N') => AtomCapabilities::NITROGEN,
        Some('O') => AtomCapabilities::OXYGEN,
        Some('P') => AtomCapabilities::PHOSPHORUS,
        Some('S') => AtomCapabilities::SULFUR,
        _ => AtomCapabilities::empty(),
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single atom owned by a residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomRecord {
    pub kind: AtomKind,
    /// Position in the residue's reference (pre-transform) coordinates.
    pub position: Point3<f64>,
    pub alt_location: char,
}

impl AtomRecord {
    pub fn new(kind: AtomKind, position: Point3<f64>) -> Self {
        Self {
            kind,
            position,
            alt_location: ' ',
        }
    }

    pub fn with_alt_location(mut self, alt_location: char) -> Self {
        self.alt_location = alt_location;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_resolves_known_kinds() {
        assert_eq!(AtomKind::from_name("N9"), AtomKind::N9);
        assert_eq!(AtomKind::from_name("O4*"), AtomKind::O4p);
    }

    #[test]
    fn from_name_falls_back_to_misc_slot() {
        let kind = AtomKind::from_name("mg");
        assert!(matches!(kind, AtomKind::Misc(_)));
        assert_eq!(kind.name(), "MG");
        assert_eq!(AtomKind::from_name("MG"), kind);
        assert_eq!(AtomKind::lookup("MG"), None);
    }

    #[test]
    fn name_round_trips_through_lookup_for_enumerated_kinds() {
        for kind in [
            AtomKind::P,
            AtomKind::C1p,
            AtomKind::H5pp,
            AtomKind::Lp2a,
            AtomKind::Lp6b,
            AtomKind::H73,
            AtomKind::PsZ,
            AtomKind::OXT,
            AtomKind::NH2,
        ] {
            assert_eq!(AtomKind::lookup(kind.name()), Some(kind));
        }
    }

    #[test]
    fn capabilities_classify_nucleotide_atoms() {
        assert!(AtomKind::C1p.is_backbone());
        assert!(!AtomKind::C1p.is_side_chain());
        assert!(AtomKind::N7.is_side_chain());
        assert!(AtomKind::H8.is_hydrogen());
        assert!(AtomKind::Lp3.is_lone_pair());
        assert!(!AtomKind::Lp3.is_hydrogen());
        assert!(AtomKind::PsY.is_pseudo());
        assert!(AtomKind::C7.is_rotor());
        assert!(!AtomKind::C5.is_rotor());
    }

    #[test]
    fn capabilities_classify_amino_acid_atoms() {
        assert!(AtomKind::CA.is_backbone());
        assert!(AtomKind::CB.is_side_chain());
        assert!(AtomKind::HA.is_hydrogen());
        assert!(AtomKind::SG.has(AtomCapabilities::SULFUR | AtomCapabilities::AMINO_ACID));
    }

    #[test]
    fn element_follows_capabilities() {
        assert_eq!(AtomKind::N1.element(), Element::Nitrogen);
        assert_eq!(AtomKind::C8.element(), Element::Carbon);
        assert_eq!(AtomKind::O2p.element(), Element::Oxygen);
        assert_eq!(AtomKind::P.element(), Element::Phosphorus);
        assert_eq!(AtomKind::H61.element(), Element::Hydrogen);
        assert_eq!(AtomKind::Lp1.element(), Element::Other);
        assert_eq!(AtomKind::from_name("HW1").element(), Element::Hydrogen);
    }

    #[test]
    fn enumerated_kinds_sort_before_misc() {
        let misc = AtomKind::from_name("ZZ9");
        assert!(AtomKind::NH2 < misc);
        assert!(AtomKind::P < AtomKind::C1p);
        assert!(AtomKind::C1p < AtomKind::N1);
    }

    #[test]
    fn atom_record_defaults_to_blank_alt_location() {
        let atom = AtomRecord::new(AtomKind::N1, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.alt_location, ' ');
        assert_eq!(atom.with_alt_location('A').alt_location, 'A');
    }
}
