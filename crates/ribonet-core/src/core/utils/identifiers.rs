use crate::core::models::atom::AtomKind;
use crate::core::models::residue::ResidueKind;
use phf::{Map, phf_map};

static ATOM_NAMES: Map<&'static str, AtomKind> = phf_map! {
    "P" => AtomKind::P, "OP1" => AtomKind::OP1, "OP2" => AtomKind::OP2, "OP3" => AtomKind::OP3,
    "O1P" => AtomKind::OP1, "O2P" => AtomKind::OP2, "O3P" => AtomKind::OP3,
    "O5'" => AtomKind::O5p, "C5'" => AtomKind::C5p, "C4'" => AtomKind::C4p, "O4'" => AtomKind::O4p,
    "C3'" => AtomKind::C3p, "O3'" => AtomKind::O3p, "C2'" => AtomKind::C2p, "O2'" => AtomKind::O2p,
    "C1'" => AtomKind::C1p,
    "H5'" => AtomKind::H5p, "H5''" => AtomKind::H5pp, "H4'" => AtomKind::H4p, "H3'" => AtomKind::H3p,
    "H2'" => AtomKind::H2p, "H2''" => AtomKind::H2pp, "HO2'" => AtomKind::HO2p, "H1'" => AtomKind::H1p,
    "HO3'" => AtomKind::HO3p, "HO5'" => AtomKind::HO5p,
    "N1" => AtomKind::N1, "C2" => AtomKind::C2, "N3" => AtomKind::N3, "C4" => AtomKind::C4,
    "C5" => AtomKind::C5, "C6" => AtomKind::C6, "N6" => AtomKind::N6, "O6" => AtomKind::O6,
    "N7" => AtomKind::N7, "C8" => AtomKind::C8, "N9" => AtomKind::N9, "N2" => AtomKind::N2,
    "O2" => AtomKind::O2, "N4" => AtomKind::N4, "O4" => AtomKind::O4, "C7" => AtomKind::C7,
    "C5M" => AtomKind::C7,
    "H1" => AtomKind::H1, "H2" => AtomKind::H2, "H21" => AtomKind::H21, "H22" => AtomKind::H22,
    "H3" => AtomKind::H3, "H41" => AtomKind::H41, "H42" => AtomKind::H42, "H5" => AtomKind::H5,
    "H6" => AtomKind::H6, "H61" => AtomKind::H61, "H62" => AtomKind::H62, "H71" => AtomKind::H71,
    "H72" => AtomKind::H72, "H73" => AtomKind::H73, "H8" => AtomKind::H8,
    "LP1" => AtomKind::Lp1, "LP3" => AtomKind::Lp3, "LP7" => AtomKind::Lp7,
    "1LP2" => AtomKind::Lp2a, "2LP2" => AtomKind::Lp2b, "1LP4" => AtomKind::Lp4a,
    "2LP4" => AtomKind::Lp4b, "1LP6" => AtomKind::Lp6a, "2LP6" => AtomKind::Lp6b,
    "PSO" => AtomKind::PsO, "PSX" => AtomKind::PsX, "PSY" => AtomKind::PsY, "PSZ" => AtomKind::PsZ,
    "N" => AtomKind::N, "CA" => AtomKind::CA, "C" => AtomKind::C, "O" => AtomKind::O,
    "OXT" => AtomKind::OXT, "H" => AtomKind::H, "HN" => AtomKind::H, "HA" => AtomKind::HA,
    "HA2" => AtomKind::HA2, "HA3" => AtomKind::HA3,
    "CB" => AtomKind::CB, "CG" => AtomKind::CG, "CG1" => AtomKind::CG1, "CG2" => AtomKind::CG2,
    "OG" => AtomKind::OG, "OG1" => AtomKind::OG1, "SG" => AtomKind::SG, "CD" => AtomKind::CD,
    "CD1" => AtomKind::CD1, "CD2" => AtomKind::CD2, "ND1" => AtomKind::ND1, "ND2" => AtomKind::ND2,
    "OD1" => AtomKind::OD1, "OD2" => AtomKind::OD2, "SD" => AtomKind::SD, "CE" => AtomKind::CE,
    "CE1" => AtomKind::CE1, "CE2" => AtomKind::CE2, "CE3" => AtomKind::CE3, "NE" => AtomKind::NE,
    "NE1" => AtomKind::NE1, "NE2" => AtomKind::NE2, "OE1" => AtomKind::OE1, "OE2" => AtomKind::OE2,
    "CZ" => AtomKind::CZ, "CZ2" => AtomKind::CZ2, "CZ3" => AtomKind::CZ3, "NZ" => AtomKind::NZ,
    "OH" => AtomKind::OH, "CH2" => AtomKind::CH2, "NH1" => AtomKind::NH1, "NH2" => AtomKind::NH2,
};

static RESIDUE_NAMES: Map<&'static str, ResidueKind> = phf_map! {
    "A" => ResidueKind::A, "ADE" => ResidueKind::A, "RA" => ResidueKind::A,
    "C" => ResidueKind::C, "CYT" => ResidueKind::C, "RC" => ResidueKind::C,
    "G" => ResidueKind::G, "GUA" => ResidueKind::G, "RG" => ResidueKind::G,
    "U" => ResidueKind::U, "URA" => ResidueKind::U, "URI" => ResidueKind::U, "RU" => ResidueKind::U,
    "DA" => ResidueKind::DA, "DC" => ResidueKind::DC, "DG" => ResidueKind::DG, "DT" => ResidueKind::DT,
    "T" => ResidueKind::DT, "THY" => ResidueKind::DT,
    "ALA" => ResidueKind::Ala, "ARG" => ResidueKind::Arg, "ASN" => ResidueKind::Asn,
    "ASP" => ResidueKind::Asp, "CYS" => ResidueKind::Cys, "GLN" => ResidueKind::Gln,
    "GLU" => ResidueKind::Glu, "GLY" => ResidueKind::Gly, "HIS" => ResidueKind::His,
    "ILE" => ResidueKind::Ile, "LEU" => ResidueKind::Leu, "LYS" => ResidueKind::Lys,
    "MET" => ResidueKind::Met, "PHE" => ResidueKind::Phe, "PRO" => ResidueKind::Pro,
    "SER" => ResidueKind::Ser, "THR" => ResidueKind::Thr, "TRP" => ResidueKind::Trp,
    "TYR" => ResidueKind::Tyr, "VAL" => ResidueKind::Val,
};

/// Canonical spelling of an atom name: trimmed, upper-case, with the legacy `*`
/// prime marker replaced by `'`.
pub fn normalize_atom_name(name: &str) -> String {
    name.trim().to_ascii_uppercase().replace('*', "'")
}

pub fn lookup_atom_kind(name: &str) -> Option<AtomKind> {
    ATOM_NAMES.get(normalize_atom_name(name).as_str()).copied()
}

pub fn lookup_residue_kind(name: &str) -> Option<ResidueKind> {
    RESIDUE_NAMES
        .get(name.trim().to_ascii_uppercase().as_str())
        .copied()
}
