use crate::core::models::atom::{AtomKind, AtomRecord};
use crate::core::models::residue::{Nucleobase, Residue};
use crate::core::utils::geometry::{place_methyl_triplet, place_on_bisector, place_trigonal_pair};
use nalgebra::Point3;
use tracing::trace;

pub const POLAR_BOND_LENGTH: f64 = 1.00;
pub const AROMATIC_CH_BOND_LENGTH: f64 = 1.08;
pub const METHYL_CH_BOND_LENGTH: f64 = 1.09;
pub const LONE_PAIR_DISTANCE: f64 = 1.00;

/// How one group of implicit atoms is built from the residue's heavy atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImplicitPlacement {
    /// One atom on the external bisector of `neighbors`–`anchor`.
    Bisector {
        atom: AtomKind,
        anchor: AtomKind,
        neighbors: [AtomKind; 2],
        bond_length: f64,
    },
    /// Two in-plane atoms on the exocyclic `axis`, bonded to `root` in a ring spanned
    /// by `plane`.
    Pair {
        atoms: [AtomKind; 2],
        axis: AtomKind,
        root: AtomKind,
        plane: [AtomKind; 2],
        bond_length: f64,
    },
    /// Three methyl hydrogens on `axis`.
    Methyl {
        atoms: [AtomKind; 3],
        axis: AtomKind,
        root: AtomKind,
        plane: [AtomKind; 2],
        bond_length: f64,
    },
}

use AtomKind::*;
use ImplicitPlacement::{Bisector, Methyl, Pair};

const fn bisector(
    atom: AtomKind,
    anchor: AtomKind,
    neighbors: [AtomKind; 2],
    bond_length: f64,
) -> ImplicitPlacement {
    Bisector {
        atom,
        anchor,
        neighbors,
        bond_length,
    }
}

const fn pair(
    atoms: [AtomKind; 2],
    axis: AtomKind,
    root: AtomKind,
    plane: [AtomKind; 2],
    bond_length: f64,
) -> ImplicitPlacement {
    Pair {
        atoms,
        axis,
        root,
        plane,
        bond_length,
    }
}

const ADENINE: &[ImplicitPlacement] = &[
    bisector(H2, C2, [N1, N3], AROMATIC_CH_BOND_LENGTH),
    bisector(H8, C8, [N7, N9], AROMATIC_CH_BOND_LENGTH),
    pair([H61, H62], N6, C6, [N1, C5], POLAR_BOND_LENGTH),
    bisector(Lp1, N1, [C2, C6], LONE_PAIR_DISTANCE),
    bisector(Lp3, N3, [C2, C4], LONE_PAIR_DISTANCE),
    bisector(Lp7, N7, [C5, C8], LONE_PAIR_DISTANCE),
];

const GUANINE: &[ImplicitPlacement] = &[
    bisector(H1, N1, [C2, C6], POLAR_BOND_LENGTH),
    bisector(H8, C8, [N7, N9], AROMATIC_CH_BOND_LENGTH),
    pair([H21, H22], N2, C2, [N1, N3], POLAR_BOND_LENGTH),
    bisector(Lp3, N3, [C2, C4], LONE_PAIR_DISTANCE),
    bisector(Lp7, N7, [C5, C8], LONE_PAIR_DISTANCE),
    pair([Lp6a, Lp6b], O6, C6, [N1, C5], LONE_PAIR_DISTANCE),
];

const CYTOSINE: &[ImplicitPlacement] = &[
    bisector(H5, C5, [C4, C6], AROMATIC_CH_BOND_LENGTH),
    bisector(H6, C6, [C5, N1], AROMATIC_CH_BOND_LENGTH),
    pair([H41, H42], N4, C4, [N3, C5], POLAR_BOND_LENGTH),
    bisector(Lp3, N3, [C2, C4], LONE_PAIR_DISTANCE),
    pair([Lp2a, Lp2b], O2, C2, [N1, N3], LONE_PAIR_DISTANCE),
];

const URACIL: &[ImplicitPlacement] = &[
    bisector(H3, N3, [C2, C4], POLAR_BOND_LENGTH),
    bisector(H5, C5, [C4, C6], AROMATIC_CH_BOND_LENGTH),
    bisector(H6, C6, [C5, N1], AROMATIC_CH_BOND_LENGTH),
    pair([Lp2a, Lp2b], O2, C2, [N1, N3], LONE_PAIR_DISTANCE),
    pair([Lp4a, Lp4b], O4, C4, [N3, C5], LONE_PAIR_DISTANCE),
];

const THYMINE: &[ImplicitPlacement] = &[
    bisector(H3, N3, [C2, C4], POLAR_BOND_LENGTH),
    bisector(H6, C6, [C5, N1], AROMATIC_CH_BOND_LENGTH),
    Methyl {
        atoms: [H71, H72, H73],
        axis: C7,
        root: C5,
        plane: [C4, C6],
        bond_length: METHYL_CH_BOND_LENGTH,
    },
    pair([Lp2a, Lp2b], O2, C2, [N1, N3], LONE_PAIR_DISTANCE),
    pair([Lp4a, Lp4b], O4, C4, [N3, C5], LONE_PAIR_DISTANCE),
];

/// Reconstruction templates for a nucleobase.
pub fn templates(base: Nucleobase) -> &'static [ImplicitPlacement] {
    match base {
        Nucleobase::Adenine => ADENINE,
        Nucleobase::Guanine => GUANINE,
        Nucleobase::Cytosine => CYTOSINE,
        Nucleobase::Uracil => URACIL,
        Nucleobase::Thymine => THYMINE,
    }
}

/// Builds the implicit hydrogens and lone pairs of `residue` from its reference
/// coordinates and inserts them. Non-nucleotides are left alone. Returns the number
/// of atoms placed.
pub fn reconstruct(residue: &mut Residue) -> usize {
    let Some(base) = residue.kind().nucleobase() else {
        return 0;
    };

    let mut placed: Vec<AtomRecord> = Vec::new();
    for template in templates(base) {
        match place(residue, template) {
            Some(atoms) => placed.extend(atoms),
            None => trace!(
                residue = %residue.label,
                template = ?template,
                "Skipping implicit atoms with missing anchors."
            ),
        }
    }

    let count = placed.len();
    for atom in placed {
        residue.insert(atom);
    }
    count
}

fn place(residue: &Residue, template: &ImplicitPlacement) -> Option<Vec<AtomRecord>> {
    let at = |kind: AtomKind| residue.reference(kind);
    let record = |kind: AtomKind, position: Point3<f64>| AtomRecord::new(kind, position);

    match *template {
        Bisector {
            atom,
            anchor,
            neighbors: [nb1, nb2],
            bond_length,
        } => {
            let position = place_on_bisector(&at(anchor)?, &at(nb1)?, &at(nb2)?, bond_length);
            Some(vec![record(atom, position)])
        }
        Pair {
            atoms: [first, second],
            axis,
            root,
            plane: [p1, p2],
            bond_length,
        } => {
            let root_pos = at(root)?;
            let x = (at(p1)? - root_pos).normalize();
            let y = (at(p2)? - root_pos).normalize();
            let [a, b] = place_trigonal_pair(&at(axis)?, &root_pos, &x, &y, bond_length);
            Some(vec![record(first, a), record(second, b)])
        }
        Methyl {
            atoms: [h1, h2, h3],
            axis,
            root,
            plane: [p1, p2],
            bond_length,
        } => {
            let root_pos = at(root)?;
            let x = (at(p1)? - root_pos).normalize();
            let y = (at(p2)? - root_pos).normalize();
            let [a, b, c] = place_methyl_triplet(&at(axis)?, &root_pos, &x, &y, bond_length);
            Some(vec![record(h1, a), record(h2, b), record(h3, c)])
        }
    }
}
