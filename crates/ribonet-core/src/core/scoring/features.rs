use super::hbond::HBondQuadruple;
use crate::core::models::atom::AtomKind;
use crate::core::models::residue::Residue;
use crate::core::utils::geometry::{angle, place_rotor_hydrogen};
use nalgebra::{Point3, Vector3};

/// Distance from a rotating methyl carbon to its synthesized hydrogen.
pub const ROTOR_HYDROGEN_BOND_LENGTH: f64 = 1.08;

/// The three geometric descriptors of a donor–hydrogen–acceptor–lone-pair quadruple.
///
/// - `x1 = ln(d(H, LP)³)`
/// - `x2 = atanh(cos ∠(D; H, A))`, the angle measured at the donor
/// - `x3 = atanh(cos ∠(A; D, LP))`, the angle measured at the acceptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HBondFeature {
    pub x1: f64,
    pub x2: f64,
    pub x3: f64,
}

impl HBondFeature {
    pub fn new(x1: f64, x2: f64, x3: f64) -> Self {
        Self { x1, x2, x3 }
    }

    pub fn from_geometry(
        donor: &Point3<f64>,
        hydrogen: &Point3<f64>,
        acceptor: &Point3<f64>,
        lone_pair: &Point3<f64>,
    ) -> Self {
        let x1 = (hydrogen - lone_pair).norm().powi(3).ln();
        let x2 = angle(donor, hydrogen, acceptor).cos().atanh();
        let x3 = angle(acceptor, donor, lone_pair).cos().atanh();
        Self { x1, x2, x3 }
    }

    /// Extracts the features of `quadruple` from the placed coordinates of the two
    /// residues. Returns `None` when an atom is missing.
    ///
    /// A rotating methyl donor without a recorded hydrogen gets a synthesized one.
    pub fn extract(
        donor_residue: &Residue,
        quadruple: &HBondQuadruple,
        acceptor_residue: &Residue,
    ) -> Option<Self> {
        let donor = donor_residue.placed(quadruple.donor)?;
        let hydrogen = match donor_residue.placed(quadruple.hydrogen) {
            Some(h) => h,
            None if quadruple.donor.is_rotor() => {
                synthesize_rotor_hydrogen(donor_residue, quadruple.donor)?
            }
            None => return None,
        };
        let acceptor = acceptor_residue.placed(quadruple.acceptor)?;
        let lone_pair = acceptor_residue.placed(quadruple.lone_pair)?;
        Some(Self::from_geometry(&donor, &hydrogen, &acceptor, &lone_pair))
    }

    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x1, self.x2, self.x3)
    }
}

/// Root carbon and ring-plane atoms of each rotating methyl donor.
fn rotor_anchors(donor: AtomKind) -> Option<(AtomKind, [AtomKind; 2])> {
    match donor {
        AtomKind::C7 => Some((AtomKind::C5, [AtomKind::C4, AtomKind::C6])),
        _ => None,
    }
}

fn synthesize_rotor_hydrogen(residue: &Residue, donor: AtomKind) -> Option<Point3<f64>> {
    let (root, [p1, p2]) = rotor_anchors(donor)?;
    let donor_pos = residue.placed(donor)?;
    let root_pos = residue.placed(root)?;
    let x = (residue.placed(p1)? - root_pos).normalize();
    let y = (residue.placed(p2)? - root_pos).normalize();
    Some(place_rotor_hydrogen(
        &donor_pos,
        &root_pos,
        &x,
        &y,
        ROTOR_HYDROGEN_BOND_LENGTH,
    ))
}
