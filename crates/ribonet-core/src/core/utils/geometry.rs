use nalgebra::{Point3, Vector3};

pub const TAN_30: f64 = 0.577_350_269_189_625_8;
pub const TAN_60: f64 = 1.732_050_807_568_877_2;
pub const TAN_70: f64 = 2.747_477_419_454_622;

/// Angle in radians at `vertex` between the rays towards `a` and `b`.
///
/// Degenerate input (a point coinciding with the vertex) yields NaN.
pub fn angle(vertex: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let u = (a - vertex).normalize();
    let v = (b - vertex).normalize();
    u.dot(&v).acos()
}

/// Unsigned torsion angle in radians around the `b`–`c` bond, in `[0, π]`.
pub fn torsion_angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, d: &Point3<f64>) -> f64 {
    let (p1, p2, _) = project_torsion_arms(a, b, c, d);
    p1.normalize().dot(&p2.normalize()).clamp(-1.0, 1.0).acos()
}

/// Signed torsion angle in radians around the `b`–`c` bond, in `[-π, π]`.
///
/// The sign is the sign of the scalar triple product of the two projected arms and
/// the bond axis.
pub fn signed_torsion_angle(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    d: &Point3<f64>,
) -> f64 {
    let (p1, p2, axis) = project_torsion_arms(a, b, c, d);
    let magnitude = p1.normalize().dot(&p2.normalize()).clamp(-1.0, 1.0).acos();
    if p1.cross(&p2).dot(&axis) < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

fn project_torsion_arms(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    d: &Point3<f64>,
) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
    let axis = (c - b).normalize();
    let arm1 = a - b;
    let arm2 = d - c;
    let p1 = arm1 - axis * arm1.dot(&axis);
    let p2 = arm2 - axis * arm2.dot(&axis);
    (p1, p2, axis)
}

/// Places an atom on the external bisector of the angle `nb1`–`anchor`–`nb2`.
///
/// This is the construction for aromatic C-H, ring N-H and in-ring lone pairs.
pub fn place_on_bisector(
    anchor: &Point3<f64>,
    nb1: &Point3<f64>,
    nb2: &Point3<f64>,
    bond_length: f64,
) -> Point3<f64> {
    let direction = ((anchor - nb1).normalize() + (anchor - nb2).normalize()).normalize();
    anchor + direction * bond_length
}

/// Places the two in-plane substituents of a trigonal exocyclic atom (NH2 hydrogens,
/// carbonyl lone pairs).
///
/// `x` and `y` are unit vectors along two ring bonds from `root`, `axis` is the
/// exocyclic atom. Each substituent sits 60° off the `root`→`axis` bond, on either
/// side, inside the ring plane.
pub fn place_trigonal_pair(
    axis: &Point3<f64>,
    root: &Point3<f64>,
    x: &Vector3<f64>,
    y: &Vector3<f64>,
    bond_length: f64,
) -> [Point3<f64>; 2] {
    let up = x.cross(y).normalize();
    let z = (axis - root).normalize();
    let branch_a = (z + up.cross(&z).normalize() * TAN_60).normalize();
    let branch_b = (z + z.cross(&up).normalize() * TAN_60).normalize();
    [axis + branch_a * bond_length, axis + branch_b * bond_length]
}

/// Places the three hydrogens of a methyl group in a staggered tetrahedral fan around
/// the `root`→`axis` bond.
pub fn place_methyl_triplet(
    axis: &Point3<f64>,
    root: &Point3<f64>,
    x: &Vector3<f64>,
    y: &Vector3<f64>,
    bond_length: f64,
) -> [Point3<f64>; 3] {
    let up = x.cross(y).normalize();
    let z = (axis - root).normalize();
    let p = up.cross(&z).normalize();
    let branch_1 = (z + p * TAN_70).normalize();
    let branch_2 = (z + (up - p * TAN_30).normalize() * TAN_70).normalize();
    let branch_3 = (z + (-up - p * TAN_30).normalize() * TAN_70).normalize();
    [
        axis + branch_1 * bond_length,
        axis + branch_2 * bond_length,
        axis + branch_3 * bond_length,
    ]
}

/// Synthesizes a single representative hydrogen on a rotating methyl donor.
///
/// Only the first branch of [`place_methyl_triplet`] is produced. Which of the
/// symmetric candidates best represents a freely rotating methyl has not been
/// verified; the construction is kept as a numerical approximation.
pub fn place_rotor_hydrogen(
    donor: &Point3<f64>,
    root: &Point3<f64>,
    x: &Vector3<f64>,
    y: &Vector3<f64>,
    bond_length: f64,
) -> Point3<f64> {
    let up = x.cross(y).normalize();
    let z = (donor - root).normalize();
    let branch = (z + up.cross(&z).normalize() * TAN_70).normalize();
    donor + branch * bond_length
}
