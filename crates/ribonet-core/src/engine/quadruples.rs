use crate::core::models::atom::AtomKind;
use crate::core::models::residue::{Nucleobase, ResidueKind};
use crate::core::scoring::hbond::HBondQuadruple;
use itertools::Itertools;

/// Supplies the candidate quadruples tried between a donor and an acceptor residue.
///
/// Implementations are shared by the scoring workers and must be `Sync`. Closures
/// with the matching signature implement the trait directly.
pub trait QuadrupleSource: Sync {
    fn quadruples(&self, donor: &ResidueKind, acceptor: &ResidueKind) -> Vec<HBondQuadruple>;
}

impl<F> QuadrupleSource for F
where
    F: Fn(&ResidueKind, &ResidueKind) -> Vec<HBondQuadruple> + Sync,
{
    fn quadruples(&self, donor: &ResidueKind, acceptor: &ResidueKind) -> Vec<HBondQuadruple> {
        self(donor, acceptor)
    }
}

/// Every donor of the donor base paired with every acceptor of the acceptor base.
///
/// Deoxyribonucleotides share the tables of their base. Residues without a
/// nucleobase (including downgraded ones) yield nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseEdgeQuadruples;

impl QuadrupleSource for BaseEdgeQuadruples {
    fn quadruples(&self, donor: &ResidueKind, acceptor: &ResidueKind) -> Vec<HBondQuadruple> {
        let (Some(donor_base), Some(acceptor_base)) = (donor.nucleobase(), acceptor.nucleobase())
        else {
            return Vec::new();
        };
        base_donors(donor_base)
            .iter()
            .cartesian_product(base_acceptors(acceptor_base))
            .map(|(&(d, h), &(a, lp))| HBondQuadruple::new(d, h, a, lp))
            .collect()
    }
}

/// Heavy atom and hydrogen of each donor on the base.
pub fn base_donors(base: Nucleobase) -> &'static [(AtomKind, AtomKind)] {
    use AtomKind::*;
    match base {
        Nucleobase::Adenine => &[(N6, H61), (N6, H62), (C2, H2), (C8, H8)],
        Nucleobase::Guanine => &[(N1, H1), (N2, H21), (N2, H22), (C8, H8)],
        Nucleobase::Cytosine => &[(N4, H41), (N4, H42), (C5, H5), (C6, H6)],
        Nucleobase::Uracil => &[(N3, H3), (C5, H5), (C6, H6)],
        Nucleobase::Thymine => &[(N3, H3), (C6, H6), (C7, H71)],
    }
}

/// Heavy atom and lone pair of each acceptor on the base.
pub fn base_acceptors(base: Nucleobase) -> &'static [(AtomKind, AtomKind)] {
    use AtomKind::*;
    match base {
        Nucleobase::Adenine => &[(N1, Lp1), (N3, Lp3), (N7, Lp7)],
        Nucleobase::Guanine => &[(N3, Lp3), (N7, Lp7), (O6, Lp6a), (O6, Lp6b)],
        Nucleobase::Cytosine => &[(N3, Lp3), (O2, Lp2a), (O2, Lp2b)],
        Nucleobase::Uracil | Nucleobase::Thymine => {
            &[(O2, Lp2a), (O2, Lp2b), (O4, Lp4a), (O4, Lp4b)]
        }
    }
}
