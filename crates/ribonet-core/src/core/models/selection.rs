use super::atom::AtomKind;
use std::ops::{BitAnd, BitOr, Not};

/// A composable predicate over atom kinds.
///
/// Sets are plain values and can be combined with the `!`, `&` and `|` operators:
///
/// ```ignore
/// let heavy_side_chain = AtomSet::SideChain & !(AtomSet::Hydrogen | AtomSet::LonePair);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AtomSet {
    #[default]
    All,
    Not(Box<AtomSet>),
    And(Box<AtomSet>, Box<AtomSet>),
    Or(Box<AtomSet>, Box<AtomSet>),
    Backbone,
    SideChain,
    Pseudo,
    Hydrogen,
    LonePair,
    Single(AtomKind),
}

impl AtomSet {
    pub fn matches(&self, kind: AtomKind) -> bool {
        match self {
            AtomSet::All => true,
            AtomSet::Not(inner) => !inner.matches(kind),
            AtomSet::And(lhs, rhs) => lhs.matches(kind) && rhs.matches(kind),
            AtomSet::Or(lhs, rhs) => lhs.matches(kind) || rhs.matches(kind),
            AtomSet::Backbone => kind.is_backbone(),
            AtomSet::SideChain => kind.is_side_chain(),
            AtomSet::Pseudo => kind.is_pseudo(),
            AtomSet::Hydrogen => kind.is_hydrogen(),
            AtomSet::LonePair => kind.is_lone_pair(),
            AtomSet::Single(single) => *single == kind,
        }
    }
}

impl Not for AtomSet {
    type Output = AtomSet;

    fn not(self) -> AtomSet {
        AtomSet::Not(Box::new(self))
    }
}

impl BitAnd for AtomSet {
    type Output = AtomSet;

    fn bitand(self, rhs: AtomSet) -> AtomSet {
        AtomSet::And(Box::new(self), Box::new(rhs))
    }
}

impl BitOr for AtomSet {
    type Output = AtomSet;

    fn bitor(self, rhs: AtomSet) -> AtomSet {
        AtomSet::Or(Box::new(self), Box::new(rhs))
    }
}

impl From<AtomKind> for AtomSet {
    fn from(kind: AtomKind) -> Self {
        AtomSet::Single(kind)
    }
}
