use crate::core::models::residue::Residue;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// An unordered pair of residues whose padded bounding boxes overlap on every axis.
///
/// Indices refer to the container order of the residues handed to
/// [`find_contacts`]; `first` is always the smaller one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactCandidate {
    pub first: usize,
    pub second: usize,
}

impl ContactCandidate {
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b, "a residue cannot contact itself");
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }
}

/// Extent of one residue along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub index: usize,
    pub min: f64,
    pub max: f64,
}

/// Per-axis extents of the placed atoms of a residue. `None` for an empty residue.
pub fn residue_extents(index: usize, residue: &Residue) -> Option<[Interval; 3]> {
    residue.placed_atoms().fold(None, |acc, (_, p)| {
        let mut extents = acc.unwrap_or([
            Interval { index, min: f64::INFINITY, max: f64::NEG_INFINITY },
            Interval { index, min: f64::INFINITY, max: f64::NEG_INFINITY },
            Interval { index, min: f64::INFINITY, max: f64::NEG_INFINITY },
        ]);
        for (axis, interval) in extents.iter_mut().enumerate() {
            interval.min = interval.min.min(p[axis]);
            interval.max = interval.max.max(p[axis]);
        }
        Some(extents)
    })
}

/// Sorts the intervals by lower bound and reports every pair that overlaps once
/// the later interval is pulled back by `cutoff`.
///
/// The inner scan stops at the first interval that starts too far away; every later
/// one starts even further.
fn sweep(mut intervals: Vec<Interval>, cutoff: f64, mut on_overlap: impl FnMut(ContactCandidate)) {
    intervals.sort_by(|a, b| a.min.total_cmp(&b.min));
    for (i, lower) in intervals.iter().enumerate() {
        for upper in &intervals[i + 1..] {
            if upper.min - cutoff <= lower.max {
                on_overlap(ContactCandidate::new(lower.index, upper.index));
            } else {
                break;
            }
        }
    }
}

/// Broad-phase contact detection with a three-axis sweep and prune.
///
/// Residues rejected by `filter` and residues without atoms never take part. A pair
/// is reported when the bounding boxes of its placed atoms lie within `cutoff` of
/// each other along x, y and z. The third axis only counts pairs that survived the
/// first two.
#[instrument(skip_all, name = "contact_detection_task")]
pub fn find_contacts<'a, I, F>(residues: I, filter: F, cutoff: f64) -> HashSet<ContactCandidate>
where
    I: IntoIterator<Item = &'a Residue>,
    F: Fn(&Residue) -> bool,
{
    let extents: Vec<[Interval; 3]> = residues
        .into_iter()
        .enumerate()
        .filter(|(_, residue)| filter(*residue))
        .filter_map(|(index, residue)| residue_extents(index, residue))
        .collect();

    let axis = |a: usize| extents.iter().map(|e| e[a]).collect::<Vec<_>>();

    let mut counts: HashMap<ContactCandidate, u8> = HashMap::new();
    for a in 0..2 {
        sweep(axis(a), cutoff, |pair| *counts.entry(pair).or_insert(0) += 1);
    }
    counts.retain(|_, count| *count == 2);

    sweep(axis(2), cutoff, |pair| {
        if let Some(count) = counts.get_mut(&pair) {
            *count += 1;
        }
    });

    let contacts: HashSet<ContactCandidate> = counts
        .into_iter()
        .filter(|(_, count)| *count == 3)
        .map(|(pair, _)| pair)
        .collect();
    debug!(
        residues = extents.len(),
        contacts = contacts.len(),
        cutoff,
        "Broad-phase contact detection finished."
    );
    contacts
}
