use super::ids::ResidueId;
use super::residue::{Residue, ResidueLabel};
use slotmap::SlotMap;
use std::collections::HashMap;

/// A macromolecular structure: an arena of residues that remembers the order in
/// which they were added.
///
/// Residue ids stay valid across removals of other residues. The container order is
/// the order used to canonicalize contact pairs.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Residue ids in container order.
    order: Vec<ResidueId>,
    /// Lookup map from chain, number and insertion code to residue id.
    label_map: HashMap<ResidueLabel, ResidueId>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a residue and returns its id. A residue carrying the label of an
    /// existing one shadows it in [`Structure::find`].
    pub fn add_residue(&mut self, residue: Residue) -> ResidueId {
        let label = residue.label;
        let id = self.residues.insert(residue);
        self.order.push(id);
        self.label_map.insert(label, id);
        id
    }

    pub fn remove_residue(&mut self, id: ResidueId) -> Option<Residue> {
        let residue = self.residues.remove(id)?;
        self.order.retain(|&other| other != id);
        if self.label_map.get(&residue.label) == Some(&id) {
            self.label_map.remove(&residue.label);
        }
        Some(residue)
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residue_mut(&mut self, id: ResidueId) -> Option<&mut Residue> {
        self.residues.get_mut(id)
    }

    pub fn find(&self, label: &ResidueLabel) -> Option<ResidueId> {
        self.label_map.get(label).copied()
    }

    /// Residue ids in container order.
    pub fn residue_ids(&self) -> &[ResidueId] {
        &self.order
    }

    /// Residues in container order.
    pub fn residues(&self) -> impl Iterator<Item = (ResidueId, &Residue)> + Clone {
        self.order
            .iter()
            .filter_map(move |&id| self.residues.get(id).map(|residue| (id, residue)))
    }

    /// Mutable access to every residue, in storage order.
    pub fn residues_mut(&mut self) -> impl Iterator<Item = (ResidueId, &mut Residue)> {
        self.residues.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::ResidueKind;

    fn residue(chain: char, number: isize, kind: ResidueKind) -> Residue {
        Residue::new(ResidueLabel::new(chain, number), kind)
    }

    #[test]
    fn residues_iterate_in_insertion_order() {
        let mut structure = Structure::new();
        let a = structure.add_residue(residue('A', 2, ResidueKind::G));
        let b = structure.add_residue(residue('A', 1, ResidueKind::C));
        let ids: Vec<_> = structure.residues().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(structure.residue_ids(), &[a, b]);
        assert_eq!(structure.len(), 2);
    }

    #[test]
    fn find_resolves_labels() {
        let mut structure = Structure::new();
        let id = structure.add_residue(residue('B', 7, ResidueKind::U));
        assert_eq!(structure.find(&ResidueLabel::new('B', 7)), Some(id));
        assert_eq!(structure.find(&ResidueLabel::new('B', 8)), None);
    }

    #[test]
    fn remove_residue_keeps_other_ids_valid() {
        let mut structure = Structure::new();
        let a = structure.add_residue(residue('A', 1, ResidueKind::A));
        let b = structure.add_residue(residue('A', 2, ResidueKind::U));
        let removed = structure.remove_residue(a);
        assert_eq!(removed.map(|r| r.kind()), Some(ResidueKind::A));
        assert!(structure.residue(a).is_none());
        assert_eq!(structure.residue(b).map(|r| r.kind()), Some(ResidueKind::U));
        assert_eq!(structure.residue_ids(), &[b]);
        assert_eq!(structure.find(&ResidueLabel::new('A', 1)), None);
        assert!(structure.remove_residue(a).is_none());
    }

    #[test]
    fn residue_mut_allows_in_place_changes() {
        let mut structure = Structure::new();
        let id = structure.add_residue(residue('A', 1, ResidueKind::G));
        if let Some(r) = structure.residue_mut(id) {
            r.downgrade();
        }
        assert!(structure.residue(id).is_some_and(|r| r.kind().is_unknown()));
        assert_eq!(structure.residues_mut().count(), 1);
    }
}
