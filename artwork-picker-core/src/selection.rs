use crate::artic::models::{Artwork, ArtworkId};
use std::collections::{BTreeMap, HashMap};

/// Rows the user has chosen, in the order they were chosen, unique by id.
///
/// Lookups by id are hash lookups; insertion order is kept in a separate
/// sequence index so removals do not have to shift a vector.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    rows: HashMap<ArtworkId, (u64, Artwork)>,
    order: BTreeMap<u64, ArtworkId>,
    next_seq: u64,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the row if it is absent, remove it if present.
    /// Returns whether the row is selected afterwards.
    pub fn toggle(&mut self, row: &Artwork) -> bool {
        if self.unselect(row.id) {
            false
        } else {
            self.select(row.clone())
        }
    }

    /// Returns false if a row with the same id was already selected
    pub fn select(&mut self, row: Artwork) -> bool {
        if self.rows.contains_key(&row.id) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, row.id);
        self.rows.insert(row.id, (seq, row));
        true
    }

    /// Returns false if the id was not selected
    pub fn unselect(&mut self, id: ArtworkId) -> bool {
        match self.rows.remove(&id) {
            Some((seq, _)) => {
                self.order.remove(&seq);
                true
            }
            None => false,
        }
    }

    /// Replace the whole selection. Later duplicates of an id are dropped.
    pub fn replace_all<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = Artwork>,
    {
        self.rows.clear();
        self.order.clear();
        self.next_seq = 0;
        for row in rows {
            self.select(row);
        }
    }

    pub fn contains(&self, id: ArtworkId) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn get(&self, id: ArtworkId) -> Option<&Artwork> {
        self.rows.get(&id).map(|(_, row)| row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Selected rows in selection order
    pub fn iter(&self) -> impl Iterator<Item = &Artwork> + '_ {
        self.order
            .values()
            .filter_map(move |id| self.rows.get(id).map(|(_, row)| row))
    }

    pub fn ids(&self) -> Vec<ArtworkId> {
        self.order.values().copied().collect()
    }

    pub fn to_vec(&self) -> Vec<Artwork> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{artwork, ids};

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut selection = SelectionSet::new();
        selection.select(artwork(1));

        let row = artwork(2);
        assert!(selection.toggle(&row));
        assert!(selection.contains(row.id));
        assert!(!selection.toggle(&row));
        assert!(!selection.contains(row.id));
        assert_eq!(ids(&selection.to_vec()), vec![1]);

        // And starting from selected
        let first = artwork(1);
        assert!(!selection.toggle(&first));
        assert!(selection.toggle(&first));
        assert_eq!(ids(&selection.to_vec()), vec![1]);
    }

    #[test]
    fn test_selection_order_survives_removal() {
        let mut selection = SelectionSet::new();
        for id in [5, 3, 9, 1] {
            selection.select(artwork(id));
        }
        selection.unselect(ArtworkId(3));
        selection.select(artwork(3));

        assert_eq!(ids(&selection.to_vec()), vec![5, 9, 1, 3]);
        assert_eq!(
            selection.ids(),
            vec![ArtworkId(5), ArtworkId(9), ArtworkId(1), ArtworkId(3)]
        );
    }

    #[test]
    fn test_select_twice_keeps_one() {
        let mut selection = SelectionSet::new();
        assert!(selection.select(artwork(1)));
        assert!(!selection.select(artwork(1)));
        assert_eq!(selection.len(), 1);
        assert!(!selection.unselect(ArtworkId(42)));
    }

    #[test]
    fn test_replace_all_deduplicates_first_wins() {
        let mut selection = SelectionSet::new();
        selection.select(artwork(100));

        let mut duplicate = artwork(2);
        duplicate.title = Some("later copy".to_string());
        selection.replace_all(vec![artwork(1), artwork(2), duplicate, artwork(3), artwork(1)]);

        assert_eq!(ids(&selection.to_vec()), vec![1, 2, 3]);
        assert!(!selection.contains(ArtworkId(100)));
        assert_eq!(
            selection.get(ArtworkId(2)).and_then(|row| row.title.as_deref()),
            Some("Artwork 2")
        );
    }

    #[test]
    fn test_replace_all_with_nothing_clears() {
        let mut selection = SelectionSet::new();
        selection.select(artwork(1));
        selection.replace_all(Vec::new());
        assert!(selection.is_empty());
        assert_eq!(selection.iter().count(), 0);
    }
}
