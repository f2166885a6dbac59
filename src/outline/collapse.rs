//! Collapse set
//!
//! Indices into the canonical sequence whose descendants are hidden in the
//! projected view. Indices go stale whenever lines are inserted, removed or
//! reordered, so every structural edit must remap them through one of the
//! helpers here and then call [`CollapseSet::revalidate`].

use super::indent::has_children;
use std::collections::BTreeSet;

/// Set of collapsed canonical line indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseSet {
    indices: BTreeSet<usize>,
}

impl CollapseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn insert(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    pub fn remove(&mut self, index: usize) -> bool {
        self.indices.remove(&index)
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Flip membership of `index`. Returns `true` if it is now collapsed.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.indices.remove(&index) {
            false
        } else {
            self.indices.insert(index);
            true
        }
    }

    /// Iterate collapsed indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Index Maintenance
    // ─────────────────────────────────────────────────────────────────────────

    /// Shift indices after `count` lines were inserted at `at`.
    pub fn shift_for_insert(&mut self, at: usize, count: usize) {
        self.remap(|i| Some(if i >= at { i + count } else { i }));
    }

    /// Drop indices in `start..end` and shift later ones down after removal.
    pub fn shift_for_remove(&mut self, start: usize, end: usize) {
        let count = end.saturating_sub(start);
        self.remap(|i| {
            if i < start {
                Some(i)
            } else if i < end {
                None
            } else {
                Some(i - count)
            }
        });
    }

    /// Remap every index through `f`; indices mapped to `None` are dropped.
    pub fn remap<F>(&mut self, f: F)
    where
        F: Fn(usize) -> Option<usize>,
    {
        self.indices = self.indices.iter().filter_map(|&i| f(i)).collect();
    }

    /// Drop indices that are out of range or no longer have children.
    pub fn revalidate<S: AsRef<str>>(&mut self, lines: &[S]) {
        self.indices
            .retain(|&i| i < lines.len() && has_children(lines, i));
    }
}

impl FromIterator<usize> for CollapseSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(set: &CollapseSet) -> Vec<usize> {
        set.iter().collect()
    }

    #[test]
    fn test_toggle() {
        let mut set = CollapseSet::new();
        assert!(set.toggle(3));
        assert!(set.contains(3));
        assert!(!set.toggle(3));
        assert!(set.is_empty());
    }

    #[test]
    fn test_shift_for_insert() {
        let mut set: CollapseSet = [0, 2, 5].into_iter().collect();
        set.shift_for_insert(2, 1);
        assert_eq!(indices(&set), vec![0, 3, 6]);
    }

    #[test]
    fn test_shift_for_remove() {
        let mut set: CollapseSet = [0, 2, 5].into_iter().collect();
        set.shift_for_remove(1, 3);
        assert_eq!(indices(&set), vec![0, 3]);
    }

    #[test]
    fn test_revalidate_drops_childless_and_stale() {
        let lines = ["A", "  a", "B", "C"];
        let mut set: CollapseSet = [0, 2, 9].into_iter().collect();
        set.revalidate(&lines);
        assert_eq!(indices(&set), vec![0]);
    }
}
