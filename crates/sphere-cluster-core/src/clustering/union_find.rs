//! Disjoint-set forest over dataset positions.

/// Arena-indexed union-find with union by rank and path halving.
///
/// One node per dataset position. `find` is reflexive and transitive;
/// `union` of two nodes already sharing a root is a no-op.
///
/// # Example
///
/// ```
/// use sphere_cluster_core::clustering::DisjointSetForest;
///
/// let mut forest = DisjointSetForest::new(4);
/// assert!(forest.union(0, 1));
/// assert!(forest.union(2, 1));
/// assert!(!forest.union(0, 2));
/// assert!(forest.same_set(0, 2));
/// assert!(!forest.same_set(0, 3));
/// assert_eq!(forest.set_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DisjointSetForest {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl DisjointSetForest {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            sets: n,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets.
    #[inline]
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Root of `x`, compressing the path on the way.
    ///
    /// # Panics
    ///
    /// Panics if `x >= len()`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            let grandparent = self.parent[self.parent[x]];
            self.parent[x] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Whether `a` and `b` share a root.
    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Merge the sets of `a` and `b`.
    ///
    /// Returns `true` if two distinct sets were merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
        self.sets -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_forest_is_all_singletons() {
        let mut forest = DisjointSetForest::new(5);
        assert_eq!(forest.set_count(), 5);
        for i in 0..5 {
            assert_eq!(forest.find(i), i, "find must be reflexive");
        }
    }

    #[test]
    fn test_union_is_transitive() {
        let mut forest = DisjointSetForest::new(6);
        forest.union(0, 1);
        forest.union(1, 2);
        forest.union(4, 5);

        assert!(forest.same_set(0, 2));
        assert!(forest.same_set(5, 4));
        assert!(!forest.same_set(2, 3));
        assert!(!forest.same_set(0, 4));
        assert_eq!(forest.set_count(), 3);
        println!("[PASS] test_union_is_transitive - sets={}", forest.set_count());
    }

    #[test]
    fn test_union_is_idempotent() {
        let mut forest = DisjointSetForest::new(3);
        assert!(forest.union(0, 1));
        let before = forest.set_count();
        assert!(!forest.union(0, 1));
        assert!(!forest.union(1, 0));
        assert_eq!(forest.set_count(), before);
    }

    #[test]
    fn test_long_chain_stays_consistent() {
        let n = 10_000;
        let mut forest = DisjointSetForest::new(n);
        for i in 1..n {
            forest.union(i - 1, i);
        }
        assert_eq!(forest.set_count(), 1);
        let root = forest.find(0);
        assert!((0..n).all(|i| forest.find(i) == root));
    }
}
