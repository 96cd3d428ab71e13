//! Point-id to matrix-offset mapping.

use crate::dataset::PointId;

/// Bijection between point ids and kernel-matrix offsets.
///
/// Chosen once at matrix construction: a contiguous id range resolves in
/// O(1) by subtraction, anything else by binary search over a sorted copy
/// of the ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOffsets {
    /// Ids are exactly `start..start + len`.
    Range { start: u64, len: usize },
    /// Sorted, duplicate-free ids.
    Sorted(Vec<PointId>),
}

impl IdOffsets {
    /// Build the mapping for a set of distinct ids, in any order.
    ///
    /// The caller guarantees the ids are distinct.
    pub fn new(ids: &[PointId]) -> Self {
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();

        let contiguous = sorted
            .windows(2)
            .all(|w| w[0].0.checked_add(1) == Some(w[1].0));

        match sorted.first() {
            Some(first) if contiguous => IdOffsets::Range {
                start: first.0,
                len: sorted.len(),
            },
            None => IdOffsets::Range { start: 0, len: 0 },
            _ => IdOffsets::Sorted(sorted),
        }
    }

    /// Offset of `id`, or `None` if it is not in the set.
    #[inline]
    pub fn offset(&self, id: PointId) -> Option<usize> {
        match self {
            IdOffsets::Range { start, len } => {
                let off = id.0.checked_sub(*start)?;
                usize::try_from(off).ok().filter(|off| off < len)
            }
            IdOffsets::Sorted(ids) => ids.binary_search(&id).ok(),
        }
    }

    /// Id stored at `offset`.
    pub fn id_at(&self, offset: usize) -> Option<PointId> {
        match self {
            IdOffsets::Range { start, len } => {
                (offset < *len).then(|| PointId(start + offset as u64))
            }
            IdOffsets::Sorted(ids) => ids.get(offset).copied(),
        }
    }

    /// Number of ids.
    pub fn len(&self) -> usize {
        match self {
            IdOffsets::Range { len, .. } => *len,
            IdOffsets::Sorted(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the O(1) range mapping is in use.
    pub fn is_range(&self) -> bool {
        matches!(self, IdOffsets::Range { .. })
    }
}
