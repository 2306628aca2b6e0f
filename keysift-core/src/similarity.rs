//! Pairwise similarity entries and the dense n×n matrix.
//!

/// Best-alignment result for an ordered stroke pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    /// Normalized cross-correlation at the best alignment, in [-1, 1].
    pub cc: f64,
    /// Shift of the second stroke relative to the first, in samples.
    pub offset: i64,
}

impl Default for Match {
    fn default() -> Self {
        Self {
            cc: 0.0,
            offset: 0,
        }
    }
}

/// Dense row-major matrix of pairwise best-alignment matches.
///
/// Entry `(i, j)` holds the best alignment of stroke j's search window
/// against stroke i's anchor window; `(j, i)` is computed independently
/// with the anchors swapped, so the matrix is not symmetric in offset
/// and only approximately symmetric in cc.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    entries: Vec<Match>,
}

impl SimilarityMatrix {
    /// New n×n matrix of default entries.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            n,
            entries: vec![Match::default(); n * n],
        }
    }

    /// Assemble from per-row vectors; every row must have length `rows.len()`.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<Match>>) -> Self {
        let n = rows.len();
        let mut entries = Vec::with_capacity(n * n);
        for row in rows {
            debug_assert_eq!(row.len(), n);
            entries.extend(row);
        }
        Self { n, entries }
    }

    /// Side length of the matrix.
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns true if the matrix is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Entry at row `i`, column `j`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Match {
        self.entries[i * self.n + j]
    }

    /// Overwrites the entry at row `i`, column `j`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, entry: Match) {
        self.entries[i * self.n + j] = entry;
    }

    /// Cross-correlation at `(i, j)`.
    #[inline]
    #[must_use]
    pub fn cc(&self, i: usize, j: usize) -> f64 {
        self.get(i, j).cc
    }

    /// Best offset at `(i, j)`.
    #[inline]
    #[must_use]
    pub fn offset(&self, i: usize, j: usize) -> i64 {
        self.get(i, j).offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_default() {
        let entry = Match::default();
        assert_eq!(entry.cc, 0.0);
        assert_eq!(entry.offset, 0);
    }

    #[test]
    fn test_matrix_get_set() {
        let mut matrix = SimilarityMatrix::new(3);
        assert_eq!(matrix.n(), 3);
        assert_eq!(matrix.cc(1, 2), 0.0);

        matrix.set(
            1,
            2,
            Match {
                cc: 0.75,
                offset: -3,
            },
        );
        assert_eq!(matrix.cc(1, 2), 0.75);
        assert_eq!(matrix.offset(1, 2), -3);
        // The transpose entry is independent.
        assert_eq!(matrix.cc(2, 1), 0.0);
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![
            vec![
                Match {
                    cc: 1.0,
                    offset: 0,
                },
                Match {
                    cc: 0.5,
                    offset: 2,
                },
            ],
            vec![
                Match {
                    cc: 0.4,
                    offset: -2,
                },
                Match {
                    cc: 1.0,
                    offset: 0,
                },
            ],
        ];
        let matrix = SimilarityMatrix::from_rows(rows);
        assert_eq!(matrix.n(), 2);
        assert_eq!(matrix.cc(0, 1), 0.5);
        assert_eq!(matrix.offset(1, 0), -2);
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = SimilarityMatrix::from_rows(Vec::new());
        assert!(matrix.is_empty());
        assert_eq!(matrix.n(), 0);
    }
}
