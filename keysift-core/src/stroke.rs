//! Key stroke records and ordered collections.
//!

use crate::waveform::Position;

/// Cluster identifier assigned by the clustering stage.
///
/// Values are opaque small integers; two strokes share an id iff they
/// are believed to come from the same physical key.
pub type ClusterId = i32;

/// Marker for strokes that have not been assigned to a cluster.
pub const UNCLUSTERED: ClusterId = -1;

/// One detected keystroke.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyStroke {
    /// Sample index of the detected peak in the source waveform.
    pub position: Position,
    /// Mean normalized cross-correlation against all other strokes.
    pub avg_cc: f64,
    /// Cluster assignment ([`UNCLUSTERED`] until clustering runs).
    pub cluster_id: ClusterId,
}

impl KeyStroke {
    /// New stroke at `position` with unset similarity and cluster fields.
    #[must_use]
    pub fn at(position: Position) -> Self {
        Self {
            position,
            avg_cc: 0.0,
            cluster_id: UNCLUSTERED,
        }
    }
}

/// Chronologically ordered strokes plus the cluster count.
///
/// Order is ascending by position and preserved across all pipeline
/// stages; alignment perturbs positions by at most the alignment
/// window, which is small against inter-stroke spacing.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrokeCollection {
    /// Strokes in ascending position order.
    pub strokes: Vec<KeyStroke>,
    /// Number of distinct cluster ids (populated by clustering).
    pub n_clusters: usize,
}

impl StrokeCollection {
    /// New empty collection with reserved capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            strokes: Vec::with_capacity(capacity),
            n_clusters: 0,
        }
    }

    /// Collection of fresh strokes at the given positions.
    #[must_use]
    pub fn from_positions(positions: &[Position]) -> Self {
        Self {
            strokes: positions.iter().map(|&p| KeyStroke::at(p)).collect(),
            n_clusters: 0,
        }
    }

    /// Number of strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Returns true if the collection holds no strokes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Appends a stroke.
    pub fn push(&mut self, stroke: KeyStroke) {
        self.strokes.push(stroke);
    }

    /// Positions in collection order.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.strokes.iter().map(|s| s.position).collect()
    }

    /// Cluster ids in collection order (the downstream decoder input).
    #[must_use]
    pub fn cluster_ids(&self) -> Vec<ClusterId> {
        self.strokes.iter().map(|s| s.cluster_id).collect()
    }

    /// Returns true if positions are strictly increasing.
    #[must_use]
    pub fn is_chronological(&self) -> bool {
        self.strokes.windows(2).all(|w| w[0].position < w[1].position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_defaults() {
        let stroke = KeyStroke::at(1234);
        assert_eq!(stroke.position, 1234);
        assert_eq!(stroke.avg_cc, 0.0);
        assert_eq!(stroke.cluster_id, UNCLUSTERED);
    }

    #[test]
    fn test_collection_from_positions() {
        let strokes = StrokeCollection::from_positions(&[10, 20, 30]);
        assert_eq!(strokes.len(), 3);
        assert_eq!(strokes.positions(), vec![10, 20, 30]);
        assert_eq!(strokes.cluster_ids(), vec![UNCLUSTERED; 3]);
        assert_eq!(strokes.n_clusters, 0);
        assert!(strokes.is_chronological());
    }

    #[test]
    fn test_is_chronological_rejects_duplicates() {
        let strokes = StrokeCollection::from_positions(&[10, 10, 30]);
        assert!(!strokes.is_chronological());
    }
}
