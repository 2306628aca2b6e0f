//! Agglomerative merging of strokes under a cohesion criterion.

use tracing::debug;

use keysift_core::{ClusteringError, Parameters, SimilarityMatrix, StrokeCollection};

/// A merge is accepted when the merged cluster's average pairwise cc
/// clears this fraction of the two internal averages' sum.
const COHESION_RATIO: f64 = 0.4;

/// Statistics from a clustering pass.
#[derive(Clone, Debug, Default)]
pub struct ClusterStatistics {
    /// Candidate pairs ranked by cc.
    pub pairs_ranked: usize,
    /// Merges that passed the cohesion test.
    pub merges_accepted: usize,
    /// Merges rejected by the cohesion test.
    pub merges_rejected: usize,
    /// Distinct clusters after the pass.
    pub clusters_found: usize,
}

struct RankedPair {
    i: usize,
    j: usize,
    cc: f64,
}

fn ranked_pairs(matrix: &SimilarityMatrix) -> Vec<RankedPair> {
    let n = matrix.n();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push(RankedPair {
                i,
                j,
                cc: matrix.cc(i, j),
            });
        }
    }
    // Stable sort keeps lexicographic (i, j) order among equal scores.
    pairs.sort_by(|a, b| b.cc.total_cmp(&a.cc));
    pairs
}

/// Agglomerative clusterer driven by the pairwise similarity matrix.
///
/// Every stroke starts in its own cluster. Pairs are visited in
/// descending cc order until the first pair below the threshold; each
/// candidate merge is gated by the cohesion test over the current
/// cluster memberships, and an accepted merge relabels the union to
/// the smaller of the two cluster ids.
#[derive(Clone, Debug)]
pub struct Clusterer {
    threshold: f64,
}

impl Clusterer {
    /// New clusterer with an explicit merge threshold.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// New clusterer from shared pipeline parameters.
    #[must_use]
    pub fn from_params(params: &Parameters) -> Self {
        Self::new(params.threshold_clustering)
    }

    /// Assigns `cluster_id` to every stroke and sets the collection's
    /// cluster count.
    pub fn cluster(
        &self,
        matrix: &SimilarityMatrix,
        strokes: &mut StrokeCollection,
    ) -> Result<ClusterStatistics, ClusteringError> {
        let n = strokes.len();
        if matrix.n() != n {
            return Err(ClusteringError::SizeMismatch {
                matrix: matrix.n(),
                strokes: n,
            });
        }

        for (idx, stroke) in strokes.strokes.iter_mut().enumerate() {
            stroke.cluster_id = idx as i32 + 1;
        }
        let mut n_clusters = n;

        let pairs = ranked_pairs(matrix);
        for (rank, pair) in pairs.iter().take(10).enumerate() {
            debug!(rank, i = pair.i, j = pair.j, cc = pair.cc, "top pair");
        }

        let mut stats = ClusterStatistics {
            pairs_ranked: pairs.len(),
            ..ClusterStatistics::default()
        };

        for pair in &pairs {
            if pair.cc < self.threshold {
                break;
            }

            let ci = strokes.strokes[pair.i].cluster_id;
            let cj = strokes.strokes[pair.j].cluster_id;
            if ci == cj {
                continue;
            }
            let merged = ci.min(cj);

            // Average cc over ordered pairs with both members in the
            // union, and over ordered pairs fully inside each cluster;
            // singletons have no internal pairs and contribute zero.
            // Same-cluster pairs intentionally count toward the union
            // average as well.
            let mut sum_union = 0.0;
            let mut sum_i = 0.0;
            let mut sum_j = 0.0;
            let mut n_union = 0usize;
            let mut n_i = 0usize;
            let mut n_j = 0usize;
            for k in 0..n {
                let ck = strokes.strokes[k].cluster_id;
                for q in 0..n {
                    if q == k {
                        continue;
                    }
                    let cq = strokes.strokes[q].cluster_id;
                    if (ck == ci || ck == cj) && (cq == ci || cq == cj) {
                        sum_union += matrix.cc(k, q);
                        n_union += 1;
                    }
                    if ck == ci && cq == ci {
                        sum_i += matrix.cc(k, q);
                        n_i += 1;
                    }
                    if ck == cj && cq == cj {
                        sum_j += matrix.cc(k, q);
                        n_j += 1;
                    }
                }
            }
            sum_union /= n_union as f64;
            if n_i > 0 {
                sum_i /= n_i as f64;
            }
            if n_j > 0 {
                sum_j /= n_j as f64;
            }

            debug!(
                i = pair.i,
                j = pair.j,
                cc_union = sum_union,
                cc_i = sum_i,
                cc_j = sum_j,
                "merge candidate"
            );

            if sum_union > COHESION_RATIO * (sum_i + sum_j) {
                for stroke in &mut strokes.strokes {
                    if stroke.cluster_id == ci || stroke.cluster_id == cj {
                        stroke.cluster_id = merged;
                    }
                }
                n_clusters -= 1;
                stats.merges_accepted += 1;
            } else {
                stats.merges_rejected += 1;
            }
        }

        strokes.n_clusters = n_clusters;
        stats.clusters_found = n_clusters;
        Ok(stats)
    }
}
