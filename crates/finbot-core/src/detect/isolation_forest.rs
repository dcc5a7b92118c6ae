//! Isolation forest outlier model
//!
//! An ensemble of random partition trees, each grown on a sub-sample drawn
//! without replacement. Points that are isolated after few splits are
//! outliers. Scores follow the usual convention: `score_samples` is the
//! negated anomaly score in [-1, 0), and `decision_function` subtracts an
//! offset chosen so that a `contamination` fraction of the training data
//! falls below zero.
//!
//! Every tree gets its own seed drawn from one `StdRng`, so the fitted model
//! is identical no matter how many threads build it.

use std::num::NonZeroUsize;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};
use crate::stats::{mean, percentile};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Fitting parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// Sub-sample size per tree, capped at the number of rows
    pub max_samples: usize,
    /// Expected outlier fraction, in (0, 0.5)
    pub contamination: f64,
    pub random_seed: u64,
    /// Worker threads for tree building (0 = all cores)
    pub n_jobs: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_samples: 256,
            contamination: 0.1,
            random_seed: 42,
            n_jobs: 1,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// One random partition tree, stored as a node arena rooted at index 0
#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn build(data: &[Vec<f64>], seed: u64, sample_size: usize, max_depth: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let sample = rand::seq::index::sample(&mut rng, data.len(), sample_size).into_vec();

        let mut tree = Self { nodes: Vec::new() };
        tree.grow(data, sample, 0, max_depth, &mut rng);
        tree
    }

    fn grow(
        &mut self,
        data: &[Vec<f64>],
        rows: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { size: rows.len() });

        if depth >= max_depth || rows.len() <= 1 {
            return id;
        }

        // Only features that still vary inside this node can split it
        let n_features = data[rows[0]].len();
        let splittable: Vec<(usize, f64, f64)> = (0..n_features)
            .filter_map(|f| {
                let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, &r| {
                    (acc.0.min(data[r][f]), acc.1.max(data[r][f]))
                });
                (lo < hi).then_some((f, lo, hi))
            })
            .collect();

        if splittable.is_empty() {
            return id;
        }

        let (feature, lo, hi) = splittable[rng.gen_range(0..splittable.len())];
        let threshold = rng.gen_range(lo..hi);
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.iter().partition(|&&r| data[r][feature] <= threshold);

        let left = self.grow(data, left_rows, depth + 1, max_depth, rng);
        let right = self.grow(data, right_rows, depth + 1, max_depth, rng);
        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    /// Depth at which `point` lands, plus the expected remaining depth of
    /// the leaf's unsplit rows
    fn path_length(&self, point: &[f64]) -> f64 {
        let mut node = 0;
        let mut depth = 0.0;
        loop {
            match self.nodes[node] {
                Node::Leaf { size } => return depth + average_path_length(size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if point[feature] <= threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` items
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// A fitted isolation forest
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
    offset: f64,
}

impl IsolationForest {
    /// Fit on a row-major feature matrix and calibrate the outlier offset
    pub fn fit(data: &[Vec<f64>], params: &ForestParams) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::InvalidData(
                "cannot fit isolation forest on empty data".into(),
            ));
        }
        if !(params.contamination > 0.0 && params.contamination < 0.5) {
            return Err(Error::InvalidData(format!(
                "contamination must be between 0 and 0.5 (exclusive), got {}",
                params.contamination
            )));
        }
        if params.n_estimators == 0 || params.max_samples == 0 {
            return Err(Error::InvalidData(
                "n_estimators and max_samples must be at least 1".into(),
            ));
        }

        let sample_size = params.max_samples.min(data.len());
        let max_depth = (sample_size as f64).log2().ceil() as usize;

        let mut rng = StdRng::seed_from_u64(params.random_seed);
        let seeds: Vec<u64> = (0..params.n_estimators).map(|_| rng.gen()).collect();

        let trees = build_trees(data, &seeds, sample_size, max_depth, params.n_jobs);

        let mut forest = Self {
            trees,
            sample_size,
            offset: 0.0,
        };
        let scores = forest.score_samples(data);
        forest.offset = percentile(&scores, params.contamination * 100.0);

        debug!(
            "Fitted isolation forest: {} trees, sample size {}, offset {:.4}",
            forest.trees.len(),
            sample_size,
            forest.offset
        );
        Ok(forest)
    }

    /// Negated anomaly score per row; lower = more anomalous
    pub fn score_samples(&self, data: &[Vec<f64>]) -> Vec<f64> {
        let norm = match average_path_length(self.sample_size) {
            c if c > 0.0 => c,
            _ => 1.0,
        };
        data.iter()
            .map(|point| {
                let depths: Vec<f64> = self.trees.iter().map(|t| t.path_length(point)).collect();
                -(2f64.powf(-mean(&depths) / norm))
            })
            .collect()
    }

    /// Score shifted by the contamination offset; negative = outlier
    pub fn decision_function(&self, data: &[Vec<f64>]) -> Vec<f64> {
        self.score_samples(data)
            .into_iter()
            .map(|s| s - self.offset)
            .collect()
    }

    /// `true` for rows classified as outliers
    pub fn predict(&self, data: &[Vec<f64>]) -> Vec<bool> {
        self.decision_function(data)
            .into_iter()
            .map(|d| d < 0.0)
            .collect()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn build_trees(
    data: &[Vec<f64>],
    seeds: &[u64],
    sample_size: usize,
    max_depth: usize,
    n_jobs: usize,
) -> Vec<IsolationTree> {
    let workers = match n_jobs {
        0 => thread::available_parallelism().map_or(1, NonZeroUsize::get),
        n => n,
    }
    .min(seeds.len())
    .max(1);

    let build = |seed: &u64| IsolationTree::build(data, *seed, sample_size, max_depth);

    if workers == 1 {
        return seeds.iter().map(build).collect();
    }

    let chunk_size = seeds.len().div_ceil(workers);
    thread::scope(|scope| {
        let handles: Vec<_> = seeds
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().map(build).collect::<Vec<_>>()))
            .collect();

        // Chunks are joined in order, so tree order matches the seed order
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A tight 2-D cluster plus one far-away point (last row)
    fn cluster_with_outlier() -> Vec<Vec<f64>> {
        let mut data: Vec<Vec<f64>> = (0..40)
            .map(|i| {
                let x = (i % 8) as f64 * 0.1;
                let y = (i / 8) as f64 * 0.1;
                vec![x, y]
            })
            .collect();
        data.push(vec![8.0, 9.0]);
        data
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // c(256) is about 10.24
        assert!((average_path_length(256) - 10.2448).abs() < 1e-3);
    }

    #[test]
    fn test_outlier_gets_lowest_score() {
        let data = cluster_with_outlier();
        let forest = IsolationForest::fit(&data, &ForestParams::default()).unwrap();
        let scores = forest.score_samples(&data);

        let outlier = scores[data.len() - 1];
        assert!(scores[..data.len() - 1].iter().all(|&s| s > outlier));
        assert!(scores.iter().all(|&s| (-1.0..0.0).contains(&s)));

        let flagged = forest.predict(&data);
        assert!(flagged[data.len() - 1]);
    }

    #[test]
    fn test_contamination_bounds_flagged_fraction() {
        let data = cluster_with_outlier();
        let params = ForestParams {
            contamination: 0.2,
            ..ForestParams::default()
        };
        let forest = IsolationForest::fit(&data, &params).unwrap();
        let flagged = forest.predict(&data).into_iter().filter(|&f| f).count();
        // rank 0.2 * 40 = 8 -> at most 8 rows strictly below the offset
        assert!(flagged >= 1 && flagged <= 8, "{}", flagged);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let data = cluster_with_outlier();
        let params = ForestParams::default();
        let a = IsolationForest::fit(&data, &params).unwrap();
        let b = IsolationForest::fit(&data, &params).unwrap();
        assert_eq!(a.decision_function(&data), b.decision_function(&data));
    }

    #[test]
    fn test_thread_count_does_not_change_scores() {
        let data = cluster_with_outlier();
        let serial = IsolationForest::fit(&data, &ForestParams::default()).unwrap();
        let parallel = IsolationForest::fit(
            &data,
            &ForestParams {
                n_jobs: 4,
                ..ForestParams::default()
            },
        )
        .unwrap();
        assert_eq!(parallel.n_trees(), 200);
        assert_eq!(serial.score_samples(&data), parallel.score_samples(&data));
        assert_eq!(serial.offset(), parallel.offset());
    }

    #[test]
    fn test_constant_data_does_not_split() {
        let data = vec![vec![1.0, 1.0]; 12];
        let forest = IsolationForest::fit(&data, &ForestParams::default()).unwrap();
        let scores = forest.score_samples(&data);
        // Every row sits in the same root leaf, so all scores tie
        assert!(scores.windows(2).all(|w| w[0] == w[1]));
        assert!(forest.predict(&data).iter().all(|&f| !f));
    }

    #[test]
    fn test_rejects_bad_params() {
        let data = cluster_with_outlier();
        assert!(IsolationForest::fit(&[], &ForestParams::default()).is_err());
        let params = ForestParams {
            contamination: 0.5,
            ..ForestParams::default()
        };
        assert!(IsolationForest::fit(&data, &params).is_err());
    }
}
