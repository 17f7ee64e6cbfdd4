//! Seeded k-means over 2D coordinates.
//!
//! k-means++ seeding from a fixed-seed RNG followed by Lloyd iterations.
//! Nearest-centroid lookup goes through an rstar R-tree rebuilt each step.

use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::RTree;
use rstar::primitives::GeomWithData;
use tracing::debug;

use crate::params::BundleParams;

/// A plane point: `[latitude, longitude]`.
pub type Coord = [f64; 2];

type CentroidEntry = GeomWithData<Coord, usize>;

#[inline(always)]
fn squared_distance(a: Coord, b: Coord) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx.mul_add(dx, dy * dy)
}

/// k-means configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    k: usize,
    seed: u64,
    max_iterations: usize,
    tolerance: f64,
    restarts: usize,
}

/// Output of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster label for each input point, in `0..centroids.len()`.
    pub labels: Vec<usize>,
    pub centroids: Vec<Coord>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
    /// Lloyd iterations used by the winning run.
    pub iterations: usize,
}

impl Clustering {
    /// Input indices grouped by label, ascending label order, empty labels
    /// dropped. Indices within a group keep input order.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); self.centroids.len()];
        for (idx, &label) in self.labels.iter().enumerate() {
            groups[label].push(idx);
        }
        groups.retain(|g| !g.is_empty());
        groups
    }
}

impl KMeans {
    /// Creates a k-means run for `k` clusters with default tunables.
    pub fn new(k: usize) -> Self {
        let defaults = BundleParams::default();
        Self {
            k,
            seed: defaults.seed,
            max_iterations: defaults.max_iterations,
            tolerance: defaults.tolerance,
            restarts: defaults.restarts,
        }
    }

    /// Creates a k-means run using the tunables from `params`.
    pub fn from_params(k: usize, params: &BundleParams) -> Self {
        Self {
            k,
            seed: params.seed,
            max_iterations: params.max_iterations,
            tolerance: params.tolerance,
            restarts: params.restarts,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts.max(1);
        self
    }

    /// Fits `min(k, data.len())` clusters. Empty input gives an empty result.
    pub fn fit(&self, data: &[Coord]) -> Clustering {
        let n = data.len();
        if n == 0 {
            return Clustering {
                labels: Vec::new(),
                centroids: Vec::new(),
                inertia: 0.0,
                iterations: 0,
            };
        }

        let k = self.k.clamp(1, n);
        if k == 1 {
            let centroid = mean(data, (0..n).map(|i| (i, 0)), 1)[0];
            return Clustering {
                labels: vec![0; n],
                inertia: data.iter().map(|&p| squared_distance(p, centroid)).sum(),
                centroids: vec![centroid],
                iterations: 0,
            };
        }

        let threshold = self.tolerance * mean_variance(data);
        let mut best = self.run(data, k, threshold, 0);
        for run in 1..self.restarts {
            let candidate = self.run(data, k, threshold, run);
            if OrderedFloat(candidate.inertia) < OrderedFloat(best.inertia) {
                best = candidate;
            }
        }
        best
    }

    fn run(&self, data: &[Coord], k: usize, threshold: f64, run: usize) -> Clustering {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(run as u64));
        let result = self.lloyd(data, kmeans_plus_plus(data, k, &mut rng), threshold);
        debug!(
            run,
            k,
            iterations = result.iterations,
            inertia = result.inertia,
            "k-means run finished"
        );
        result
    }

    fn lloyd(&self, data: &[Coord], mut centroids: Vec<Coord>, threshold: f64) -> Clustering {
        let k = centroids.len();
        let mut labels = assign(data, &centroids);
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            let mut updated = mean(data, labels.iter().copied().enumerate(), k);
            relocate_empty(data, &labels, &centroids, &mut updated);

            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(&old, &new)| squared_distance(old, new))
                .sum();
            centroids = updated;
            labels = assign(data, &centroids);

            if shift <= threshold {
                break;
            }
        }

        let inertia = data
            .iter()
            .zip(&labels)
            .map(|(&p, &label)| squared_distance(p, centroids[label]))
            .sum();

        Clustering {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }
}

/// Assigns each point to its nearest centroid.
fn assign(data: &[Coord], centroids: &[Coord]) -> Vec<usize> {
    let tree: RTree<CentroidEntry> = RTree::bulk_load(
        centroids
            .iter()
            .enumerate()
            .map(|(idx, &c)| CentroidEntry::new(c, idx))
            .collect(),
    );
    data.iter()
        .map(|p| tree.nearest_neighbor(p).map_or(0, |entry| entry.data))
        .collect()
}

/// Per-label mean of the points. Labels with no points get `[NAN, NAN]`
/// and must be fixed by `relocate_empty`.
fn mean(data: &[Coord], labelled: impl Iterator<Item = (usize, usize)>, k: usize) -> Vec<Coord> {
    let mut sums = vec![[0.0, 0.0]; k];
    let mut counts = vec![0usize; k];
    for (idx, label) in labelled {
        sums[label][0] += data[idx][0];
        sums[label][1] += data[idx][1];
        counts[label] += 1;
    }
    sums.iter()
        .zip(&counts)
        .map(|(s, &c)| {
            if c == 0 {
                [f64::NAN, f64::NAN]
            } else {
                [s[0] / c as f64, s[1] / c as f64]
            }
        })
        .collect()
}

/// Moves each empty centroid onto the point farthest from its current
/// centroid. Points are used at most once; ties go to the lower index.
fn relocate_empty(data: &[Coord], labels: &[usize], previous: &[Coord], centroids: &mut [Coord]) {
    let empty: Vec<usize> = centroids
        .iter()
        .enumerate()
        .filter(|(_, c)| c[0].is_nan())
        .map(|(idx, _)| idx)
        .collect();
    if empty.is_empty() {
        return;
    }

    let mut far: Vec<(usize, f64)> = data
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(idx, (&p, &label))| (idx, squared_distance(p, previous[label])))
        .collect();
    far.sort_by_key(|&(idx, d)| (std::cmp::Reverse(OrderedFloat(d)), idx));

    for (slot, (point_idx, _)) in empty.into_iter().zip(far) {
        centroids[slot] = data[point_idx];
    }
}

/// k-means++ seeding: first centre uniform, the rest sampled with
/// probability proportional to squared distance from the nearest centre.
fn kmeans_plus_plus(data: &[Coord], k: usize, rng: &mut StdRng) -> Vec<Coord> {
    let n = data.len();
    let mut centroids = Vec::with_capacity(k);
    let first = rng.random_range(0..n);
    centroids.push(data[first]);

    let mut nearest: Vec<f64> = data.iter().map(|&p| squared_distance(p, data[first])).collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let chosen = if total > 0.0 {
            let threshold = rng.random::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = None;
            for (idx, &d) in nearest.iter().enumerate() {
                cumulative += d;
                if d > 0.0 && cumulative > threshold {
                    chosen = Some(idx);
                    break;
                }
            }
            // Rounding can leave the threshold just past the last sum.
            chosen.or_else(|| nearest.iter().rposition(|&d| d > 0.0)).unwrap_or(0)
        } else {
            // Every point sits on an existing centre.
            rng.random_range(0..n)
        };

        let centre = data[chosen];
        centroids.push(centre);
        for (d, &p) in nearest.iter_mut().zip(data) {
            *d = d.min(squared_distance(p, centre));
        }
    }

    centroids
}

/// Mean of the per-axis variances.
fn mean_variance(data: &[Coord]) -> f64 {
    let n = data.len() as f64;
    let mut total = 0.0;
    for axis in 0..2 {
        let mean = data.iter().map(|p| p[axis]).sum::<f64>() / n;
        total += data.iter().map(|p| (p[axis] - mean).powi(2)).sum::<f64>() / n;
    }
    total / 2.0
}
