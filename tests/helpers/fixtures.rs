//! Synthetic association problems
//!
//! Datasets are generated from a seeded `StdRng`; the second dataset is a
//! rigid transform of the first, so every one-to-one association is an
//! inlier and any other pairing is (almost surely) an outlier.

use nalgebra::{DMatrix, Rotation3, Vector3};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use robust_association_rs::types::{Association, AssociationSet, Data};

/// Two datasets, candidate associations and the ground truth
#[derive(Debug, Clone)]
pub struct Scenario {
    pub d1: Data,
    pub d2: Data,
    pub associations: AssociationSet,
    /// Positions of the true associations in `associations`, ascending
    pub inliers: Vec<usize>,
}

impl Scenario {
    /// Associations at the inlier positions
    pub fn inlier_associations(&self) -> AssociationSet {
        self.inliers.iter().map(|&i| self.associations[i]).collect()
    }
}

/// `n` points on the x axis at unit spacing
pub fn collinear(n: usize) -> Data {
    Data::from_fn(2, n, |r, c| if r == 0 { c as f64 } else { 0.0 })
}

/// One-to-one associations `(i, i)` for `i < n`
pub fn identity_associations(n: usize) -> AssociationSet {
    (0..n).map(|i| Association::new(i, i)).collect()
}

fn random_rigid_transform(rng: &mut StdRng) -> (Rotation3<f64>, Vector3<f64>) {
    let rotation = Rotation3::from_euler_angles(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-3.0..3.0),
    );
    let translation = Vector3::new(
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
    );
    (rotation, translation)
}

fn shuffled_associations(
    rng: &mut StdRng,
    num_points: usize,
    num_outliers: usize,
) -> (AssociationSet, Vec<usize>) {
    let mut tagged: Vec<(Association, bool)> = (0..num_points)
        .map(|i| (Association::new(i, i), true))
        .collect();
    for _ in 0..num_outliers {
        let source = rng.gen_range(0..num_points);
        let mut target = rng.gen_range(0..num_points);
        while target == source {
            target = rng.gen_range(0..num_points);
        }
        tagged.push((Association::new(source, target), false));
    }
    tagged.shuffle(rng);

    let inliers = tagged
        .iter()
        .enumerate()
        .filter(|(_, (_, inlier))| *inlier)
        .map(|(idx, _)| idx)
        .collect();
    let associations = tagged.into_iter().map(|(a, _)| a).collect();
    (associations, inliers)
}

/// 3D point cloud in a 10 m box, its rigid transform and shuffled candidates
pub fn rigid_point_cloud(seed: u64, num_points: usize, num_outliers: usize) -> Scenario {
    let mut rng = StdRng::seed_from_u64(seed);

    let d1 = DMatrix::from_fn(3, num_points, |_, _| rng.gen_range(0.0..10.0));
    let (rotation, translation) = random_rigid_transform(&mut rng);
    let mut d2 = DMatrix::zeros(3, num_points);
    for j in 0..num_points {
        let p = Vector3::new(d1[(0, j)], d1[(1, j)], d1[(2, j)]);
        d2.column_mut(j).copy_from(&(rotation * p + translation));
    }

    let (associations, inliers) = shuffled_associations(&mut rng, num_points, num_outliers);
    Scenario {
        d1,
        d2,
        associations,
        inliers,
    }
}

/// Like [`rigid_point_cloud`], with a unit normal stacked under each point
pub fn rigid_point_normal_cloud(seed: u64, num_points: usize, num_outliers: usize) -> Scenario {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut d1 = DMatrix::zeros(6, num_points);
    for j in 0..num_points {
        let p = Vector3::new(
            rng.gen_range(0.0..10.0),
            rng.gen_range(0.0..10.0),
            rng.gen_range(0.0..10.0),
        );
        let n = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
        .try_normalize(1e-6)
        .unwrap_or_else(Vector3::z);
        d1.fixed_view_mut::<3, 1>(0, j).copy_from(&p);
        d1.fixed_view_mut::<3, 1>(3, j).copy_from(&n);
    }

    let (rotation, translation) = random_rigid_transform(&mut rng);
    let mut d2 = DMatrix::zeros(6, num_points);
    for j in 0..num_points {
        let p = Vector3::new(d1[(0, j)], d1[(1, j)], d1[(2, j)]);
        let n = Vector3::new(d1[(3, j)], d1[(4, j)], d1[(5, j)]);
        d2.fixed_view_mut::<3, 1>(0, j)
            .copy_from(&(rotation * p + translation));
        d2.fixed_view_mut::<3, 1>(3, j).copy_from(&(rotation * n));
    }

    let (associations, inliers) = shuffled_associations(&mut rng, num_points, num_outliers);
    Scenario {
        d1,
        d2,
        associations,
        inliers,
    }
}

/// Random symmetric graph with unit diagonal.
///
/// Each off-diagonal pair is compatible with probability `density` and then
/// carries an affinity in `(0, 1]`.
pub fn random_graph(seed: u64, n: usize, density: f64) -> (DMatrix<f64>, DMatrix<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = DMatrix::identity(n, n);
    let mut c = DMatrix::identity(n, n);
    for a in 0..n {
        for b in a + 1..n {
            if rng.gen::<f64>() < density {
                let w = 1.0 - rng.gen::<f64>();
                m[(a, b)] = w;
                m[(b, a)] = w;
                c[(a, b)] = 1.0;
                c[(b, a)] = 1.0;
            }
        }
    }
    (m, c)
}

/// Random graph with a planted clique on `clique` with unit affinities
pub fn planted_clique_graph(
    seed: u64,
    n: usize,
    density: f64,
    clique: &[usize],
) -> (DMatrix<f64>, DMatrix<f64>) {
    let (mut m, mut c) = random_graph(seed, n, density);
    for &a in clique {
        for &b in clique {
            m[(a, b)] = 1.0;
            c[(a, b)] = 1.0;
        }
    }
    (m, c)
}
