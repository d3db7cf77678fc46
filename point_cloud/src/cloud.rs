use crate::error::CloudError;
use crate::ply::write_ply;
use crate::Scalar;
use half::f16;
use itertools::Itertools;
use log::{debug, info};
use point_gpu::Point;
use std::{fs::File, io::BufWriter, path::Path, sync::Arc};

/// A point cloud stored as a struct of arrays.
///
/// Positions and normals are kept in six columns of the storage kind `T`. The
/// position columns always have the same length. The normal columns are
/// either all empty, meaning the cloud has no normals, or all as long as the
/// position columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud<T> {
    xs: Vec<T>,
    ys: Vec<T>,
    zs: Vec<T>,
    normal_xs: Vec<T>,
    normal_ys: Vec<T>,
    normal_zs: Vec<T>,
}

impl<T> PointCloud<T>
where
    T: Scalar,
{
    /// Transcodes the shared source points and their normals into columns.
    ///
    /// # Panics
    ///
    /// Panics if there is not exactly one normal per point.
    pub fn new(points: &Arc<Vec<Point>>, normals: &[Point]) -> Self {
        assert_eq!(
            points.len(),
            normals.len(),
            "a point cloud needs exactly one normal per point"
        );

        let (xs, ys, zs) = columns(points);
        let (normal_xs, normal_ys, normal_zs) = columns(normals);
        debug!(
            "created {} point cloud with {} points and normals",
            T::NAME,
            xs.len()
        );
        Self {
            xs,
            ys,
            zs,
            normal_xs,
            normal_ys,
            normal_zs,
        }
    }

    /// Transcodes the shared source points into a cloud without normals.
    pub fn from_points(points: &Arc<Vec<Point>>) -> Self {
        let (xs, ys, zs) = columns(points);
        debug!("created {} point cloud with {} points", T::NAME, xs.len());
        Self {
            xs,
            ys,
            zs,
            normal_xs: vec![],
            normal_ys: vec![],
            normal_zs: vec![],
        }
    }

    #[cfg(feature = "cuda")]
    pub(crate) fn from_columns(positions: [Vec<T>; 3], normals: [Vec<T>; 3]) -> Self {
        let [xs, ys, zs] = positions;
        let [normal_xs, normal_ys, normal_zs] = normals;
        let cloud = Self {
            xs,
            ys,
            zs,
            normal_xs,
            normal_ys,
            normal_zs,
        };
        cloud.check_columns();
        cloud
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        !self.normal_xs.is_empty()
    }

    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    pub fn zs(&self) -> &[T] {
        &self.zs
    }

    pub fn normal_xs(&self) -> &[T] {
        &self.normal_xs
    }

    pub fn normal_ys(&self) -> &[T] {
        &self.normal_ys
    }

    pub fn normal_zs(&self) -> &[T] {
        &self.normal_zs
    }

    /// Returns the position of point `i`.
    pub fn position(&self, i: usize) -> [T; 3] {
        [self.xs[i], self.ys[i], self.zs[i]]
    }

    /// Returns the normal of point `i`, if the cloud has normals.
    pub fn normal(&self, i: usize) -> Option<[T; 3]> {
        self.has_normals()
            .then(|| [self.normal_xs[i], self.normal_ys[i], self.normal_zs[i]])
    }

    /// Writes the cloud to `path` as an ASCII PLY file.
    ///
    /// A file that cannot be created is reported as [`CloudError::Io`]. A
    /// failure while writing leaves a truncated file behind.
    ///
    /// # Panics
    ///
    /// Panics if the columns have inconsistent lengths.
    pub fn save_as_ply<P>(&self, path: P) -> Result<(), CloudError>
    where
        P: AsRef<Path>,
    {
        self.check_columns();

        let path = path.as_ref();
        let file = File::create(path)?;
        write_ply(self, BufWriter::new(file))?;
        info!("wrote {} points to {}", self.len(), path.display());
        Ok(())
    }

    fn check_columns(&self) {
        let n = self.xs.len();
        assert_eq!(n, self.ys.len(), "position columns differ in length");
        assert_eq!(n, self.zs.len(), "position columns differ in length");
        if self.has_normals() {
            assert_eq!(n, self.normal_xs.len(), "normal columns differ from positions");
            assert_eq!(n, self.normal_ys.len(), "normal columns differ from positions");
            assert_eq!(n, self.normal_zs.len(), "normal columns differ from positions");
        } else {
            assert!(
                self.normal_ys.is_empty() && self.normal_zs.is_empty(),
                "normal columns differ in length"
            );
        }
    }
}

/// Clouds whose normals can be replaced after construction.
///
/// Only `f32` clouds store the same kind as the source `Point`s; every other
/// storage kind reports [`CloudError::UnsupportedStorage`] instead of picking
/// a lossy conversion.
pub trait NormalsSettable {
    fn set_normals(&mut self, normals: Vec<Point>) -> Result<(), CloudError>;
}

impl NormalsSettable for PointCloud<f32> {
    /// Replaces the normal columns. An empty list removes the normals.
    ///
    /// # Panics
    ///
    /// Panics if `normals` is neither empty nor as long as the cloud.
    fn set_normals(&mut self, normals: Vec<Point>) -> Result<(), CloudError> {
        assert!(
            normals.is_empty() || normals.len() == self.len(),
            "a point cloud needs exactly one normal per point"
        );
        let (normal_xs, normal_ys, normal_zs) = columns(&normals);
        self.normal_xs = normal_xs;
        self.normal_ys = normal_ys;
        self.normal_zs = normal_zs;
        Ok(())
    }
}

macro_rules! unsupported_set_normals {
    ($($t:ty),*) => {
        $(
            impl NormalsSettable for PointCloud<$t> {
                fn set_normals(&mut self, _normals: Vec<Point>) -> Result<(), CloudError> {
                    Err(CloudError::UnsupportedStorage {
                        storage: <$t as Scalar>::NAME,
                    })
                }
            }
        )*
    };
}

unsupported_set_normals!(f64, f16);

/// Splits points into x, y and z columns of the storage kind `T`.
fn columns<T>(points: &[Point]) -> (Vec<T>, Vec<T>, Vec<T>)
where
    T: Scalar,
{
    let xs = points.iter().map(|p| T::from_f32(p.x)).collect_vec();
    let ys = points.iter().map(|p| T::from_f32(p.y)).collect_vec();
    let zs = points.iter().map(|p| T::from_f32(p.z)).collect_vec();
    (xs, ys, zs)
}
