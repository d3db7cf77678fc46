use crate::{Point, PointCloud};
use cust::prelude::*;
use std::error::Error;

/// An `f32` point cloud held in device memory, one buffer per column.
///
/// A CUDA context must be current, e.g. from `cust::quick_init()`.
pub struct DeviceCloud {
    pub dev_xs: DeviceBuffer<f32>,
    pub dev_ys: DeviceBuffer<f32>,
    pub dev_zs: DeviceBuffer<f32>,
    pub dev_normal_xs: DeviceBuffer<f32>,
    pub dev_normal_ys: DeviceBuffer<f32>,
    pub dev_normal_zs: DeviceBuffer<f32>,
}

impl DeviceCloud {
    pub fn upload(cloud: &PointCloud<f32>) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            dev_xs: cloud.xs().as_dbuf()?,
            dev_ys: cloud.ys().as_dbuf()?,
            dev_zs: cloud.zs().as_dbuf()?,
            dev_normal_xs: cloud.normal_xs().as_dbuf()?,
            dev_normal_ys: cloud.normal_ys().as_dbuf()?,
            dev_normal_zs: cloud.normal_zs().as_dbuf()?,
        })
    }

    pub fn download(&self) -> Result<PointCloud<f32>, Box<dyn Error>> {
        let positions = [
            download_column(&self.dev_xs)?,
            download_column(&self.dev_ys)?,
            download_column(&self.dev_zs)?,
        ];
        let normals = [
            download_column(&self.dev_normal_xs)?,
            download_column(&self.dev_normal_ys)?,
            download_column(&self.dev_normal_zs)?,
        ];
        Ok(PointCloud::from_columns(positions, normals))
    }
}

/// Copies points into device memory as-is. The `DeviceCopy` layout of `Point`
/// matches its committed datatype, so kernels see the same stride.
pub fn upload_points(points: &[Point]) -> Result<DeviceBuffer<Point>, Box<dyn Error>> {
    Ok(points.as_dbuf()?)
}

fn download_column(dev: &DeviceBuffer<f32>) -> Result<Vec<f32>, Box<dyn Error>> {
    let mut column = vec![0.0f32; dev.len()];
    dev.copy_to(&mut column)?;
    Ok(column)
}
