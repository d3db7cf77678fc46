use bytemuck::{Pod, Zeroable};
use core::ops::{Add, AddAssign, Div, DivAssign, Sub, SubAssign};
use cust_core::DeviceCopy;

/// A single-precision 3D point that can be used on both the host and the
/// device.
///
/// The layout is `#[repr(C)]` with no padding so that slices of points can be
/// copied to device memory or reinterpreted as bytes for transfer between
/// processes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, DeviceCopy, Pod, Zeroable)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    #[inline(always)]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns the squared Euclidean distance between the two points.
    ///
    /// No square root is taken.
    #[inline(always)]
    pub fn distance2(p1: &Point, p2: &Point) -> f32 {
        let x = p1.x - p2.x;
        let y = p1.y - p2.y;
        let z = p1.z - p2.z;
        x * x + y * y + z * z
    }

    #[inline(always)]
    pub fn dot(&self, other: &Point) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline(always)]
    pub fn xyz(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Point {
    #[inline(always)]
    fn from(xyz: [f32; 3]) -> Self {
        Self::new(xyz[0], xyz[1], xyz[2])
    }
}

impl AddAssign for Point {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Add for Point {
    type Output = Point;

    #[inline(always)]
    fn add(mut self, rhs: Point) -> Point {
        self += rhs;
        self
    }
}

impl SubAssign for Point {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline(always)]
    fn sub(mut self, rhs: Point) -> Point {
        self -= rhs;
        self
    }
}

/// Division by zero produces infinite or NaN components.
impl DivAssign<f32> for Point {
    #[inline(always)]
    fn div_assign(&mut self, rhs: f32) {
        self.x /= rhs;
        self.y /= rhs;
        self.z /= rhs;
    }
}

impl Div<f32> for Point {
    type Output = Point;

    #[inline(always)]
    fn div(mut self, rhs: f32) -> Point {
        self /= rhs;
        self
    }
}
