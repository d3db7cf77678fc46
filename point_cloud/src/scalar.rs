use half::f16;
use std::fmt::{Debug, Display};

/// The numeric kind a point cloud stores its columns in.
///
/// Values are transcoded from the `f32` coordinates of a `Point`, widening or
/// narrowing as the kind requires.
pub trait Scalar: Copy + Debug + Display + PartialEq + Send + Sync + 'static {
    /// Name used in diagnostics.
    const NAME: &'static str;

    fn from_f32(v: f32) -> Self;
}

impl Scalar for f32 {
    const NAME: &'static str = "f32";

    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        v
    }
}

impl Scalar for f64 {
    const NAME: &'static str = "f64";

    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        f64::from(v)
    }
}

impl Scalar for f16 {
    const NAME: &'static str = "f16";

    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }
}

#[cfg(test)]
mod tests {
    use super::Scalar;
    use half::f16;

    #[test]
    fn transcode_test() {
        assert_eq!(f32::from_f32(0.1), 0.1f32);
        assert_eq!(f64::from_f32(0.5), 0.5f64);
        assert_eq!(<f16 as Scalar>::from_f32(1.5).to_f32(), 1.5);

        // Narrowing loses precision.
        assert_ne!(f64::from(f16::from_f32(0.1).to_f32()), f64::from_f32(0.1));
    }
}
