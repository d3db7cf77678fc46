use crate::{PointCloud, Scalar};
use std::io::{self, Write};

/// Writes the cloud as an ASCII PLY file: one vertex line per point, with the
/// normal properties present only if the cloud has normals.
pub fn write_ply<T, W>(cloud: &PointCloud<T>, mut out: W) -> io::Result<()>
where
    T: Scalar,
    W: Write,
{
    let has_normals = cloud.has_normals();

    writeln!(out, "ply")?;
    writeln!(out, "format ascii 1.0")?;
    writeln!(out, "element vertex {}", cloud.len())?;
    writeln!(out, "property float x")?;
    writeln!(out, "property float y")?;
    writeln!(out, "property float z")?;
    if has_normals {
        writeln!(out, "property float nx")?;
        writeln!(out, "property float ny")?;
        writeln!(out, "property float nz")?;
    }
    writeln!(out, "end_header")?;

    let (xs, ys, zs) = (cloud.xs(), cloud.ys(), cloud.zs());
    let (nxs, nys, nzs) = (cloud.normal_xs(), cloud.normal_ys(), cloud.normal_zs());
    for i in 0..cloud.len() {
        write!(out, "{} {} {}", xs[i], ys[i], zs[i])?;
        if has_normals {
            write!(out, " {} {} {}", nxs[i], nys[i], nzs[i])?;
        }
        writeln!(out)?;
    }

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::write_ply;
    use crate::PointCloud;
    use point_gpu::Point;
    use std::sync::Arc;

    #[test]
    fn empty_cloud() {
        let cloud = PointCloud::<f32>::from_points(&Arc::new(vec![]));
        let mut out = Vec::new();
        write_ply(&cloud, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ply\nformat ascii 1.0\nelement vertex 0\nproperty float x\nproperty float y\nproperty float z\nend_header\n"
        );
    }

    #[test]
    fn widened_values() {
        let points = Arc::new(vec![Point::new(0.5, -1.25, 2.0)]);
        let normals = vec![Point::new(0.0, 0.0, -1.0)];
        let cloud = PointCloud::<f64>::new(&points, &normals);
        let mut out = Vec::new();
        write_ply(&cloud, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().last(), Some("0.5 -1.25 2 0 0 -1"));
    }
}
