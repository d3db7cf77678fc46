use point_cloud::{CloudError, NormalsSettable, Point, PointCloud};
use std::{fs, sync::Arc};
use tempfile::tempdir;

fn unit_points() -> Arc<Vec<Point>> {
    Arc::new(vec![
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
    ])
}

fn body_numbers(text: &str) -> Vec<Vec<f32>> {
    text.lines()
        .skip_while(|line| *line != "end_header")
        .skip(1)
        .map(|line| {
            line.split(' ')
                .map(|v| v.parse::<f32>().unwrap())
                .collect()
        })
        .collect()
}

#[test]
fn export_without_normals() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cloud.ply");

    let cloud = PointCloud::<f32>::from_points(&unit_points());
    cloud.save_as_ply(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let header = text
        .lines()
        .take_while(|line| *line != "end_header")
        .collect::<Vec<_>>();
    assert_eq!(
        header,
        vec![
            "ply",
            "format ascii 1.0",
            "element vertex 3",
            "property float x",
            "property float y",
            "property float z",
        ]
    );
    assert!(!text.contains("nx"));

    let body = body_numbers(&text);
    assert_eq!(
        body,
        vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ]
    );
}

#[test]
fn export_after_setting_normals() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cloud.ply");

    let mut cloud = PointCloud::<f32>::from_points(&unit_points());
    cloud
        .set_normals(vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(0.0, 0.0, -1.0),
            Point::new(1.0, 0.0, 0.0),
        ])
        .unwrap();
    cloud.save_as_ply(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines[2], "element vertex 3");
    assert_eq!(
        &lines[6..10],
        &[
            "property float nx",
            "property float ny",
            "property float nz",
            "end_header"
        ]
    );

    let body = body_numbers(&text);
    assert_eq!(
        body,
        vec![
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            vec![0.0, 1.0, 0.0, 0.0, 0.0, -1.0],
            vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
        ]
    );
}

#[test]
fn export_keeps_order_and_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("many.ply");

    let points = Arc::new(
        (0..250)
            .map(|i| Point::new(i as f32, -(i as f32) * 0.5, 1e-3 * i as f32))
            .collect::<Vec<_>>(),
    );
    let normals = vec![Point::new(0.0, 1.0, 0.0); points.len()];
    let cloud = PointCloud::<f64>::new(&points, &normals);
    cloud.save_as_ply(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("element vertex 250\n"));
    let body = body_numbers(&text);
    assert_eq!(body.len(), 250);
    for (row, p) in body.iter().zip(points.iter()) {
        assert_eq!(row.len(), 6);
        assert_eq!(&row[..3], &p.xyz());
    }
}

#[test]
fn unopenable_path_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("cloud.ply");

    let cloud = PointCloud::<f32>::from_points(&unit_points());
    let result = cloud.save_as_ply(&path);
    assert!(matches!(result, Err(CloudError::Io(_))));
    assert!(!path.exists());
}
