use clap::{Parser, ValueEnum};
use half::f16;
use itertools::Itertools;
use log::info;
use point_cloud::{comm::Endpoint, CommError, Point, PointCloud, Scalar};
use rand::{Rng, SeedableRng};
use rand_hc::Hc128Rng;
use std::{
    error::Error,
    ops::Range,
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Storage {
    F32,
    F64,
    F16,
}

/// Generates a random point cloud, scatters it across in-process ranks and
/// gathers it back, then exports it as an ASCII PLY file.
#[derive(Parser, Debug)]
#[command(name = "ptcloud", version)]
struct Args {
    /// Number of points to generate.
    #[arg(short, long, default_value_t = 1000)]
    count: usize,

    /// Seed for the random point generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Numeric kind the cloud columns are stored in.
    #[arg(long, value_enum, default_value_t = Storage::F32)]
    storage: Storage,

    /// Attach random unit normals to the points.
    #[arg(long)]
    normals: bool,

    /// Number of in-process ranks the points are exchanged between.
    #[arg(short, long, default_value_t = 4)]
    ranks: usize,

    /// Output PLY file.
    #[arg(short, long, default_value = "cloud.ply")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = Hc128Rng::seed_from_u64(args.seed);
    let points = create_random_points(args.count, &mut rng);
    let normals = args
        .normals
        .then(|| create_random_normals(args.count, &mut rng));

    let gathered = scatter_gather(&points, args.ranks.max(1))?;
    if gathered != points {
        return Err("points changed while being exchanged between ranks".into());
    }
    info!("exchanged {} points between {} ranks", points.len(), args.ranks.max(1));

    let points = Arc::new(gathered);
    match args.storage {
        Storage::F32 => export::<f32>(&points, normals.as_deref(), &args.output),
        Storage::F64 => export::<f64>(&points, normals.as_deref(), &args.output),
        Storage::F16 => export::<f16>(&points, normals.as_deref(), &args.output),
    }
}

fn export<T>(
    points: &Arc<Vec<Point>>,
    normals: Option<&[Point]>,
    path: &Path,
) -> Result<(), Box<dyn Error>>
where
    T: Scalar,
{
    let cloud = match normals {
        Some(normals) => PointCloud::<T>::new(points, normals),
        None => PointCloud::<T>::from_points(points),
    };
    cloud.save_as_ply(path)?;
    Ok(())
}

/// Sends an even share of `points` from rank 0 to every other rank, has each
/// rank send its share back, and returns the shares gathered in rank order.
fn scatter_gather(points: &[Point], ranks: usize) -> Result<Vec<Point>, CommError> {
    let mut world = Endpoint::world(ranks);
    let root = world.remove(0);

    thread::scope(|s| {
        let handles = world
            .into_iter()
            .map(|endpoint| {
                s.spawn(move || -> Result<(), CommError> {
                    let share = endpoint.receive::<Point>(0)?;
                    endpoint.send(0, &share)
                })
            })
            .collect_vec();

        // Dropping the root endpoint on failure disconnects any waiting rank.
        let gathered = gather_at_root(root, points, ranks);

        let mut joined = Ok(());
        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle
                .join()
                .unwrap_or(Err(CommError::Disconnected { rank: i + 1 }));
            joined = joined.and(result);
        }

        let gathered = gathered?;
        joined?;
        Ok(gathered)
    })
}

fn gather_at_root(root: Endpoint, points: &[Point], ranks: usize) -> Result<Vec<Point>, CommError> {
    for rank in 1..ranks {
        root.send(rank, &points[share(points.len(), ranks, rank)])?;
    }

    let mut gathered = points[share(points.len(), ranks, 0)].to_vec();
    for rank in 1..ranks {
        gathered.extend(root.receive::<Point>(rank)?);
    }
    Ok(gathered)
}

/// The index range of the points owned by `rank`.
fn share(len: usize, ranks: usize, rank: usize) -> Range<usize> {
    (rank * len / ranks)..((rank + 1) * len / ranks)
}

/// Creates the specified number of random points in the unit cube.
fn create_random_points(points_count: usize, rng: &mut impl Rng) -> Vec<Point> {
    (0..points_count)
        .map(|_| Point::from(rng.gen::<[f32; 3]>()))
        .collect()
}

/// Creates the specified number of random unit vectors.
fn create_random_normals(normals_count: usize, rng: &mut impl Rng) -> Vec<Point> {
    (0..normals_count)
        .map(|_| {
            let v = Point::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            let len2 = v.dot(&v);
            if len2 > f32::EPSILON {
                v / len2.sqrt()
            } else {
                Point::new(0.0, 0.0, 1.0)
            }
        })
        .collect()
}
