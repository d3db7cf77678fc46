use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DatatypeError {
    #[error("a struct datatype needs at least one block")]
    EmptyStruct,
    #[error("block {index} has a count of zero")]
    ZeroCount { index: usize },
    #[error("datatype extent is zero")]
    ZeroExtent,
    #[error("block {index} spans bytes {start}..{end}, outside of the bounds {lower_bound}..{upper_bound}")]
    OutOfBounds {
        index: usize,
        start: usize,
        end: usize,
        lower_bound: usize,
        upper_bound: usize,
    },
    #[error("blocks {first} and {second} overlap")]
    Overlap { first: usize, second: usize },
    #[error("buffer holds {actual} bytes but {expected} were expected")]
    BufferLength { expected: usize, actual: usize },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommError {
    #[error("rank {rank} is not part of a world of size {size}")]
    InvalidRank { rank: usize, size: usize },
    #[error("rank {rank} has disconnected")]
    Disconnected { rank: usize },
    #[error("datatype extent {extent} does not match the element stride {stride}")]
    StrideMismatch { extent: usize, stride: usize },
    #[error("message announced {announced} elements but carried {actual}")]
    CountMismatch { announced: usize, actual: usize },
    #[error(transparent)]
    Datatype(#[from] DatatypeError),
}

#[derive(Error, Debug)]
pub enum CloudError {
    #[error("normals cannot be set on a point cloud stored as {storage}")]
    UnsupportedStorage { storage: &'static str },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
