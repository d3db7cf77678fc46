use crate::datatype::{struct_datatype, Block, Datatype, Equivalence, Primitive};
use crate::error::DatatypeError;
use log::{debug, error};
use point_gpu::Point;
use std::{mem::offset_of, process, sync::OnceLock};

static POINT_DATATYPE: OnceLock<Datatype> = OnceLock::new();

/// Returns the committed datatype that describes a `Point`.
///
/// The datatype is built on first use and shared by the whole process after
/// that. Concurrent first calls are serialized, and only one of them builds
/// it. If the datatype cannot be committed the process is aborted, since every
/// transfer that used it would be corrupt.
pub fn point_datatype() -> &'static Datatype {
    POINT_DATATYPE.get_or_init(|| match build_point_datatype() {
        Ok(datatype) => {
            debug!(
                "committed Point datatype: extent {} bytes, {} payload bytes",
                datatype.extent(),
                datatype.size()
            );
            datatype
        }
        Err(err) => {
            error!("failed to commit the Point datatype: {}", err);
            process::abort()
        }
    })
}

fn build_point_datatype() -> Result<Datatype, DatatypeError> {
    let blocks = vec![
        Block::new(offset_of!(Point, x), 1, Primitive::Float32),
        Block::new(offset_of!(Point, y), 1, Primitive::Float32),
        Block::new(offset_of!(Point, z), 1, Primitive::Float32),
    ];
    struct_datatype::<Point>(blocks)
}

// The blocks come from `offset_of!` on `Point`'s three `f32` fields and the
// extent is resized to its size.
unsafe impl Equivalence for Point {
    fn equivalent_datatype() -> &'static Datatype {
        point_datatype()
    }
}
