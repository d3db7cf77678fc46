//! Derived datatypes that describe how a record is laid out in memory.
//!
//! A datatype is a list of blocks (a primitive kind repeated `count` times at
//! a byte offset) plus a lower bound and an extent. The extent is the stride
//! between consecutive records in an array. Packing a buffer of records copies
//! only the described fields into a contiguous wire buffer, and unpacking
//! writes them back at the same offsets on the receiving side.

use crate::error::DatatypeError;
use bytemuck::Pod;
use itertools::Itertools;
use std::mem;

/// Predefined element kinds that blocks are made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Float32,
    Float64,
    Int32,
    UInt8,
}

impl Primitive {
    pub const fn size(self) -> usize {
        match self {
            Primitive::Float32 => 4,
            Primitive::Float64 => 8,
            Primitive::Int32 => 4,
            Primitive::UInt8 => 1,
        }
    }

    /// Natural alignment, which equals the size for every predefined kind.
    pub const fn align(self) -> usize {
        self.size()
    }
}

/// `count` consecutive values of `primitive` starting `offset` bytes into a
/// record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub offset: usize,
    pub count: usize,
    pub primitive: Primitive,
}

impl Block {
    pub fn new(offset: usize, count: usize, primitive: Primitive) -> Self {
        Self {
            offset,
            count,
            primitive,
        }
    }

    pub fn byte_len(&self) -> usize {
        self.count * self.primitive.size()
    }

    pub fn end(&self) -> usize {
        self.offset + self.byte_len()
    }
}

/// A structured datatype that has not been committed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
    blocks: Vec<Block>,
    lower_bound: usize,
    extent: usize,
}

impl StructType {
    /// Builds a struct type from its blocks.
    ///
    /// The initial bounds follow the natural alignment rule: the lower bound is
    /// the smallest block offset and the upper bound is the end of the last
    /// block rounded up to the largest block alignment. Records with extra
    /// trailing padding need `resized` to reach their real stride.
    pub fn create(blocks: Vec<Block>) -> Result<Self, DatatypeError> {
        if blocks.is_empty() {
            return Err(DatatypeError::EmptyStruct);
        }

        let lower_bound = blocks.iter().map(|b| b.offset).min().unwrap_or(0);
        let upper_bound = blocks.iter().map(|b| b.end()).max().unwrap_or(0);
        let align = blocks.iter().map(|b| b.primitive.align()).max().unwrap_or(1);
        let extent = round_up(upper_bound - lower_bound, align);

        Ok(Self {
            blocks,
            lower_bound,
            extent,
        })
    }

    /// Returns the lower bound and the extent.
    pub fn extent(&self) -> (usize, usize) {
        (self.lower_bound, self.extent)
    }

    /// Returns the same type with new bounds.
    pub fn resized(self, lower_bound: usize, extent: usize) -> Self {
        Self {
            lower_bound,
            extent,
            ..self
        }
    }

    /// Validates the type and turns it into an immutable, reusable handle.
    pub fn commit(self) -> Result<Datatype, DatatypeError> {
        if self.extent == 0 {
            return Err(DatatypeError::ZeroExtent);
        }

        let upper_bound = self.lower_bound + self.extent;
        for (index, block) in self.blocks.iter().enumerate() {
            if block.count == 0 {
                return Err(DatatypeError::ZeroCount { index });
            }
            if block.offset < self.lower_bound || block.end() > upper_bound {
                return Err(DatatypeError::OutOfBounds {
                    index,
                    start: block.offset,
                    end: block.end(),
                    lower_bound: self.lower_bound,
                    upper_bound,
                });
            }
        }

        // Check neighbours in offset order for overlapping byte ranges.
        let by_offset = (0..self.blocks.len())
            .sorted_by_key(|&i| self.blocks[i].offset)
            .collect_vec();
        for (&a, &b) in by_offset.iter().tuple_windows() {
            if self.blocks[a].end() > self.blocks[b].offset {
                return Err(DatatypeError::Overlap {
                    first: a.min(b),
                    second: a.max(b),
                });
            }
        }

        let size = self.blocks.iter().map(|b| b.byte_len()).sum();
        Ok(Datatype {
            blocks: self.blocks,
            lower_bound: self.lower_bound,
            extent: self.extent,
            size,
        })
    }
}

/// A committed datatype.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Datatype {
    blocks: Vec<Block>,
    lower_bound: usize,
    extent: usize,
    size: usize,
}

impl Datatype {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn lower_bound(&self) -> usize {
        self.lower_bound
    }

    /// The stride between consecutive records.
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// The number of payload bytes per record, without padding.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of bytes a buffer of `count` records spans. Record `i`
    /// starts `i * extent` bytes into the buffer and its blocks sit at their
    /// offsets from there, so the last record ends `lower_bound + extent`
    /// bytes after its start.
    pub fn span(&self, count: usize) -> usize {
        if count == 0 {
            0
        } else {
            self.lower_bound + count * self.extent
        }
    }

    /// Copies the described fields of `count` records laid out `extent` bytes
    /// apart in `records` into a contiguous wire buffer.
    pub fn pack(&self, records: &[u8], count: usize) -> Result<Vec<u8>, DatatypeError> {
        let expected = self.span(count);
        if records.len() != expected {
            return Err(DatatypeError::BufferLength {
                expected,
                actual: records.len(),
            });
        }

        let mut wire = Vec::with_capacity(count * self.size);
        for i in 0..count {
            let base = i * self.extent;
            for block in &self.blocks {
                wire.extend_from_slice(&records[base + block.offset..base + block.end()]);
            }
        }
        Ok(wire)
    }

    /// Writes the records in `wire` back into `records` at their described
    /// offsets and returns the number of records. Padding bytes in `records`
    /// are left untouched.
    pub fn unpack(&self, wire: &[u8], records: &mut [u8]) -> Result<usize, DatatypeError> {
        if wire.len() % self.size != 0 {
            return Err(DatatypeError::BufferLength {
                expected: round_up(wire.len(), self.size),
                actual: wire.len(),
            });
        }
        let count = wire.len() / self.size;
        let expected = self.span(count);
        if records.len() != expected {
            return Err(DatatypeError::BufferLength {
                expected,
                actual: records.len(),
            });
        }

        for (i, packed) in wire.chunks_exact(self.size).enumerate() {
            let base = i * self.extent;
            let mut start = 0;
            for block in &self.blocks {
                let len = block.byte_len();
                records[base + block.offset..base + block.end()]
                    .copy_from_slice(&packed[start..start + len]);
                start += len;
            }
        }
        Ok(count)
    }
}

/// A type whose memory layout is described by a committed datatype.
///
/// # Safety
///
/// The datatype must describe `Self` exactly: every block lies inside the
/// type at the offset of a field of the same primitive kind, and the extent
/// equals `size_of::<Self>()`. Receivers trust it to rebuild values from raw
/// bytes.
pub unsafe trait Equivalence: Pod {
    fn equivalent_datatype() -> &'static Datatype;
}

/// Builds and commits a struct datatype for `T` from its field blocks.
///
/// The natural extent of the blocks is resized to the stride of `T` so that
/// arrays of more than one `T` line up from the second element on.
pub fn struct_datatype<T>(blocks: Vec<Block>) -> Result<Datatype, DatatypeError> {
    let struct_type = StructType::create(blocks)?;
    let (lower_bound, extent) = struct_type.extent();
    let stride = mem::size_of::<T>();
    if extent != stride {
        log::debug!(
            "resizing datatype for {} from extent {} to stride {}",
            std::any::type_name::<T>(),
            extent,
            stride
        );
    }
    struct_type.resized(lower_bound, stride).commit()
}

fn round_up(value: usize, multiple: usize) -> usize {
    (value + multiple - 1) / multiple * multiple
}
