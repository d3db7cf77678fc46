//! An in-process transport between ranks.
//!
//! Every rank owns an [`Endpoint`] connected to every other rank by a channel.
//! Buffers are packed with the element's committed datatype before sending
//! and unpacked into fresh storage on the receiving side, so only the bytes
//! the datatype describes cross the boundary.

use crate::datatype::Equivalence;
use crate::error::CommError;
use bytemuck::Zeroable;
use crossbeam::channel::{unbounded, Receiver, Sender};
use itertools::Itertools;
use std::mem;

struct Message {
    count: usize,
    bytes: Vec<u8>,
}

pub struct Endpoint {
    rank: usize,
    /// `senders[dest]` delivers to rank `dest`.
    senders: Vec<Sender<Message>>,
    /// `receivers[source]` yields messages sent by rank `source`.
    receivers: Vec<Receiver<Message>>,
}

impl Endpoint {
    /// Creates `size` fully connected endpoints, one per rank, in rank order.
    pub fn world(size: usize) -> Vec<Endpoint> {
        // channels[source][dest]
        let channels = (0..size)
            .map(|_| (0..size).map(|_| unbounded()).collect_vec())
            .collect_vec();

        (0..size)
            .map(|rank| Endpoint {
                rank,
                senders: channels[rank].iter().map(|(s, _)| s.clone()).collect(),
                receivers: channels.iter().map(|row| row[rank].1.clone()).collect(),
            })
            .collect()
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.senders.len()
    }

    /// Sends a contiguous buffer of elements to `dest`.
    pub fn send<T>(&self, dest: usize, buf: &[T]) -> Result<(), CommError>
    where
        T: Equivalence,
    {
        let sender = self.senders.get(dest).ok_or(CommError::InvalidRank {
            rank: dest,
            size: self.size(),
        })?;

        let datatype = T::equivalent_datatype();
        check_stride::<T>(datatype.extent())?;
        let bytes = datatype.pack(bytemuck::cast_slice(buf), buf.len())?;

        sender
            .send(Message {
                count: buf.len(),
                bytes,
            })
            .map_err(|_| CommError::Disconnected { rank: dest })
    }

    /// Blocks until a buffer from `source` arrives and returns its elements.
    pub fn receive<T>(&self, source: usize) -> Result<Vec<T>, CommError>
    where
        T: Equivalence,
    {
        let receiver = self.receivers.get(source).ok_or(CommError::InvalidRank {
            rank: source,
            size: self.size(),
        })?;
        let message = receiver
            .recv()
            .map_err(|_| CommError::Disconnected { rank: source })?;

        let datatype = T::equivalent_datatype();
        check_stride::<T>(datatype.extent())?;

        let mut elements = vec![T::zeroed(); message.count];
        let actual = datatype.unpack(&message.bytes, bytemuck::cast_slice_mut(&mut elements))?;
        if actual != message.count {
            return Err(CommError::CountMismatch {
                announced: message.count,
                actual,
            });
        }
        Ok(elements)
    }
}

fn check_stride<T>(extent: usize) -> Result<(), CommError> {
    let stride = mem::size_of::<T>();
    if extent == stride {
        Ok(())
    } else {
        Err(CommError::StrideMismatch { extent, stride })
    }
}
