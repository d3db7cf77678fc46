use point_cloud::{comm::Endpoint, point_datatype, Point};
use std::{mem, thread};

#[test]
fn datatype_extent_is_point_stride() {
    assert_eq!(point_datatype().extent(), mem::size_of::<Point>());
}

#[test]
fn points_cross_threads_unchanged() {
    let points = (0..1000)
        .map(|i| {
            let t = i as f32;
            Point::new(t.sin(), t.cos(), t * 0.001 - 0.5)
        })
        .collect::<Vec<_>>();

    let mut world = Endpoint::world(2);
    let receiver = world.pop().unwrap();
    let sender = world.pop().unwrap();

    let handle = thread::spawn(move || receiver.receive::<Point>(0).unwrap());
    sender.send(1, &points).unwrap();
    let received = handle.join().unwrap();

    assert_eq!(received.len(), points.len());
    for (a, b) in received.iter().zip(&points) {
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.z.to_bits(), b.z.to_bits());
    }
}

#[test]
fn ring_exchange() {
    let size = 4;
    let world = Endpoint::world(size);

    let results = thread::scope(|s| {
        let handles = world
            .iter()
            .map(|endpoint| {
                s.spawn(move || {
                    let rank = endpoint.rank();
                    let next = (rank + 1) % size;
                    let prev = (rank + size - 1) % size;
                    let mine = vec![Point::new(rank as f32, 0.0, 0.0); rank + 2];
                    endpoint.send(next, &mine).unwrap();
                    endpoint.receive::<Point>(prev).unwrap()
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    for (rank, received) in results.iter().enumerate() {
        let prev = (rank + size - 1) % size;
        assert_eq!(received, &vec![Point::new(prev as f32, 0.0, 0.0); prev + 2]);
    }
}
