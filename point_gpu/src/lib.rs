#![cfg_attr(
    target_os = "cuda",
    no_std,
    feature(register_attr),
    register_attr(nvvm_internal)
)]

#[cfg(target_os = "cuda")]
pub mod kernels;
mod point;

pub use point::Point;
