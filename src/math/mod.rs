//! Mathematical utilities and data structures

pub mod ellipsoid;
pub mod ray;

pub use ellipsoid::Ellipsoid;
pub use ray::Ray;
