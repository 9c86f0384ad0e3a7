//! Physics primitives
//!
//! Only what picking needs: rays and ray hits.

pub mod collision;

pub use collision::{Ray, RayHit};
