//! Time-driven animation state
//!
//! Every animated value in a session is derived from elapsed session time,
//! never from accumulated per-frame deltas, so a dropped frame cannot make
//! entities drift. The one exception is the firework particle system, which
//! steps once per tick.

pub mod bounce;
pub mod custom;
pub mod idle;
pub mod particles;
pub mod spin;

pub use bounce::{BounceAnimation, BounceTracker};
pub use custom::{UpdateError, UpdateRegistry, UpdateRoutine};
pub use idle::{IdleAnimation, IdleAnimator};
pub use particles::{Particle, ParticleSystem};
pub use spin::{SpinEntity, SpinKind, SpinSet};
