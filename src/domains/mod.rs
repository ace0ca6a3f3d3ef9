//! Reference problem domains.
//!
//! Small benchmark functions that exercise the core end to end, one per
//! representation capability.

mod onemax;
mod sphere;

pub use onemax::OneMax;
pub use sphere::Sphere;
