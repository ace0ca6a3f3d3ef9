//! Representation helpers.
//!
//! Generation, variation and safety-check building blocks for domains that
//! implement [`BinaryRepresentable`](crate::problem::BinaryRepresentable) or
//! [`CoordinateRepresentable`](crate::problem::CoordinateRepresentable).

pub mod binary;
pub mod coordinate;
