//! DSP primitives used by the augmentation transforms.
//!
//! Everything here is pure Rust and deterministic; filter and delay state
//! lives only for the duration of a single block call.

pub mod delay;
pub mod filter;
pub mod resample;
