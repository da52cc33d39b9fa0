// SPDX-License-Identifier: LGPL-3.0-or-later

//! # biquad-dsp-lib
//!
//! Low-level building blocks for second-order (biquad) IIR filtering:
//!
//! - **Types**: normalized coefficient sets, lock-free atomic coefficient
//!   cells for display readers, per-channel delay state
//! - **Forms**: the four direct-form recurrence evaluators (I, II and their
//!   transposed variants) plus per-sample and buffer dispatch
//! - **Float**: denormal snapping and signal sanitization helpers
//!
//! Everything in this crate is real-time safe: no allocation, no locking,
//! deterministic per-sample cost. Higher-level parameter management and
//! coefficient calculation live in `biquad-dsp-units`.

pub mod float;
pub mod forms;
pub mod types;
