// SPDX-License-Identifier: LGPL-3.0-or-later

//! # biquad-dsp-units
//!
//! High-level biquad filtering on top of [`biquad_dsp_lib`]:
//!
//! - **Filters**: the [`Biquad`](filters::biquad::Biquad) processor —
//!   musical parameters in (frequency, resonance, gain, filter type,
//!   transform type), one sample per channel through, coefficients out to
//!   display readers via lock-free cells
//! - **Coefficient engine**: fifteen closed-form bilinear coefficient sets
//!   from the classic audio EQ cookbook family
//! - **Units/consts**: dB/amplitude conversions and frequency-bound
//!   constants
//!
//! The per-sample path never allocates, locks, or divides.

pub mod consts;
pub mod filters;
pub mod units;
