// SPDX-License-Identifier: LGPL-3.0-or-later

//! Coefficient calculation and the high-level biquad processor.

pub mod biquad;
pub mod coeffs;
