// SPDX-License-Identifier: LGPL-3.0-or-later

//! Gain unit conversions.

use biquad_dsp_lib::types::Sample;

/// Convert decibels to linear gain (amplitude ratio), `10^(db/20)`.
#[inline]
pub fn db_to_gain<T: Sample>(db: T) -> T {
    T::from_f64(10.0).powf(db / T::from_f64(20.0))
}

/// Convert linear gain (amplitude ratio) to decibels.
#[inline]
pub fn gain_to_db<T: Sample>(gain: T) -> T {
    T::from_f64(20.0) * gain.log10()
}

/// Convert decibels to the peak/shelf amplitude factor `A = 10^(db/40)`.
///
/// The halved exponent is the EQ-cookbook convention: a peaking filter's
/// center-frequency magnitude works out to `A^2`, i.e. the full `db` boost,
/// while the shelf slope terms consume `sqrt(A)`.
#[inline]
pub fn db_to_peak_amp<T: Sample>(db: T) -> T {
    T::from_f64(10.0).powf(db / T::from_f64(40.0))
}
