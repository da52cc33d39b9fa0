// SPDX-License-Identifier: LGPL-3.0-or-later

//! Closed-form biquad coefficient sets.
//!
//! Fifteen filter shapes derived from the bilinear transform, in the lineage
//! of the classic audio EQ cookbook, with two deliberate departures that are
//! part of this engine's contract:
//!
//! - resonance is a `[0, 1]` parameter mapped as `alpha = sin(omega)*(1-q)`
//!   (inverse of the usual `sin/(2Q)`), so higher values mean sharper
//!   response;
//! - the one-pole variants are written directly in `omega` rather than
//!   through a tangent prewarp.
//!
//! Both shape the audible response curves and must not be "corrected" to the
//! textbook forms.

use biquad_dsp_lib::types::{BiquadCoeffs, Sample};

use crate::units::db_to_peak_amp;

/// Filter shape selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    /// Two-pole low-pass, resonance via `alpha`. The default.
    #[default]
    LowPass2,
    /// One-pole (6 dB/oct) low-pass, resonance-free.
    LowPass1,
    /// Two-pole high-pass, resonance via `alpha`.
    HighPass2,
    /// One-pole (6 dB/oct) high-pass, resonance-free.
    HighPass1,
    /// Band-pass, `b_0 = sin/2` numerator (peak gain rises with resonance).
    BandPass,
    /// Band-pass, `b_0 = alpha` numerator (unity peak gain).
    BandPassQ,
    /// Two-pole low shelf.
    LowShelf2,
    /// One-pole low shelf.
    LowShelf1,
    /// One-pole low shelf with gain-compensated corner (`omega / A`).
    LowShelf1C,
    /// Two-pole high shelf.
    HighShelf2,
    /// One-pole high shelf.
    HighShelf1,
    /// One-pole high shelf with gain-compensated corner (`omega * A`).
    HighShelf1C,
    /// Two-pole parametric peaking EQ.
    Peak,
    /// Two-pole notch, unity gain outside the notch.
    Notch,
    /// Two-pole all-pass, unity magnitude everywhere.
    AllPass,
}

impl FilterType {
    /// All fifteen shapes, in declaration order.
    pub const ALL: [FilterType; 15] = [
        FilterType::LowPass2,
        FilterType::LowPass1,
        FilterType::HighPass2,
        FilterType::HighPass1,
        FilterType::BandPass,
        FilterType::BandPassQ,
        FilterType::LowShelf2,
        FilterType::LowShelf1,
        FilterType::LowShelf1C,
        FilterType::HighShelf2,
        FilterType::HighShelf1,
        FilterType::HighShelf1C,
        FilterType::Peak,
        FilterType::Notch,
        FilterType::AllPass,
    ];

    /// True for the shapes whose transfer function depends on the gain
    /// parameter; gain is mathematically inert for every other shape.
    pub fn uses_gain(self) -> bool {
        matches!(
            self,
            FilterType::LowShelf2
                | FilterType::LowShelf1
                | FilterType::LowShelf1C
                | FilterType::HighShelf2
                | FilterType::HighShelf1
                | FilterType::HighShelf1C
                | FilterType::Peak
        )
    }
}

/// Trigonometric terms shared by all coefficient formulas.
///
/// Recomputed whenever frequency, resonance, or gain changes.
#[derive(Debug, Clone, Copy)]
pub struct TrigCache<T> {
    /// `frequency * 2*pi / sample_rate`.
    pub omega: T,
    pub cos_omega: T,
    pub sin_omega: T,
    /// `sin_omega * (1 - resonance)`.
    pub alpha: T,
    /// `10^(gain_db / 40)`.
    pub amp: T,
    /// `2 * sqrt(amp) * alpha` — the two-pole shelf slope term.
    pub sqrt_amp_alpha: T,
}

impl<T: Sample> TrigCache<T> {
    pub fn new(frequency: T, sample_rate: T, resonance: T, gain_db: T) -> Self {
        let two = T::from_f64(2.0);
        let pi = T::from_f64(std::f64::consts::PI);

        let omega = frequency * (two * pi / sample_rate);
        let cos_omega = omega.cos();
        let sin_omega = omega.sin();
        let alpha = sin_omega * (T::one() - resonance);
        let amp = db_to_peak_amp(gain_db);
        let sqrt_amp_alpha = two * amp.sqrt() * alpha;

        Self {
            omega,
            cos_omega,
            sin_omega,
            alpha,
            amp,
            sqrt_amp_alpha,
        }
    }
}

/// Unnormalized transfer-function coefficients,
/// `H(z) = (b0 + b1 z^-1 + b2 z^-2) / (a0 + a1 z^-1 + a2 z^-2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCoeffs<T> {
    pub b0: T,
    pub b1: T,
    pub b2: T,
    pub a0: T,
    pub a1: T,
    pub a2: T,
}

impl<T: Sample> RawCoeffs<T> {
    /// Divide through by `a0` and pre-negate the feedback terms, producing
    /// the set the recurrence forms consume. The stored `a0` is the
    /// reciprocal of the raw `a0`, so processing never divides.
    pub fn normalize(&self) -> BiquadCoeffs<T> {
        let a0 = self.a0.recip();
        BiquadCoeffs {
            b0: self.b0 * a0,
            b1: self.b1 * a0,
            b2: self.b2 * a0,
            a0,
            a1: -self.a1 * a0,
            a2: -self.a2 * a0,
        }
    }
}

/// Compute the unnormalized coefficient set for one filter shape.
pub fn raw_coeffs<T: Sample>(filter_type: FilterType, w: &TrigCache<T>) -> RawCoeffs<T> {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);

    let cos = w.cos_omega;
    let sin = w.sin_omega;
    let omega = w.omega;
    let alpha = w.alpha;
    let a = w.amp;
    let t = w.sqrt_amp_alpha;

    match filter_type {
        FilterType::LowPass2 => RawCoeffs {
            b0: (one - cos) / two,
            b1: one - cos,
            b2: (one - cos) / two,
            a0: one + alpha,
            a1: -two * cos,
            a2: one - alpha,
        },

        FilterType::LowPass1 => RawCoeffs {
            b0: omega / (one + omega),
            b1: omega / (one + omega),
            b2: zero,
            a0: one,
            a1: -((one - omega) / (one + omega)),
            a2: zero,
        },

        FilterType::HighPass2 => RawCoeffs {
            b0: (one + cos) / two,
            b1: -(one + cos),
            b2: (one + cos) / two,
            a0: one + alpha,
            a1: -two * cos,
            a2: one - alpha,
        },

        FilterType::HighPass1 => RawCoeffs {
            b0: (one + omega).recip(),
            b1: -(one + omega).recip(),
            b2: zero,
            a0: one,
            a1: -((one - omega) / (one + omega)),
            a2: zero,
        },

        FilterType::BandPass => RawCoeffs {
            b0: sin / two,
            b1: zero,
            b2: -(sin / two),
            a0: one + alpha,
            a1: -two * cos,
            a2: one - alpha,
        },

        FilterType::BandPassQ => RawCoeffs {
            b0: alpha,
            b1: zero,
            b2: -alpha,
            a0: one + alpha,
            a1: -two * cos,
            a2: one - alpha,
        },

        FilterType::LowShelf2 => {
            let ap1 = a + one;
            let am1 = a - one;
            RawCoeffs {
                b0: a * (ap1 - am1 * cos + t),
                b1: two * a * (am1 - ap1 * cos),
                b2: a * (ap1 - am1 * cos - t),
                a0: ap1 + am1 * cos + t,
                a1: -two * (am1 + ap1 * cos),
                a2: ap1 + am1 * cos - t,
            }
        }

        FilterType::LowShelf1 => {
            let ratio = omega / (one + omega);
            let pole = (one - omega) / (one + omega);
            RawCoeffs {
                b0: one + ratio * (a * a - one),
                b1: ratio * (a * a - one) - pole,
                b2: zero,
                a0: one,
                a1: -pole,
                a2: zero,
            }
        }

        FilterType::LowShelf1C => {
            // Corner frequency compensated downward with gain: omega / A
            let omega_c = omega / a;
            let ratio = omega_c / (one + omega_c);
            let pole = (one - omega_c) / (one + omega_c);
            RawCoeffs {
                b0: one + ratio * (a * a - one),
                b1: ratio * (a * a - one) - pole,
                b2: zero,
                a0: one,
                a1: -pole,
                a2: zero,
            }
        }

        FilterType::HighShelf2 => {
            let ap1 = a + one;
            let am1 = a - one;
            RawCoeffs {
                b0: a * (ap1 + am1 * cos + t),
                b1: -two * a * (am1 + ap1 * cos),
                b2: a * (ap1 + am1 * cos - t),
                a0: ap1 - am1 * cos + t,
                a1: two * (am1 - ap1 * cos),
                a2: ap1 - am1 * cos - t,
            }
        }

        FilterType::HighShelf1 => {
            let shelf = (a * a - one) / (one + omega);
            let pole = (one - omega) / (one + omega);
            RawCoeffs {
                b0: one + shelf,
                b1: -(pole + shelf),
                b2: zero,
                a0: one,
                a1: -pole,
                a2: zero,
            }
        }

        FilterType::HighShelf1C => {
            // Corner frequency compensated upward with gain: omega * A
            let omega_c = omega * a;
            let shelf = (a * a - one) / (one + omega_c);
            let pole = (one - omega_c) / (one + omega_c);
            RawCoeffs {
                b0: one + shelf,
                b1: -(pole + shelf),
                b2: zero,
                a0: one,
                a1: -pole,
                a2: zero,
            }
        }

        FilterType::Peak => RawCoeffs {
            b0: one + alpha * a,
            b1: -two * cos,
            b2: one - alpha * a,
            a0: one + alpha / a,
            a1: -two * cos,
            a2: one - alpha / a,
        },

        FilterType::Notch => RawCoeffs {
            b0: one,
            b1: -two * cos,
            b2: one,
            a0: one + alpha,
            a1: -two * cos,
            a2: one - alpha,
        },

        FilterType::AllPass => RawCoeffs {
            b0: one - alpha,
            b1: -two * cos,
            b2: one + alpha,
            a0: one + alpha,
            a1: -two * cos,
            a2: one - alpha,
        },
    }
}

/// Compute the normalized coefficient set for one filter shape.
pub fn calc_coeffs<T: Sample>(filter_type: FilterType, w: &TrigCache<T>) -> BiquadCoeffs<T> {
    raw_coeffs(filter_type, w).normalize()
}
