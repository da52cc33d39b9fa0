// SPDX-License-Identifier: LGPL-3.0-or-later

//! The four structural realizations of the biquad difference equation.
//!
//! All four forms compute the same transfer function from the same
//! normalized coefficient set; they differ in which delay registers they
//! use, in operation ordering, and therefore in roundoff behavior. The
//! transposed forms are less sensitive to coefficient quantization, which
//! is why [`TransformType::DirectFormIITransposed`] is the default.
//!
//! Coefficients follow the pre-negated convention of
//! [`BiquadCoeffs`](crate::types::BiquadCoeffs): feedback terms are added,
//! never subtracted, and nothing divides.

use crate::types::{BiquadCoeffs, ChannelState, Sample};

/// Structural realization selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformType {
    /// Four delay registers, input and output history.
    DirectFormI,
    /// Two delay registers, minimal state, most quantization-sensitive.
    DirectFormII,
    /// Four delay registers with transposed update order.
    DirectFormITransposed,
    /// Two delay registers, best numerical behavior. The default.
    #[default]
    DirectFormIITransposed,
}

impl TransformType {
    /// All four realizations, in declaration order.
    pub const ALL: [TransformType; 4] = [
        TransformType::DirectFormI,
        TransformType::DirectFormII,
        TransformType::DirectFormITransposed,
        TransformType::DirectFormIITransposed,
    ];
}

/// Direct form I: full input/output history.
#[inline]
pub fn direct_form_i<T: Sample>(c: &BiquadCoeffs<T>, s: &mut ChannelState<T>, x: T) -> T {
    let y = c.b0 * x + c.b1 * s.x1 + c.b2 * s.x2 + c.a1 * s.y1 + c.a2 * s.y2;

    s.x2 = s.x1;
    s.y2 = s.y1;
    s.x1 = x;
    s.y1 = y;

    y
}

/// Direct form II: single internal node `w`, two delay registers.
#[inline]
pub fn direct_form_ii<T: Sample>(c: &BiquadCoeffs<T>, s: &mut ChannelState<T>, x: T) -> T {
    let w = x + c.a1 * s.w1 + c.a2 * s.w2;
    let y = c.b0 * w + c.b1 * s.w1 + c.b2 * s.w2;

    s.w2 = s.w1;
    s.w1 = w;

    y
}

/// Direct form I, transposed: four registers with a distinct update order.
#[inline]
pub fn direct_form_i_transposed<T: Sample>(
    c: &BiquadCoeffs<T>,
    s: &mut ChannelState<T>,
    x: T,
) -> T {
    let w = x + s.w2;
    let y = c.b0 * w + s.x2;

    s.x2 = c.b1 * w + s.x1;
    s.w2 = c.a1 * w + s.w1;
    s.x1 = c.b2 * w;
    s.w1 = c.a2 * w;

    y
}

/// Direct form II, transposed: two registers, the recommended form.
#[inline]
pub fn direct_form_ii_transposed<T: Sample>(
    c: &BiquadCoeffs<T>,
    s: &mut ChannelState<T>,
    x: T,
) -> T {
    let y = c.b0 * x + s.x2;

    s.x2 = c.b1 * x + s.x1 + c.a1 * y;
    s.x1 = c.b2 * x + c.a2 * y;

    y
}

/// Evaluate one sample under the selected structural form.
#[inline]
pub fn process_sample<T: Sample>(
    form: TransformType,
    c: &BiquadCoeffs<T>,
    s: &mut ChannelState<T>,
    x: T,
) -> T {
    match form {
        TransformType::DirectFormI => direct_form_i(c, s, x),
        TransformType::DirectFormII => direct_form_ii(c, s, x),
        TransformType::DirectFormITransposed => direct_form_i_transposed(c, s, x),
        TransformType::DirectFormIITransposed => direct_form_ii_transposed(c, s, x),
    }
}

/// Process `src` into `dst` through one channel's state.
///
/// Output length is `min(dst.len(), src.len())`.
pub fn process_buf<T: Sample>(
    form: TransformType,
    c: &BiquadCoeffs<T>,
    s: &mut ChannelState<T>,
    dst: &mut [T],
    src: &[T],
) {
    for (out, &inp) in dst.iter_mut().zip(src.iter()) {
        *out = process_sample(form, c, s, inp);
    }
}

/// Process a buffer in place through one channel's state.
pub fn process_buf_inplace<T: Sample>(
    form: TransformType,
    c: &BiquadCoeffs<T>,
    s: &mut ChannelState<T>,
    buf: &mut [T],
) {
    for sample in buf.iter_mut() {
        *sample = process_sample(form, c, s, *sample);
    }
}
