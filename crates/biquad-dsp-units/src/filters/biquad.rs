// SPDX-License-Identifier: LGPL-3.0-or-later

//! The high-level biquad processor.
//!
//! [`Biquad`] owns the parameter set, the derived coefficients, and the
//! per-channel delay state. Setters clamp their input and recompute
//! coefficients immediately, so the recurrence always runs against the most
//! recent configuration. The per-sample path performs no allocation, no
//! locking, and no division.

use std::sync::Arc;

use biquad_dsp_lib::forms::{self, TransformType};
use biquad_dsp_lib::types::{AtomicBiquadCoeffs, ChannelState, Sample};

use crate::consts::{
    FREQ_DFL, FREQ_MAX_DIVISOR, FREQ_MIN_DIVISOR, GAIN_DFL, RESONANCE_DFL, SAMPLE_RATE_DFL,
    SPEC_FREQ_MAX, SPEC_FREQ_MIN,
};
use crate::filters::coeffs::{calc_coeffs, FilterType, TrigCache};

/// Multi-channel biquad filter with musical parameter control.
///
/// Call [`prepare`](Biquad::prepare) before processing. Setters may be
/// chained; each one takes effect (including coefficient recomputation)
/// before it returns. Changing the filter or transform type clears the
/// delay state, so a structurally different topology never runs on stale
/// feedback energy.
///
/// Coefficients live in lock-free atomic cells that a display thread may
/// read concurrently via [`coefficient_cells`](Biquad::coefficient_cells);
/// see [`AtomicBiquadCoeffs`] for the (lack of) cross-cell guarantees.
///
/// # Examples
///
/// ```
/// use biquad_dsp_units::filters::biquad::Biquad;
/// use biquad_dsp_units::filters::coeffs::FilterType;
///
/// let mut filt = Biquad::<f32>::new();
/// filt.prepare(48000.0, 2);
/// filt.set_filter_type(FilterType::Peak)
///     .set_frequency(2500.0)
///     .set_resonance(0.7)
///     .set_gain(6.0);
///
/// let left = filt.process_sample(0, 0.25);
/// let right = filt.process_sample(1, -0.25);
/// # let _ = (left, right);
/// ```
#[derive(Debug)]
pub struct Biquad<T: Sample> {
    filter_type: FilterType,
    transform: TransformType,
    sample_rate: f64,
    min_freq: T,
    max_freq: T,
    frequency: T,
    resonance: T,
    gain_db: T,
    coeffs: Arc<AtomicBiquadCoeffs<T>>,
    state: Vec<ChannelState<T>>,
}

impl<T: Sample> Biquad<T> {
    /// Create a filter with safe defaults: 1000 Hz, resonance 0.5, 0 dB,
    /// two-pole low-pass, direct form II transposed, 48 kHz.
    ///
    /// The instance owns no channel state until [`prepare`](Biquad::prepare)
    /// is called.
    pub fn new() -> Self {
        let mut filt = Self {
            filter_type: FilterType::default(),
            transform: TransformType::default(),
            sample_rate: SAMPLE_RATE_DFL,
            min_freq: T::from_f64(SAMPLE_RATE_DFL / FREQ_MIN_DIVISOR),
            max_freq: T::from_f64(SAMPLE_RATE_DFL / FREQ_MAX_DIVISOR),
            frequency: T::from_f64(FREQ_DFL),
            resonance: T::from_f64(RESONANCE_DFL),
            gain_db: T::from_f64(GAIN_DFL),
            coeffs: Arc::new(AtomicBiquadCoeffs::new()),
            state: Vec::new(),
        };
        filt.update_coefficients();
        filt
    }

    /// Size the per-channel state and derive the frequency bounds.
    ///
    /// Must be called before the first `process_sample`, and again whenever
    /// the sample rate or channel count changes. Clears all delay state and
    /// re-applies the current configuration under the new bounds.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` or `channels` is not positive — both indicate
    /// an integration bug, not a runtime condition.
    pub fn prepare(&mut self, sample_rate: f64, channels: usize) {
        assert!(sample_rate > 0.0, "sample rate must be positive");
        assert!(channels > 0, "channel count must be positive");

        self.sample_rate = sample_rate;
        self.state.clear();
        self.state.resize(channels, ChannelState::default());

        self.min_freq = T::from_f64(sample_rate / FREQ_MIN_DIVISOR);
        self.max_freq = T::from_f64(sample_rate / FREQ_MAX_DIVISOR);
        debug_assert!(
            self.min_freq <= T::from_f64(SPEC_FREQ_MAX),
            "derived minimum frequency above the audio range"
        );
        debug_assert!(
            self.max_freq >= T::from_f64(SPEC_FREQ_MIN),
            "derived maximum frequency below the audio range"
        );

        self.frequency = self.frequency.max(self.min_freq).min(self.max_freq);
        self.update_coefficients();
    }

    /// Set the center/cutoff frequency in Hz.
    ///
    /// Out-of-range values are silently clamped to the bounds derived from
    /// the sample rate.
    pub fn set_frequency(&mut self, hz: T) -> &mut Self {
        self.frequency = hz.max(self.min_freq).min(self.max_freq);
        self.update_coefficients();
        self
    }

    /// Set the resonance, silently clamped to `[0, 1]`. Higher values give
    /// a sharper response.
    pub fn set_resonance(&mut self, resonance: T) -> &mut Self {
        self.resonance = resonance.max(T::zero()).min(T::one());
        self.update_coefficients();
        self
    }

    /// Set the gain in dB. Only the peak and shelf shapes respond; for all
    /// other shapes the parameter is inert by construction.
    pub fn set_gain(&mut self, gain_db: T) -> &mut Self {
        self.gain_db = gain_db;
        self.update_coefficients();
        self
    }

    /// Set the filter shape. A change clears the delay state before the
    /// next sample, so stale feedback energy from the previous topology
    /// cannot ring into the new one.
    pub fn set_filter_type(&mut self, filter_type: FilterType) -> &mut Self {
        if self.filter_type != filter_type {
            self.filter_type = filter_type;
            self.reset();
            self.update_coefficients();
        }
        self
    }

    /// Set the structural realization. A change clears the delay state;
    /// coefficients are transform-agnostic, so none are recomputed.
    pub fn set_transform_type(&mut self, transform: TransformType) -> &mut Self {
        if self.transform != transform {
            self.transform = transform;
            self.reset();
        }
        self
    }

    /// Clear all delay registers to zero.
    pub fn reset(&mut self) {
        self.reset_to(T::zero());
    }

    /// Fill all delay registers with `initial`.
    pub fn reset_to(&mut self, initial: T) {
        for s in &mut self.state {
            s.fill(initial);
        }
    }

    /// Process one sample on one channel.
    ///
    /// `channel` must index a channel sized by `prepare`; violating this is
    /// a caller bug and fails fast.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, input: T) -> T {
        debug_assert!(
            channel < self.state.len(),
            "channel {channel} out of range ({} prepared)",
            self.state.len()
        );

        let c = self.coeffs.load();
        forms::process_sample(self.transform, &c, &mut self.state[channel], input)
    }

    /// Process `src` into `dst` on one channel, then snap that channel's
    /// delay registers (the per-block denormal flush).
    pub fn process_block(&mut self, channel: usize, dst: &mut [T], src: &[T]) {
        debug_assert!(
            channel < self.state.len(),
            "channel {channel} out of range ({} prepared)",
            self.state.len()
        );

        let c = self.coeffs.load();
        forms::process_buf(self.transform, &c, &mut self.state[channel], dst, src);
        self.state[channel].snap_to_zero();
    }

    /// In-place variant of [`process_block`](Biquad::process_block).
    pub fn process_block_inplace(&mut self, channel: usize, buf: &mut [T]) {
        debug_assert!(
            channel < self.state.len(),
            "channel {channel} out of range ({} prepared)",
            self.state.len()
        );

        let c = self.coeffs.load();
        forms::process_buf_inplace(self.transform, &c, &mut self.state[channel], buf);
        self.state[channel].snap_to_zero();
    }

    /// Snap near-zero delay registers to exact zero on every channel.
    ///
    /// Call once per processing block when driving the filter through
    /// [`process_sample`](Biquad::process_sample) directly.
    pub fn snap_to_zero(&mut self) {
        for s in &mut self.state {
            s.snap_to_zero();
        }
    }

    /// Evaluate the transfer function at `freq` Hz.
    ///
    /// Returns `(magnitude, phase)`, magnitude linear, phase in radians.
    /// Uses the current coefficients.
    pub fn freq_response(&self, freq: T) -> (T, T) {
        let c = self.coeffs.load();
        let one = T::one();
        let two = T::from_f64(2.0);
        let pi = T::from_f64(std::f64::consts::PI);

        let w = two * pi * freq / T::from_f64(self.sample_rate);
        let (cos_w, sin_w) = (w.cos(), w.sin());
        let (cos_2w, sin_2w) = ((two * w).cos(), (two * w).sin());

        let num_re = c.b0 + c.b1 * cos_w + c.b2 * cos_2w;
        let num_im = -(c.b1 * sin_w) - c.b2 * sin_2w;
        // Pre-negated convention: denominator is 1 - a1*z^-1 - a2*z^-2
        let den_re = one - c.a1 * cos_w - c.a2 * cos_2w;
        let den_im = c.a1 * sin_w + c.a2 * sin_2w;

        let den_mag_sq = den_re * den_re + den_im * den_im;
        let h_re = (num_re * den_re + num_im * den_im) / den_mag_sq;
        let h_im = (num_im * den_re - num_re * den_im) / den_mag_sq;

        ((h_re * h_re + h_im * h_im).sqrt(), h_im.atan2(h_re))
    }

    /// Shareable handle to the atomic coefficient cells, for display threads.
    pub fn coefficient_cells(&self) -> Arc<AtomicBiquadCoeffs<T>> {
        Arc::clone(&self.coeffs)
    }

    /// Normalized `b0` (current value; safe to call from a display thread
    /// holding [`coefficient_cells`](Biquad::coefficient_cells)).
    pub fn b0(&self) -> T {
        self.coeffs.b0()
    }

    /// Normalized `b1`.
    pub fn b1(&self) -> T {
        self.coeffs.b1()
    }

    /// Normalized `b2`.
    pub fn b2(&self) -> T {
        self.coeffs.b2()
    }

    /// Reciprocal of the raw `a0`.
    pub fn a0(&self) -> T {
        self.coeffs.a0()
    }

    /// Normalized, pre-negated `a1`.
    pub fn a1(&self) -> T {
        self.coeffs.a1()
    }

    /// Normalized, pre-negated `a2`.
    pub fn a2(&self) -> T {
        self.coeffs.a2()
    }

    /// Current center/cutoff frequency in Hz (after clamping).
    pub fn frequency(&self) -> T {
        self.frequency
    }

    /// Current resonance (after clamping).
    pub fn resonance(&self) -> T {
        self.resonance
    }

    /// Current gain in dB.
    pub fn gain(&self) -> T {
        self.gain_db
    }

    /// Current filter shape.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Current structural realization.
    pub fn transform_type(&self) -> TransformType {
        self.transform
    }

    /// Lowest settable frequency at the prepared sample rate.
    pub fn min_frequency(&self) -> T {
        self.min_freq
    }

    /// Highest settable frequency at the prepared sample rate.
    pub fn max_frequency(&self) -> T {
        self.max_freq
    }

    /// Number of prepared channels (zero before `prepare`).
    pub fn channels(&self) -> usize {
        self.state.len()
    }

    fn update_coefficients(&mut self) {
        let w = TrigCache::new(
            self.frequency,
            T::from_f64(self.sample_rate),
            self.resonance,
            self.gain_db,
        );
        self.coeffs.store(&calc_coeffs(self.filter_type, &w));
    }
}

impl<T: Sample> Default for Biquad<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    const SR: f64 = 48000.0;

    fn prepared() -> Biquad<f64> {
        let mut filt = Biquad::new();
        filt.prepare(SR, 1);
        filt
    }

    #[test]
    fn construction_defaults() {
        let filt = Biquad::<f64>::new();
        assert_eq!(filt.frequency(), 1000.0);
        assert_eq!(filt.resonance(), 0.5);
        assert_eq!(filt.gain(), 0.0);
        assert_eq!(filt.filter_type(), FilterType::LowPass2);
        assert_eq!(filt.transform_type(), TransformType::DirectFormIITransposed);
        assert_eq!(filt.channels(), 0);
    }

    #[test]
    fn default_coefficients_match_configuration() {
        let filt = Biquad::<f64>::new();
        let omega = 1000.0 * 2.0 * std::f64::consts::PI / SR;
        let alpha = omega.sin() * 0.5;
        let a0 = 1.0 + alpha;
        assert_approx_eq!(f64, filt.a0(), 1.0 / a0, epsilon = 1e-12);
        assert_approx_eq!(
            f64,
            filt.b0(),
            (1.0 - omega.cos()) / 2.0 / a0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn setters_chain() {
        let mut filt = prepared();
        filt.set_filter_type(FilterType::Peak)
            .set_frequency(2500.0)
            .set_resonance(0.7)
            .set_gain(6.0)
            .set_transform_type(TransformType::DirectFormI);
        assert_eq!(filt.filter_type(), FilterType::Peak);
        assert_eq!(filt.transform_type(), TransformType::DirectFormI);
    }

    #[test]
    fn frequency_clamps_to_derived_bounds() {
        let mut filt = prepared();
        assert_approx_eq!(f64, filt.min_frequency(), SR / 24576.0, epsilon = 1e-12);
        assert_approx_eq!(f64, filt.max_frequency(), SR / 2.125, epsilon = 1e-12);

        filt.set_frequency(1.0e9);
        assert_eq!(filt.frequency(), filt.max_frequency());
        filt.set_frequency(-5.0);
        assert_eq!(filt.frequency(), filt.min_frequency());
    }

    #[test]
    fn resonance_clamps_to_unit_range() {
        let mut filt = prepared();
        filt.set_resonance(7.0);
        assert_eq!(filt.resonance(), 1.0);
        filt.set_resonance(-0.25);
        assert_eq!(filt.resonance(), 0.0);
    }

    #[test]
    #[should_panic(expected = "sample rate")]
    fn prepare_rejects_zero_sample_rate() {
        Biquad::<f32>::new().prepare(0.0, 2);
    }

    #[test]
    #[should_panic(expected = "channel count")]
    fn prepare_rejects_zero_channels() {
        Biquad::<f32>::new().prepare(48000.0, 0);
    }

    #[test]
    #[should_panic]
    fn process_before_prepare_fails_fast() {
        let mut filt = Biquad::<f32>::new();
        filt.process_sample(0, 1.0);
    }

    #[test]
    fn lowpass_passes_dc_through_blocks() {
        let mut filt = prepared();
        let dc = vec![1.0f64; 4096];
        let mut out = vec![0.0f64; 4096];
        filt.process_block(0, &mut out, &dc);
        assert!(
            (out[4095] - 1.0).abs() < 1e-3,
            "LPF should pass DC, got {}",
            out[4095]
        );
    }

    #[test]
    fn one_pole_lowpass_at_max_frequency_is_near_transparent() {
        let mut filt = prepared();
        let max = filt.max_frequency();
        filt.set_filter_type(FilterType::LowPass1).set_frequency(max);

        let mut response = [0.0f64; 64];
        response[0] = filt.process_sample(0, 1.0);
        for y in response.iter_mut().skip(1) {
            *y = filt.process_sample(0, 0.0);
        }

        assert!(
            response[0] > 0.7,
            "impulse should mostly pass straight through, got {}",
            response[0]
        );
        let sum: f64 = response.iter().sum();
        assert_approx_eq!(f64, sum, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn impulse_reference_lowpass2_df2t() {
        let mut filt = prepared();
        filt.set_frequency(1000.0)
            .set_resonance(0.5)
            .set_gain(0.0)
            .set_filter_type(FilterType::LowPass2)
            .set_transform_type(TransformType::DirectFormIITransposed);

        // Expected values from the closed-form coefficients and the
        // direct-form-II-transposed equations, evaluated by hand.
        let omega = 1000.0 * 2.0 * std::f64::consts::PI / SR;
        let (cos, sin) = (omega.cos(), omega.sin());
        let alpha = sin * 0.5;
        let inv_a0 = 1.0 / (1.0 + alpha);
        let b0 = (1.0 - cos) / 2.0 * inv_a0;
        let b1 = (1.0 - cos) * inv_a0;
        let b2 = b0;
        let a1 = 2.0 * cos * inv_a0;
        let a2 = -(1.0 - alpha) * inv_a0;

        let input = [1.0, 0.0, 0.0, 0.0, 0.0];
        let mut expected = [0.0f64; 5];
        let (mut x1, mut x2) = (0.0f64, 0.0f64);
        for (i, &x) in input.iter().enumerate() {
            let y = b0 * x + x2;
            x2 = b1 * x + x1 + a1 * y;
            x1 = b2 * x + a2 * y;
            expected[i] = y;
        }
        assert_approx_eq!(f64, expected[0], b0, epsilon = 1e-15);
        assert_approx_eq!(f64, expected[1], b1 + a1 * b0, epsilon = 1e-15);

        for (i, &x) in input.iter().enumerate() {
            let y = filt.process_sample(0, x);
            assert_approx_eq!(f64, y, expected[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn filter_type_switch_starts_from_cleared_state() {
        let mut filt = prepared();
        for i in 0..256 {
            filt.process_sample(0, ((i as f64) * 0.37).sin());
        }
        filt.set_filter_type(FilterType::HighPass2);
        let switched = filt.process_sample(0, 0.5);

        let mut fresh = Biquad::<f64>::new();
        fresh.prepare(SR, 1);
        fresh.set_filter_type(FilterType::HighPass2);
        let reference = fresh.process_sample(0, 0.5);

        assert_approx_eq!(f64, switched, reference, epsilon = 1e-15);
    }

    #[test]
    fn transform_switch_starts_from_cleared_state() {
        let mut filt = prepared();
        for i in 0..256 {
            filt.process_sample(0, ((i as f64) * 0.37).sin());
        }
        filt.set_transform_type(TransformType::DirectFormI);
        let switched = filt.process_sample(0, 0.5);

        let mut fresh = Biquad::<f64>::new();
        fresh.prepare(SR, 1);
        fresh.set_transform_type(TransformType::DirectFormI);
        let reference = fresh.process_sample(0, 0.5);

        assert_approx_eq!(f64, switched, reference, epsilon = 1e-15);
    }

    #[test]
    fn reset_to_seeds_delay_registers() {
        let mut filt = prepared();
        filt.reset_to(1.0);
        // DF2T: y = b0*0 + x2, and x2 was just seeded with 1.0
        let y = filt.process_sample(0, 0.0);
        assert_approx_eq!(f64, y, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn snap_to_zero_ends_decay_exactly() {
        let mut filt = Biquad::<f32>::new();
        filt.prepare(SR, 1);
        filt.process_sample(0, 1.0);
        for _ in 0..4096 {
            filt.process_sample(0, 0.0);
        }
        filt.snap_to_zero();
        for _ in 0..8 {
            assert_eq!(filt.process_sample(0, 0.0), 0.0);
        }
    }

    #[test]
    fn channels_are_independent() {
        let mut filt = Biquad::<f64>::new();
        filt.prepare(SR, 2);
        filt.process_sample(0, 1.0);

        // Channel 1 has seen no input, so its state is still zero
        let y = filt.process_sample(1, 0.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn freq_response_lowpass_shape() {
        let mut filt = prepared();
        filt.set_frequency(1000.0).set_resonance(0.25);

        let (dc, _) = filt.freq_response(1.0);
        let (mid, _) = filt.freq_response(1000.0);
        let (high, _) = filt.freq_response(20000.0);

        assert_approx_eq!(f64, dc, 1.0, epsilon = 1e-4);
        assert!(mid > 0.3 && mid < 0.95, "cutoff magnitude out of range: {mid}");
        assert!(high < 0.01, "LPF should attenuate near Nyquist, got {high}");
    }

    #[test]
    fn freq_response_allpass_unity() {
        let mut filt = prepared();
        filt.set_filter_type(FilterType::AllPass).set_frequency(3000.0);
        for &freq in &[100.0, 1000.0, 3000.0, 10000.0, 20000.0] {
            let (mag, _) = filt.freq_response(freq);
            assert_approx_eq!(f64, mag, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn prepare_reclamps_frequency_for_new_rate() {
        let mut filt = Biquad::<f64>::new();
        filt.prepare(96000.0, 1);
        filt.set_frequency(50000.0);
        assert_eq!(filt.frequency(), 96000.0 / 2.125);

        // Dropping the rate tightens the bound; prepare re-applies it
        filt.prepare(8000.0, 1);
        assert_eq!(filt.frequency(), 8000.0 / 2.125);
    }

    #[test]
    fn accessors_match_cells() {
        let mut filt = prepared();
        filt.set_filter_type(FilterType::Peak).set_gain(6.0);
        let cells = filt.coefficient_cells();
        let c = cells.load();
        assert_eq!(filt.b0(), c.b0);
        assert_eq!(filt.b1(), c.b1);
        assert_eq!(filt.b2(), c.b2);
        assert_eq!(filt.a0(), c.a0);
        assert_eq!(filt.a1(), c.a1);
        assert_eq!(filt.a2(), c.a2);
    }
}
