// SPDX-License-Identifier: LGPL-3.0-or-later

//! Core data types for the biquad kernels.
//!
//! The kernel is generic over the sample representation via the [`Sample`]
//! trait, instantiated for `f32` and `f64`. Coefficients are stored in the
//! normalized, pre-negated convention: `a0 = 1/a_0`, `a1 = -a_1/a_0`,
//! `a2 = -a_2/a_0`, `bN = b_N/a_0`, so every recurrence form uses addition
//! and never divides at sample-processing time.

use std::fmt::Debug;
use std::sync::atomic::Ordering;

use atomic_float::{AtomicF32, AtomicF64};
use num_traits::Float;

/// Floating-point sample type processed by the filter kernels.
///
/// Adds to [`Float`] the two things the kernels need beyond arithmetic:
/// an associated lock-free atomic cell (for coefficients shared with a
/// display thread) and infallible conversion from `f64` literals.
pub trait Sample: Float + Debug + Default + Send + Sync + 'static {
    /// Lock-free cell holding one value of this sample type.
    type Atomic: Debug + Send + Sync;

    /// Convert an `f64` constant or parameter to this sample type.
    fn from_f64(v: f64) -> Self;

    /// Create an atomic cell holding `v`.
    fn atomic(v: Self) -> Self::Atomic;

    /// Relaxed load from an atomic cell.
    fn atomic_load(cell: &Self::Atomic) -> Self;

    /// Relaxed store into an atomic cell.
    fn atomic_store(cell: &Self::Atomic, v: Self);
}

impl Sample for f32 {
    type Atomic = AtomicF32;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn atomic(v: Self) -> Self::Atomic {
        AtomicF32::new(v)
    }

    #[inline]
    fn atomic_load(cell: &Self::Atomic) -> Self {
        cell.load(Ordering::Relaxed)
    }

    #[inline]
    fn atomic_store(cell: &Self::Atomic, v: Self) {
        cell.store(v, Ordering::Relaxed);
    }
}

impl Sample for f64 {
    type Atomic = AtomicF64;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn atomic(v: Self) -> Self::Atomic {
        AtomicF64::new(v)
    }

    #[inline]
    fn atomic_load(cell: &Self::Atomic) -> Self {
        cell.load(Ordering::Relaxed)
    }

    #[inline]
    fn atomic_store(cell: &Self::Atomic, v: Self) {
        cell.store(v, Ordering::Relaxed);
    }
}

/// Normalized coefficients for a single biquad section.
///
/// `a0` holds the reciprocal of the raw `a_0` (useful to display readers
/// reconstructing the unnormalized set); the recurrence itself consumes only
/// `b0, b1, b2, a1, a2`. `a1`/`a2` are pre-negated, so the difference
/// equation is
///
/// ```text
///   y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] + a1*y[n-1] + a2*y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs<T> {
    pub b0: T,
    pub b1: T,
    pub b2: T,
    pub a0: T,
    pub a1: T,
    pub a2: T,
}

impl<T: Sample> BiquadCoeffs<T> {
    /// The identity (pass-through) coefficient set.
    pub fn identity() -> Self {
        Self {
            b0: T::one(),
            b1: T::zero(),
            b2: T::zero(),
            a0: T::one(),
            a1: T::zero(),
            a2: T::zero(),
        }
    }
}

impl<T: Sample> Default for BiquadCoeffs<T> {
    fn default() -> Self {
        Self::identity()
    }
}

/// Six independently-atomic coefficient cells.
///
/// The processing thread stores a freshly computed [`BiquadCoeffs`] set;
/// a display thread may load individual cells (or a full set) at any time.
/// There is no cross-cell snapshot: a concurrent reader can observe a torn
/// mix of old and new coefficients mid-update. That is accepted — the cells
/// feed visualization only, never the signal path of another instance.
#[derive(Debug)]
pub struct AtomicBiquadCoeffs<T: Sample> {
    b0: T::Atomic,
    b1: T::Atomic,
    b2: T::Atomic,
    a0: T::Atomic,
    a1: T::Atomic,
    a2: T::Atomic,
}

impl<T: Sample> AtomicBiquadCoeffs<T> {
    /// Create cells holding the identity coefficient set.
    pub fn new() -> Self {
        Self::from(BiquadCoeffs::identity())
    }

    /// Store a full coefficient set, one relaxed store per cell.
    pub fn store(&self, c: &BiquadCoeffs<T>) {
        T::atomic_store(&self.b0, c.b0);
        T::atomic_store(&self.b1, c.b1);
        T::atomic_store(&self.b2, c.b2);
        T::atomic_store(&self.a0, c.a0);
        T::atomic_store(&self.a1, c.a1);
        T::atomic_store(&self.a2, c.a2);
    }

    /// Load a full coefficient set, one relaxed load per cell.
    pub fn load(&self) -> BiquadCoeffs<T> {
        BiquadCoeffs {
            b0: T::atomic_load(&self.b0),
            b1: T::atomic_load(&self.b1),
            b2: T::atomic_load(&self.b2),
            a0: T::atomic_load(&self.a0),
            a1: T::atomic_load(&self.a1),
            a2: T::atomic_load(&self.a2),
        }
    }

    pub fn b0(&self) -> T {
        T::atomic_load(&self.b0)
    }

    pub fn b1(&self) -> T {
        T::atomic_load(&self.b1)
    }

    pub fn b2(&self) -> T {
        T::atomic_load(&self.b2)
    }

    pub fn a0(&self) -> T {
        T::atomic_load(&self.a0)
    }

    pub fn a1(&self) -> T {
        T::atomic_load(&self.a1)
    }

    pub fn a2(&self) -> T {
        T::atomic_load(&self.a2)
    }
}

impl<T: Sample> From<BiquadCoeffs<T>> for AtomicBiquadCoeffs<T> {
    fn from(c: BiquadCoeffs<T>) -> Self {
        Self {
            b0: T::atomic(c.b0),
            b1: T::atomic(c.b1),
            b2: T::atomic(c.b2),
            a0: T::atomic(c.a0),
            a1: T::atomic(c.a1),
            a2: T::atomic(c.a2),
        }
    }
}

impl<T: Sample> Default for AtomicBiquadCoeffs<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Delay registers for one audio channel.
///
/// `w1`/`w2` carry the internal node of direct form II and the transposed
/// form I; `x1`/`x2` the input history; `y1`/`y2` the output history. Each
/// structural form touches only the registers it needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelState<T> {
    pub w1: T,
    pub w2: T,
    pub x1: T,
    pub x2: T,
    pub y1: T,
    pub y2: T,
}

impl<T: Sample> ChannelState<T> {
    /// Fill every delay register with `value`.
    pub fn fill(&mut self, value: T) {
        self.w1 = value;
        self.w2 = value;
        self.x1 = value;
        self.x2 = value;
        self.y1 = value;
        self.y2 = value;
    }

    /// Clear every delay register to zero.
    pub fn clear(&mut self) {
        self.fill(T::zero());
    }

    /// Replace near-zero register values with exact zero.
    ///
    /// Denormal values lingering in the feedback path after the input has
    /// decayed to silence incur large per-operation cost on some CPUs; call
    /// this once per processing block, not per sample.
    pub fn snap_to_zero(&mut self) {
        self.w1 = crate::float::snap(self.w1);
        self.w2 = crate::float::snap(self.w2);
        self.x1 = crate::float::snap(self.x1);
        self.x2 = crate::float::snap(self.x2);
        self.y1 = crate::float::snap(self.y1);
        self.y2 = crate::float::snap(self.y2);
    }
}
