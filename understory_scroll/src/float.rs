// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `exp` for `std` and `libm` builds; kurbo's `FloatFuncs` has no `exp`.

#[cfg(feature = "std")]
pub(crate) fn exp(x: f64) -> f64 {
    x.exp()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
pub(crate) fn exp(x: f64) -> f64 {
    libm::exp(x)
}
