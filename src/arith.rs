// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-width modular arithmetic.
//!
//! Every other component reduces to these two primitives. Operands are
//! `u64` with intermediates widened to `u128`, so products never overflow
//! for any modulus that fits in 64 bits (the scheme itself only ever uses
//! moduli below 2³²).

/// `(a * b) mod n` without overflow.
#[inline]
pub(crate) fn mul_mod(a: u64, b: u64, n: u64) -> u64 {
    debug_assert!(n > 0);
    (u128::from(a) * u128::from(b) % u128::from(n)) as u64
}

/// `a^b mod n` by square-and-multiply.
///
/// Scans the full 64-bit width of the exponent from the most significant
/// bit down, so the result is correct for any `b` rather than only for
/// exponents that fit in 32 bits.
pub(crate) fn mod_pow(a: u64, b: u64, n: u64) -> u64 {
    debug_assert!(n > 0);
    let mut acc = 1 % n;
    for i in (0..u64::BITS).rev() {
        acc = mul_mod(acc, acc, n);
        if (b >> i) & 1 == 1 {
            acc = mul_mod(acc, a, n);
        }
    }
    acc
}
