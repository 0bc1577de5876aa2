// SPDX-License-Identifier: MIT OR Apache-2.0

//! Probabilistic primality testing and safe prime discovery.
//!
//! The search targets primes of the form `p = 2q + 1` where the Sophie
//! Germain prime `q` additionally satisfies `q ≡ 5 (mod 12)`. That
//! congruence, together with `p` being prime, is a sufficient condition for
//! `2` to generate the subgroup of order `2q` modulo `p`, so the cipher can
//! fix its generator globally instead of validating one per key.

use rand::RngCore;

use crate::arith::{mod_pow, mul_mod};
use crate::error::{Error, Result};

/// Independent Miller-Rabin trials per candidate.
///
/// The false-positive probability of a single trial is at most 1/4, so ten
/// trials bound the error by 4⁻¹⁰ per candidate.
const ROUNDS: u32 = 10;

/// Candidate draws before the safe prime search reports exhaustion.
///
/// A random 31-bit candidate survives the `q ≡ 5 (mod 12)` filter one time
/// in twelve and the two primality tests roughly one time in a hundred
/// after that, so the expected number of draws is on the order of a
/// thousand. A quarter million attempts makes spurious exhaustion
/// vanishingly unlikely while still terminating on a pathological source.
pub(crate) const MAX_ATTEMPTS: u32 = 250_000;

/// A prime pair `p = 2q + 1` produced by [`find_safe_prime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SafePrime {
    pub(crate) p: u64,
    pub(crate) q: u64,
}

/// Split `m` into `2^t * u` with `u` odd.
fn decompose(m: u64) -> (u32, u64) {
    debug_assert!(m > 0);
    let t = m.trailing_zeros();
    (t, m >> t)
}

/// Miller-Rabin compositeness test.
///
/// Returns `true` if `n` passed [`ROUNDS`] independent witness trials and
/// is therefore prime with overwhelming probability, `false` if any trial
/// proved `n` composite. Bases are drawn uniformly from `[1, n-1)`, one
/// 64-bit draw per trial; given a fixed draw sequence the outcome is
/// deterministic.
pub(crate) fn is_probable_prime<R: RngCore>(n: u64, rng: &mut R) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 || n == 3 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let (t, u) = decompose(n - 1);
    'trial: for _ in 0..ROUNDS {
        let a = 1 + rng.next_u64() % (n - 2);
        let mut x = mod_pow(a, u, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 0..t - 1 {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'trial;
            }
            if x == 1 {
                // a nontrivial square root of 1: proof of compositeness
                return false;
            }
        }
        return false;
    }
    true
}

/// Draw a search candidate: a 32-bit value with bit 30 forced set (so the
/// candidate has full 31-bit magnitude) and bit 31 forced clear (so
/// `p = 2q + 1` stays below 2³² and message blocks stay below `p`).
fn draw_candidate<R: RngCore>(rng: &mut R) -> u64 {
    let raw = rng.next_u32();
    u64::from((raw | 1 << 30) & !(1 << 31))
}

/// Search for a safe prime `p = 2q + 1` with `q ≡ 5 (mod 12)`.
///
/// Each attempt draws a fresh candidate `q`, rejects it unless the
/// congruence holds and the oracle certifies `q` prime, then tests
/// `p = 2q + 1`; if `p` fails, both are discarded and the search resamples
/// from scratch. Unlike the classic formulation this loop is bounded:
/// after [`MAX_ATTEMPTS`] candidates it returns
/// [`Error::PrimeSearchExhausted`] instead of spinning forever on a
/// degenerate random source.
pub(crate) fn find_safe_prime<R: RngCore>(rng: &mut R) -> Result<SafePrime> {
    for _ in 0..MAX_ATTEMPTS {
        let q = draw_candidate(rng);
        if q % 12 != 5 || !is_probable_prime(q, rng) {
            continue;
        }
        let p = 2 * q + 1;
        if is_probable_prime(p, rng) {
            return Ok(SafePrime { p, q });
        }
    }
    Err(Error::PrimeSearchExhausted {
        attempts: MAX_ATTEMPTS,
    })
}
