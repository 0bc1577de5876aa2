// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::io;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::arith::mod_pow;
use crate::error::{Error, Result};
use crate::prime::find_safe_prime;

/// Largest seed accepted by [`KeyPair::generate`].
pub const MAX_SEED: u32 = 10_000;

/// The group generator, fixed at 2.
///
/// The safe prime search only accepts moduli `p = 2q + 1` with
/// `q ≡ 5 (mod 12)`, which guarantees that 2 generates a subgroup of the
/// required order. No per-key generator check is needed.
pub(crate) const GENERATOR: u64 = 2;

/// Public half of a key pair: modulus `p`, generator `g` and the public
/// component `e = g^d mod p`.
///
/// Serialized as one line of three whitespace-separated decimal integers
/// `p g e` via [`Display`](fmt::Display) and [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) p: u64,
    pub(crate) g: u64,
    pub(crate) e: u64,
}

impl PublicKey {
    /// Construct a public key from its components.
    ///
    /// The generator must lie in `[1, p)` and the public component in
    /// `[0, p)`; the modulus must be odd and at least 3.
    pub fn new(p: u64, g: u64, e: u64) -> Result<Self> {
        if p < 3 || p % 2 == 0 {
            return Err(Error::ArithmeticInvariant("modulus must be odd and >= 3"));
        }
        if g == 0 || g >= p {
            return Err(Error::ArithmeticInvariant("generator outside [1, p)"));
        }
        if e >= p {
            return Err(Error::ArithmeticInvariant("public component outside [0, p)"));
        }
        Ok(Self { p, g, e })
    }

    #[inline]
    pub fn p(&self) -> u64 {
        self.p
    }

    #[inline]
    pub fn g(&self) -> u64 {
        self.g
    }

    #[inline]
    pub fn e(&self) -> u64 {
        self.e
    }

    /// Read a key line from a text source.
    pub fn read_from<R: io::Read>(reader: &mut R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        text.parse()
    }

    /// Write the key line to a text sink.
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{self}")?;
        Ok(())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.p, self.g, self.e)
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (p, g, e) = parse_triple(s)?;
        Self::new(p, g, e)
    }
}

/// Private half of a key pair: modulus `p`, generator `g` and the private
/// exponent `d` with `1 <= d < p`.
///
/// The exponent is wiped from memory on drop. Note that the
/// [`Display`](fmt::Display) form `p g d` is the key file format and
/// necessarily exposes `d`; `Debug` redacts it.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    pub(crate) p: u64,
    #[zeroize(skip)]
    pub(crate) g: u64,
    pub(crate) d: u64,
}

impl PrivateKey {
    /// Construct a private key from its components.
    ///
    /// The exponent must lie in `[1, p)`. Decryption computes `p - 1 - d`,
    /// so `d >= p` would underflow; it is rejected here and re-checked at
    /// decryption time.
    pub fn new(p: u64, g: u64, d: u64) -> Result<Self> {
        if p < 3 || p % 2 == 0 {
            return Err(Error::ArithmeticInvariant("modulus must be odd and >= 3"));
        }
        if g == 0 || g >= p {
            return Err(Error::ArithmeticInvariant("generator outside [1, p)"));
        }
        if d == 0 || d >= p {
            return Err(Error::ArithmeticInvariant("private exponent outside [1, p)"));
        }
        Ok(Self { p, g, d })
    }

    #[inline]
    pub fn p(&self) -> u64 {
        self.p
    }

    #[inline]
    pub fn g(&self) -> u64 {
        self.g
    }

    /// Read a key line from a text source.
    pub fn read_from<R: io::Read>(reader: &mut R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        text.parse()
    }

    /// Write the key line to a text sink.
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{self}")?;
        Ok(())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("p", &self.p)
            .field("g", &self.g)
            .field("d", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.p, self.g, self.d)
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (p, g, d) = parse_triple(s)?;
        Self::new(p, g, d)
    }
}

fn parse_triple(s: &str) -> Result<(u64, u64, u64)> {
    let parse_error = || Error::KeyParse(s.trim().to_owned());
    let mut parts = s.split_whitespace();
    let mut next = || -> Result<u64> {
        parts
            .next()
            .ok_or_else(parse_error)?
            .parse()
            .map_err(|_| parse_error())
    };
    let triple = (next()?, next()?, next()?);
    if parts.next().is_some() {
        return Err(parse_error());
    }
    Ok(triple)
}

/// A freshly generated public/private pair sharing the same `p` and `g`.
///
/// Immutable once produced; private material is zeroized on drop. The pair
/// is not persisted by the crate, writing the two key lines somewhere is
/// the caller's business.
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    #[zeroize(skip)]
    public: PublicKey,
    secret: PrivateKey,
}

impl KeyPair {
    /// Generate a key pair from a seed in `[0, 10000]`, using the standard
    /// deterministic generator.
    ///
    /// The entire output is a pure function of the seed: the same seed
    /// always yields the same `(p, g, e, d)`.
    pub fn generate(seed: u32) -> Result<Self> {
        Self::generate_with::<StdRng>(seed)
    }

    /// Generate a key pair from a seed, with a caller-chosen seedable
    /// random source.
    ///
    /// Fails with [`Error::InvalidSeed`] before any draw is made if the
    /// seed is out of range.
    pub fn generate_with<R>(seed: u32) -> Result<Self>
    where
        R: RngCore + SeedableRng,
    {
        if seed > MAX_SEED {
            return Err(Error::InvalidSeed(seed));
        }
        let mut rng = R::seed_from_u64(u64::from(seed));
        Self::generate_from_rng(&mut rng)
    }

    /// Generate a key pair drawing from an already-initialized random
    /// source owned by the caller.
    ///
    /// Draw order: the safe prime search consumes one 32-bit draw per
    /// candidate plus one 64-bit draw per Miller-Rabin trial, then one
    /// final 64-bit draw produces the private exponent
    /// `d = (raw mod (p-1)) + 1`. Reducing modulo `p - 1` rather than `p`
    /// keeps `d` strictly below `p`, which decryption relies on.
    pub fn generate_from_rng<R: RngCore>(rng: &mut R) -> Result<Self> {
        let sp = find_safe_prime(rng)?;
        let d = rng.next_u64() % (sp.p - 1) + 1;
        let e = mod_pow(GENERATOR, d, sp.p);

        let public = PublicKey::new(sp.p, GENERATOR, e)?;
        let secret = PrivateKey::new(sp.p, GENERATOR, d)?;
        Ok(Self { public, secret })
    }

    #[inline]
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    #[inline]
    pub fn private_key(&self) -> &PrivateKey {
        &self.secret
    }
}
