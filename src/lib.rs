// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Toy ElGamal block cipher
//!
//! Public-key encryption over a randomly discovered 32-bit safe prime
//! `p = 2q + 1`, with the generator fixed at `g = 2` (valid by the
//! construction `q ≡ 5 (mod 12)`). Plaintext is processed in 4-byte
//! big-endian blocks; each block is encrypted under a fresh ephemeral
//! exponent into a `(c1, c2)` pair.
//!
//! ## Security
//!
//! This is an educational reimplementation of a deliberately naive
//! scheme. The parameters are far too small for real use, the arithmetic
//! is not constant time, and there is no authentication or padding
//! scheme; bit 31 of every block is even discarded by design. Do not use
//! it to protect anything.
//!
//! All randomness is drawn from a caller-owned source, so every output is
//! a deterministic function of the seed and the draw order. Two quirks of
//! the block format are caller-visible: input is right-padded with zero
//! bytes to a multiple of 4, and that padding is never stripped on
//! decryption.
//!
//! ## Example
//!
//! ```rust
//! use gamal::KeyPair;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let pair = KeyPair::generate(42)?;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let blocks = pair.public_key().encrypt_bytes(b"hello world", &mut rng);
//!
//! let plain = pair.private_key().decrypt_blocks(&blocks)?;
//! assert_eq!(&plain[..11], b"hello world");
//! # Ok::<(), gamal::Error>(())
//! ```

mod arith;
pub mod ciphertext;
mod decrypt;
mod encrypt;
mod error;
mod key;
mod prime;

pub use ciphertext::CipherBlock;
pub use encrypt::Encryptor;
pub use error::{Error, Result};
pub use key::{KeyPair, PrivateKey, PublicKey, MAX_SEED};
