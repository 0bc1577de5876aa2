// SPDX-License-Identifier: MIT OR Apache-2.0

/// Errors that can occur during key generation, parsing, or decryption.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("seed {0} is outside the accepted range 0..=10000")]
    InvalidSeed(u32),

    #[error("safe prime search gave up after {attempts} candidates")]
    PrimeSearchExhausted { attempts: u32 },

    #[error("key text must be three whitespace-separated unsigned integers, got {0:?}")]
    KeyParse(String),

    #[error("ciphertext text must be whitespace-separated unsigned integer pairs: {0}")]
    CiphertextParse(String),

    #[error("arithmetic invariant violated: {0}")]
    ArithmeticInvariant(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
