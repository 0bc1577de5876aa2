// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::arith::{mod_pow, mul_mod};
use crate::ciphertext::{CipherBlock, MESSAGE_MASK};
use crate::error::{Error, Result};
use crate::key::PrivateKey;

impl PrivateKey {
    /// Decrypt one block back into its 4 plaintext bytes,
    /// most-significant-first.
    ///
    /// Computes `m = c1^(p-1-d) * c2 mod p`, then clears bit 31 to mirror
    /// the mask applied during encryption. Both ciphertext components must
    /// lie in `[0, p)` and the exponent must satisfy `d < p`, otherwise
    /// `p - 1 - d` would underflow; violations surface as
    /// [`Error::ArithmeticInvariant`] rather than wrapping silently.
    pub fn decrypt_block(&self, block: &CipherBlock) -> Result<[u8; 4]> {
        if self.d >= self.p {
            return Err(Error::ArithmeticInvariant(
                "private exponent must be smaller than the modulus",
            ));
        }
        if block.c1 >= self.p || block.c2 >= self.p {
            return Err(Error::ArithmeticInvariant(
                "ciphertext component outside [0, p)",
            ));
        }

        let shared = mod_pow(block.c1, self.p - 1 - self.d, self.p);
        let m = mul_mod(shared, block.c2, self.p) & u64::from(MESSAGE_MASK);
        Ok((m as u32).to_be_bytes())
    }

    /// Decrypt a sequence of blocks into the concatenated plaintext bytes.
    ///
    /// Every block contributes exactly 4 bytes. Trailing zero bytes that
    /// the encryptor added as padding are passed through verbatim; the
    /// format carries no length information to strip them with.
    pub fn decrypt_blocks(&self, blocks: &[CipherBlock]) -> Result<Vec<u8>> {
        let mut plain = Vec::with_capacity(blocks.len() * 4);
        for block in blocks {
            plain.extend_from_slice(&self.decrypt_block(block)?);
        }
        Ok(plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyPair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_ciphertext_outside_modulus_range() {
        let pair = KeyPair::generate(42).unwrap();
        let p = pair.public_key().p();

        for bad in [CipherBlock::new(p, 1), CipherBlock::new(1, p), CipherBlock::new(u64::MAX, 0)] {
            assert!(matches!(
                pair.private_key().decrypt_block(&bad),
                Err(Error::ArithmeticInvariant(_))
            ));
        }
    }

    #[test]
    fn failing_block_aborts_the_stream() {
        let pair = KeyPair::generate(42).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let mut blocks = pair.public_key().encrypt_bytes(b"abcd", &mut rng);
        blocks.push(CipherBlock::new(u64::MAX, u64::MAX));
        assert!(pair.private_key().decrypt_blocks(&blocks).is_err());
    }

    #[test]
    fn decrypts_each_block_to_four_bytes() {
        let pair = KeyPair::generate(9).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let blocks = pair.public_key().encrypt_bytes(&[1, 2, 3, 4, 5], &mut rng);
        let plain = pair.private_key().decrypt_blocks(&blocks).unwrap();
        assert_eq!(plain, [1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn zero_block_round_trips() {
        let pair = KeyPair::generate(11).unwrap();
        let mut rng = StdRng::seed_from_u64(10);

        let blocks = pair.public_key().encrypt_bytes(&[0, 0, 0, 0], &mut rng);
        let plain = pair.private_key().decrypt_blocks(&blocks).unwrap();
        assert_eq!(plain, [0, 0, 0, 0]);
    }

    #[test]
    fn decrypt_with_mismatched_key_garbles_but_does_not_error() {
        let alice = KeyPair::generate(1).unwrap();
        let mallory = KeyPair::generate(2).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let blocks = alice.public_key().encrypt_bytes(b"secret!!", &mut rng);
        // a foreign key with a larger modulus may reject or garble, but a
        // same-sized one must decrypt to something different, not panic
        if let Ok(plain) = mallory.private_key().decrypt_blocks(&blocks) {
            assert_ne!(&plain[..8], b"secret!!");
        }
    }
}
