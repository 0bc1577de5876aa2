// SPDX-License-Identifier: MIT OR Apache-2.0

use rand::RngCore;

use crate::arith::{mod_pow, mul_mod};
use crate::ciphertext::{CipherBlock, MESSAGE_MASK};
use crate::key::PublicKey;

impl PublicKey {
    /// Encrypt one 32-bit block.
    ///
    /// Bit 31 of `m` is cleared first, guaranteeing `m < p`, then a fresh
    /// ephemeral exponent `k` is drawn in `[0, p)`, one 64-bit draw per
    /// call.
    pub fn encrypt_block<R: RngCore>(&self, m: u32, rng: &mut R) -> CipherBlock {
        let m = u64::from(m & MESSAGE_MASK);
        let k = rng.next_u64() % self.p;
        let c1 = mod_pow(self.g, k, self.p);
        let c2 = mul_mod(mod_pow(self.e, k, self.p), m, self.p);
        CipherBlock::new(c1, c2)
    }

    /// Lazily encrypt a stream of plaintext bytes.
    ///
    /// The returned iterator pulls 4 bytes per block as it is advanced, so
    /// arbitrarily long input never has to be buffered whole. It is finite
    /// and not restartable: once the byte source is exhausted the iterator
    /// stays exhausted.
    pub fn encryptor<'a, R, I>(&'a self, rng: &'a mut R, bytes: I) -> Encryptor<'a, R, I::IntoIter>
    where
        R: RngCore,
        I: IntoIterator<Item = u8>,
    {
        Encryptor {
            key: self,
            rng,
            bytes: bytes.into_iter(),
            done: false,
        }
    }

    /// Encrypt a byte slice in one call.
    ///
    /// The last block is right-padded with zero bytes when the input length
    /// is not a multiple of 4. That padding survives decryption verbatim;
    /// callers who care about exact lengths must track them out of band.
    pub fn encrypt_bytes<R: RngCore>(&self, data: &[u8], rng: &mut R) -> Vec<CipherBlock> {
        self.encryptor(rng, data.iter().copied()).collect()
    }
}

/// Streaming block encryptor created by [`PublicKey::encryptor`].
///
/// Yields one [`CipherBlock`] per 4-byte big-endian group of the
/// underlying byte stream, zero-padding the final partial group.
pub struct Encryptor<'a, R: RngCore, I: Iterator<Item = u8>> {
    key: &'a PublicKey,
    rng: &'a mut R,
    bytes: I,
    done: bool,
}

impl<R: RngCore, I: Iterator<Item = u8>> Iterator for Encryptor<'_, R, I> {
    type Item = CipherBlock;

    fn next(&mut self) -> Option<CipherBlock> {
        if self.done {
            return None;
        }

        let mut group = [0u8; 4];
        let mut filled = 0;
        while filled < 4 {
            match self.bytes.next() {
                Some(byte) => {
                    group[filled] = byte;
                    filled += 1;
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if filled == 0 {
            return None;
        }

        let m = u32::from_be_bytes(group);
        Some(self.key.encrypt_block(m, self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyPair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_pair() -> KeyPair {
        KeyPair::generate(42).unwrap()
    }

    #[test]
    fn block_count_rounds_up_to_four_byte_groups() {
        let pair = test_pair();
        let mut rng = StdRng::seed_from_u64(1);
        for (len, blocks) in [(0, 0), (1, 1), (3, 1), (4, 1), (5, 2), (8, 2), (9, 3)] {
            let data = vec![0xAB; len];
            let out = pair.public_key().encrypt_bytes(&data, &mut rng);
            assert_eq!(out.len(), blocks, "len {len}");
        }
    }

    #[test]
    fn round_trip_with_padding() {
        let pair = test_pair();
        let mut rng = StdRng::seed_from_u64(2);

        let blocks = pair.public_key().encrypt_bytes(b"Hi!", &mut rng);
        assert_eq!(blocks.len(), 1);

        let plain = pair.private_key().decrypt_blocks(&blocks).unwrap();
        assert_eq!(plain, b"Hi!\x00");
    }

    #[test]
    fn round_trip_multiple_blocks() {
        let pair = test_pair();
        let mut rng = StdRng::seed_from_u64(3);
        let message = b"The quick brown fox jumps over the lazy dog";

        let blocks = pair.public_key().encrypt_bytes(message, &mut rng);
        let plain = pair.private_key().decrypt_blocks(&blocks).unwrap();

        assert_eq!(&plain[..message.len()], message);
        // right-padded with zeros up to the next multiple of four
        assert!(plain[message.len()..].iter().all(|&b| b == 0));
        assert_eq!(plain.len(), message.len().div_ceil(4) * 4);
    }

    #[test]
    fn ciphertexts_differ_between_encryptions() {
        let pair = test_pair();
        let mut rng = StdRng::seed_from_u64(4);

        // fresh ephemeral k per block: identical plaintext blocks encrypt
        // differently within one stream and across streams
        let a = pair.public_key().encrypt_bytes(b"AAAAAAAA", &mut rng);
        let b = pair.public_key().encrypt_bytes(b"AAAAAAAA", &mut rng);
        assert_ne!(a[0], a[1]);
        assert_ne!(a, b);
    }

    #[test]
    fn encryptor_is_lazy_and_terminal() {
        let pair = test_pair();
        let mut rng = StdRng::seed_from_u64(5);
        let mut encryptor = pair.public_key().encryptor(&mut rng, b"12345678".iter().copied());

        assert!(encryptor.next().is_some());
        assert!(encryptor.next().is_some());
        assert!(encryptor.next().is_none());
        // exhausted stays exhausted
        assert!(encryptor.next().is_none());
    }

    #[test]
    fn top_bit_of_block_is_discarded() {
        let pair = test_pair();
        let mut rng = StdRng::seed_from_u64(6);

        // 0xFF... has bit 31 set; it must decrypt as if that bit were 0
        let blocks = pair.public_key().encrypt_bytes(&[0xFF, 0, 0, 1], &mut rng);
        let plain = pair.private_key().decrypt_blocks(&blocks).unwrap();
        assert_eq!(plain, [0x7F, 0, 0, 1]);
    }

    #[test]
    fn pinned_draws_give_known_ciphertext() {
        struct FixedDraws(u64);

        impl RngCore for FixedDraws {
            fn next_u32(&mut self) -> u32 {
                self.0 as u32
            }

            fn next_u64(&mut self) -> u64 {
                self.0
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                let bytes = self.0.to_le_bytes();
                for chunk in dest.chunks_mut(8) {
                    chunk.copy_from_slice(&bytes[..chunk.len()]);
                }
            }

            fn try_fill_bytes(
                &mut self,
                dest: &mut [u8],
            ) -> std::result::Result<(), rand::Error> {
                self.fill_bytes(dest);
                Ok(())
            }
        }

        let key = PublicKey::new(2_147_485_547, 2, 2_147_485_545).unwrap();
        let mut rng = FixedDraws(1_073_742_773);

        let blocks = key.encrypt_bytes(b"Hi!", &mut rng);
        assert_eq!(blocks, vec![CipherBlock::new(2_147_485_546, 1_214_849_280)]);
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        let pair = test_pair();
        let mut rng = StdRng::seed_from_u64(7);
        let blocks = pair.public_key().encrypt_bytes(b"", &mut rng);
        assert!(blocks.is_empty());
        assert!(pair.private_key().decrypt_blocks(&blocks).unwrap().is_empty());
    }
}
