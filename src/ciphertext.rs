// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::io;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Mask clearing bit 31 of a message block.
///
/// Forcing `m < 2^31` is a correctness requirement, not an optimization:
/// the modulus always exceeds 2^31, so a masked block is guaranteed to be
/// a valid group element. The discarded bit is lost; encryption is
/// deliberately lossy in that one bit per block.
pub(crate) const MESSAGE_MASK: u32 = 0x7FFF_FFFF;

/// One encrypted 4-byte block: the pair `(c1, c2)` with
/// `c1 = g^k mod p` and `c2 = (e^k mod p) * m mod p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherBlock {
    pub(crate) c1: u64,
    pub(crate) c2: u64,
}

impl CipherBlock {
    pub fn new(c1: u64, c2: u64) -> Self {
        Self { c1, c2 }
    }

    #[inline]
    pub fn c1(&self) -> u64 {
        self.c1
    }

    #[inline]
    pub fn c2(&self) -> u64 {
        self.c2
    }
}

impl fmt::Display for CipherBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.c1, self.c2)
    }
}

impl FromStr for CipherBlock {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let blocks = from_text(s)?;
        match blocks.as_slice() {
            [block] => Ok(*block),
            _ => Err(Error::CiphertextParse(
                "expected exactly one c1 c2 pair".into(),
            )),
        }
    }
}

/// Render blocks as the flat `c1 c2 c1 c2 ...` text form.
///
/// Block order is significant: pair order equals plaintext block order.
pub fn to_text(blocks: &[CipherBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&block.to_string());
    }
    out
}

/// Parse the flat text form back into blocks.
///
/// Accepts any whitespace between integers. Fails if a token is not an
/// unsigned decimal integer or if a trailing `c1` is left without its `c2`.
pub fn from_text(s: &str) -> Result<Vec<CipherBlock>> {
    let mut values = Vec::new();
    for token in s.split_whitespace() {
        let value: u64 = token
            .parse()
            .map_err(|_| Error::CiphertextParse(format!("bad integer {token:?}")))?;
        values.push(value);
    }
    if values.len() % 2 != 0 {
        return Err(Error::CiphertextParse(
            "odd number of integers, every c1 needs a c2".into(),
        ));
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| CipherBlock::new(pair[0], pair[1]))
        .collect())
}

/// Write the text form to a sink.
pub fn write_to<W: io::Write>(blocks: &[CipherBlock], writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", to_text(blocks))?;
    Ok(())
}

/// Read the text form from a source until EOF.
pub fn read_from<R: io::Read>(reader: &mut R) -> Result<Vec<CipherBlock>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    from_text(&text)
}
