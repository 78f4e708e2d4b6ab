//! Validated 17-base DNA sequences.
//!
//! Every key and query the store handles is a [`Seq17`]: exactly 17 bases
//! drawn from {A, C, G, T}, validated once at construction so the store and
//! lookup paths never re-check the alphabet.

use std::fmt;
use std::str::{self, FromStr};

use bio::alphabets::dna::revcomp;

use crate::error::SequenceError;

/// Length of every sequence handled by the store.
pub const KMER_LEN: usize = 17;

/// Width of the first shard key (bases `[0, 6)`).
pub(crate) const HEAD_LEN: usize = 6;
/// Width of the second shard key (bases `[6, 12)`).
pub(crate) const MID_LEN: usize = 6;
/// Width of the leaf key (bases `[12, 17)`).
pub(crate) const TAIL_LEN: usize = 5;

/// A DNA base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Parses an uppercase base byte.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            _ => None,
        }
    }
}

/// A validated 17-base DNA sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seq17([u8; KMER_LEN]);

impl Seq17 {
    /// The sequence as raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KMER_LEN] {
        &self.0
    }

    /// The sequence as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Bytes are ACGT by construction.
        str::from_utf8(&self.0).expect("validated ASCII bases")
    }

    /// The reverse complement: base order reversed, A<->T and C<->G swapped.
    #[must_use]
    pub fn reverse_complement(&self) -> Self {
        let rc = revcomp(self.0.as_slice());
        let mut bytes = [0u8; KMER_LEN];
        bytes.copy_from_slice(&rc);
        Self(bytes)
    }

    /// Splits the sequence into the store's 6/6/5 shard keys.
    pub(crate) fn shards(&self) -> ([u8; HEAD_LEN], [u8; MID_LEN], [u8; TAIL_LEN]) {
        let mut head = [0u8; HEAD_LEN];
        let mut mid = [0u8; MID_LEN];
        let mut tail = [0u8; TAIL_LEN];
        head.copy_from_slice(&self.0[..HEAD_LEN]);
        mid.copy_from_slice(&self.0[HEAD_LEN..HEAD_LEN + MID_LEN]);
        tail.copy_from_slice(&self.0[HEAD_LEN + MID_LEN..]);
        (head, mid, tail)
    }
}

impl TryFrom<&[u8]> for Seq17 {
    type Error = SequenceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != KMER_LEN {
            return Err(SequenceError::InvalidLength { len: bytes.len() });
        }
        for (position, &base) in bytes.iter().enumerate() {
            if Base::from_u8(base).is_none() {
                return Err(SequenceError::InvalidBase { base, position });
            }
        }
        let mut seq = [0u8; KMER_LEN];
        seq.copy_from_slice(bytes);
        Ok(Self(seq))
    }
}

impl FromStr for Seq17 {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.as_bytes())
    }
}

impl fmt::Display for Seq17 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Seq17 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq17({})", self.as_str())
    }
}
