//! Substitution scoring for pairwise sequence alignment.
//!
//! A [`SubstMatrix`] pairs an [`Alphabet`] with a dense score table whose
//! rows and columns follow the alphabet's ordering. The gap symbol `-` is an
//! ordinary alphabet member, so the gap penalty used by global alignment is
//! simply the matrix's `score(b'-', b'-')` entry.

use physalia_core::{PhysaliaError, Result};
use physalia_seq::{Alphabet, AlphabetIndex, Residue};

/// A substitution matrix over an ordered alphabet.
#[derive(Clone)]
pub struct SubstMatrix {
    alphabet: Alphabet,
    index: AlphabetIndex,
    /// Flattened `len × len` score table, row-major in alphabet order.
    scores: Vec<i32>,
}

impl SubstMatrix {
    /// Create a matrix from an alphabet and a flattened row-major table.
    ///
    /// # Errors
    ///
    /// Returns an error if `scores` is not exactly `len(alphabet)²` long.
    pub fn new(alphabet: Alphabet, scores: Vec<i32>) -> Result<Self> {
        let n = alphabet.len();
        if scores.len() != n * n {
            return Err(PhysaliaError::InvalidInput(format!(
                "substitution table has {} entries, alphabet of {} residues needs {}",
                scores.len(),
                n,
                n * n
            )));
        }
        let index = alphabet.index();
        Ok(Self {
            alphabet,
            index,
            scores,
        })
    }

    /// Build a uniform matrix: identical non-gap residues score
    /// `match_score`, differing non-gap residues `mismatch_score`, and any
    /// pair involving the gap symbol `gap_score` (so the derived gap penalty
    /// is `gap_score`).
    pub fn uniform(alphabet: Alphabet, match_score: i32, mismatch_score: i32, gap_score: i32) -> Self {
        let n = alphabet.len();
        let mut scores = vec![0; n * n];
        for (i, &a) in alphabet.residues().iter().enumerate() {
            for (j, &b) in alphabet.residues().iter().enumerate() {
                scores[i * n + j] = if a == b'-' || b == b'-' {
                    gap_score
                } else if a == b {
                    match_score
                } else {
                    mismatch_score
                };
            }
        }
        let index = alphabet.index();
        Self {
            alphabet,
            index,
            scores,
        }
    }

    /// BLOSUM62 over [`Alphabet::blosum62`] (NCBI values; pairs involving
    /// the gap symbol score −4).
    pub fn blosum62() -> Self {
        let alphabet = Alphabet::blosum62();
        let index = alphabet.index();
        Self {
            alphabet,
            index,
            scores: BLOSUM62.to_vec(),
        }
    }

    /// Simple DNA scoring over [`Alphabet::dna`]: +1 match, −1 mismatch,
    /// −1 gap.
    pub fn dna() -> Self {
        Self::uniform(Alphabet::dna(), 1, -1, -1)
    }

    /// Simple RNA scoring over [`Alphabet::rna`]: +1 match, −1 mismatch,
    /// −1 gap.
    pub fn rna() -> Self {
        Self::uniform(Alphabet::rna(), 1, -1, -1)
    }

    /// The alphabet whose ordering indexes this matrix.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Score an ordered pair of residues.
    ///
    /// Residues outside the alphabet score as the worst entry in the matrix.
    pub fn score(&self, a: Residue, b: Residue) -> i32 {
        let n = self.alphabet.len();
        match (self.index.lookup(a), self.index.lookup(b)) {
            (Some(i), Some(j)) => self.scores[i * n + j],
            _ => self.worst_score(),
        }
    }

    fn worst_score(&self) -> i32 {
        self.scores.iter().copied().min().unwrap_or(0)
    }
}

// ===========================================================================
// NCBI BLOSUM62 data
// Row/column order matches Alphabet::blosum62():
//   A B C D E F G H I K L M N P Q R S T V W X Y Z -
// Pairs involving the gap symbol score -4.
// ===========================================================================

#[rustfmt::skip]
const BLOSUM62: [i32; 24 * 24] = [
//   A   B   C   D   E   F   G   H   I   K   L   M   N   P   Q   R   S   T   V   W   X   Y   Z   -
     4, -2,  0, -2, -1, -2,  0, -2, -1, -1, -1, -1, -2, -1, -1, -1,  1,  0,  0, -3,  0, -2, -1, -4, // A
    -2,  4, -3,  4,  1, -3, -1,  0, -3,  0, -4, -3,  3, -2,  0, -1,  0, -1, -3, -4, -1, -3,  1, -4, // B
     0, -3,  9, -3, -4, -2, -3, -3, -1, -3, -1, -1, -3, -3, -3, -3, -1, -1, -1, -2, -2, -2, -3, -4, // C
    -2,  4, -3,  6,  2, -3, -1, -1, -3, -1, -4, -3,  1, -1,  0, -2,  0, -1, -3, -4, -1, -3,  1, -4, // D
    -1,  1, -4,  2,  5, -3, -2,  0, -3,  1, -3, -2,  0, -1,  2,  0,  0, -1, -2, -3, -1, -2,  4, -4, // E
    -2, -3, -2, -3, -3,  6, -3, -1,  0, -3,  0,  0, -3, -4, -3, -3, -2, -2, -1,  1, -1,  3, -3, -4, // F
     0, -1, -3, -1, -2, -3,  6, -2, -4, -2, -4, -3,  0, -2, -2, -2,  0, -2, -3, -2, -1, -3, -2, -4, // G
    -2,  0, -3, -1,  0, -1, -2,  8, -3, -1, -3, -2,  1, -2,  0,  0, -1, -2, -3, -2, -1,  2,  0, -4, // H
    -1, -3, -1, -3, -3,  0, -4, -3,  4, -3,  2,  1, -3, -3, -3, -3, -2, -1,  3, -3, -1, -1, -3, -4, // I
    -1,  0, -3, -1,  1, -3, -2, -1, -3,  5, -2, -1,  0, -1,  1,  2,  0, -1, -2, -3, -1, -2,  1, -4, // K
    -1, -4, -1, -4, -3,  0, -4, -3,  2, -2,  4,  2, -3, -3, -2, -2, -2, -1,  1, -2, -1, -1, -3, -4, // L
    -1, -3, -1, -3, -2,  0, -3, -2,  1, -1,  2,  5, -2, -2,  0, -1, -1, -1,  1, -1, -1, -1, -1, -4, // M
    -2,  3, -3,  1,  0, -3,  0,  1, -3,  0, -3, -2,  6, -2,  0,  0,  1,  0, -3, -4, -1, -2,  0, -4, // N
    -1, -2, -3, -1, -1, -4, -2, -2, -3, -1, -3, -2, -2,  7, -1, -2, -1, -1, -2, -4, -2, -3, -1, -4, // P
    -1,  0, -3,  0,  2, -3, -2,  0, -3,  1, -2,  0,  0, -1,  5,  1,  0, -1, -2, -2, -1, -1,  3, -4, // Q
    -1, -1, -3, -2,  0, -3, -2,  0, -3,  2, -2, -1,  0, -2,  1,  5, -1, -1, -3, -3, -1, -2,  0, -4, // R
     1,  0, -1,  0,  0, -2,  0, -1, -2,  0, -2, -1,  1, -1,  0, -1,  4,  1, -2, -3,  0, -2,  0, -4, // S
     0, -1, -1, -1, -1, -2, -2, -2, -1, -1, -1, -1,  0, -1, -1, -1,  1,  5,  0, -2,  0, -2, -1, -4, // T
     0, -3, -1, -3, -2, -1, -3, -3,  3, -2,  1,  1, -3, -2, -2, -3, -2,  0,  4, -3, -1, -1, -2, -4, // V
    -3, -4, -2, -4, -3,  1, -2, -2, -3, -3, -2, -1, -4, -4, -2, -3, -3, -2, -3, 11, -2,  2, -3, -4, // W
     0, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2, -1, -1,  0,  0, -1, -2, -1, -1, -1, -4, // X
    -2, -3, -2, -3, -2,  3, -3,  2, -1, -2, -1, -1, -2, -3, -1, -2, -2, -2, -1,  2, -1,  7, -2, -4, // Y
    -1,  1, -3,  1,  4, -3, -2,  0, -3,  1, -3, -1,  0, -1,  3,  0,  0, -1, -2, -3, -1, -2,  4, -4, // Z
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, // -
];
