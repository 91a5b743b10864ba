//! Needleman-Wunsch global alignment with a linear gap model.
//!
//! The engine is generic over the substitution function: any
//! `Fn(Residue, Residue) -> i32` works, symmetric or not. The gap penalty is
//! derived once as `subst(b'-', b'-')` and charged uniformly for every
//! inserted or deleted residue.
//!
//! Traceback is tie-break deterministic: when several optimal paths exist,
//! the diagonal edge wins, then the vertical (consume from the reference),
//! then the horizontal (consume from the query). Reference alignments depend
//! on this ordering.

use physalia_seq::Residue;

/// One optimal global alignment: two equal-length gapped residue runs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alignment {
    /// The first input (`a`), with gaps inserted.
    pub reference: Vec<Residue>,
    /// The second input (`b`), with gaps inserted.
    pub query: Vec<Residue>,
}

impl Alignment {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    /// True iff the alignment has no columns.
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }
}

/// Globally align `a` (reference) against `b` (query).
///
/// `subst` scores an ordered residue pair; its `('-', '-')` entry is the
/// uniform gap penalty. Runs in O(|a|·|b|) time and space.
///
/// # Panics
///
/// Panics if the traceback reaches a cell with no valid predecessor. Given a
/// correctly filled matrix this cannot happen; hitting it means an internal
/// invariant was broken, and the panic message names the offending
/// coordinates.
pub fn needleman_wunsch<F>(a: &[Residue], b: &[Residue], subst: F) -> Alignment
where
    F: Fn(Residue, Residue) -> i32,
{
    // Rows correspond to residues of `a`, columns to residues of `b`.
    let rows = a.len() + 1;
    let cols = b.len() + 1;
    let gap_penalty = subst(b'-', b'-');

    let mut matrix = vec![0i32; rows * cols];
    for i in 0..rows {
        matrix[i * cols] = gap_penalty * i as i32;
    }
    for j in 0..cols {
        matrix[j] = gap_penalty * j as i32;
    }

    for i in 1..rows {
        for j in 1..cols {
            let diag = matrix[(i - 1) * cols + (j - 1)] + subst(a[i - 1], b[j - 1]);
            let up = matrix[(i - 1) * cols + j] + gap_penalty;
            let left = matrix[i * cols + (j - 1)] + gap_penalty;
            matrix[i * cols + j] = if diag > up && diag > left {
                diag
            } else if up > left {
                up
            } else {
                left
            };
        }
    }

    // Trace an optimal path back from (|a|, |b|) to (0, 0).
    let capacity = rows.max(cols);
    let mut reference = Vec::with_capacity(capacity);
    let mut query = Vec::with_capacity(capacity);
    let (mut i, mut j) = (a.len(), b.len());
    while i > 0 || j > 0 {
        let here = matrix[i * cols + j];
        if i > 0 && j > 0 && here == matrix[(i - 1) * cols + (j - 1)] + subst(a[i - 1], b[j - 1]) {
            reference.push(a[i - 1]);
            query.push(b[j - 1]);
            i -= 1;
            j -= 1;
        } else if i > 0 && here == matrix[(i - 1) * cols + j] + gap_penalty {
            reference.push(a[i - 1]);
            query.push(b'-');
            i -= 1;
        } else if j > 0 && here == matrix[i * cols + (j - 1)] + gap_penalty {
            reference.push(b'-');
            query.push(b[j - 1]);
            j -= 1;
        } else {
            unreachable!("needleman-wunsch traceback: no predecessor at ({i}, {j})");
        }
    }

    // The path was accumulated backwards.
    reference.reverse();
    query.reverse();
    Alignment { reference, query }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::scoring::SubstMatrix;
    use physalia_seq::Alphabet;
    use proptest::prelude::*;

    fn dna_seq(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(
            prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')],
            0..=max_len,
        )
    }

    proptest! {
        #[test]
        fn alignment_is_deterministic(a in dna_seq(40), b in dna_seq(40)) {
            let m = SubstMatrix::dna();
            let first = needleman_wunsch(&a, &b, |x, y| m.score(x, y));
            let second = needleman_wunsch(&a, &b, |x, y| m.score(x, y));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn rows_are_equal_length_and_cover_inputs(a in dna_seq(40), b in dna_seq(40)) {
            let m = SubstMatrix::dna();
            let aln = needleman_wunsch(&a, &b, |x, y| m.score(x, y));
            prop_assert_eq!(aln.reference.len(), aln.query.len());

            let ref_residues: Vec<u8> =
                aln.reference.iter().copied().filter(|&r| r != b'-').collect();
            let query_residues: Vec<u8> =
                aln.query.iter().copied().filter(|&r| r != b'-').collect();
            prop_assert_eq!(ref_residues, a);
            prop_assert_eq!(query_residues, b);
        }

        #[test]
        fn symmetric_scoring_gives_equal_scores_under_swap(
            a in dna_seq(30),
            b in dna_seq(30),
        ) {
            let m = SubstMatrix::uniform(Alphabet::from_bytes(b"ACGT-"), 1, -1, -1);
            let fwd = needleman_wunsch(&a, &b, |x, y| m.score(x, y));
            let rev = needleman_wunsch(&b, &a, |x, y| m.score(x, y));

            let score = |aln: &Alignment| -> i32 {
                aln.reference
                    .iter()
                    .zip(&aln.query)
                    .map(|(&x, &y)| m.score(x, y))
                    .sum()
            };
            prop_assert_eq!(score(&fwd), score(&rev));
        }
    }
}
