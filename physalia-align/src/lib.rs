//! Sequence alignment and profile-HMM scoring for the physalia workspace.
//!
//! Two engines share one design: dense state/position-indexed tables,
//! negated-log (or integer) scores, deterministic tie-breaks, and scratch
//! memory that can be reused across calls.
//!
//! - **Global alignment** — [`needleman_wunsch`] over any substitution
//!   function, with the gap penalty taken from the function's `('-', '-')`
//!   entry
//! - **Substitution scoring** — [`SubstMatrix`] (BLOSUM62, simple DNA/RNA,
//!   custom tables)
//! - **Profile HMMs** — [`Hmm`] with Plan7 topology, scored by Viterbi
//!   against a reusable [`DynamicTable`]
//!
//! # Quick start
//!
//! ```
//! use physalia_align::{needleman_wunsch, SubstMatrix};
//!
//! let m = SubstMatrix::dna();
//! let aln = needleman_wunsch(b"ACGT", b"AGT", |a, b| m.score(a, b));
//! assert_eq!(aln.reference, b"ACGT");
//! assert_eq!(aln.query, b"A-GT");
//! ```

pub mod hmm;
pub mod needleman_wunsch;
pub mod scoring;

pub use hmm::{DynamicTable, Hmm, HmmNode, HmmState, TProbs};
pub use needleman_wunsch::{needleman_wunsch, Alignment};
pub use scoring::SubstMatrix;
