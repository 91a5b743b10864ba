//! Plan7 profile hidden Markov models and Viterbi best-path scoring.
//!
//! A profile HMM is an ordered list of nodes (model columns), each bundling
//! match and insertion emissions with a seven-field transition record. The
//! Plan7 topology allows M→{M,I,D}, I→{M,I} and D→{M,D}; direct
//! insertion↔deletion transitions do not exist.
//!
//! Scoring runs in negated-log space over a flat, caller-owned
//! [`DynamicTable`]: [`Hmm::viterbi_score`] allocates one per call, while
//! [`Hmm::viterbi_score_mem`] reuses a table across calls for
//! performance-critical loops. The exclusive `&mut` borrow is the
//! single-writer contract — one table serves at most one in-flight
//! computation, and parallel scoring needs one table per worker.
//!
//! # Example
//!
//! ```
//! use physalia_align::hmm::{Hmm, HmmNode, TProbs};
//! use physalia_core::Prob;
//! use physalia_seq::{Alphabet, EProbs, Sequence};
//!
//! let alpha = Alphabet::from_bytes(b"X");
//! let mut mat_emit = EProbs::new(&alpha);
//! mat_emit.set(b'X', Prob::new(0.0)).unwrap();
//!
//! let node = |n| HmmNode {
//!     residue: b'X',
//!     node_num: n,
//!     ins_emit: EProbs::new(&alpha),
//!     mat_emit: mat_emit.clone(),
//!     transitions: TProbs::match_only(),
//!     neff_m: Prob::MIN,
//!     neff_i: Prob::MIN,
//!     neff_d: Prob::MIN,
//! };
//! let hmm = Hmm::new(vec![node(0), node(1)], alpha, None);
//!
//! let score = hmm.viterbi_score(&Sequence::from_text("q", "XX"));
//! assert_eq!(score, Prob::new(0.0));
//! ```

use physalia_core::{PhysaliaError, Prob, Result};
use physalia_seq::{Alphabet, EProbs, Residue, Sequence};

/// HMM states in the Plan7 architecture.
///
/// Begin and End are boundary conventions of the recurrence, not stored
/// states; only these three index the dynamic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HmmState {
    Match = 0,
    Deletion = 1,
    Insertion = 2,
}

/// Transition scores out of one node, as negated-log probabilities.
///
/// ID and DI are omitted (Plan7).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TProbs {
    pub mm: Prob,
    pub mi: Prob,
    pub md: Prob,
    pub im: Prob,
    pub ii: Prob,
    pub dm: Prob,
    pub dd: Prob,
}

impl TProbs {
    /// Transitions that force the match path: every transition into a match
    /// state is free, every other transition is impossible. This is the row
    /// a sliced model ends with.
    pub fn match_only() -> Self {
        Self {
            mm: Prob::new(0.0),
            mi: Prob::MIN,
            md: Prob::MIN,
            im: Prob::new(0.0),
            ii: Prob::MIN,
            dm: Prob::new(0.0),
            dd: Prob::MIN,
        }
    }
}

/// One model column: reference residue, node index, emissions, transitions.
///
/// The `neff_*` effective-count fields are not used by scoring but exist in
/// common HMM file formats, so parsed models keep them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HmmNode {
    pub residue: Residue,
    pub node_num: usize,
    pub ins_emit: EProbs,
    pub mat_emit: EProbs,
    pub transitions: TProbs,
    pub neff_m: Prob,
    pub neff_i: Prob,
    pub neff_d: Prob,
}

/// A profile hidden Markov model: ordered nodes, an alphabet fixing emission
/// indices, and an optional background (null) emission model.
///
/// hmm files don't carry a null model, but hhm files do; when present it is
/// the background the insertion emissions of every node were scored against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hmm {
    /// An ordered list of model nodes.
    pub nodes: Vec<HmmNode>,
    /// The alphabet whose ordering indexes match/insertion emissions.
    pub alphabet: Alphabet,
    /// Background emission frequencies, when the source format has them.
    pub null: Option<EProbs>,
}

impl Hmm {
    /// Create an HMM from a list of nodes, an ordered alphabet and an
    /// optional set of null probabilities.
    pub fn new(nodes: Vec<HmmNode>, alphabet: Alphabet, null: Option<EProbs>) -> Self {
        Self {
            nodes,
            alphabet,
            null,
        }
    }

    /// Number of nodes (model columns).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True iff the model has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A new independent model made of nodes `[start, end)`, sharing this
    /// model's alphabet and null model.
    ///
    /// The last node's transition row is forced to a clean exit:
    /// `mm = im = dm = 0` and `mi = md = ii = dd` minimal, so the sliced
    /// model terminates in a match state at the cut. No other rows change.
    ///
    /// # Errors
    ///
    /// Returns [`PhysaliaError::InvalidInput`] when the range is empty or
    /// out of bounds.
    pub fn slice(&self, start: usize, end: usize) -> Result<Hmm> {
        if start >= end || end > self.nodes.len() {
            return Err(PhysaliaError::InvalidInput(format!(
                "node range [{start}, {end}) is invalid for a {}-node model",
                self.nodes.len()
            )));
        }
        let mut nodes = self.nodes[start..end].to_vec();
        let last = nodes.len() - 1;
        nodes[last].transitions = TProbs::match_only();
        Ok(Hmm {
            nodes,
            alphabet: self.alphabet.clone(),
            null: self.null.clone(),
        })
    }

    /// Join two models into one, nodes of `h1` followed by nodes of `h2`.
    /// The inputs are not modified; `h1`'s alphabet and null model are kept.
    ///
    /// # Errors
    ///
    /// Returns [`PhysaliaError::InvalidInput`] when the alphabets differ —
    /// emission and transition indices of the second model would be
    /// meaningless under the first model's ordering.
    pub fn concat(h1: &Hmm, h2: &Hmm) -> Result<Hmm> {
        if h1.alphabet != h2.alphabet {
            return Err(PhysaliaError::InvalidInput(format!(
                "cannot concatenate models over different alphabets ({} vs {})",
                h1.alphabet, h2.alphabet
            )));
        }
        let mut nodes = Vec::with_capacity(h1.nodes.len() + h2.nodes.len());
        nodes.extend(h1.nodes.iter().cloned());
        nodes.extend(h2.nodes.iter().cloned());
        Ok(Hmm {
            nodes,
            alphabet: h1.alphabet.clone(),
            null: h1.null.clone(),
        })
    }

    /// The probability of the likeliest path through the model for the
    /// given sequence.
    ///
    /// Allocates a fresh dynamic table per call. In performance-critical
    /// loops, allocate one [`DynamicTable`] and use
    /// [`viterbi_score_mem`](Self::viterbi_score_mem) instead.
    ///
    /// The state path itself is not computed.
    pub fn viterbi_score(&self, seq: &Sequence) -> Prob {
        let mut table = DynamicTable::new(self.nodes.len(), seq.len());
        self.viterbi_score_mem(seq, &mut table)
    }

    /// Same as [`viterbi_score`](Self::viterbi_score) against a
    /// caller-provided table, which is reset before filling. Repeated calls
    /// with stable model/sequence dimensions never reallocate.
    pub fn viterbi_score_mem(&self, seq: &Sequence, table: &mut DynamicTable) -> Prob {
        table.reset(self.nodes.len(), seq.len());
        let begin = table.index(HmmState::Match, 0, 0);
        table.scores[begin] = Prob::new(0.0);

        for node in 0..self.nodes.len() {
            let trans = self.nodes[node].transitions;
            for obs in 0..seq.len() {
                let residue = seq.residues[obs];
                let iemit = self.nodes[node].ins_emit.lookup(residue);
                let memit = match self.nodes.get(node + 1) {
                    Some(next) => next.mat_emit.lookup(residue),
                    // Force into the match state for the end node.
                    None => Prob::new(0.0),
                };

                let here = table.get(HmmState::Match, node, obs);
                table.relax(HmmState::Insertion, node, obs + 1, here + trans.mi + iemit);
                table.relax(HmmState::Match, node + 1, obs + 1, here + trans.mm + memit);
                table.relax(HmmState::Deletion, node + 1, obs, here + trans.md);

                let here = table.get(HmmState::Insertion, node, obs);
                table.relax(HmmState::Insertion, node, obs + 1, here + trans.ii + iemit);
                table.relax(HmmState::Match, node + 1, obs + 1, here + trans.im + memit);

                let here = table.get(HmmState::Deletion, node, obs);
                table.relax(HmmState::Match, node + 1, obs + 1, here + trans.dm + memit);
                table.relax(HmmState::Deletion, node + 1, obs, here + trans.dd);
            }
        }
        table.get(HmmState::Match, self.nodes.len(), seq.len())
    }
}

/// A reusable dynamic programming table for HMM scoring.
///
/// Storage is a flat buffer indexed by HMM state, node index and observation
/// index, in that order, with room for `3 · (nodes + 1) · (seq_len + 1)`
/// scores. Every entry starts at (and resets to) the minimum probability.
///
/// The table is caller-owned scratch: create one per worker and pass it to
/// [`Hmm::viterbi_score_mem`]. The exclusive borrow taken there makes
/// concurrent use of a single table impossible by construction.
#[derive(Debug, Clone)]
pub struct DynamicTable {
    scores: Vec<Prob>,
    nodes: usize,
}

impl DynamicTable {
    /// A table sized for a model of `num_nodes` nodes and a sequence of
    /// `seq_len` residues, with every score minimal.
    pub fn new(num_nodes: usize, seq_len: usize) -> Self {
        let mut table = Self {
            scores: Vec::new(),
            nodes: 0,
        };
        table.reset(num_nodes, seq_len);
        table
    }

    /// Re-derive dimensions and fill with the minimum probability. The
    /// buffer only grows; resetting to the same dimensions reuses it
    /// allocation-free.
    fn reset(&mut self, num_nodes: usize, seq_len: usize) {
        self.nodes = num_nodes + 1;
        let len = 3 * self.nodes * (seq_len + 1);
        self.scores.clear();
        self.scores.resize(len, Prob::MIN);
    }

    fn index(&self, state: HmmState, node: usize, obs: usize) -> usize {
        state as usize + 3 * (node + self.nodes * obs)
    }

    fn get(&self, state: HmmState, node: usize, obs: usize) -> Prob {
        self.scores[self.index(state, node, obs)]
    }

    /// Keep the more probable of the existing and proposed scores; ties
    /// keep the incumbent.
    fn relax(&mut self, state: HmmState, node: usize, obs: usize, p: Prob) {
        let i = self.index(state, node, obs);
        if self.scores[i].less(p) {
            self.scores[i] = p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_alpha() -> Alphabet {
        Alphabet::from_bytes(b"X")
    }

    /// A node over {X} whose match emission for X is free and whose
    /// transitions force the match path.
    fn forced_match_node(n: usize) -> HmmNode {
        let mut mat_emit = EProbs::new(&x_alpha());
        mat_emit.set(b'X', Prob::new(0.0)).unwrap();
        HmmNode {
            residue: b'X',
            node_num: n,
            ins_emit: EProbs::new(&x_alpha()),
            mat_emit,
            transitions: TProbs::match_only(),
            neff_m: Prob::MIN,
            neff_i: Prob::MIN,
            neff_d: Prob::MIN,
        }
    }

    fn forced_match_hmm(len: usize) -> Hmm {
        Hmm::new((0..len).map(forced_match_node).collect(), x_alpha(), None)
    }

    #[test]
    fn perfect_path_scores_zero() {
        let hmm = forced_match_hmm(2);
        let score = hmm.viterbi_score(&Sequence::from_text("q", "XX"));
        assert_eq!(score, Prob::new(0.0));
    }

    #[test]
    fn single_node_single_residue() {
        let hmm = forced_match_hmm(1);
        let score = hmm.viterbi_score(&Sequence::from_text("q", "X"));
        assert_eq!(score, Prob::new(0.0));
    }

    #[test]
    fn too_short_sequence_is_unreachable_under_forced_match() {
        // Two match-only nodes cannot explain one residue: no deletions are
        // allowed, so no path reaches the end cell.
        let hmm = forced_match_hmm(2);
        let score = hmm.viterbi_score(&Sequence::from_text("q", "X"));
        assert!(score.is_min());
    }

    #[test]
    fn empty_sequence_against_nonempty_model() {
        let hmm = forced_match_hmm(2);
        let score = hmm.viterbi_score(&Sequence::from_text("q", ""));
        assert!(score.is_min());
    }

    #[test]
    fn empty_model_scores_empty_sequence_as_certain() {
        let hmm = Hmm::new(Vec::new(), x_alpha(), None);
        assert_eq!(
            hmm.viterbi_score(&Sequence::from_text("q", "")),
            Prob::new(0.0)
        );
        assert!(hmm
            .viterbi_score(&Sequence::from_text("q", "X"))
            .is_min());
    }

    #[test]
    fn deletion_path_charges_its_transitions() {
        // Two nodes, one residue: the only path is
        // Begin → D1 (md of node 0) → M-end (dm of node 1).
        let mut hmm = forced_match_hmm(2);
        hmm.nodes[0].transitions = TProbs {
            md: Prob::new(1.5),
            ..TProbs::match_only()
        };
        hmm.nodes[1].transitions = TProbs {
            dm: Prob::new(0.25),
            ..TProbs::match_only()
        };
        let score = hmm.viterbi_score(&Sequence::from_text("q", "X"));
        assert_eq!(score, Prob::new(1.75));
    }

    #[test]
    fn insertion_path_charges_transitions_and_emission() {
        // One node, two residues: Begin → I0 (mi + insert emission)
        // → M-end (im).
        let mut hmm = forced_match_hmm(1);
        hmm.nodes[0].ins_emit.set(b'X', Prob::new(0.5)).unwrap();
        hmm.nodes[0].transitions = TProbs {
            mi: Prob::new(1.0),
            im: Prob::new(0.25),
            ..TProbs::match_only()
        };
        let score = hmm.viterbi_score(&Sequence::from_text("q", "XX"));
        assert_eq!(score, Prob::new(1.75));
    }

    #[test]
    fn match_emissions_accumulate() {
        let mut hmm = forced_match_hmm(2);
        hmm.nodes[0].mat_emit.set(b'X', Prob::new(0.125)).unwrap();
        hmm.nodes[1].mat_emit.set(b'X', Prob::new(0.5)).unwrap();
        // Only node 1's match emission is consulted (arrival at node 1);
        // arrival at the synthetic end node is free.
        let score = hmm.viterbi_score(&Sequence::from_text("q", "XX"));
        assert_eq!(score, Prob::new(0.5));
    }

    #[test]
    fn out_of_alphabet_residue_kills_the_match_path() {
        let hmm = forced_match_hmm(2);
        let score = hmm.viterbi_score(&Sequence::from_text("q", "ZX"));
        assert!(score.is_min());
    }

    #[test]
    fn final_residue_is_consumed_by_the_end_transition() {
        // Arrival at the synthetic end node is a zero-cost match, so the
        // last residue's identity never consults an emission table.
        let hmm = forced_match_hmm(2);
        let score = hmm.viterbi_score(&Sequence::from_text("q", "XZ"));
        assert_eq!(score, Prob::new(0.0));
    }

    #[test]
    fn engine_and_caller_tables_agree_bitwise() {
        let mut hmm = forced_match_hmm(3);
        hmm.nodes[1].mat_emit.set(b'X', Prob::new(0.3)).unwrap();
        hmm.nodes[2].mat_emit.set(b'X', Prob::new(0.7)).unwrap();
        let seq = Sequence::from_text("q", "XXX");

        let allocated = hmm.viterbi_score(&seq);
        let mut table = DynamicTable::new(hmm.len(), seq.len());
        let reused = hmm.viterbi_score_mem(&seq, &mut table);
        assert_eq!(allocated, reused);
    }

    #[test]
    fn table_reuse_across_dimensions_matches_fresh_tables() {
        let hmm_small = forced_match_hmm(2);
        let hmm_large = forced_match_hmm(5);
        let short = Sequence::from_text("q", "XX");
        let long = Sequence::from_text("q", "XXXXX");

        let mut table = DynamicTable::new(hmm_large.len(), long.len());
        assert_eq!(
            hmm_large.viterbi_score_mem(&long, &mut table),
            hmm_large.viterbi_score(&long)
        );
        // Shrinking dimensions must not leak stale scores.
        assert_eq!(
            hmm_small.viterbi_score_mem(&short, &mut table),
            hmm_small.viterbi_score(&short)
        );
        // And growing again still agrees.
        assert_eq!(
            hmm_large.viterbi_score_mem(&long, &mut table),
            hmm_large.viterbi_score(&long)
        );
    }

    #[test]
    fn slice_full_range_touches_only_last_transition_row() {
        let mut hmm = forced_match_hmm(3);
        hmm.nodes[0].transitions.mm = Prob::new(0.5);
        hmm.nodes[2].transitions = TProbs {
            mm: Prob::new(0.1),
            mi: Prob::new(0.2),
            md: Prob::new(0.3),
            im: Prob::new(0.4),
            ii: Prob::new(0.5),
            dm: Prob::new(0.6),
            dd: Prob::new(0.7),
        };

        let sliced = hmm.slice(0, 3).unwrap();
        assert_eq!(sliced.len(), 3);
        assert_eq!(sliced.alphabet, hmm.alphabet);
        for i in 0..2 {
            assert_eq!(sliced.nodes[i], hmm.nodes[i]);
        }
        assert_eq!(sliced.nodes[2].transitions, TProbs::match_only());
        assert_eq!(sliced.nodes[2].mat_emit, hmm.nodes[2].mat_emit);
        assert_eq!(sliced.nodes[2].ins_emit, hmm.nodes[2].ins_emit);
        // The input is untouched.
        assert_eq!(hmm.nodes[2].transitions.dd, Prob::new(0.7));
    }

    #[test]
    fn slice_interior_range() {
        let hmm = forced_match_hmm(5);
        let sliced = hmm.slice(1, 4).unwrap();
        assert_eq!(sliced.len(), 3);
        assert_eq!(sliced.nodes[0].node_num, 1);
        assert_eq!(sliced.nodes[2].node_num, 3);
    }

    #[test]
    fn slice_rejects_bad_ranges() {
        let hmm = forced_match_hmm(3);
        assert!(hmm.slice(2, 2).is_err());
        assert!(hmm.slice(3, 2).is_err());
        assert!(hmm.slice(0, 4).is_err());
    }

    #[test]
    fn concat_joins_nodes_and_keeps_first_null() {
        let mut null = EProbs::new(&x_alpha());
        null.set(b'X', Prob::new(0.5)).unwrap();
        let h1 = Hmm::new(
            (0..2).map(forced_match_node).collect(),
            x_alpha(),
            Some(null.clone()),
        );
        let h2 = forced_match_hmm(3);

        let joined = Hmm::concat(&h1, &h2).unwrap();
        assert_eq!(joined.len(), 5);
        assert_eq!(joined.alphabet, x_alpha());
        assert_eq!(joined.null, Some(null));
        // Inputs unchanged.
        assert_eq!(h1.len(), 2);
        assert_eq!(h2.len(), 3);
    }

    #[test]
    fn concat_rejects_mismatched_alphabets() {
        let h1 = forced_match_hmm(1);
        let h2 = Hmm::new(Vec::new(), Alphabet::dna(), None);
        assert!(Hmm::concat(&h1, &h2).is_err());
    }

    #[test]
    fn sliced_model_terminates_cleanly() {
        // A model whose interior forbids exit still scores once sliced,
        // because the cut forces the exit row open.
        let mut hmm = forced_match_hmm(3);
        hmm.nodes[2].transitions = TProbs {
            mm: Prob::MIN,
            ..TProbs::match_only()
        };
        assert!(hmm
            .viterbi_score(&Sequence::from_text("q", "XXX"))
            .is_min());

        let sliced = hmm.slice(0, 3).unwrap();
        assert_eq!(
            sliced.viterbi_score(&Sequence::from_text("q", "XXX")),
            Prob::new(0.0)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        let mut hmm = forced_match_hmm(2);
        hmm.nodes[0].mat_emit.set(b'X', Prob::new(0.25)).unwrap();
        let json = serde_json::to_string(&hmm).unwrap();
        let back: Hmm = serde_json::from_str(&json).unwrap();
        assert_eq!(hmm, back);
    }
}
