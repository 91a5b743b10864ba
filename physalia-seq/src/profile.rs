//! Per-column residue frequency profiles and their log-odds emission form.
//!
//! A [`FrequencyProfile`] accumulates raw residue counts for each column of
//! a fixed-width sequence collection. Dividing those counts by a single
//! column of background counts (the null model) yields a [`Profile`] of
//! negated-log-odds emission tables, one [`EProbs`] per column.

use physalia_core::{PhysaliaError, Prob, Result};

use crate::alphabet::Alphabet;
use crate::emissions::EProbs;
use crate::sequence::{Residue, Sequence};

/// Raw per-column residue counts over an alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyProfile {
    alphabet: Alphabet,
    /// `freqs[column][alphabet position]`.
    freqs: Vec<Vec<u32>>,
}

impl FrequencyProfile {
    /// Create an empty profile with the given number of columns.
    pub fn new(columns: usize, alphabet: Alphabet) -> Self {
        let freqs = vec![vec![0; alphabet.len()]; columns];
        Self { alphabet, freqs }
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.freqs.len()
    }

    /// The alphabet the counts are indexed by.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The count for residue `r` in `column`, or `None` when `r` is not in
    /// the alphabet.
    pub fn count(&self, column: usize, r: Residue) -> Option<u32> {
        let pos = self.alphabet.index().lookup(r)?;
        Some(self.freqs[column][pos])
    }

    /// Add one sequence's residues to the per-column counts.
    ///
    /// # Errors
    ///
    /// Returns [`PhysaliaError::InvalidInput`] if the sequence length does
    /// not equal the column count, or if it contains a residue outside the
    /// alphabet.
    pub fn add(&mut self, seq: &Sequence) -> Result<()> {
        if seq.len() != self.columns() {
            return Err(PhysaliaError::InvalidInput(format!(
                "sequence '{}' has {} residues, profile has {} columns",
                seq.name,
                seq.len(),
                self.columns()
            )));
        }
        let index = self.alphabet.index();
        for (column, &r) in seq.residues.iter().enumerate() {
            let pos = index.lookup(r).ok_or_else(|| {
                PhysaliaError::InvalidInput(format!(
                    "residue '{}' at column {} is not in alphabet {}",
                    char::from(r),
                    column,
                    self.alphabet
                ))
            })?;
            self.freqs[column][pos] += 1;
        }
        Ok(())
    }

    /// Convert the counts into log-odds emissions against a background.
    ///
    /// `null` is a single-column profile of background counts over the same
    /// alphabet. For each column and residue, the emission is
    /// `-ln((freq / column_total) / (null_freq / null_total))`; a zero
    /// residue count or zero background count yields the minimum
    /// probability.
    ///
    /// # Errors
    ///
    /// Returns [`PhysaliaError::InvalidInput`] if `null` has more than one
    /// column or a different alphabet.
    pub fn profile(&self, null: &FrequencyProfile) -> Result<Profile> {
        if null.columns() != 1 {
            return Err(PhysaliaError::InvalidInput(format!(
                "null model must have exactly 1 column, got {}",
                null.columns()
            )));
        }
        if null.alphabet != self.alphabet {
            return Err(PhysaliaError::InvalidInput(format!(
                "null model alphabet {} differs from profile alphabet {}",
                null.alphabet, self.alphabet
            )));
        }

        let null_counts = &null.freqs[0];
        let null_total: u32 = null_counts.iter().sum();

        let mut emissions = Vec::with_capacity(self.columns());
        for counts in &self.freqs {
            let column_total: u32 = counts.iter().sum();
            let mut ep = EProbs::new(&self.alphabet);
            for (pos, &r) in self.alphabet.residues().iter().enumerate() {
                let p = log_odds(counts[pos], column_total, null_counts[pos], null_total);
                ep.set(r, p)?;
            }
            emissions.push(ep);
        }

        Ok(Profile {
            alphabet: self.alphabet.clone(),
            emissions,
        })
    }
}

/// Negated-log-odds of a residue frequency against its background frequency.
fn log_odds(freq: u32, column_total: u32, null_freq: u32, null_total: u32) -> Prob {
    if freq == 0 || null_freq == 0 {
        return Prob::MIN;
    }
    let num = f64::from(freq) / f64::from(column_total);
    let den = f64::from(null_freq) / f64::from(null_total);
    Prob::new(-(num / den).ln())
}

/// Per-column log-odds emissions over an alphabet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub alphabet: Alphabet,
    pub emissions: Vec<EProbs>,
}
