//! Dense, alphabet-indexed emission probability tables.
//!
//! An [`EProbs`] holds one [`Prob`] per byte in the span covered by an
//! alphabet's residues, offset-indexed by the alphabet's smallest byte
//! value. Lookups are branch-light and never fail: a residue outside the
//! span reads as [`Prob::MIN`], the same value every entry starts with.

use physalia_core::{PhysaliaError, Prob, Result};

use crate::alphabet::Alphabet;
use crate::sequence::Residue;

/// Emission probabilities for one model column, as negated-log scores.
#[derive(Debug, Clone, PartialEq)]
pub struct EProbs {
    offset: Residue,
    probs: Vec<Prob>,
}

impl EProbs {
    /// Create an emission table covering the byte span of `alphabet`, with
    /// every entry initialized to the minimum probability.
    pub fn new(alphabet: &Alphabet) -> Self {
        if alphabet.is_empty() {
            return Self {
                offset: 0,
                probs: Vec::new(),
            };
        }
        let mut offset = Residue::MAX;
        let mut max = Residue::MIN;
        for &r in alphabet.residues() {
            offset = offset.min(r);
            max = max.max(r);
        }
        Self {
            offset,
            probs: vec![Prob::MIN; 1 + usize::from(max - offset)],
        }
    }

    /// The emission probability for `r`.
    ///
    /// Residues outside the table's span read as [`Prob::MIN`] rather than
    /// failing; unreachable and unknown are deliberately the same answer
    /// here, keeping scoring loops branch-free.
    pub fn lookup(&self, r: Residue) -> Prob {
        match r.checked_sub(self.offset) {
            Some(i) if usize::from(i) < self.probs.len() => self.probs[usize::from(i)],
            _ => Prob::MIN,
        }
    }

    /// Set the emission probability for `r`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysaliaError::InvalidInput`] if `r` lies outside the span
    /// the table was built over.
    pub fn set(&mut self, r: Residue, p: Prob) -> Result<()> {
        match r.checked_sub(self.offset) {
            Some(i) if usize::from(i) < self.probs.len() => {
                self.probs[usize::from(i)] = p;
                Ok(())
            }
            _ => Err(PhysaliaError::InvalidInput(format!(
                "residue '{}' is outside the emission table span",
                char::from(r)
            ))),
        }
    }

    /// The smallest byte value the table covers.
    pub fn offset(&self) -> Residue {
        self.offset
    }

    /// Number of bytes in the covered span.
    pub fn span(&self) -> usize {
        self.probs.len()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EProbs {
    /// Encodes as a mapping from single-character residue to the
    /// probability's text form, covering the whole span (sentinel entries
    /// encode as `"*"`), so decoding reconstructs the table exactly.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.probs.len()))?;
        for (i, p) in self.probs.iter().enumerate() {
            let r = self.offset.wrapping_add(i as u8);
            map.serialize_entry(&char::from(r).to_string(), &p.to_string())?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EProbs {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        use serde::Deserialize;
        use std::collections::BTreeMap;

        let entries = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut parsed = Vec::with_capacity(entries.len());
        for (key, value) in &entries {
            let mut chars = key.chars();
            let (c, rest) = (chars.next(), chars.next());
            let r = match (c, rest) {
                (Some(c), None) if u32::from(c) <= 255 => u32::from(c) as Residue,
                _ => {
                    return Err(D::Error::custom(format!(
                        "emission key '{key}' is not a single-byte residue"
                    )))
                }
            };
            let p: Prob = value.parse().map_err(D::Error::custom)?;
            parsed.push((r, p));
        }

        let Some(offset) = parsed.iter().map(|&(r, _)| r).min() else {
            return Ok(Self {
                offset: 0,
                probs: Vec::new(),
            });
        };
        let max = parsed.iter().map(|&(r, _)| r).max().unwrap_or(offset);
        let mut probs = vec![Prob::MIN; 1 + usize::from(max - offset)];
        for (r, p) in parsed {
            probs[usize::from(r - offset)] = p;
        }
        Ok(Self { offset, probs })
    }
}
