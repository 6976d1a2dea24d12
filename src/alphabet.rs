//! Symbol alphabet shared by all sensor slots.
//!
//! Detector class `k` of every synapse grid responds to alphabet symbol `k`.

use crate::{DendriteError, Result};
use serde::{Deserialize, Serialize};

/// An ordered, fixed set of categorical symbols.
///
/// # Examples
///
/// ```
/// use dendrite_learning::Alphabet;
///
/// let dna = Alphabet::dna();
/// assert_eq!(dna.len(), 4);
/// assert_eq!(dna.encode("GATC").unwrap(), vec![2, 0, 3, 1]);
/// assert_eq!(dna.decode(&[2, 0, 3, 1]), "GATC");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<char>", into = "Vec<char>")]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Create an alphabet from distinct symbols.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `symbols` is empty or has duplicates.
    pub fn new(symbols: Vec<char>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(DendriteError::InvalidConfiguration(
                "alphabet must have at least one symbol".into(),
            ));
        }
        for (i, c) in symbols.iter().enumerate() {
            if symbols[..i].contains(c) {
                return Err(DendriteError::InvalidConfiguration(format!(
                    "duplicate alphabet symbol {:?}",
                    c
                )));
            }
        }
        Ok(Self { symbols })
    }

    /// The four DNA bases `A C G T`.
    pub fn dna() -> Self {
        Self {
            symbols: vec!['A', 'C', 'G', 'T'],
        }
    }

    /// Number of symbol classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; alphabets are never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol for class `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= len()`.
    #[inline]
    pub fn symbol(&self, k: usize) -> char {
        self.symbols[k]
    }

    /// All symbols in class order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Class index of `c`, if it belongs to the alphabet.
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == c)
    }

    /// Convert a window of characters to class indices.
    pub fn encode(&self, text: &str) -> Result<Vec<usize>> {
        text.chars()
            .map(|c| self.index_of(c).ok_or(DendriteError::UnknownSymbol(c)))
            .collect()
    }

    /// Convert class indices back to characters.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    pub fn decode(&self, indices: &[usize]) -> String {
        indices.iter().map(|&k| self.symbol(k)).collect()
    }
}

impl TryFrom<Vec<char>> for Alphabet {
    type Error = DendriteError;

    fn try_from(symbols: Vec<char>) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<Alphabet> for Vec<char> {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.symbols
    }
}
