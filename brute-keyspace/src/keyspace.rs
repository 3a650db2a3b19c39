//! Enumeration of every fixed-length string over an alphabet.
//!
//! Candidates are ranked by counting in base `|alphabet|`: the digit value of a
//! symbol is its position in the alphabet, the leftmost character is the most
//! significant digit. For `ab` at length 2 the order is `aa, ab, ba, bb`.
//!
//! [`Keyspace::get`] decodes a single rank directly, [`Keyspace::candidates`]
//! streams the whole space without materializing it, and
//! [`Keyspace::materialize`] builds the full [`PermutationSequence`] behind a
//! size ceiling.

use std::iter::FusedIterator;

use crate::alphabet::Alphabet;
use crate::error::Error;

/// Ceiling used by [`enumerate`]. 94^4 (the largest reference keyspace) fits.
pub const DEFAULT_MATERIALIZE_LIMIT: u64 = 100_000_000;

/// The set of all strings of one length over one alphabet.
#[derive(Debug, Clone, Copy)]
pub struct Keyspace<'a> {
    alphabet: &'a Alphabet,
    length: usize,
    count: u64,
}

impl<'a> Keyspace<'a> {
    /// Fails with [`Error::CapacityExceeded`] when `|alphabet|^length` does not
    /// fit in a `u64`.
    pub fn new(alphabet: &'a Alphabet, length: usize) -> Result<Self, Error> {
        let overflow = || Error::CapacityExceeded {
            alphabet_size: alphabet.len(),
            length,
            limit: u64::MAX,
        };

        let exponent = u32::try_from(length).map_err(|_| overflow())?;
        let count = (alphabet.len() as u64).checked_pow(exponent).ok_or_else(overflow)?;

        Ok(Self { alphabet, length, count })
    }

    #[inline]
    pub fn alphabet(&self) -> &'a Alphabet {
        self.alphabet
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// `|alphabet|^length`
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Decodes the candidate at `index`.
    pub fn get(&self, index: u64) -> Option<String> {
        if index >= self.count {
            return None;
        }

        let radix = self.alphabet.len() as u64;
        let symbols = self.alphabet.symbols();
        let mut out = vec![symbols[0]; self.length];
        let mut rest = index;

        // Fill from the least significant (rightmost) position.
        for slot in out.iter_mut().rev() {
            *slot = symbols[(rest % radix) as usize];
            rest /= radix;
        }

        Some(out.into_iter().collect())
    }

    /// Rank of `candidate`, or `None` if it is not in this keyspace.
    pub fn position(&self, candidate: &str) -> Option<u64> {
        let radix = self.alphabet.len() as u64;
        let mut index = 0u64;
        let mut seen = 0usize;

        for symbol in candidate.chars() {
            if seen == self.length {
                return None;
            }
            let digit = self.alphabet.digit(symbol)? as u64;
            index = index * radix + digit;
            seen += 1;
        }

        (seen == self.length).then_some(index)
    }

    /// Lazily yields every candidate in rank order.
    pub fn candidates(&self) -> Candidates<'a> {
        Candidates {
            symbols: self.alphabet.symbols(),
            digits: vec![0; self.length],
            remaining: self.count,
        }
    }

    /// Builds the full sequence.
    ///
    /// With `limit` set, a keyspace larger than `limit` fails before anything
    /// is allocated. A keyspace that cannot be addressed on this platform
    /// always fails.
    pub fn materialize(&self, limit: Option<u64>) -> Result<PermutationSequence, Error> {
        let exceeded = |limit: u64| Error::CapacityExceeded {
            alphabet_size: self.alphabet.len(),
            length: self.length,
            limit,
        };

        if let Some(limit) = limit {
            if self.count > limit {
                return Err(exceeded(limit));
            }
        }
        let ceiling = limit.unwrap_or(u64::MAX);
        let capacity = usize::try_from(self.count).map_err(|_| exceeded(ceiling))?;

        let mut items = Vec::new();
        items.try_reserve_exact(capacity).map_err(|_| exceeded(ceiling))?;
        items.extend(self.candidates());

        Ok(PermutationSequence { length: self.length, items })
    }
}

/// Materializes every string of `length` symbols over `alphabet`, in rank order.
///
/// Uses [`DEFAULT_MATERIALIZE_LIMIT`] as the size ceiling.
pub fn enumerate(alphabet: &Alphabet, length: usize) -> Result<PermutationSequence, Error> {
    Keyspace::new(alphabet, length)?.materialize(Some(DEFAULT_MATERIALIZE_LIMIT))
}

/// Streaming iterator over a keyspace, see [`Keyspace::candidates`].
///
/// Works like an odometer: the last digit turns fastest and carries into the
/// one before it.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    symbols: &'a [char],
    digits: Vec<usize>,
    remaining: u64,
}

impl Candidates<'_> {
    fn advance(&mut self) {
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.symbols.len() {
                return;
            }
            *digit = 0;
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }

        let candidate: String = self.digits.iter().map(|&d| self.symbols[d]).collect();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }

        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Candidates<'_> {}

/// Every candidate of one keyspace, held in memory in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationSequence {
    length: usize,
    items: Vec<String>,
}

impl PermutationSequence {
    /// Number of characters in every element.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Same as [`len`](Self::len), as the `u64` the estimator works with.
    #[inline]
    pub fn permutation_count(&self) -> u64 {
        self.items.len() as u64
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl<'s> IntoIterator for &'s PermutationSequence {
    type Item = &'s String;
    type IntoIter = std::slice::Iter<'s, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
