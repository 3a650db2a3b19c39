use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::Error;

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";

/// Punctuation appended to the alphanumeric set by [`Alphabet::ascii`].
pub const SYMBOLS: &str = "~`!@#$%^&*()_-+=[]{}\\|;:'\",./<>?";

/// An ordered set of distinct symbols that candidate strings are built from.
///
/// The order matters: it defines the digit values used when ranking candidates,
/// so `Alphabet::new("ab")` and `Alphabet::new("ba")` enumerate differently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Builds an alphabet from the characters of `symbols`, in order.
    ///
    /// Fails when `symbols` is empty or repeats a character.
    pub fn new(symbols: &str) -> Result<Self, Error> {
        let mut collected: Vec<char> = Vec::with_capacity(symbols.len());
        for symbol in symbols.chars() {
            if collected.contains(&symbol) {
                return Err(Error::DuplicateSymbol { symbol });
            }
            collected.push(symbol);
        }

        if collected.is_empty() {
            return Err(Error::EmptyAlphabet);
        }

        Ok(Self { symbols: collected })
    }

    /// `a-z`
    pub fn lowercase() -> Self {
        Self::from_trusted(LOWERCASE)
    }

    /// `a-z` followed by `A-Z`
    pub fn letters() -> Self {
        Self::from_trusted(&[LOWERCASE, UPPERCASE].concat())
    }

    /// Letters followed by `0-9`
    pub fn alphanumeric() -> Self {
        Self::from_trusted(&[LOWERCASE, UPPERCASE, DIGITS].concat())
    }

    /// Alphanumerics followed by [`SYMBOLS`]
    pub fn ascii() -> Self {
        Self::from_trusted(&[LOWERCASE, UPPERCASE, DIGITS, SYMBOLS].concat())
    }

    // Preset sets are known to be non-empty and duplicate free.
    fn from_trusted(symbols: &str) -> Self {
        Self { symbols: symbols.chars().collect() }
    }

    /// Number of symbols (the radix of the keyspace).
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; kept for the `len` convention.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Symbol at digit value `digit`.
    #[inline]
    pub fn symbol(&self, digit: usize) -> Option<char> {
        self.symbols.get(digit).copied()
    }

    /// Digit value of `symbol`, if it belongs to the alphabet.
    #[inline]
    pub fn digit(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.digit(symbol).is_some()
    }

    /// Draws a string of `length` symbols, each chosen independently and
    /// uniformly. This is a uniform draw from the keyspace of that length.
    pub fn random_string<R: Rng + ?Sized>(&self, rng: &mut R, length: usize) -> String {
        (0..length)
            .map(|_| self.symbols[rng.gen_range(0..self.symbols.len())])
            .collect()
    }
}

impl FromStr for Alphabet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            fmt::Write::write_char(f, *symbol)?;
        }
        Ok(())
    }
}
