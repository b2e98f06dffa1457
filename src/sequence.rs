//! Sequence (language) models for single-byte encodings.
//!
//! A single-byte encoding is judged by how natural its adjacent letter pairs
//! look for a given language. Each byte is first mapped to a frequency *order*
//! (0 = most frequent letter of the language). The 64 most frequent letters
//! form a square precedence matrix whose entries classify a pair as
//!
//! | class | meaning                 |
//! |-------|-------------------------|
//! | 0     | never seen              |
//! | 1     | rare                    |
//! | 2     | occasional              |
//! | 3     | common (positive)       |
//!
//! Orders at or above [`SYMBOL_CAT_ORDER`] are symbols, digits and control
//! bytes: they separate words but are not letters at all.
//!
//! Two encodings of the same language share the matrix and differ only in the
//! byte→order map.

use crate::charset::Charset;

/// Side length of the precedence matrix.
pub const SAMPLE_SIZE: usize = 64;

/// Orders at or above this value are not counted as characters.
pub const SYMBOL_CAT_ORDER: u8 = 250;

/// Number of precedence classes.
pub const CATEGORY_COUNT: usize = 4;

/// The precedence class of a common pair.
pub const POSITIVE_CAT: usize = CATEGORY_COUNT - 1;

/// A (language, encoding) pair-frequency model.
#[derive(Debug)]
pub struct SequenceModel {
    charset: Charset,
    char_to_order: &'static [u8; 256],
    precedence: &'static [u8],
    typical_positive_ratio: f32,
}

impl SequenceModel {
    /// Builds a model over an already validated precedence matrix.
    ///
    /// `precedence` must hold `SAMPLE_SIZE²` entries in `0..CATEGORY_COUNT`.
    pub(crate) fn new(
        charset: Charset,
        char_to_order: &'static [u8; 256],
        precedence: &'static [u8],
        typical_positive_ratio: f32,
    ) -> Self {
        debug_assert_eq!(precedence.len(), SAMPLE_SIZE * SAMPLE_SIZE);
        Self {
            charset,
            char_to_order,
            precedence,
            typical_positive_ratio,
        }
    }

    /// The encoding this model scores.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Frequency order of a raw byte.
    #[inline(always)]
    pub fn char_to_order(&self, byte: u8) -> u8 {
        self.char_to_order[byte as usize]
    }

    /// Precedence class of the pair `(first, second)`; both orders must be
    /// below [`SAMPLE_SIZE`].
    #[inline(always)]
    pub fn precedence(&self, first: u8, second: u8) -> u8 {
        self.precedence[first as usize * SAMPLE_SIZE + second as usize]
    }

    /// Share of common pairs observed in representative text.
    pub fn typical_positive_ratio(&self) -> f32 {
        self.typical_positive_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static IDENTITY: [u8; 256] = {
        let mut map = [255u8; 256];
        let mut i = 0;
        while i < SAMPLE_SIZE {
            map[b'a' as usize + i % 26] = (i % 26) as u8;
            i += 1;
        }
        map
    };

    #[test]
    fn test_precedence_is_row_major() {
        let matrix: Vec<u8> = (0..SAMPLE_SIZE * SAMPLE_SIZE)
            .map(|i| if i == SAMPLE_SIZE + 2 { 3 } else { 0 })
            .collect();
        let matrix: &'static [u8] = Box::leak(matrix.into_boxed_slice());
        let model = SequenceModel::new(Charset::Iso8859_7, &IDENTITY, matrix, 0.9);

        assert_eq!(model.precedence(1, 2), 3);
        assert_eq!(model.precedence(2, 1), 0);
        assert_eq!(model.char_to_order(b'c'), 2);
        assert_eq!(model.char_to_order(b'!'), 255);
        assert_eq!(model.charset(), Charset::Iso8859_7);
    }
}
