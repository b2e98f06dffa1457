//! Byte-classification state machines for multi-byte encodings.
//!
//! Each encoding family gets an immutable [`StateMachineModel`]: a byte→class
//! table and a `state × class` transition table, both bit-packed. A
//! [`CodingStateMachine`] walks one model over the input, one byte at a time,
//! and reports whether the bytes seen so far still form valid characters.
//!
//! ```text
//! byte ──class_table──▶ class ──state_table[state × class_factor + class]──▶ next state
//! ```
//!
//! Three states are reserved:
//!
//! - [`START`]: at a character boundary.
//! - [`ERROR`]: the input is invalid for this encoding. Every transition out of
//!   `ERROR` leads back to `ERROR`.
//! - [`ITSME`]: a complete multi-byte character was just consumed. The row for
//!   `ITSME` is identical to the `START` row, so the next byte begins a new
//!   character.
//!
//! The machine only judges structure. Counting confirmed characters and
//! deciding what an `ERROR` means for the candidate is the prober's job.
//!
//! A model may also describe its lead-byte rows: the [`LeadRow::Text`] rows
//! hold the letters ordinary text of the language is written in (kana,
//! Hangul syllables, common hanzi), the [`LeadRow::Symbol`] rows hold
//! punctuation shared by every family member. Structure alone cannot tell
//! EUC-KR from EUC-JP; where the characters land can.

use crate::charset::Charset;
use crate::codec::BitPackage;
use crate::error::{Error, Result};

/// At a character boundary.
pub const START: u8 = 0;
/// Invalid input; terminal.
pub const ERROR: u8 = 1;
/// A complete multi-byte character was consumed.
pub const ITSME: u8 = 2;

/// Where a character's lead byte falls in the encoding's layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeadRow {
    /// Everyday letters of the language.
    Text,
    /// Punctuation and full-width forms.
    Symbol,
    /// Anything else: rare characters, extensions, user-defined rows.
    Other,
}

/// Immutable tables describing one encoding's byte structure.
#[derive(Debug)]
pub struct StateMachineModel {
    charset: Charset,
    class_table: BitPackage,
    class_factor: usize,
    state_table: BitPackage,
    char_len_table: &'static [u8],
    state_count: usize,
    text_rows: &'static [(u8, u8)],
    symbol_rows: &'static [(u8, u8)],
}

impl StateMachineModel {
    /// Assembles a model; table shapes are checked during const evaluation.
    pub const fn new(
        charset: Charset,
        class_table: BitPackage,
        class_factor: usize,
        state_table: BitPackage,
        char_len_table: &'static [u8],
        state_count: usize,
    ) -> Self {
        assert!(class_table.len() == 256, "class table must cover every byte");
        assert!(
            state_table.len() == class_factor * state_count,
            "state table must hold class_factor × state_count entries"
        );
        assert!(
            char_len_table.len() == class_factor,
            "char length table must hold one entry per class"
        );
        assert!(state_count > ITSME as usize, "reserved states are missing");
        Self {
            charset,
            class_table,
            class_factor,
            state_table,
            char_len_table,
            state_count,
            text_rows: &[],
            symbol_rows: &[],
        }
    }

    /// Attaches the lead-byte row layout, as inclusive ranges.
    pub const fn with_lead_rows(
        mut self,
        text_rows: &'static [(u8, u8)],
        symbol_rows: &'static [(u8, u8)],
    ) -> Self {
        self.text_rows = text_rows;
        self.symbol_rows = symbol_rows;
        self
    }

    /// The encoding this model validates.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Role of the row a character with lead byte `lead` belongs to.
    pub fn lead_row(&self, lead: u8) -> LeadRow {
        let within = |rows: &[(u8, u8)]| rows.iter().any(|&(lo, hi)| (lo..=hi).contains(&lead));
        if within(self.text_rows) {
            LeadRow::Text
        } else if within(self.symbol_rows) {
            LeadRow::Symbol
        } else {
            LeadRow::Other
        }
    }

    /// Number of lead bytes opening a text row; 0 when the model has no
    /// row layout. Narrower text blocks make for more specific evidence.
    pub fn text_row_count(&self) -> usize {
        self.text_rows
            .iter()
            .map(|&(lo, hi)| hi as usize - lo as usize + 1)
            .sum()
    }

    /// Class of a raw byte.
    #[inline(always)]
    pub fn class_of(&self, byte: u8) -> u8 {
        self.class_table.unpack(byte as usize)
    }

    /// Next state after reading a byte of class `class` in state `state`.
    #[inline(always)]
    pub fn transition(&self, state: u8, class: u8) -> u8 {
        self.state_table
            .unpack(state as usize * self.class_factor + class as usize)
    }

    /// Expected byte length of a character that starts with class `class`.
    #[inline(always)]
    pub fn char_len(&self, class: u8) -> u8 {
        self.char_len_table[class as usize]
    }

    /// Checks the value-level invariants the const constructor cannot see
    /// through the packing: classes and transitions in range, `ERROR` closed,
    /// `ITSME` behaving like `START`.
    pub fn validate(&self) -> Result<()> {
        if self
            .class_table
            .iter()
            .any(|class| class as usize >= self.class_factor)
        {
            return Err(Error::MalformedTable("byte class out of range"));
        }
        if self
            .state_table
            .iter()
            .any(|state| state as usize >= self.state_count)
        {
            return Err(Error::MalformedTable("transition to an undefined state"));
        }
        if self
            .text_rows
            .iter()
            .chain(self.symbol_rows)
            .any(|&(lo, hi)| lo > hi || lo < 0x80)
        {
            return Err(Error::MalformedTable("lead row range is not a high-byte range"));
        }
        for class in 0..self.class_factor as u8 {
            if self.transition(ERROR, class) != ERROR {
                return Err(Error::MalformedTable("error state is not terminal"));
            }
            if self.transition(ITSME, class) != self.transition(START, class) {
                return Err(Error::MalformedTable("confirmation row differs from start row"));
            }
        }
        Ok(())
    }
}

/// Run-time walker over one [`StateMachineModel`].
#[derive(Clone, Debug)]
pub struct CodingStateMachine {
    model: &'static StateMachineModel,
    state: u8,
    char_len: u8,
    lead: u8,
}

impl CodingStateMachine {
    /// Creates a machine at [`START`].
    pub fn new(model: &'static StateMachineModel) -> Self {
        Self {
            model,
            state: START,
            char_len: 0,
            lead: 0,
        }
    }

    /// Feeds one byte and returns the new state.
    ///
    /// When the byte opens a new character, it and the character's expected
    /// length are captured; see [`current_lead`](Self::current_lead) and
    /// [`current_char_len`](Self::current_char_len).
    #[inline]
    pub fn next_state(&mut self, byte: u8) -> u8 {
        let class = self.model.class_of(byte);
        if self.state == START || self.state == ITSME {
            self.char_len = self.model.char_len(class);
            self.lead = byte;
        }
        self.state = self.model.transition(self.state, class);
        self.state
    }

    /// Returns to [`START`], discarding any partial character.
    pub fn reset(&mut self) {
        self.state = START;
        self.char_len = 0;
        self.lead = 0;
    }

    /// Current state.
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Expected byte length of the character currently being read.
    pub fn current_char_len(&self) -> u8 {
        self.char_len
    }

    /// First byte of the character currently being read.
    pub fn current_lead(&self) -> u8 {
        self.lead
    }

    /// The encoding this machine validates.
    pub fn charset(&self) -> Charset {
        self.model.charset
    }

    /// The model being walked.
    pub fn model(&self) -> &'static StateMachineModel {
        self.model
    }
}
