//! Single-byte prober driven by a [`SequenceModel`].
//!
//! Every byte maps to a frequency order. Pairs of consecutive frequent letters
//! (both orders below [`SAMPLE_SIZE`]) are classified by the precedence
//! matrix, and the share of common pairs, relative to what real text of the
//! language shows, becomes the confidence:
//!
//! ```text
//! conf = positive / total_pairs / typical_positive_ratio × frequent / chars
//! ```
//!
//! The second factor discounts text where most letters fall outside the
//! language's frequent alphabet.

use crate::charset::Charset;
use crate::config::DetectorConfig;
use crate::multi_byte::NO_EVIDENCE;
use crate::prober::ProbingState;
use crate::sequence::{SequenceModel, CATEGORY_COUNT, POSITIVE_CAT, SAMPLE_SIZE, SYMBOL_CAT_ORDER};

const MAX_CONFIDENCE: f32 = 0.99;

/// Prober wrapping one language model.
#[derive(Clone, Debug)]
pub struct SingleByteProber {
    model: &'static SequenceModel,
    positive_shortcut: f32,
    enough_sequences: u32,
    state: ProbingState,
    last_order: u8,
    total_chars: u32,
    freq_chars: u32,
    total_seqs: u32,
    seq_counters: [u32; CATEGORY_COUNT],
    consumed: u64,
}

impl SingleByteProber {
    /// Creates a prober over `model`.
    pub fn new(model: &'static SequenceModel, config: &DetectorConfig) -> Self {
        Self {
            model,
            positive_shortcut: config.positive_shortcut,
            enough_sequences: config.enough_sequences,
            state: ProbingState::Detecting,
            last_order: u8::MAX,
            total_chars: 0,
            freq_chars: 0,
            total_seqs: 0,
            seq_counters: [0; CATEGORY_COUNT],
            consumed: 0,
        }
    }

    /// Feeds a chunk and returns the state afterwards.
    pub fn feed(&mut self, bytes: &[u8]) -> ProbingState {
        for &byte in bytes {
            if self.state != ProbingState::Detecting {
                break;
            }
            self.consumed += 1;
            let order = self.model.char_to_order(byte);
            if order < SYMBOL_CAT_ORDER {
                self.total_chars = self.total_chars.saturating_add(1);
            }
            if (order as usize) < SAMPLE_SIZE {
                self.freq_chars = self.freq_chars.saturating_add(1);
                if (self.last_order as usize) < SAMPLE_SIZE {
                    self.total_seqs = self.total_seqs.saturating_add(1);
                    let class = self.model.precedence(self.last_order, order) as usize;
                    self.seq_counters[class] = self.seq_counters[class].saturating_add(1);
                    self.check_shortcut();
                }
            }
            self.last_order = order;
        }
        self.state
    }

    fn check_shortcut(&mut self) {
        if self.total_seqs > self.enough_sequences && self.confidence() > self.positive_shortcut {
            tracing::debug!(
                charset = %self.model.charset(),
                pairs = self.total_seqs,
                "language model is confident"
            );
            self.state = ProbingState::FoundIt;
        }
    }

    /// Current verdict.
    pub fn state(&self) -> ProbingState {
        self.state
    }

    /// Pair-statistics confidence, clamped to `[0, 0.99]`.
    pub fn confidence(&self) -> f32 {
        if self.total_seqs == 0 || self.total_chars == 0 {
            return NO_EVIDENCE;
        }
        let positive = self.seq_counters[POSITIVE_CAT] as f32;
        let ratio = positive / self.total_seqs as f32 / self.model.typical_positive_ratio();
        let confidence = ratio * self.freq_chars as f32 / self.total_chars as f32;
        confidence.clamp(0.0, MAX_CONFIDENCE)
    }

    /// The model's encoding.
    pub fn charset(&self) -> Charset {
        self.model.charset()
    }

    /// Pairs scored so far.
    pub fn total_sequences(&self) -> u32 {
        self.total_seqs
    }

    /// Bytes read before reaching a verdict, or so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Returns to the initial state.
    pub fn reset(&mut self) {
        self.consumed = 0;
        self.state = ProbingState::Detecting;
        self.last_order = u8::MAX;
        self.total_chars = 0;
        self.freq_chars = 0;
        self.total_seqs = 0;
        self.seq_counters = [0; CATEGORY_COUNT];
    }
}
