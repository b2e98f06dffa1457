//! State-machine prober for multi-byte encodings.
//!
//! One [`CodingStateMachine`] per candidate encoding, all fed the same bytes.
//! A candidate that reaches `ERROR` before confirming any character is
//! dropped at once; afterwards it may survive up to `max_errors` errors, each
//! halving its confidence.
//!
//! # Confidence
//!
//! For a candidate with `n` confirmed multi-byte characters:
//!
//! ```text
//! structure = min(0.99, 1 − 0.99 · one_char_prob^n)
//! coverage  = n / (n + high_singles)
//! share     = text / (n − symbols)
//! conf      = structure · coverage · share · 0.5^errors
//! ```
//!
//! `one_char_prob` is the chance a random pair of high bytes happens to pass
//! the machine, so each confirmed character makes a fluke less likely.
//! `high_singles` counts high bytes the machine consumed as single-byte
//! characters (Shift_JIS half-width katakana, for instance): text that only
//! ever looks valid that way is probably not this encoding.
//!
//! `share` is the fraction of non-punctuation characters whose lead byte
//! falls in the model's text rows. Korean read as EUC-JP is structurally
//! flawless but has no kana; Japanese read as EUC-KR lands its kana outside
//! the Hangul rows. Models without a row layout score a share of 1.

use crate::charset::Charset;
use crate::config::DetectorConfig;
use crate::prober::ProbingState;
use crate::state_machine::{CodingStateMachine, LeadRow, StateMachineModel, ERROR, ITSME, START};

/// Confidence reported when there is no evidence either way.
pub(crate) const NO_EVIDENCE: f32 = 0.01;

const MAX_CONFIDENCE: f32 = 0.99;

/// Per-candidate counters.
#[derive(Clone, Debug)]
pub struct Candidate {
    machine: CodingStateMachine,
    alive: bool,
    confirmed: u32,
    text: u32,
    symbols: u32,
    high_singles: u32,
    errors: u32,
}

impl Candidate {
    fn new(model: &'static StateMachineModel) -> Self {
        Self {
            machine: CodingStateMachine::new(model),
            alive: true,
            confirmed: 0,
            text: 0,
            symbols: 0,
            high_singles: 0,
            errors: 0,
        }
    }

    /// The candidate encoding.
    pub fn charset(&self) -> Charset {
        self.machine.charset()
    }

    /// False once the candidate has been ruled out.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Complete multi-byte characters seen.
    pub fn confirmed(&self) -> u32 {
        self.confirmed
    }

    /// Share of non-punctuation characters written in the model's text
    /// rows; 1.0 for models without a row layout or before any evidence.
    pub fn text_share(&self) -> f32 {
        let scored = self.confirmed.saturating_sub(self.symbols);
        if scored == 0 || self.machine.model().text_row_count() == 0 {
            return 1.0;
        }
        self.text as f32 / scored as f32
    }

    /// Errors survived.
    pub fn errors(&self) -> u32 {
        self.errors
    }

    fn confidence(&self, one_char_prob: f32) -> f32 {
        if !self.alive || self.confirmed == 0 {
            return NO_EVIDENCE;
        }
        let n = self.confirmed;
        let structure = (1.0 - MAX_CONFIDENCE * one_char_prob.powi(saturating_i32(n)))
            .min(MAX_CONFIDENCE);
        let coverage = n as f32 / (n as f32 + self.high_singles as f32);
        let penalty = 0.5f32.powi(saturating_i32(self.errors));
        (structure * coverage * self.text_share() * penalty).max(NO_EVIDENCE)
    }

    fn confirm(&mut self) {
        self.confirmed = self.confirmed.saturating_add(1);
        let model = self.machine.model();
        match model.lead_row(self.machine.current_lead()) {
            LeadRow::Text => self.text = self.text.saturating_add(1),
            LeadRow::Symbol => self.symbols = self.symbols.saturating_add(1),
            LeadRow::Other => {}
        }
    }
}

fn saturating_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Prober over a group of multi-byte candidates.
#[derive(Clone, Debug)]
pub struct StateMachineProber {
    candidates: Vec<Candidate>,
    max_errors: u32,
    one_char_prob: f32,
    state: ProbingState,
}

impl StateMachineProber {
    /// Creates a prober over `models`, earlier models winning ties.
    pub fn new(models: &[&'static StateMachineModel], config: &DetectorConfig) -> Self {
        Self {
            candidates: models.iter().map(|&model| Candidate::new(model)).collect(),
            max_errors: config.max_errors,
            one_char_prob: config.one_char_prob,
            state: ProbingState::Detecting,
        }
    }

    /// Feeds a chunk and returns the state afterwards.
    pub fn feed(&mut self, bytes: &[u8]) -> ProbingState {
        if self.state != ProbingState::Detecting {
            return self.state;
        }
        for candidate in self.candidates.iter_mut().filter(|c| c.alive) {
            for &byte in bytes {
                match candidate.machine.next_state(byte) {
                    ERROR => {
                        candidate.errors = candidate.errors.saturating_add(1);
                        if candidate.confirmed == 0 || candidate.errors > self.max_errors {
                            tracing::debug!(
                                charset = %candidate.charset(),
                                confirmed = candidate.confirmed,
                                errors = candidate.errors,
                                "candidate dropped"
                            );
                            candidate.alive = false;
                            break;
                        }
                        candidate.machine.reset();
                    }
                    ITSME => candidate.confirm(),
                    START if byte >= 0x80 => {
                        candidate.high_singles = candidate.high_singles.saturating_add(1);
                    }
                    _ => {}
                }
            }
        }
        if self.candidates.iter().all(|c| !c.alive) {
            self.state = ProbingState::NotMe;
        }
        self.state
    }

    /// Current verdict.
    pub fn state(&self) -> ProbingState {
        self.state
    }

    fn best(&self) -> Option<(&Candidate, f32)> {
        let mut best: Option<(&Candidate, f32)> = None;
        for candidate in self.candidates.iter().filter(|c| c.alive) {
            let confidence = candidate.confidence(self.one_char_prob);
            if best.map_or(true, |(_, top)| confidence > top) {
                best = Some((candidate, confidence));
            }
        }
        best
    }

    /// Confidence of the best live candidate.
    pub fn confidence(&self) -> f32 {
        self.best().map_or(NO_EVIDENCE, |(_, confidence)| confidence)
    }

    /// The best live candidate.
    pub fn charset(&self) -> Option<Charset> {
        self.best().map(|(candidate, _)| candidate.charset())
    }

    /// Every candidate, live or not, in priority order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Returns every candidate to its initial state.
    pub fn reset(&mut self) {
        for candidate in &mut self.candidates {
            *candidate = Candidate::new(candidate.machine.model());
        }
        self.state = ProbingState::Detecting;
    }
}
