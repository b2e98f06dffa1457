//! The polymorphic prober.
//!
//! Every prober moves through the same lifecycle:
//!
//! ```text
//!             ┌──▶ FoundIt
//! Detecting ──┤
//!             └──▶ NotMe
//! ```
//!
//! Both outcomes are terminal. A `NotMe` prober is no longer fed and never
//! ranked; a `FoundIt` prober reports confidence 1.0.

use crate::charset::Charset;
use crate::escape::EscapeProber;
use crate::multi_byte::StateMachineProber;
use crate::single_byte::SingleByteProber;

/// Verdict of a prober so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProbingState {
    /// Still collecting evidence.
    Detecting,
    /// The input is this prober's encoding.
    FoundIt,
    /// The input cannot be this prober's encoding.
    NotMe,
}

/// The family a prober belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProberKind {
    /// 7-bit escape-sequence encodings.
    Escape,
    /// Multi-byte state-machine encodings.
    MultiByte,
    /// Single-byte language-model encodings.
    SingleByte,
}

/// One unit of detection.
#[derive(Clone, Debug)]
pub enum Prober {
    /// Escape-sequence dictionary matcher.
    Escape(EscapeProber),
    /// Group of multi-byte state machines.
    StateMachine(StateMachineProber),
    /// Language-model scorer.
    SingleByte(SingleByteProber),
}

impl Prober {
    /// Feeds a chunk; terminal probers ignore it.
    pub fn feed(&mut self, bytes: &[u8]) -> ProbingState {
        match self {
            Prober::Escape(p) => p.feed(bytes),
            Prober::StateMachine(p) => p.feed(bytes),
            Prober::SingleByte(p) => p.feed(bytes),
        }
    }

    /// Current verdict.
    pub fn state(&self) -> ProbingState {
        match self {
            Prober::Escape(p) => p.state(),
            Prober::StateMachine(p) => p.state(),
            Prober::SingleByte(p) => p.state(),
        }
    }

    /// Confidence in `[0, 1]`; 1.0 once `FoundIt`.
    pub fn confidence(&self) -> f32 {
        if self.state() == ProbingState::FoundIt {
            return 1.0;
        }
        match self {
            Prober::Escape(p) => p.confidence(),
            Prober::StateMachine(p) => p.confidence(),
            Prober::SingleByte(p) => p.confidence(),
        }
    }

    /// The encoding this prober currently stands for, if any.
    pub fn charset(&self) -> Option<Charset> {
        match self {
            Prober::Escape(p) => p.charset(),
            Prober::StateMachine(p) => p.charset(),
            Prober::SingleByte(p) => Some(p.charset()),
        }
    }

    /// Stream offset just past the byte that made this prober decisive.
    ///
    /// Lets the detector order verdicts by where they happened in the stream
    /// rather than by which chunk reported them.
    pub fn found_at(&self) -> Option<u64> {
        if self.state() != ProbingState::FoundIt {
            return None;
        }
        match self {
            Prober::Escape(p) => Some(p.bytes_consumed()),
            Prober::StateMachine(_) => None,
            Prober::SingleByte(p) => Some(p.bytes_consumed()),
        }
    }

    /// Returns to the initial state.
    pub fn reset(&mut self) {
        match self {
            Prober::Escape(p) => p.reset(),
            Prober::StateMachine(p) => p.reset(),
            Prober::SingleByte(p) => p.reset(),
        }
    }

    /// The prober's family.
    pub fn kind(&self) -> ProberKind {
        match self {
            Prober::Escape(_) => ProberKind::Escape,
            Prober::StateMachine(_) => ProberKind::MultiByte,
            Prober::SingleByte(_) => ProberKind::SingleByte,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::models::multi_byte::EUCKR_MODEL;
    use crate::models::single_byte_models;

    #[test]
    fn test_found_it_reports_full_confidence() {
        let mut prober = Prober::Escape(EscapeProber::new().unwrap());
        assert_eq!(prober.kind(), ProberKind::Escape);
        assert_eq!(prober.charset(), None);
        prober.feed(b"ab\x1b$)Ccd");
        assert_eq!(prober.state(), ProbingState::FoundIt);
        assert_eq!(prober.found_at(), Some(6));
        assert_eq!(prober.confidence(), 1.0);
        assert_eq!(prober.charset(), Some(Charset::Iso2022Kr));
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let config = DetectorConfig::default();
        let mut prober = Prober::StateMachine(StateMachineProber::new(&[&EUCKR_MODEL], &config));
        assert_eq!(prober.feed(b"\xFF"), ProbingState::NotMe);
        assert_eq!(prober.feed(b"\xB0\xA1"), ProbingState::NotMe);
        prober.reset();
        assert_eq!(prober.feed(b"\xB0\xA1"), ProbingState::Detecting);
        assert_eq!(prober.charset(), Some(Charset::EucKr));
    }

    #[test]
    fn test_single_byte_always_names_its_charset() {
        let model = &single_byte_models().unwrap()[1];
        let prober = Prober::SingleByte(SingleByteProber::new(model, &DetectorConfig::default()));
        assert_eq!(prober.kind(), ProberKind::SingleByte);
        assert_eq!(prober.charset(), Some(Charset::Windows1253));
        assert_eq!(prober.confidence(), 0.01);
    }
}
