//! The aggregate detector: one detection session over a byte stream.
//!
//! ```text
//!            ┌─ BOM sniff (first ≤ 4 bytes) ──▶ resolved
//! feed(chunk)┤
//!            └─ input state ─▶ escape ─▶ multi-byte groups ─▶ single-byte
//!                                     (every prober still Detecting)
//! ```
//!
//! After each chunk the earliest decisive prober in the stream resolves the
//! session (ties by priority). Escape probers may do so at any time; the
//! others only once a high byte has been seen. Without a resolution,
//! [`Detector::result`] ranks whatever is still alive.

use std::io::{ErrorKind, Read};

use serde::{Deserialize, Serialize};

use crate::charset::Charset;
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::escape::EscapeProber;
use crate::models::multi_byte::multi_byte_groups;
use crate::models::single_byte_models;
use crate::multi_byte::StateMachineProber;
use crate::prober::{Prober, ProberKind, ProbingState};
use crate::single_byte::SingleByteProber;

/// Longest byte-order mark.
const BOM_MAX: usize = 4;

/// Checked longest first wherever one mark prefixes another.
const BOMS: [(&[u8], Charset); 5] = [
    (&[0x00, 0x00, 0xFE, 0xFF], Charset::Utf32Be),
    (&[0xFF, 0xFE, 0x00, 0x00], Charset::Utf32Le),
    (&[0xEF, 0xBB, 0xBF], Charset::Utf8),
    (&[0xFE, 0xFF], Charset::Utf16Be),
    (&[0xFF, 0xFE], Charset::Utf16Le),
];

const READ_CHUNK: usize = 8 * 1024;

/// A detected encoding and how sure the detector is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    /// The encoding.
    pub charset: Charset,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

/// What kind of bytes the stream has shown so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputState {
    /// Only 7-bit bytes, no escape material.
    PureAscii,
    /// 7-bit bytes including ESC or `~{`.
    EscAscii,
    /// At least one byte ≥ 0x80.
    HighByte,
}

enum Sniff {
    Bom(Charset),
    NoBom,
    NeedMore,
}

fn sniff_bom(head: &[u8], at_end: bool) -> Sniff {
    let extendable = BOMS
        .iter()
        .any(|(bom, _)| bom.len() > head.len() && bom.starts_with(head));
    if extendable && !at_end {
        return Sniff::NeedMore;
    }
    BOMS.iter()
        .find(|(bom, _)| head.starts_with(bom))
        .map_or(Sniff::NoBom, |&(_, charset)| Sniff::Bom(charset))
}

/// A streaming detection session.
#[derive(Clone, Debug)]
pub struct Detector {
    config: DetectorConfig,
    probers: Vec<Prober>,
    /// Leading bytes held back while a BOM is still possible; `None` once
    /// sniffing is over.
    bom_head: Option<Vec<u8>>,
    input_state: InputState,
    last_byte: u8,
    total_bytes: u64,
    resolved: Option<Guess>,
}

impl Detector {
    /// Creates a session with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(DetectorConfig::default())
    }

    /// Creates a session; fails on invalid configuration or model data.
    pub fn with_config(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let mut probers = Vec::new();
        if config.escape {
            probers.push(Prober::Escape(EscapeProber::new()?));
        }
        if config.multi_byte {
            for group in multi_byte_groups()? {
                probers.push(Prober::StateMachine(StateMachineProber::new(group, &config)));
            }
        }
        if config.single_byte {
            for model in single_byte_models()? {
                probers.push(Prober::SingleByte(SingleByteProber::new(model, &config)));
            }
        }
        Ok(Self {
            config,
            probers,
            bom_head: Some(Vec::with_capacity(BOM_MAX)),
            input_state: InputState::PureAscii,
            last_byte: 0,
            total_bytes: 0,
            resolved: None,
        })
    }

    /// Feeds the next chunk of the stream. Never fails; invalid input is a
    /// verdict, not an error.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.total_bytes += bytes.len() as u64;
        if self.resolved.is_some() || bytes.is_empty() {
            return;
        }
        let Some(mut head) = self.bom_head.take() else {
            self.process(bytes);
            return;
        };
        let take = (BOM_MAX - head.len()).min(bytes.len());
        head.extend_from_slice(&bytes[..take]);
        match sniff_bom(&head, false) {
            Sniff::NeedMore => self.bom_head = Some(head),
            Sniff::Bom(charset) => self.resolve_bom(charset),
            Sniff::NoBom => {
                self.process(&head);
                self.process(&bytes[take..]);
            }
        }
    }

    fn resolve_bom(&mut self, charset: Charset) {
        tracing::debug!(%charset, "byte-order mark");
        self.resolved = Some(Guess {
            charset,
            confidence: 1.0,
        });
    }

    fn process(&mut self, bytes: &[u8]) {
        if bytes.is_empty() || self.resolved.is_some() {
            return;
        }
        self.update_input_state(bytes);

        for prober in &mut self.probers {
            if prober.state() != ProbingState::Detecting {
                continue;
            }
            if prober.feed(bytes) == ProbingState::NotMe {
                tracing::debug!(kind = ?prober.kind(), "prober retired");
            }
        }

        if self.config.short_circuit {
            if let Some(guess) = self.earliest_decisive() {
                tracing::debug!(
                    charset = %guess.charset,
                    offset = self.total_bytes,
                    "session resolved"
                );
                self.resolved = Some(guess);
            }
        }
    }

    fn update_input_state(&mut self, bytes: &[u8]) {
        if self.input_state == InputState::HighByte {
            return;
        }
        let before = self.input_state;
        let mut prev = self.last_byte;
        for &byte in bytes {
            if byte >= 0x80 {
                self.input_state = InputState::HighByte;
                break;
            }
            if byte == 0x1B || (prev == b'~' && byte == b'{') {
                self.input_state = InputState::EscAscii;
            }
            prev = byte;
        }
        self.last_byte = prev;
        if self.input_state != before {
            tracing::debug!(from = ?before, to = ?self.input_state, "input state");
        }
    }

    /// Decisive probers allowed to resolve the session, earliest in the
    /// stream first, then by priority.
    fn earliest_decisive(&self) -> Option<Guess> {
        self.probers
            .iter()
            .filter(|p| p.kind() == ProberKind::Escape || self.input_state == InputState::HighByte)
            .filter_map(|p| Some((p.found_at()?, p.charset()?)))
            .min_by_key(|&(offset, _)| offset)
            .map(|(_, charset)| Guess {
                charset,
                confidence: 1.0,
            })
    }

    /// The best guess so far, or `None` when the encoding is unknown.
    ///
    /// Bytes held back for BOM sniffing are taken into account as if the
    /// stream ended here; the session itself is left untouched.
    pub fn result(&self) -> Option<Guess> {
        if self.bom_head.as_ref().is_some_and(|head| !head.is_empty()) {
            return self.clone().finish();
        }
        if let Some(guess) = self.resolved {
            return Some(guess);
        }
        if self.total_bytes == 0 {
            return None;
        }
        if self.input_state != InputState::HighByte {
            // Only an escape encoding can beat plain ASCII here.
            let escape = self
                .probers
                .iter()
                .filter(|p| p.kind() == ProberKind::Escape)
                .find_map(|p| p.found_at().and(p.charset()));
            return Some(Guess {
                charset: escape.unwrap_or(Charset::Ascii),
                confidence: 1.0,
            });
        }
        if let Some(guess) = self.earliest_decisive() {
            return Some(guess);
        }

        let mut best: Option<Guess> = None;
        for prober in &self.probers {
            if prober.state() == ProbingState::NotMe {
                continue;
            }
            let Some(charset) = prober.charset() else {
                continue;
            };
            let confidence = prober.confidence();
            if best.map_or(true, |b| confidence > b.confidence) {
                best = Some(Guess {
                    charset,
                    confidence,
                });
            }
        }
        best.filter(|guess| guess.confidence >= self.config.minimum_confidence)
    }

    /// Ends the stream: settles any held-back BOM prefix and returns the
    /// result.
    pub fn finish(&mut self) -> Option<Guess> {
        if let Some(head) = self.bom_head.take() {
            match sniff_bom(&head, true) {
                Sniff::Bom(charset) => self.resolve_bom(charset),
                Sniff::NoBom | Sniff::NeedMore => self.process(&head),
            }
        }
        self.result()
    }

    /// Returns to the freshly constructed state, keeping the configuration.
    pub fn reset(&mut self) {
        for prober in &mut self.probers {
            prober.reset();
        }
        self.bom_head = Some(Vec::with_capacity(BOM_MAX));
        self.input_state = InputState::PureAscii;
        self.last_byte = 0;
        self.total_bytes = 0;
        self.resolved = None;
    }

    /// Every prober in priority order.
    pub fn probers(&self) -> &[Prober] {
        &self.probers
    }

    /// What kind of bytes the stream has shown so far.
    pub fn input_state(&self) -> InputState {
        self.input_state
    }

    /// Total bytes passed to [`feed`](Self::feed).
    pub fn bytes_fed(&self) -> u64 {
        self.total_bytes
    }

    /// True once the session is resolved; further input is ignored.
    pub fn is_done(&self) -> bool {
        self.resolved.is_some()
    }

    /// The session's configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}

/// Detects the encoding of a complete buffer.
pub fn detect(bytes: &[u8]) -> Result<Option<Guess>> {
    let mut detector = Detector::new()?;
    detector.feed(bytes);
    Ok(detector.finish())
}

/// Detects the encoding of a reader, stopping early once resolved.
pub fn detect_reader<R: Read>(mut reader: R) -> Result<Option<Guess>> {
    let mut detector = Detector::new()?;
    let mut buf = vec![0u8; READ_CHUNK];
    while !detector.is_done() {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        detector.feed(&buf[..n]);
    }
    Ok(detector.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn guess(bytes: &[u8]) -> Option<Guess> {
        detect(bytes).unwrap()
    }

    #[test]
    fn test_empty_stream_is_unknown() {
        assert_eq!(guess(b""), None);
        let detector = Detector::new().unwrap();
        assert_eq!(detector.result(), None);
    }

    #[test]
    fn test_ascii() {
        let g = guess(b"Plain old ASCII text.\n").unwrap();
        assert_eq!(g.charset, Charset::Ascii);
        assert_eq!(g.confidence, 1.0);
    }

    #[test]
    fn test_boms() {
        let cases: [(&[u8], Charset); 6] = [
            (b"\xEF\xBB\xBFhello", Charset::Utf8),
            (b"\xFE\xFF\x00h", Charset::Utf16Be),
            (b"\xFF\xFEh\x00", Charset::Utf16Le),
            (b"\xFF\xFE\x00\x00h\x00\x00\x00", Charset::Utf32Le),
            (b"\x00\x00\xFE\xFF", Charset::Utf32Be),
            (b"\xFF\xFE", Charset::Utf16Le),
        ];
        for (bytes, charset) in cases {
            let g = guess(bytes).unwrap();
            assert_eq!(g.charset, charset, "{bytes:02X?}");
            assert_eq!(g.confidence, 1.0);
        }
    }

    #[test]
    fn test_bom_split_across_chunks() {
        let mut detector = Detector::new().unwrap();
        detector.feed(b"\xFF");
        assert!(!detector.is_done());
        detector.feed(b"\xFE");
        // Could still become UTF-32LE.
        assert!(!detector.is_done());
        assert_eq!(detector.result().map(|g| g.charset), Some(Charset::Utf16Le));
        detector.feed(b"\x00");
        detector.feed(b"\x00");
        assert!(detector.is_done());
        assert_eq!(detector.result().map(|g| g.charset), Some(Charset::Utf32Le));
    }

    #[test]
    fn test_bom_prefix_that_is_text() {
        // 0xEF 0xBB without 0xBF is not a BOM; the bytes still reach the probers.
        let mut detector = Detector::new().unwrap();
        detector.feed(b"\xEF\xBB");
        detector.feed(b"x");
        assert!(!detector.is_done());
        assert_eq!(detector.input_state(), InputState::HighByte);
        assert_eq!(detector.bytes_fed(), 3);
    }

    #[test]
    fn test_escape_resolves_early() {
        let mut detector = Detector::new().unwrap();
        detector.feed(b"Subject: \x1b$B$3$s$K$A$O\x1b(B\r\n");
        assert!(detector.is_done());
        assert_eq!(detector.input_state(), InputState::EscAscii);
        let g = detector.result().unwrap();
        assert_eq!(g.charset, Charset::Iso2022Jp);
        assert_eq!(g.confidence, 1.0);
    }

    #[test]
    fn test_hz_marks_escape_ascii_across_chunks() {
        let mut detector = Detector::new().unwrap();
        detector.feed(b"abc~");
        assert_eq!(detector.input_state(), InputState::PureAscii);
        detector.feed(b"{");
        assert_eq!(detector.input_state(), InputState::EscAscii);
        // Without a shift-out HZ is not proven; the text is plain ASCII.
        assert_eq!(detector.result().map(|g| g.charset), Some(Charset::Ascii));
    }

    #[test]
    fn test_truncated_utf8_is_unknown() {
        assert_eq!(guess(&[0xC3]), None);
        let mut detector = Detector::new().unwrap();
        detector.feed(&[0xC3]);
        assert!(detector
            .probers()
            .iter()
            .all(|p| p.state() != ProbingState::FoundIt));
    }

    #[test]
    fn test_utf8_text() {
        let g = guess("Привет, мир! Как дела?".as_bytes()).unwrap();
        assert_eq!(g.charset, Charset::Utf8);
        assert!(g.confidence > 0.9);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DetectorConfig {
            minimum_confidence: -0.1,
            ..DetectorConfig::default()
        };
        assert!(Detector::with_config(config).is_err());
    }

    #[test]
    fn test_families_can_be_disabled() {
        let config = DetectorConfig {
            escape: false,
            single_byte: false,
            ..DetectorConfig::default()
        };
        let detector = Detector::with_config(config.clone()).unwrap();
        assert_eq!(detector.config(), &config);
        assert!(detector
            .probers()
            .iter()
            .all(|p| p.kind() == ProberKind::MultiByte));
        assert_eq!(detector.probers().len(), 4);
    }

    #[test]
    fn test_reader_stops_once_resolved() {
        struct Endless;
        impl Read for Endless {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                buf.fill(b'a');
                buf[..4].copy_from_slice(b"\x1b$)C");
                Ok(buf.len())
            }
        }
        let g = detect_reader(Endless).unwrap().unwrap();
        assert_eq!(g.charset, Charset::Iso2022Kr);
    }

    #[test]
    fn test_reader_surfaces_io_errors() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(ErrorKind::Other, "disk on fire"))
            }
        }
        assert!(matches!(
            detect_reader(Broken),
            Err(crate::error::Error::Io(_))
        ));
    }

    #[test]
    fn test_sessions_can_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Detector>();

        let handles: Vec<_> = ["Ελληνικά", "日本語のテキスト"]
            .into_iter()
            .map(|text| std::thread::spawn(move || guess(text.as_bytes())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().map(|g| g.charset), Some(Charset::Utf8));
        }
    }

    #[test]
    fn test_reset_matches_fresh_session() {
        let bytes = "Ελληνικά".as_bytes();
        let mut detector = Detector::new().unwrap();
        detector.feed(bytes);
        let first = detector.finish();
        detector.reset();
        assert_eq!(detector.bytes_fed(), 0);
        assert_eq!(detector.input_state(), InputState::PureAscii);
        detector.feed(bytes);
        assert_eq!(detector.finish(), first);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_ascii_is_ascii(text in "[ -}\n\t]{1,200}") {
            let g = guess(text.as_bytes()).unwrap();
            prop_assert_eq!(g.charset, Charset::Ascii);
            prop_assert_eq!(g.confidence, 1.0);
        }

        #[test]
        fn prop_chunking_is_invisible(
            bytes in prop::collection::vec(any::<u8>(), 0..512),
            cuts in prop::collection::vec(any::<usize>(), 0..8),
        ) {
            let whole = guess(&bytes);
            let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c % (bytes.len() + 1)).collect();
            cuts.sort_unstable();
            let mut detector = Detector::new().unwrap();
            let mut start = 0;
            for cut in cuts {
                detector.feed(&bytes[start..cut]);
                start = cut;
            }
            detector.feed(&bytes[start..]);
            prop_assert_eq!(detector.finish(), whole);
        }
    }
}
