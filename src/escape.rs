//! Escape-sequence prober for 7-bit stateful encodings.
//!
//! ISO-2022-JP/KR/CN and HZ-GB-2312 are pure 7-bit streams whose non-ASCII
//! content is switched in by fixed byte sequences. The dictionary is compiled
//! into a linearized byte trie; the prober walks it once per byte.
//!
//! # Verdicts
//!
//! - A `Designate` match, or a `ShiftOut` after a `ShiftIn` of the same
//!   encoding, is decisive: `FoundIt`.
//! - A byte that breaks off a partial match rules out every encoding reachable
//!   from that partial match. The byte is then retried from the root, since it
//!   may open a new sequence.
//! - Any byte ≥ 0x80 rules out all of them.
//! - Inside an open HZ span, bytes pair up as GB2312 rows. A `~` in trail
//!   position is a character byte, not the start of an escape.
//! - `NotMe` once nothing is left.

use std::sync::OnceLock;

use crate::charset::Charset;
use crate::error::{Error, Result};
use crate::models::escape::{EscapeRole, EscapeSequence, ESCAPE_CHARSETS, ESCAPE_SEQUENCES};
use crate::models::get_or_try_init;
use crate::prober::ProbingState;

const NULL_NODE: u32 = u32::MAX;

/// One node of the linearized trie. Children form a sibling list.
#[derive(Clone, Copy, Debug)]
struct TrieNode {
    byte: u8,
    first_child: u32,
    next_sibling: u32,
    /// Index into the dictionary when a sequence ends here.
    terminal: u32,
    /// Bitmask over [`ESCAPE_CHARSETS`] of encodings with a sequence below.
    reach: u8,
}

impl TrieNode {
    const fn new(byte: u8) -> Self {
        Self {
            byte,
            first_child: NULL_NODE,
            next_sibling: NULL_NODE,
            terminal: NULL_NODE,
            reach: 0,
        }
    }
}

/// The escape dictionary compiled into a trie.
#[derive(Debug)]
pub struct EscapeTrie {
    nodes: Vec<TrieNode>,
    sequences: &'static [EscapeSequence],
}

impl EscapeTrie {
    /// Builds a trie over `sequences`.
    ///
    /// Fails when one sequence is a prefix of another, or names an encoding
    /// outside [`ESCAPE_CHARSETS`].
    pub fn build(sequences: &'static [EscapeSequence]) -> Result<Self> {
        let mut nodes = vec![TrieNode::new(0)];
        for (index, sequence) in sequences.iter().enumerate() {
            let bit = charset_bit(sequence.charset)
                .ok_or(Error::MalformedTable("escape sequence for an unlisted charset"))?;
            if sequence.bytes.is_empty() {
                return Err(Error::MalformedTable("empty escape sequence"));
            }
            let mut curr = 0usize;
            nodes[curr].reach |= bit;
            for &byte in sequence.bytes {
                if nodes[curr].terminal != NULL_NODE {
                    return Err(Error::MalformedTable("escape sequence shadows another"));
                }
                curr = match find_child(&nodes, curr, byte) {
                    Some(next) => next,
                    None => {
                        let next = nodes.len();
                        let mut node = TrieNode::new(byte);
                        node.next_sibling = nodes[curr].first_child;
                        nodes.push(node);
                        nodes[curr].first_child = next as u32;
                        next
                    }
                };
                nodes[curr].reach |= bit;
            }
            if nodes[curr].terminal != NULL_NODE || nodes[curr].first_child != NULL_NODE {
                return Err(Error::MalformedTable("escape sequence shadows another"));
            }
            nodes[curr].terminal = index as u32;
        }
        tracing::trace!(
            sequences = sequences.len(),
            nodes = nodes.len(),
            "built escape trie"
        );
        Ok(Self { nodes, sequences })
    }

    /// The shared trie over the built-in dictionary.
    pub fn global() -> Result<&'static Self> {
        static TRIE: OnceLock<EscapeTrie> = OnceLock::new();
        get_or_try_init(&TRIE, || Self::build(&ESCAPE_SEQUENCES))
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn child(&self, node: usize, byte: u8) -> Option<usize> {
        find_child(&self.nodes, node, byte)
    }
}

fn find_child(nodes: &[TrieNode], node: usize, byte: u8) -> Option<usize> {
    let mut curr = nodes[node].first_child;
    while curr != NULL_NODE {
        let candidate = &nodes[curr as usize];
        if candidate.byte == byte {
            return Some(curr as usize);
        }
        curr = candidate.next_sibling;
    }
    None
}

fn charset_bit(charset: Charset) -> Option<u8> {
    ESCAPE_CHARSETS
        .iter()
        .position(|&c| c == charset)
        .map(|i| 1u8 << i)
}

const ALL_ESCAPE: u8 = (1 << ESCAPE_CHARSETS.len()) - 1;

/// Walks the escape trie over the input.
#[derive(Clone, Debug)]
pub struct EscapeProber {
    trie: &'static EscapeTrie,
    node: usize,
    /// Encodings not yet ruled out.
    active: u8,
    /// Encodings with an open shift-in.
    shifted_in: u8,
    /// The next byte is the trail of an HZ double-byte character.
    hz_trail: bool,
    state: ProbingState,
    detected: Option<Charset>,
    consumed: u64,
}

impl EscapeProber {
    /// Creates a prober over the built-in dictionary.
    pub fn new() -> Result<Self> {
        Ok(Self::with_trie(EscapeTrie::global()?))
    }

    /// Creates a prober over a specific trie.
    pub fn with_trie(trie: &'static EscapeTrie) -> Self {
        Self {
            trie,
            node: 0,
            active: ALL_ESCAPE,
            shifted_in: 0,
            hz_trail: false,
            state: ProbingState::Detecting,
            detected: None,
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
            self.step(byte);
        }
        self.state
    }

    fn step(&mut self, byte: u8) {
        if byte >= 0x80 {
            tracing::debug!(byte, "high byte rules out escape encodings");
            self.active = 0;
            self.state = ProbingState::NotMe;
            return;
        }
        if std::mem::take(&mut self.hz_trail) && (0x21..=0x7E).contains(&byte) {
            return;
        }

        let next = match self.trie.child(self.node, byte) {
            Some(next) => next,
            None if self.node == 0 => {
                self.plain_byte(byte);
                return;
            }
            None => {
                self.active &= !self.trie.nodes[self.node].reach;
                self.node = 0;
                if self.active == 0 {
                    tracing::debug!("every escape encoding ruled out");
                    self.state = ProbingState::NotMe;
                    return;
                }
                match self.trie.child(0, byte) {
                    Some(next) => next,
                    None => {
                        self.plain_byte(byte);
                        return;
                    }
                }
            }
        };

        let terminal = self.trie.nodes[next].terminal;
        if terminal == NULL_NODE {
            self.node = next;
            return;
        }
        self.node = 0;
        let trie = self.trie;
        self.on_match(&trie.sequences[terminal as usize]);
    }

    /// A byte outside any sequence. In an open HZ span it leads a
    /// two-byte character.
    fn plain_byte(&mut self, byte: u8) {
        let in_hz = charset_bit(Charset::HzGb2312)
            .is_some_and(|bit| self.shifted_in & self.active & bit != 0);
        if in_hz && (0x21..=0x7E).contains(&byte) {
            self.hz_trail = true;
        }
    }

    fn on_match(&mut self, sequence: &EscapeSequence) {
        let Some(bit) = charset_bit(sequence.charset) else {
            return;
        };
        if self.active & bit == 0 {
            return;
        }
        match sequence.role {
            EscapeRole::Designate => self.found(sequence.charset),
            EscapeRole::ShiftIn => self.shifted_in |= bit,
            EscapeRole::ShiftOut if self.shifted_in & bit != 0 => self.found(sequence.charset),
            EscapeRole::ShiftOut | EscapeRole::Literal => {}
        }
    }

    fn found(&mut self, charset: Charset) {
        tracing::debug!(%charset, "escape sequence is decisive");
        self.detected = Some(charset);
        self.state = ProbingState::FoundIt;
    }

    /// Current verdict.
    pub fn state(&self) -> ProbingState {
        self.state
    }

    /// 1.0 once an encoding is found, 0.01 otherwise.
    pub fn confidence(&self) -> f32 {
        match self.detected {
            Some(_) => 1.0,
            None => 0.01,
        }
    }

    /// The detected encoding, if any.
    pub fn charset(&self) -> Option<Charset> {
        self.detected
    }

    /// Bytes read before reaching a verdict, or so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Encodings not yet ruled out.
    pub fn candidates(&self) -> impl Iterator<Item = Charset> + '_ {
        (0..ESCAPE_CHARSETS.len())
            .filter(move |i| self.active & (1 << i) != 0)
            .map(|i| ESCAPE_CHARSETS[i])
    }

    /// Returns to the initial state.
    pub fn reset(&mut self) {
        *self = Self::with_trie(self.trie);
    }
}
