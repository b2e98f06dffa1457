//! # Charset Probing
//!
//! *Streaming character-encoding detection from bytes alone.*
//!
//! ## Intuition First
//!
//! Hand someone a page of text in an unknown script and ask which encoding it
//! was saved in. They would not decode it every possible way; they would rule
//! things out. "That byte can't start a character in UTF-8." "No Japanese
//! text switches character sets with that escape." "These letter pairs are
//! nothing like Greek." Whatever survives, weighted by how natural it looks,
//! is the answer.
//!
//! This crate runs that process as a committee of *probers*, each an expert in
//! one encoding family, all reading the same bytes in parallel.
//!
//! ## The Problem
//!
//! Encoding labels are often missing or wrong, and many legacy encodings
//! accept almost any byte string. Structure alone rarely settles it:
//! - **Validity** rules encodings *out* (a byte sequence that cannot occur).
//! - **Statistics** rank what is left (how typical the text looks).
//!
//! ## Historical Context
//!
//! ```text
//! 1986  ISO 2022    Escape sequences switch character sets in 7-bit streams
//! 1993  RFC 1468    ISO-2022-JP for Japanese mail
//! 1995  RFC 1843    HZ: `~{ ... ~}` for Chinese in 7-bit channels
//! 2001  Li & Momoi  "A composite approach to language/encoding detection"
//!                   (Netscape/Mozilla universal charset detector)
//! 2019  WHATWG      Encoding Standard fixes the label set browsers use
//! ```
//!
//! ## Mathematical Formulation
//!
//! Multi-byte probers run a finite-state machine per encoding. A byte is mapped
//! to a class, and the next state is a table lookup:
//!
//! ```text
//! state' = T[state · class_factor + class(byte)]
//! ```
//!
//! With `n` confirmed characters, the chance that random bytes got that far is
//! roughly `p^n`, so confidence grows as `1 − 0.99 · p^n`.
//!
//! Single-byte probers score adjacent letter pairs `(a, b)` against a
//! precedence matrix `P` learned from real text:
//!
//! ```text
//! conf = |{(a,b) : P[a][b] = common}| / |pairs| / r_typical × frequent / chars
//! ```
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(k)$ per byte for `k` live candidates, all table lookups.
//! - **Space**: $O(1)$ per session; model tables are `'static` and shared.
//!
//! ## Failure Modes
//!
//! 1. **Short input**: a handful of bytes fits many encodings equally well.
//! 2. **Structural twins**: EUC-KR, EUC-JP, GB18030 and Big5 accept much of
//!    each other's text. Without character-frequency data, the lead rows
//!    carrying each encoding's core script (Hangul, kana, hanzi) decide.
//!    Remaining ties go to the encoding with the narrower text block.
//! 3. **Mixed content**: text that switches encodings mid-stream has no
//!    single right answer.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **[`Detector`]**: a streaming session; feed chunks, ask for a [`Guess`].
//! - **Escape prober**: ISO-2022-JP/KR/CN and HZ-GB-2312 by dictionary trie.
//! - **State-machine probers**: UTF-8, Shift_JIS, EUC-KR, EUC-JP, Big5, GB18030.
//! - **Single-byte probers**: ISO-8859-7 and windows-1253 by Greek language model.
//! - **BOM sniffing** for UTF-8/16/32.
//!
//! Tables are bit-packed at compile time; the language matrix ships as raw
//! DEFLATE and is inflated once on first use.
//!
//! ```
//! use charprobe::{detect, Charset};
//!
//! let guess = detect("Жил-был кот.".as_bytes()).unwrap().unwrap();
//! assert_eq!(guess.charset, Charset::Utf8);
//! ```
//!
//! ## References
//!
//! - Li, S., Momoi, K. (2001). "A composite approach to language/encoding detection."
//! - RFC 1468, RFC 1557, RFC 1843, RFC 1922 (ISO-2022-JP, -KR, HZ, -CN).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod charset;
pub mod codec;
pub mod config;
pub mod detector;
pub mod error;
pub mod escape;
pub mod models;
pub mod multi_byte;
pub mod prober;
pub mod sequence;
pub mod single_byte;
pub mod state_machine;

pub use charset::Charset;
pub use config::DetectorConfig;
pub use detector::{detect, detect_reader, Detector, Guess, InputState};
pub use error::{Error, Result};
pub use prober::{Prober, ProberKind, ProbingState};
