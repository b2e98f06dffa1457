//! Greek language model shared by ISO-8859-7 and windows-1253.
//!
//! Frequency orders: 255 control, 254 CR/LF, 253 punctuation, 252 digit.
//! Of the pairs in the training text, 98.2851% fell into the first 512
//! sequences of the precedence matrix.

use std::sync::OnceLock;

use crate::charset::Charset;
use crate::codec::decompress;
use crate::error::{Error, Result};
use crate::sequence::{SequenceModel, CATEGORY_COUNT, SAMPLE_SIZE};

use super::get_or_try_init;

/// Share of common pairs in representative Greek text.
pub const GREEK_TYPICAL_POSITIVE_RATIO: f32 = 0.982851;

/// The 64×64 Greek precedence matrix as a raw DEFLATE stream.
static GREEK_PRECEDENCE_DEFLATE: [u8; 710] = [
    0xC5, 0x56, 0x5B, 0xB2, 0xEB, 0x30, 0x08, 0x43, 0xF2, 0xFE, 0xF7, 0x7C,
    0xC2, 0xD3, 0xD8, 0x69, 0x52, 0x77, 0xEE, 0xC7, 0x75, 0xA7, 0x6D, 0x1E,
    0x06, 0x09, 0x10, 0x24, 0x22, 0xFF, 0xBA, 0x06, 0x39, 0x62, 0xE1, 0xFA,
    0x8A, 0x9E, 0xCA, 0xF5, 0xA1, 0x0C, 0x3B, 0x10, 0xA1, 0xED, 0xE3, 0x83,
    0xF9, 0xB0, 0x6D, 0x6A, 0x10, 0x3F, 0x97, 0x89, 0x39, 0x18, 0x7C, 0xB6,
    0x9A, 0x97, 0xD9, 0xF0, 0xCD, 0x99, 0x30, 0x0E, 0xCC, 0xD5, 0xF4, 0xF1,
    0xE4, 0xC9, 0x37, 0xD6, 0x12, 0x22, 0x8C, 0xE9, 0x0C, 0x0E, 0xF8, 0xCB,
    0x98, 0x51, 0x4C, 0x47, 0x16, 0x10, 0x05, 0x9F, 0xEC, 0xB1, 0xC6, 0xCF,
    0xE1, 0x87, 0xE2, 0x29, 0xCC, 0x48, 0xC2, 0xEA, 0x01, 0xB9, 0xD9, 0xCB,
    0xC8, 0x7F, 0x5E, 0xD9, 0x10, 0x86, 0xD3, 0xF1, 0x66, 0xD8, 0xED, 0xCD,
    0x6C, 0x24, 0x7E, 0x25, 0x84, 0xAF, 0xC8, 0x9D, 0xBF, 0xD5, 0x39, 0x0D,
    0x55, 0x13, 0x4A, 0xE2, 0x00, 0x5D, 0x24, 0x43, 0xB5, 0xC2, 0xF9, 0x99,
    0xD7, 0x9F, 0xC1, 0x3F, 0x53, 0xF5, 0xA6, 0x1F, 0xBA, 0x70, 0x2A, 0x0B,
    0xD7, 0x59, 0x55, 0xEF, 0x2B, 0x7F, 0x66, 0xBC, 0xAA, 0x25, 0xCB, 0x84,
    0x15, 0x5F, 0x3C, 0x95, 0xB5, 0xF1, 0xC9, 0x9B, 0x47, 0xEE, 0xD9, 0x76,
    0xBD, 0x5B, 0x3A, 0x86, 0x5A, 0x1C, 0xE8, 0xE7, 0x60, 0x7D, 0xAD, 0x7F,
    0xD7, 0x9F, 0x48, 0xC8, 0xE7, 0xCA, 0x1C, 0xFD, 0xFC, 0xD5, 0x4B, 0xE4,
    0xCF, 0xDB, 0x38, 0xCE, 0xE0, 0xE2, 0x25, 0x3E, 0x9B, 0xEC, 0x0E, 0x24,
    0xF3, 0x27, 0x13, 0x9F, 0x56, 0xD2, 0xDE, 0xFF, 0x0F, 0x72, 0xE8, 0xFC,
    0x5B, 0xFE, 0x98, 0x2A, 0x9A, 0x1B, 0x9F, 0xF0, 0xC1, 0x59, 0xBF, 0xC2,
    0x57, 0x43, 0x0E, 0x7C, 0xAF, 0x5F, 0xE8, 0xCF, 0x45, 0x33, 0x13, 0xE9,
    0xFA, 0x3D, 0x90, 0x70, 0x29, 0x36, 0x71, 0xE7, 0xFC, 0xFA, 0x6E, 0x9C,
    0x71, 0xCD, 0xF8, 0x99, 0x7E, 0x9A, 0x7E, 0xF0, 0xCA, 0x3F, 0x07, 0x00,
    0x23, 0x6F, 0x91, 0xB9, 0xB3, 0xEE, 0x77, 0xFC, 0x6C, 0x5B, 0xF5, 0x02,
    0x93, 0x82, 0x35, 0xF4, 0x49, 0xFB, 0x7B, 0xFC, 0xCC, 0x88, 0x89, 0x5F,
    0xE3, 0x67, 0xAB, 0x7F, 0xD4, 0xEF, 0xE2, 0xA0, 0xAD, 0xA7, 0x0D, 0xD8,
    0x37, 0xBE, 0xF3, 0x57, 0x03, 0x84, 0x5E, 0x86, 0x0F, 0x5D, 0xE0, 0x40,
    0xC0, 0x86, 0x8C, 0xA6, 0xBB, 0xE0, 0x7F, 0x81, 0x9F, 0xC9, 0x7F, 0xD6,
    0x5F, 0x0B, 0x66, 0xA3, 0xD4, 0x74, 0x7B, 0x94, 0x3D, 0xC7, 0x8F, 0x9D,
    0x6E, 0x66, 0xCD, 0xA8, 0x9F, 0x23, 0xF8, 0x70, 0x62, 0xB8, 0xA6, 0x01,
    0x89, 0x4C, 0x81, 0xAE, 0x1F, 0x06, 0x15, 0x58, 0x3A, 0xF3, 0x6B, 0xE9,
    0x71, 0x50, 0x29, 0x7C, 0x38, 0x6D, 0xBB, 0x3B, 0x4E, 0x07, 0x96, 0x4D,
    0x4D, 0x45, 0xA8, 0x9F, 0x19, 0x8D, 0xFA, 0x80, 0x9D, 0xDA, 0x45, 0xAB,
    0x6B, 0x40, 0x4D, 0xEF, 0x7A, 0x75, 0xD8, 0xD0, 0xA5, 0x44, 0x2E, 0xF5,
    0x1E, 0x50, 0x1E, 0xC5, 0x29, 0x05, 0x77, 0xE6, 0x43, 0x11, 0x81, 0x6F,
    0xCF, 0xA9, 0xE1, 0x20, 0x5A, 0x35, 0x0D, 0x8D, 0x14, 0x69, 0xF8, 0x48,
    0x34, 0x9A, 0xD9, 0xD7, 0x87, 0xEA, 0x0F, 0x8B, 0xF1, 0x98, 0xB4, 0xDA,
    0xA7, 0x57, 0xA7, 0x3A, 0xB9, 0xBB, 0x98, 0x18, 0x05, 0xF1, 0x2D, 0x69,
    0xEF, 0xB3, 0x2E, 0xFA, 0x6D, 0x56, 0xA7, 0x76, 0x85, 0x83, 0x69, 0xB5,
    0x31, 0xB7, 0xD9, 0x6D, 0x10, 0x75, 0x33, 0x82, 0x44, 0xA3, 0x82, 0x99,
    0x3F, 0x2C, 0x08, 0xB6, 0xD0, 0xBD, 0xED, 0x17, 0x52, 0xCA, 0x88, 0x18,
    0x76, 0x02, 0xC6, 0xDF, 0xB0, 0x7D, 0x60, 0xA1, 0x1B, 0x25, 0xA3, 0x2D,
    0xEA, 0x16, 0x3F, 0xEB, 0x35, 0x03, 0xD5, 0x36, 0x38, 0x2F, 0x0F, 0x7D,
    0xF0, 0x55, 0xE2, 0xD7, 0xBB, 0xC8, 0x6E, 0xD0, 0x03, 0x30, 0xEA, 0x8F,
    0x86, 0x3F, 0xA4, 0x49, 0x2A, 0x7A, 0x70, 0xBA, 0x2A, 0xFD, 0x30, 0x6C,
    0xD8, 0x3C, 0xAF, 0x59, 0xD8, 0x03, 0x4C, 0x7E, 0x60, 0x2F, 0xBC, 0x26,
    0x71, 0x1D, 0x2C, 0x36, 0xF1, 0x11, 0xB9, 0x4B, 0x1E, 0x3E, 0x4E, 0x4E,
    0x46, 0x88, 0xFA, 0x9B, 0xFA, 0x2E, 0x97, 0xC8, 0xA3, 0xD4, 0x5F, 0x6C,
    0x62, 0xBC, 0x90, 0x76, 0xD7, 0x49, 0xA7, 0xF7, 0x7C, 0xD1, 0xC9, 0xFE,
    0x85, 0xC0, 0x67, 0x08, 0x56, 0xA3, 0x15, 0xBC, 0x3C, 0x2F, 0xF8, 0x0F,
    0xF5, 0x8F, 0x3B, 0x76, 0x6F, 0xB4, 0xEB, 0xED, 0xAF, 0xEA, 0x57, 0x45,
    0xC1, 0x0D, 0x7F, 0xE9, 0x98, 0xD6, 0x05, 0x3D, 0x13, 0x2B, 0xEB, 0x9E,
    0xFF, 0xB1, 0x6C, 0x6E, 0xB6, 0x59, 0x8E, 0xC6, 0x1F, 0xF7, 0xB2, 0x1B,
    0x7E, 0x05, 0xBB, 0xCC, 0xBF, 0x69, 0x5F, 0x59, 0x68, 0x10, 0x85, 0x5A,
    0x93, 0xEB, 0x43, 0xF8, 0xA7, 0xEB, 0x1E, 0xD6, 0xFD, 0xEE, 0xC6, 0xBA,
    0x8D, 0xAA, 0x7B, 0x71, 0xCC, 0x0A, 0xCD, 0xB4, 0x85, 0xF8, 0x71, 0xAD,
    0xEC, 0xF7, 0x81, 0xC2, 0x79, 0x2D, 0xDA, 0xFB, 0x99, 0xDF, 0x59, 0xE4,
    0xA8, 0x19, 0xC1, 0xDD, 0x62, 0x77, 0x60, 0xDE, 0x4F, 0xDE, 0x04, 0xDE,
    0xC0, 0x6E, 0xFE, 0x76, 0xE0, 0x9E, 0x20, 0xFC, 0x58, 0xBD, 0xFF, 0xB9,
    0xFE, 0x00,
];

#[rustfmt::skip]
static LATIN7_CHAR_TO_ORDER: [u8; 256] = [
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 254, 255, 255, 254, 255, 255, // 00
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, // 10
    253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, // 20
    252, 252, 252, 252, 252, 252, 252, 252, 252, 252, 253, 253, 253, 253, 253, 253, // 30
    253,  82, 100, 104,  94,  98, 101, 116, 102, 111, 187, 117,  92,  88, 113,  85, // 40
     79, 118, 105,  83,  67, 114, 119,  95,  99, 109, 188, 253, 253, 253, 253, 253, // 50
    253,  72,  70,  80,  81,  60,  96,  93,  89,  68, 120,  97,  77,  86,  69,  55, // 60
     78, 115,  65,  66,  58,  76, 106, 103,  87, 107, 112, 253, 253, 253, 253, 253, // 70
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, // 80
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, // 90
    253, 233,  90, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253,  74, 253, 253, // A0
    253, 253, 253, 253, 247, 248,  61,  36,  46,  71,  73, 253,  54, 253, 108, 123, // B0
    110,  31,  51,  43,  41,  34,  91,  40,  52,  47,  44,  53,  38,  49,  59,  39, // C0
     35,  48, 250,  37,  33,  45,  56,  50,  84,  57, 120, 121,  17,  18,  22,  15, // D0
    124,   1,  29,  20,  21,   3,  32,  13,  25,   5,  11,  16,  10,   6,  30,   4, // E0
      9,   8,  14,   7,   2,  12,  28,  23,  42,  24,  64,  75,  19,  26,  27, 253, // F0
];

#[rustfmt::skip]
static WIN1253_CHAR_TO_ORDER: [u8; 256] = [
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 254, 255, 255, 254, 255, 255, // 00
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, // 10
    253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253, // 20
    252, 252, 252, 252, 252, 252, 252, 252, 252, 252, 253, 253, 253, 253, 253, 253, // 30
    253,  82, 100, 104,  94,  98, 101, 116, 102, 111, 187, 117,  92,  88, 113,  85, // 40
     79, 118, 105,  83,  67, 114, 119,  95,  99, 109, 188, 253, 253, 253, 253, 253, // 50
    253,  72,  70,  80,  81,  60,  96,  93,  89,  68, 120,  97,  77,  86,  69,  55, // 60
     78, 115,  65,  66,  58,  76, 106, 103,  87, 107, 112, 253, 253, 253, 253, 253, // 70
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, // 80
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, // 90
    253, 233,  61, 253, 253, 253, 253, 253, 253, 253, 253, 253, 253,  74, 253, 253, // A0
    253, 253, 253, 253, 247, 253, 253,  36,  46,  71,  73, 253,  54, 253, 108, 123, // B0
    110,  31,  51,  43,  41,  34,  91,  40,  52,  47,  44,  53,  38,  49,  59,  39, // C0
     35,  48, 250,  37,  33,  45,  56,  50,  84,  57, 120, 121,  17,  18,  22,  15, // D0
    124,   1,  29,  20,  21,   3,  32,  13,  25,   5,  11,  16,  10,   6,  30,   4, // E0
      9,   8,  14,   7,   2,  12,  28,  23,  42,  24,  64,  75,  19,  26,  27, 253, // F0
];

static GREEK_PRECEDENCE: OnceLock<Vec<u8>> = OnceLock::new();

/// The decoded precedence matrix, inflated on first use.
pub fn greek_precedence() -> Result<&'static [u8]> {
    get_or_try_init(&GREEK_PRECEDENCE, || {
        let table = decompress(&GREEK_PRECEDENCE_DEFLATE, SAMPLE_SIZE * SAMPLE_SIZE)?;
        if table.iter().any(|&class| class as usize >= CATEGORY_COUNT) {
            return Err(Error::MalformedTable("greek precedence class out of range"));
        }
        tracing::trace!(
            packed = GREEK_PRECEDENCE_DEFLATE.len(),
            decoded = table.len(),
            "inflated greek precedence matrix"
        );
        Ok(table)
    })
    .map(Vec::as_slice)
}

/// ISO-8859-7 and windows-1253 models, in that order.
pub(crate) fn greek_models() -> Result<[SequenceModel; 2]> {
    let precedence = greek_precedence()?;
    Ok([
        SequenceModel::new(
            Charset::Iso8859_7,
            &LATIN7_CHAR_TO_ORDER,
            precedence,
            GREEK_TYPICAL_POSITIVE_RATIO,
        ),
        SequenceModel::new(
            Charset::Windows1253,
            &WIN1253_CHAR_TO_ORDER,
            precedence,
            GREEK_TYPICAL_POSITIVE_RATIO,
        ),
    ])
}
