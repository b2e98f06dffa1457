//! Coding state machines for the multi-byte encodings.
//!
//! Every table is written as class ranges and state rows and packed at compile
//! time. Row order is always `START`, `ERROR`, `ITSME`, then the
//! encoding-specific intermediate states. `ITSME` repeats the `START` row.
//!
//! The legacy machines only accept lead bytes of rows their character set
//! actually assigns, so user-defined and vendor-extension rows count as
//! errors. Each also carries its lead-row layout (see
//! [`LeadRow`](crate::state_machine::LeadRow)).

use std::sync::OnceLock;

use crate::charset::Charset;
use crate::codec::{classify, pack, pack_rows, packed_len, BitPackage, PackWidth};
use crate::error::Result;
use crate::state_machine::{StateMachineModel, ERROR, ITSME, START};

use super::get_or_try_init;

const S: u8 = START;
const E: u8 = ERROR;
const M: u8 = ITSME;

// UTF-8 ----------------------------------------------------------------------
//
// Overlong forms (C0, C1, E0 80-9F, F0 80-8F), surrogates (ED A0-BF) and code
// points above U+10FFFF (F4 90+, F5-FF) are rejected.

const UTF8_CLASSES: [u8; 256] = classify(&[
    (0x00, 0x7F, 0),
    (0x80, 0x8F, 1),
    (0x90, 0x9F, 2),
    (0xA0, 0xBF, 3),
    (0xC0, 0xC1, 4),
    (0xC2, 0xDF, 5),
    (0xE0, 0xE0, 6),
    (0xE1, 0xEC, 7),
    (0xED, 0xED, 8),
    (0xEE, 0xEF, 7),
    (0xF0, 0xF0, 9),
    (0xF1, 0xF3, 10),
    (0xF4, 0xF4, 11),
    (0xF5, 0xFF, 4),
]);

const UTF8_CLASS_FACTOR: usize = 12;
const UTF8_STATE_COUNT: usize = 10;

#[rustfmt::skip]
const UTF8_STATES: [[u8; UTF8_CLASS_FACTOR]; UTF8_STATE_COUNT] = [
    [S, E, E, E, E, 3, 5, 4, 6, 8, 7, 9], // START
    [E, E, E, E, E, E, E, E, E, E, E, E], // ERROR
    [S, E, E, E, E, 3, 5, 4, 6, 8, 7, 9], // ITSME
    [E, M, M, M, E, E, E, E, E, E, E, E], // one continuation left
    [E, 3, 3, 3, E, E, E, E, E, E, E, E], // two left
    [E, E, E, 3, E, E, E, E, E, E, E, E], // after E0
    [E, 3, 3, E, E, E, E, E, E, E, E, E], // after ED
    [E, 4, 4, 4, E, E, E, E, E, E, E, E], // three left
    [E, E, 4, 4, E, E, E, E, E, E, E, E], // after F0
    [E, 4, E, E, E, E, E, E, E, E, E, E], // after F4
];

static UTF8_CLASS_TABLE: [u8; packed_len(256, PackWidth::Four)] =
    pack(&UTF8_CLASSES, PackWidth::Four);
static UTF8_STATE_TABLE: [u8; packed_len(UTF8_CLASS_FACTOR * UTF8_STATE_COUNT, PackWidth::Four)] =
    pack_rows(&UTF8_STATES, PackWidth::Four);

/// UTF-8.
pub static UTF8_MODEL: StateMachineModel = StateMachineModel::new(
    Charset::Utf8,
    BitPackage::new(PackWidth::Four, 256, &UTF8_CLASS_TABLE),
    UTF8_CLASS_FACTOR,
    BitPackage::new(
        PackWidth::Four,
        UTF8_CLASS_FACTOR * UTF8_STATE_COUNT,
        &UTF8_STATE_TABLE,
    ),
    &[1, 0, 0, 0, 0, 2, 3, 3, 3, 4, 4, 4],
    UTF8_STATE_COUNT,
);

// Shift_JIS ------------------------------------------------------------------
//
// Lead 81-9F / E0-FC, trail 40-7E / 80-FC. A1-DF alone is half-width katakana.

const SJIS_CLASSES: [u8; 256] = classify(&[
    (0x00, 0x3F, 0),
    (0x40, 0x7E, 1),
    (0x7F, 0x7F, 0),
    (0x80, 0x80, 2),
    (0x81, 0x9F, 3),
    (0xA0, 0xA0, 2),
    (0xA1, 0xDF, 4),
    (0xE0, 0xFC, 3),
    (0xFD, 0xFF, 5),
]);

const SJIS_CLASS_FACTOR: usize = 6;
const SJIS_STATE_COUNT: usize = 4;

#[rustfmt::skip]
const SJIS_STATES: [[u8; SJIS_CLASS_FACTOR]; SJIS_STATE_COUNT] = [
    [S, S, E, 3, S, E],
    [E, E, E, E, E, E],
    [S, S, E, 3, S, E],
    [E, M, M, M, M, E],
];

static SJIS_CLASS_TABLE: [u8; packed_len(256, PackWidth::Four)] =
    pack(&SJIS_CLASSES, PackWidth::Four);
static SJIS_STATE_TABLE: [u8; packed_len(SJIS_CLASS_FACTOR * SJIS_STATE_COUNT, PackWidth::Four)] =
    pack_rows(&SJIS_STATES, PackWidth::Four);

/// Shift_JIS.
pub static SJIS_MODEL: StateMachineModel = StateMachineModel::new(
    Charset::ShiftJis,
    BitPackage::new(PackWidth::Four, 256, &SJIS_CLASS_TABLE),
    SJIS_CLASS_FACTOR,
    BitPackage::new(
        PackWidth::Four,
        SJIS_CLASS_FACTOR * SJIS_STATE_COUNT,
        &SJIS_STATE_TABLE,
    ),
    &[1, 1, 0, 2, 1, 0],
    SJIS_STATE_COUNT,
)
// Kana in 82-83, level-1 kanji in 88-98.
.with_lead_rows(&[(0x82, 0x83), (0x88, 0x98)], &[(0x81, 0x81)]);

// EUC-JP ---------------------------------------------------------------------
//
// JIS X 0208 rows A1-A8 and B0-F4, trail A1-FE; 8E + A1-DF for half-width
// katakana; 8F + two bytes A1-FE for JIS X 0212.

const EUCJP_CLASSES: [u8; 256] = classify(&[
    (0x00, 0x7F, 0),
    (0x80, 0x8D, 7),
    (0x8E, 0x8E, 1),
    (0x8F, 0x8F, 2),
    (0x90, 0xA0, 7),
    (0xA1, 0xA8, 3),
    (0xA9, 0xAF, 4),
    (0xB0, 0xDF, 3),
    (0xE0, 0xF4, 5),
    (0xF5, 0xFE, 6),
    (0xFF, 0xFF, 7),
]);

const EUCJP_CLASS_FACTOR: usize = 8;
const EUCJP_STATE_COUNT: usize = 6;

#[rustfmt::skip]
const EUCJP_STATES: [[u8; EUCJP_CLASS_FACTOR]; EUCJP_STATE_COUNT] = [
    [S, 3, 4, 5, E, 5, E, E],
    [E, E, E, E, E, E, E, E],
    [S, 3, 4, 5, E, 5, E, E],
    [E, E, E, M, M, E, E, E], // after 8E
    [E, E, E, 5, 5, 5, 5, E], // after 8F
    [E, E, E, M, M, M, M, E], // one trail left
];

static EUCJP_CLASS_TABLE: [u8; packed_len(256, PackWidth::Four)] =
    pack(&EUCJP_CLASSES, PackWidth::Four);
static EUCJP_STATE_TABLE: [u8; packed_len(EUCJP_CLASS_FACTOR * EUCJP_STATE_COUNT, PackWidth::Four)] =
    pack_rows(&EUCJP_STATES, PackWidth::Four);

/// EUC-JP.
pub static EUCJP_MODEL: StateMachineModel = StateMachineModel::new(
    Charset::EucJp,
    BitPackage::new(PackWidth::Four, 256, &EUCJP_CLASS_TABLE),
    EUCJP_CLASS_FACTOR,
    BitPackage::new(
        PackWidth::Four,
        EUCJP_CLASS_FACTOR * EUCJP_STATE_COUNT,
        &EUCJP_STATE_TABLE,
    ),
    &[1, 2, 3, 2, 0, 2, 0, 0],
    EUCJP_STATE_COUNT,
)
// Hiragana A4, katakana A5, level-1 kanji B0-CF.
.with_lead_rows(&[(0xA4, 0xA5), (0xB0, 0xCF)], &[(0xA1, 0xA3)]);

// EUC-KR ---------------------------------------------------------------------
//
// KS X 1001 rows A1-AC, B0-C8 and CA-FD, trail A1-FE. AD-AF, C9 and FE are
// unassigned or user-defined as leads but still valid trails.

const EUCKR_CLASSES: [u8; 256] = classify(&[
    (0x00, 0x7F, 0),
    (0x80, 0xA0, 3),
    (0xA1, 0xAC, 1),
    (0xAD, 0xAF, 2),
    (0xB0, 0xC8, 1),
    (0xC9, 0xC9, 2),
    (0xCA, 0xFD, 1),
    (0xFE, 0xFE, 2),
    (0xFF, 0xFF, 3),
]);

const EUCKR_CLASS_FACTOR: usize = 4;
const EUCKR_STATE_COUNT: usize = 4;

#[rustfmt::skip]
const EUCKR_STATES: [[u8; EUCKR_CLASS_FACTOR]; EUCKR_STATE_COUNT] = [
    [S, 3, E, E],
    [E, E, E, E],
    [S, 3, E, E],
    [E, M, M, E],
];

static EUCKR_CLASS_TABLE: [u8; packed_len(256, PackWidth::Two)] =
    pack(&EUCKR_CLASSES, PackWidth::Two);
static EUCKR_STATE_TABLE: [u8; packed_len(EUCKR_CLASS_FACTOR * EUCKR_STATE_COUNT, PackWidth::Two)] =
    pack_rows(&EUCKR_STATES, PackWidth::Two);

/// EUC-KR.
pub static EUCKR_MODEL: StateMachineModel = StateMachineModel::new(
    Charset::EucKr,
    BitPackage::new(PackWidth::Two, 256, &EUCKR_CLASS_TABLE),
    EUCKR_CLASS_FACTOR,
    BitPackage::new(
        PackWidth::Two,
        EUCKR_CLASS_FACTOR * EUCKR_STATE_COUNT,
        &EUCKR_STATE_TABLE,
    ),
    &[1, 2, 0, 0],
    EUCKR_STATE_COUNT,
)
// Hangul syllables B0-C8.
.with_lead_rows(&[(0xB0, 0xC8)], &[(0xA1, 0xA3)]);

// GB18030 --------------------------------------------------------------------
//
// Lead 81-FE, then either a trail in 40-7E / 80-FE, or a four-byte form
// 30-39 81-FE 30-39.

const GB18030_CLASSES: [u8; 256] = classify(&[
    (0x00, 0x2F, 0),
    (0x30, 0x39, 1),
    (0x3A, 0x3F, 0),
    (0x40, 0x7E, 2),
    (0x7F, 0x7F, 0),
    (0x80, 0x80, 3),
    (0x81, 0xFE, 4),
    (0xFF, 0xFF, 5),
]);

const GB18030_CLASS_FACTOR: usize = 6;
const GB18030_STATE_COUNT: usize = 6;

#[rustfmt::skip]
const GB18030_STATES: [[u8; GB18030_CLASS_FACTOR]; GB18030_STATE_COUNT] = [
    [S, S, S, E, 3, E],
    [E, E, E, E, E, E],
    [S, S, S, E, 3, E],
    [E, 4, M, M, M, E], // after lead
    [E, E, E, E, 5, E], // four-byte, third
    [E, M, E, E, E, E], // four-byte, fourth
];

static GB18030_CLASS_TABLE: [u8; packed_len(256, PackWidth::Four)] =
    pack(&GB18030_CLASSES, PackWidth::Four);
static GB18030_STATE_TABLE: [u8; packed_len(
    GB18030_CLASS_FACTOR * GB18030_STATE_COUNT,
    PackWidth::Four,
)] = pack_rows(&GB18030_STATES, PackWidth::Four);

/// GB18030.
pub static GB18030_MODEL: StateMachineModel = StateMachineModel::new(
    Charset::Gb18030,
    BitPackage::new(PackWidth::Four, 256, &GB18030_CLASS_TABLE),
    GB18030_CLASS_FACTOR,
    BitPackage::new(
        PackWidth::Four,
        GB18030_CLASS_FACTOR * GB18030_STATE_COUNT,
        &GB18030_STATE_TABLE,
    ),
    &[1, 1, 1, 0, 2, 0],
    GB18030_STATE_COUNT,
)
// GB2312 level-1 hanzi B0-D7.
.with_lead_rows(&[(0xB0, 0xD7)], &[(0xA1, 0xA3)]);

// Big5 -----------------------------------------------------------------------
//
// Lead A1-F9, trail 40-7E / A1-FE. Leads 81-A0 and FA-FE belong to
// user-defined and HKSCS extensions.

const BIG5_CLASSES: [u8; 256] = classify(&[
    (0x00, 0x3F, 0),
    (0x40, 0x7E, 1),
    (0x7F, 0x7F, 0),
    (0x80, 0xA0, 2),
    (0xA1, 0xF9, 3),
    (0xFA, 0xFE, 4),
    (0xFF, 0xFF, 2),
]);

const BIG5_CLASS_FACTOR: usize = 5;
const BIG5_STATE_COUNT: usize = 4;

#[rustfmt::skip]
const BIG5_STATES: [[u8; BIG5_CLASS_FACTOR]; BIG5_STATE_COUNT] = [
    [S, S, E, 3, E],
    [E, E, E, E, E],
    [S, S, E, 3, E],
    [E, M, E, M, M],
];

static BIG5_CLASS_TABLE: [u8; packed_len(256, PackWidth::Four)] =
    pack(&BIG5_CLASSES, PackWidth::Four);
static BIG5_STATE_TABLE: [u8; packed_len(BIG5_CLASS_FACTOR * BIG5_STATE_COUNT, PackWidth::Two)] =
    pack_rows(&BIG5_STATES, PackWidth::Two);

/// Big5.
pub static BIG5_MODEL: StateMachineModel = StateMachineModel::new(
    Charset::Big5,
    BitPackage::new(PackWidth::Four, 256, &BIG5_CLASS_TABLE),
    BIG5_CLASS_FACTOR,
    BitPackage::new(
        PackWidth::Two,
        BIG5_CLASS_FACTOR * BIG5_STATE_COUNT,
        &BIG5_STATE_TABLE,
    ),
    &[1, 1, 0, 2, 0],
    BIG5_STATE_COUNT,
)
// Frequently used characters A440-C67E.
.with_lead_rows(&[(0xA4, 0xC6)], &[(0xA1, 0xA3)]);

/// Multi-byte candidates grouped per prober, in priority order.
///
/// Candidates sharing a group compete inside one prober; the detector ranks
/// the groups against each other. Priority follows the width of each
/// model's text block, narrowest first, so equal scores go to the encoding
/// whose layout the text fits more tightly. UTF-8 has no text block and its
/// grammar is the strictest of all.
pub static MULTI_BYTE_GROUPS: [&[&StateMachineModel]; 4] = [
    &[&UTF8_MODEL],
    &[&SJIS_MODEL],
    &[&EUCKR_MODEL, &EUCJP_MODEL],
    &[&BIG5_MODEL, &GB18030_MODEL],
];

/// Every multi-byte model, in priority order.
pub fn all_models() -> impl Iterator<Item = &'static StateMachineModel> {
    MULTI_BYTE_GROUPS.iter().flat_map(|group| group.iter().copied())
}

/// [`MULTI_BYTE_GROUPS`], once every model has passed
/// [`validate`](StateMachineModel::validate).
pub fn multi_byte_groups() -> Result<&'static [&'static [&'static StateMachineModel]]> {
    static VALIDATED: OnceLock<()> = OnceLock::new();
    get_or_try_init(&VALIDATED, || {
        for model in all_models() {
            model.validate()?;
        }
        tracing::debug!(groups = MULTI_BYTE_GROUPS.len(), "multi-byte models validated");
        Ok(())
    })?;
    Ok(&MULTI_BYTE_GROUPS)
}
