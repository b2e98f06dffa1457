//! Bit-packed table codec.
//!
//! Two kinds of static data back the detector:
//!
//! - **Class and transition tables** for the coding state machines. Entries are
//!   tiny (a byte class or a state number fits in 2 or 4 bits), so they are
//!   packed several to a byte at compile time by [`pack`] / [`pack_rows`] and
//!   read back with [`BitPackage::unpack`].
//! - **Pair-precedence matrices** for the language models. These are 4096-entry
//!   tables shipped as raw DEFLATE streams and inflated once by [`decompress`].
//!
//! Packing is a `const fn`: a value that does not fit its field width, or a byte
//! that was never assigned a class, fails the build rather than the detector.

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{Error, Result};

/// Marker for bytes that [`classify`] has not yet assigned.
const UNASSIGNED: u8 = 0xFF;

/// Field width of a bit-packed table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackWidth {
    /// Four 2-bit fields per byte.
    Two,
    /// Two 4-bit fields per byte.
    Four,
    /// One 8-bit field per byte.
    Eight,
}

impl PackWidth {
    /// log2 of the number of fields per byte.
    const fn index_shift(self) -> u32 {
        match self {
            PackWidth::Two => 2,
            PackWidth::Four => 1,
            PackWidth::Eight => 0,
        }
    }

    /// log2 of the field width in bits.
    const fn bit_shift(self) -> u32 {
        match self {
            PackWidth::Two => 1,
            PackWidth::Four => 2,
            PackWidth::Eight => 3,
        }
    }

    const fn unit_mask(self) -> u8 {
        match self {
            PackWidth::Two => 0x03,
            PackWidth::Four => 0x0F,
            PackWidth::Eight => 0xFF,
        }
    }

    const fn shift_mask(self) -> usize {
        (1 << self.index_shift()) - 1
    }

    /// Largest value a field of this width can hold.
    pub const fn max_value(self) -> u8 {
        self.unit_mask()
    }
}

/// Number of bytes needed to store `len` fields of the given width.
pub const fn packed_len(len: usize, width: PackWidth) -> usize {
    let per_byte = 1 << width.index_shift();
    (len + per_byte - 1) / per_byte
}

/// Packs a flat slice of small values into fixed-width fields.
///
/// `M` must equal `packed_len(values.len(), width)`; every value must fit the
/// width. Both are checked during const evaluation.
pub const fn pack<const M: usize>(values: &[u8], width: PackWidth) -> [u8; M] {
    assert!(
        M == packed_len(values.len(), width),
        "packed length does not match value count"
    );
    let mut out = [0u8; M];
    let mut i = 0;
    while i < values.len() {
        out = put_field(out, i, values[i], width);
        i += 1;
    }
    out
}

/// Packs a row-major table (`rows[state][class]`) into fixed-width fields.
pub const fn pack_rows<const C: usize, const M: usize>(
    rows: &[[u8; C]],
    width: PackWidth,
) -> [u8; M] {
    assert!(
        M == packed_len(rows.len() * C, width),
        "packed length does not match table size"
    );
    let mut out = [0u8; M];
    let mut r = 0;
    while r < rows.len() {
        let mut c = 0;
        while c < C {
            out = put_field(out, r * C + c, rows[r][c], width);
            c += 1;
        }
        r += 1;
    }
    out
}

const fn put_field<const M: usize>(
    mut out: [u8; M],
    index: usize,
    value: u8,
    width: PackWidth,
) -> [u8; M] {
    assert!(value <= width.unit_mask(), "value does not fit the pack width");
    let slot = index >> width.index_shift();
    let offset = (index & width.shift_mask()) << width.bit_shift();
    out[slot] |= value << offset;
    out
}

/// Builds a 256-entry byte→class map from inclusive `(first, last, class)` ranges.
///
/// Every byte must be covered exactly once.
pub const fn classify(ranges: &[(u8, u8, u8)]) -> [u8; 256] {
    let mut out = [UNASSIGNED; 256];
    let mut r = 0;
    while r < ranges.len() {
        let (first, last, class) = ranges[r];
        assert!(first <= last, "class range is reversed");
        assert!(class != UNASSIGNED, "class value is reserved");
        let mut b = first as usize;
        while b <= last as usize {
            assert!(out[b] == UNASSIGNED, "byte classified twice");
            out[b] = class;
            b += 1;
        }
        r += 1;
    }
    let mut b = 0;
    while b < 256 {
        assert!(out[b] != UNASSIGNED, "byte left unclassified");
        b += 1;
    }
    out
}

/// A read-only view over a bit-packed table.
#[derive(Clone, Copy, Debug)]
pub struct BitPackage {
    index_shift: u32,
    shift_mask: usize,
    bit_shift: u32,
    unit_mask: u8,
    len: usize,
    data: &'static [u8],
}

impl BitPackage {
    /// Wraps `data` holding `len` fields of the given width.
    pub const fn new(width: PackWidth, len: usize, data: &'static [u8]) -> Self {
        assert!(
            data.len() == packed_len(len, width),
            "packed data does not hold the declared field count"
        );
        Self {
            index_shift: width.index_shift(),
            shift_mask: width.shift_mask(),
            bit_shift: width.bit_shift(),
            unit_mask: width.unit_mask(),
            len,
            data,
        }
    }

    /// Extracts the field at `index`.
    #[inline(always)]
    pub fn unpack(&self, index: usize) -> u8 {
        let byte = self.data[index >> self.index_shift];
        (byte >> ((index & self.shift_mask) << self.bit_shift)) & self.unit_mask
    }

    /// Number of fields.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True when the table holds no fields.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over every field in index order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(move |i| self.unpack(i))
    }
}

/// Inflates a raw DEFLATE stream into a table of exactly `expected_len` bytes.
///
/// Only embedded model data goes through here, so a failure means the build
/// shipped a broken table; callers surface it at detector construction.
pub fn decompress(packed: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(false);
    // One spare byte lets an over-long stream show up as a length error.
    let mut out = Vec::with_capacity(expected_len + 1);

    let status = inflater
        .decompress_vec(packed, &mut out, FlushDecompress::Finish)
        .map_err(|_| Error::MalformedTable("corrupt deflate stream"))?;

    match status {
        Status::StreamEnd if out.len() == expected_len => Ok(out),
        Status::StreamEnd => Err(Error::TableLength {
            expected: expected_len,
            actual: out.len(),
        }),
        _ if out.len() <= expected_len => Err(Error::MalformedTable("truncated deflate stream")),
        _ => Err(Error::MalformedTable("table exceeds its declared length")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use proptest::prelude::*;
    use std::io::Write;

    static FOUR_BIT: [u8; packed_len(5, PackWidth::Four)] =
        pack(&[1, 15, 0, 7, 9], PackWidth::Four);

    static TWO_BIT_ROWS: [u8; packed_len(6, PackWidth::Two)] =
        pack_rows(&[[0, 1, 2], [3, 2, 1]], PackWidth::Two);

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_four_bit_layout() {
        // Low nibble first.
        assert_eq!(FOUR_BIT, [0xF1, 0x70, 0x09]);
        let table = BitPackage::new(PackWidth::Four, 5, &FOUR_BIT);
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![1, 15, 0, 7, 9]);
    }

    #[test]
    fn test_two_bit_rows() {
        let table = BitPackage::new(PackWidth::Two, 6, &TWO_BIT_ROWS);
        assert_eq!(table.len(), 6);
        // Row 1, column 0.
        assert_eq!(table.unpack(3), 3);
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 2, 1]);
    }

    #[test]
    fn test_classify_ranges() {
        let classes = classify(&[(0x00, 0x7F, 0), (0x80, 0xFE, 1), (0xFF, 0xFF, 2)]);
        assert_eq!(classes[0x41], 0);
        assert_eq!(classes[0x80], 1);
        assert_eq!(classes[0xFF], 2);
    }

    #[test]
    fn test_decompress_exact_length() {
        let table: Vec<u8> = (0..4096u32).map(|i| (i % 4) as u8).collect();
        let packed = deflate(&table);
        assert_eq!(decompress(&packed, table.len()).unwrap(), table);
    }

    #[test]
    fn test_decompress_rejects_wrong_length() {
        let packed = deflate(&[3u8; 100]);
        assert!(matches!(
            decompress(&packed, 120),
            Err(Error::TableLength { expected: 120, actual: 100 })
        ));
        assert!(matches!(
            decompress(&packed, 64),
            Err(Error::MalformedTable(_))
        ));
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        // BTYPE = 11 is reserved.
        assert!(decompress(&[0xFF, 0xFF, 0xFF, 0xFF], 16).is_err());
        let packed = deflate(&[1u8; 256]);
        assert!(decompress(&packed[..packed.len() / 2], 256).is_err());
    }

    proptest! {
        #[test]
        fn prop_unpack_matches_source(values in prop::collection::vec(0u8..4, 1..=64)) {
            // Packed at runtime through the field writer the const tables use.
            let mut packed = [0u8; packed_len(64, PackWidth::Two)];
            for (i, &v) in values.iter().enumerate() {
                packed = put_field(packed, i, v, PackWidth::Two);
            }
            let data: &'static [u8; packed_len(64, PackWidth::Two)] = Box::leak(Box::new(packed));
            let len = packed_len(values.len(), PackWidth::Two);
            let table = BitPackage::new(PackWidth::Two, values.len(), &data[..len]);
            for (i, &v) in values.iter().enumerate() {
                prop_assert_eq!(table.unpack(i), v);
            }
        }
    }
}
