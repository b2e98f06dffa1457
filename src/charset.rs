//! Encoding identities reported by the detector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An encoding the detector can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Charset {
    /// 7-bit ASCII with no escape-switched content.
    #[serde(rename = "ASCII")]
    Ascii,
    /// UTF-8 (with or without BOM).
    #[serde(rename = "UTF-8")]
    Utf8,
    /// UTF-16 little endian, identified by BOM.
    #[serde(rename = "UTF-16LE")]
    Utf16Le,
    /// UTF-16 big endian, identified by BOM.
    #[serde(rename = "UTF-16BE")]
    Utf16Be,
    /// UTF-32 little endian, identified by BOM.
    #[serde(rename = "UTF-32LE")]
    Utf32Le,
    /// UTF-32 big endian, identified by BOM.
    #[serde(rename = "UTF-32BE")]
    Utf32Be,
    /// Shift_JIS (Japanese).
    #[serde(rename = "Shift_JIS")]
    ShiftJis,
    /// EUC-JP (Japanese).
    #[serde(rename = "EUC-JP")]
    EucJp,
    /// EUC-KR (Korean).
    #[serde(rename = "EUC-KR")]
    EucKr,
    /// GB18030, a superset of GB2312 and GBK (Simplified Chinese).
    #[serde(rename = "GB18030")]
    Gb18030,
    /// Big5 (Traditional Chinese).
    #[serde(rename = "Big5")]
    Big5,
    /// ISO-2022-JP (escape-switched Japanese).
    #[serde(rename = "ISO-2022-JP")]
    Iso2022Jp,
    /// ISO-2022-KR (escape-switched Korean).
    #[serde(rename = "ISO-2022-KR")]
    Iso2022Kr,
    /// ISO-2022-CN (escape-switched Chinese).
    #[serde(rename = "ISO-2022-CN")]
    Iso2022Cn,
    /// HZ-GB-2312 (`~{ ... ~}` switched Simplified Chinese).
    #[serde(rename = "HZ-GB-2312")]
    HzGb2312,
    /// ISO-8859-7 (Greek).
    #[serde(rename = "ISO-8859-7")]
    Iso8859_7,
    /// windows-1253 (Greek).
    #[serde(rename = "windows-1253")]
    Windows1253,
}

impl Charset {
    /// The canonical identifier, as used by WHATWG/IANA labels.
    pub const fn name(self) -> &'static str {
        match self {
            Charset::Ascii => "ASCII",
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf32Le => "UTF-32LE",
            Charset::Utf32Be => "UTF-32BE",
            Charset::ShiftJis => "Shift_JIS",
            Charset::EucJp => "EUC-JP",
            Charset::EucKr => "EUC-KR",
            Charset::Gb18030 => "GB18030",
            Charset::Big5 => "Big5",
            Charset::Iso2022Jp => "ISO-2022-JP",
            Charset::Iso2022Kr => "ISO-2022-KR",
            Charset::Iso2022Cn => "ISO-2022-CN",
            Charset::HzGb2312 => "HZ-GB-2312",
            Charset::Iso8859_7 => "ISO-8859-7",
            Charset::Windows1253 => "windows-1253",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
