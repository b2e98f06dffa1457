use std::io::Cursor;

use charprobe::{detect, detect_reader, Charset, Detector, Prober, ProbingState};
use encoding_rs::Encoding;

const JAPANESE: &str = "吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。\
    何でも薄暗いじめじめした所でニャーニャー泣いていた事だけは記憶している。";
const KOREAN: &str = "대한민국은 민주공화국이다. 대한민국의 주권은 국민에게 있고, \
    모든 권력은 국민으로부터 나온다.";
const TRADITIONAL_CHINESE: &str =
    "中華民國憲法第一條：中華民國基於三民主義，為民有民治民享之民主共和國。";
const SIMPLIFIED_CHINESE: &str =
    "中华人民共和国是工人阶级领导的、以工农联盟为基础的人民民主专政的社会主义国家。";
const RUSSIAN: &str = "Съешь же ещё этих мягких французских булок, да выпей чаю.";
const GREEK: &str = "Η γλώσσα είναι το κύριο μέσο επικοινωνίας των ανθρώπων και ένα από \
    τα πιο σημαντικά στοιχεία του πολιτισμού τους.";

fn encode(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let (bytes, _, unmappable) = encoding.encode(text);
    assert!(!unmappable, "{} cannot encode the fixture", encoding.name());
    bytes.into_owned()
}

fn charset_of(bytes: &[u8]) -> Option<Charset> {
    detect(bytes).unwrap().map(|guess| guess.charset)
}

/// State of the multi-byte candidate for `charset` after feeding `bytes`.
fn candidate_alive(bytes: &[u8], charset: Charset) -> bool {
    let mut detector = Detector::new().unwrap();
    detector.feed(bytes);
    detector
        .probers()
        .iter()
        .filter_map(|p| match p {
            Prober::StateMachine(group) => Some(group.candidates()),
            _ => None,
        })
        .flatten()
        .find(|c| c.charset() == charset)
        .is_some_and(|c| c.is_alive())
}

#[test]
fn test_utf8_japanese() {
    let guess = detect(JAPANESE.as_bytes()).unwrap().unwrap();
    assert_eq!(guess.charset, Charset::Utf8);
    assert!(guess.confidence > 0.9);
}

#[test]
fn test_utf8_cyrillic() {
    assert_eq!(charset_of(RUSSIAN.as_bytes()), Some(Charset::Utf8));
}

#[test]
fn test_shift_jis() {
    let bytes = encode(encoding_rs::SHIFT_JIS, JAPANESE);
    assert_eq!(charset_of(&bytes), Some(Charset::ShiftJis));
    assert!(!candidate_alive(&bytes, Charset::Utf8));
    assert!(!candidate_alive(&bytes, Charset::EucJp));
}

#[test]
fn test_euc_jp() {
    let bytes = encode(encoding_rs::EUC_JP, JAPANESE);
    assert_eq!(charset_of(&bytes), Some(Charset::EucJp));
}

#[test]
fn test_euc_kr() {
    // Hangul is structurally valid in EUC-JP and GB18030 as well; the
    // syllable rows decide.
    let bytes = encode(encoding_rs::EUC_KR, KOREAN);
    assert!(candidate_alive(&bytes, Charset::EucJp));
    assert!(!candidate_alive(&bytes, Charset::Utf8));
    assert!(!candidate_alive(&bytes, Charset::ShiftJis));
    assert_eq!(charset_of(&bytes), Some(Charset::EucKr));
}

#[test]
fn test_gb18030() {
    for encoding in [encoding_rs::GBK, encoding_rs::GB18030] {
        let bytes = encode(encoding, SIMPLIFIED_CHINESE);
        assert!(!candidate_alive(&bytes, Charset::EucKr), "{}", encoding.name());
        assert_eq!(
            charset_of(&bytes),
            Some(Charset::Gb18030),
            "{}",
            encoding.name()
        );
    }
}

#[test]
fn test_big5() {
    let bytes = encode(encoding_rs::BIG5, TRADITIONAL_CHINESE);
    assert!(candidate_alive(&bytes, Charset::Gb18030));
    assert!(!candidate_alive(&bytes, Charset::EucJp));
    assert!(!candidate_alive(&bytes, Charset::EucKr));
    assert_eq!(charset_of(&bytes), Some(Charset::Big5));
}

#[test]
fn test_greek_single_byte() {
    for encoding in [encoding_rs::ISO_8859_7, encoding_rs::WINDOWS_1253] {
        let guess = detect(&encode(encoding, GREEK)).unwrap().unwrap();
        assert!(
            matches!(guess.charset, Charset::Iso8859_7 | Charset::Windows1253),
            "{}: {}",
            encoding.name(),
            guess.charset
        );
        assert!(guess.confidence > 0.9);
    }
}

#[test]
fn test_greek_utf8_is_utf8() {
    assert_eq!(charset_of(GREEK.as_bytes()), Some(Charset::Utf8));
}

#[test]
fn test_unsupported_encoding_is_unknown() {
    // KOI8-R matches nothing structurally and looks nothing like Greek.
    let bytes = encode(encoding_rs::KOI8_R, RUSSIAN);
    assert_eq!(charset_of(&bytes), None);
}

#[test]
fn test_iso_2022_jp() {
    let bytes = encode(encoding_rs::ISO_2022_JP, JAPANESE);
    assert!(bytes.iter().all(|b| b.is_ascii()));
    let guess = detect(&bytes).unwrap().unwrap();
    assert_eq!(guess.charset, Charset::Iso2022Jp);
    assert_eq!(guess.confidence, 1.0);
}

#[test]
fn test_iso_2022_kr() {
    let bytes = b"\x1b$)C\x0e\x307\x31\x31\x0f ok\r\n";
    assert_eq!(charset_of(bytes), Some(Charset::Iso2022Kr));
}

#[test]
fn test_hz_needs_a_closed_span() {
    assert_eq!(charset_of(b"Hello ~{<:Ky~} world"), Some(Charset::HzGb2312));
    assert_eq!(charset_of(b"Hello ~~ world ~}"), Some(Charset::Ascii));
}

#[test]
fn test_hz_tilde_as_trail_byte() {
    // 0x30 0x7E is one GB2312 character inside the span.
    let guess = detect(b"Hello ~{0~0!~} world").unwrap().unwrap();
    assert_eq!(guess.charset, Charset::HzGb2312);
    assert_eq!(guess.confidence, 1.0);
}

#[test]
fn test_bom_wins_over_content() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend(encode(encoding_rs::SHIFT_JIS, JAPANESE));
    let guess = detect(&bytes).unwrap().unwrap();
    assert_eq!(guess.charset, Charset::Utf8);
    assert_eq!(guess.confidence, 1.0);

    let utf16 = [0xFF, 0xFE, b'h', 0x00, b'i', 0x00];
    assert_eq!(charset_of(&utf16), Some(Charset::Utf16Le));
}

#[test]
fn test_reader_matches_buffer() {
    let bytes = encode(encoding_rs::SHIFT_JIS, &JAPANESE.repeat(200));
    let from_reader = detect_reader(Cursor::new(&bytes)).unwrap();
    assert_eq!(from_reader, detect(&bytes).unwrap());
    assert_eq!(from_reader.map(|g| g.charset), Some(Charset::ShiftJis));
}

#[test]
fn test_byte_at_a_time() {
    let bytes = encode(encoding_rs::EUC_JP, JAPANESE);
    let mut detector = Detector::new().unwrap();
    for byte in &bytes {
        detector.feed(std::slice::from_ref(byte));
    }
    assert_eq!(detector.finish(), detect(&bytes).unwrap());
    assert!(detector
        .probers()
        .iter()
        .any(|p| p.state() == ProbingState::NotMe));
}
