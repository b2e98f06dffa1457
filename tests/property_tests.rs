use charprobe::{detect, Charset, Detector, DetectorConfig, Prober};
use proptest::prelude::*;

const DESIGNATIONS: [(&[u8], Charset); 5] = [
    (b"\x1b$B", Charset::Iso2022Jp),
    (b"\x1b(J", Charset::Iso2022Jp),
    (b"\x1b$)C", Charset::Iso2022Kr),
    (b"\x1b$)A", Charset::Iso2022Cn),
    (b"\x1b$+I", Charset::Iso2022Cn),
];

fn feed_in_chunks(detector: &mut Detector, bytes: &[u8], chunk: usize) {
    for part in bytes.chunks(chunk.max(1)) {
        detector.feed(part);
    }
}

proptest! {
    #[test]
    fn prop_designation_decides_regardless_of_tail(
        prefix in "[ -}\n]{0,64}",
        which in 0..DESIGNATIONS.len(),
        tail in prop::collection::vec(any::<u8>(), 0..128),
        chunk in 1usize..16,
    ) {
        let (designation, charset) = DESIGNATIONS[which];
        let mut bytes = prefix.into_bytes();
        bytes.extend_from_slice(designation);
        bytes.extend_from_slice(&tail);

        let mut detector = Detector::new().unwrap();
        feed_in_chunks(&mut detector, &bytes, chunk);
        prop_assert!(detector.is_done());
        let guess = detector.finish().unwrap();
        prop_assert_eq!(guess.charset, charset);
        prop_assert_eq!(guess.confidence, 1.0);
    }

    #[test]
    fn prop_confidence_in_unit_interval(bytes in prop::collection::vec(any::<u8>(), 0..1024)) {
        let mut detector = Detector::new().unwrap();
        detector.feed(&bytes);
        for prober in detector.probers() {
            let confidence = prober.confidence();
            prop_assert!((0.0..=1.0).contains(&confidence), "{:?} {}", prober.kind(), confidence);
        }
        if let Some(guess) = detector.finish() {
            prop_assert!((0.0..=1.0).contains(&guess.confidence));
        }
    }

    #[test]
    fn prop_guess_respects_minimum_confidence(
        bytes in prop::collection::vec(any::<u8>(), 1..512),
        minimum in 0.0f32..1.0,
    ) {
        let config = DetectorConfig {
            minimum_confidence: minimum,
            ..DetectorConfig::default()
        };
        let mut detector = Detector::with_config(config).unwrap();
        detector.feed(&bytes);
        if let Some(guess) = detector.finish() {
            prop_assert!(guess.confidence >= minimum || guess.confidence == 1.0);
        }
    }

    #[test]
    fn prop_reset_replays_identically(
        first in prop::collection::vec(any::<u8>(), 0..256),
        second in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut detector = Detector::new().unwrap();
        detector.feed(&first);
        detector.finish();
        detector.reset();
        detector.feed(&second);
        prop_assert_eq!(detector.finish(), detect(&second).unwrap());
    }

    #[test]
    fn prop_valid_utf8_is_never_ruled_out(text in "\\PC{1,64}") {
        let mut detector = Detector::new().unwrap();
        detector.feed(text.as_bytes());
        let utf8 = detector
            .probers()
            .iter()
            .filter_map(|p| match p {
                Prober::StateMachine(group) => Some(group.candidates()),
                _ => None,
            })
            .flatten()
            .find(|c| c.charset() == Charset::Utf8)
            .unwrap();
        prop_assert!(utf8.is_alive());
        prop_assert_eq!(utf8.errors(), 0);
    }
}
