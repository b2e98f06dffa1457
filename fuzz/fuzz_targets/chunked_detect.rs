#![no_main]
use charprobe::{detect, Detector};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, Vec<u16>)| {
    let (input, cuts) = data;

    let whole = detect(&input).unwrap();
    if let Some(guess) = whole {
        assert!((0.0..=1.0).contains(&guess.confidence));
    }

    let mut cuts: Vec<usize> = cuts
        .into_iter()
        .map(|c| c as usize % (input.len() + 1))
        .collect();
    cuts.sort_unstable();

    let mut detector = Detector::new().unwrap();
    let mut start = 0;
    for cut in cuts {
        detector.feed(&input[start..cut]);
        start = cut;
    }
    detector.feed(&input[start..]);

    assert_eq!(detector.finish(), whole);
});
