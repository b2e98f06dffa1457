use charprobe::Detector;

fn main() {
    let text = "吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。";
    let input = text.as_bytes().repeat(200);

    for _ in 0..1000 {
        let mut detector = Detector::new().unwrap();
        for chunk in input.chunks(4096) {
            detector.feed(chunk);
        }
        std::hint::black_box(detector.finish());
    }
}
