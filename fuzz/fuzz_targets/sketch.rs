#![no_main]

use hll_sketch::Sketch;
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let precision = 4 + (wyhash(data, 0) as usize % 7);
    let mut sketch: Sketch = Sketch::with_precision(precision).unwrap();
    let mut previous: Vec<u8> = sketch.registers().collect();

    for chunk in data.chunks(4) {
        sketch.insert_bytes(chunk);
        let current: Vec<u8> = sketch.registers().collect();
        assert!(previous.iter().zip(&current).all(|(p, c)| p <= c));
        assert!(current.iter().all(|&r| usize::from(r) <= 65 - precision));
        assert!(sketch.estimate() > 0.0);
        previous = current;
    }

    sketch.clear();
    assert_eq!(sketch.estimate(), 0.0);
});
