use hll_sketch::{ConfigError, Sketch};

fn main() -> Result<(), ConfigError> {
    let mut sketch: Sketch = Sketch::with_precision(4)?;
    for item in ["Test", "Test", "Test2", "Test3"] {
        sketch.insert_bytes(item.as_bytes());
    }
    println!(
        "estimate = {:.2} (standard error {:.2})",
        sketch.estimate(),
        sketch.precision_err()
    );
    Ok(())
}
