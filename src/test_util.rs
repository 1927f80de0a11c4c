/// compare floats with a tolerance relative to the expected value's magnitude
#[track_caller]
pub fn assert_approx_eq(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!((actual - expected).abs() <= tolerance, "expected {} but was {}", expected, actual);
}
