/// Default tolerance for floating-point comparisons
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Assert that two floating-point numbers are approximately equal
pub fn assert_approx_eq(actual: f64, expected: f64, tolerance: f64) {
  assert!(
    (actual - expected).abs() < tolerance,
    "Values not approximately equal:\n  actual:   {}\n  expected: {}\n  diff:     {}\n  tolerance: {}",
    actual,
    expected,
    (actual - expected).abs(),
    tolerance
  );
}

/// Assert that an optional cell holds a value approximately equal to `expected`
pub fn assert_some_approx_eq(actual: Option<f64>, expected: f64) {
  match actual {
    Some(value) => assert_approx_eq(value, expected, DEFAULT_TOLERANCE),
    None => panic!("expected a value of approximately {}, got an absent cell", expected),
  }
}
