/// Snap a normalized value to the center of one of `steps` equal buckets.
///
/// The outermost buckets snap to exactly 0 and 1 so the ends of a ramp stay
/// reachable. `steps == 0` leaves the value untouched.
pub fn quantize(value: f64, steps: u32) -> f64 {
    if steps == 0 {
        return value;
    }
    let n = steps as f64;
    let per_step = 1.0 / n;
    if value <= per_step {
        return 0.0;
    }
    if value >= 1.0 - per_step {
        return 1.0;
    }
    ((value * n).floor() + 0.5) / n
}
