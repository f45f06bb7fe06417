/// `used / capacity` as a percentage, `0.0` when there is no capacity.
pub fn percentage(used: f64, capacity: f64) -> f64 {
    if capacity > 0.0 {
        used / capacity * 100.0
    } else {
        0.0
    }
}
