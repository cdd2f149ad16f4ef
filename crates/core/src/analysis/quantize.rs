/// Maps a raw sample onto bar-height units: `floor(|x| / divisor)`.
///
/// `divisor` is `max_amplitude / height`, so the loudest possible sample lands
/// at roughly `height` units.
pub fn quantize<T: Into<f64>>(sample: T, divisor: f64) -> u64 {
    (sample.into().abs() / divisor).floor() as u64
}
