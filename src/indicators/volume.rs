// =============================================================================
// Average Volume
// =============================================================================

use crate::indicators::window::rolling_mean;

/// Rolling mean of volume, aligned with the bars.
pub fn average_volume(volumes: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling_mean(volumes, period)
}

/// Current volume relative to its average.
///
/// `None` if the average is undefined or the ratio is NaN (zero volume over
/// the whole window).
pub fn volume_ratio(current: f64, average: Option<f64>) -> Option<f64> {
    let ratio = current / average?;
    if ratio.is_nan() {
        None
    } else {
        Some(ratio)
    }
}
