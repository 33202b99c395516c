pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// `1 - |a - b|` for values already in `[0, 1]`.
pub(crate) fn closeness(a: f64, b: f64) -> f64 {
    crate::foundation::core::clamp01(1.0 - (a - b).abs())
}

/// `min / max` ratio of two non-negative magnitudes; `0` when either is zero.
pub(crate) fn ratio(a: f64, b: f64) -> f64 {
    let hi = a.max(b);
    if hi <= f64::EPSILON {
        return 0.0;
    }
    crate::foundation::core::clamp01(a.min(b) / hi)
}

/// Pearson correlation of two equally sized series mapped to `[0, 1]` by clamping negatives.
///
/// A series without variance carries no evidence and yields `0`.
pub(crate) fn correlation01(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let ma = mean(a);
    let mb = mean(b);
    let mut num = 0.0;
    let mut da = 0.0;
    let mut db = 0.0;
    for (x, y) in a.iter().zip(b) {
        num += (x - ma) * (y - mb);
        da += (x - ma).powi(2);
        db += (y - mb).powi(2);
    }
    let denom = (da * db).sqrt();
    if denom <= 1e-12 {
        return 0.0;
    }
    crate::foundation::core::clamp01(num / denom)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
