/// Sum that skips NaN values. An all-NaN or empty input sums to 0.0.
#[inline]
pub fn nan_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().filter(|v| !v.is_nan()).sum()
}

/// Mean that skips NaN values. NaN when nothing is left to average.
#[inline]
pub fn nan_mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        if !v.is_nan() {
            sum += v;
            n += 1;
        }
    }
    if n > 0 {
        sum / n as f64
    } else {
        f64::NAN
    }
}

/// `num / den`, NaN when the denominator is zero or either side is NaN.
#[inline]
pub fn ratio_or_nan(num: f64, den: f64) -> f64 {
    if den == 0.0 || den.is_nan() || num.is_nan() {
        f64::NAN
    } else {
        num / den
    }
}
