//! One-dimensional interpolation used along water-column profiles.

/// Piecewise-linear interpolation of `(xs, ys)` at `x`.
///
/// `xs` must be ascending and the same length as `ys`. Targets outside
/// `[xs[0], xs[last]]` take the nearest end value, so a target slightly
/// shallower than the topmost native level receives the topmost sample.
///
/// NaN entries in `ys` are not skipped: a target that lands exactly on a
/// sample returns that sample, any other target whose bracketing pair (or
/// clamped end) is NaN yields NaN. Returns NaN for an empty profile.
#[inline]
pub fn linear_interp(x: f64, xs: &[f64], ys: &[f32]) -> f32 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return f32::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    // First index with xs[i] > x; 1 <= upper <= n - 1 given the checks above.
    let upper = xs[..n].partition_point(|&v| v <= x);
    let lower = upper - 1;
    if xs[lower] == x {
        return ys[lower];
    }
    let (x0, x1) = (xs[lower], xs[upper]);
    let (y0, y1) = (ys[lower] as f64, ys[upper] as f64);

    let t = (x - x0) / (x1 - x0);
    (y0 + (y1 - y0) * t) as f32
}
