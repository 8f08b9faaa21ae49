//! The single reserved "missing / land / unresolved" value.
//!
//! Every output produced by the engine uses this value for cells that
//! have no physical meaning. Archive writers map it onto their own
//! missing-value attribute unchanged.

/// Sentinel written for missing, land or below-seabed cells.
pub const SENTINEL: f32 = 1.0e37;

/// True when `value` is exactly the sentinel.
#[inline]
pub fn is_sentinel(value: f32) -> bool {
    value == SENTINEL
}

/// Map NaN and an optional caller-specific missing value onto NaN.
///
/// Used on entry so that missing samples never look like valid data.
#[inline]
pub fn to_nan(value: f32, missing: Option<f32>) -> f32 {
    match missing {
        Some(m) if value == m => f32::NAN,
        _ => value,
    }
}

/// Replace NaN with `fill`.
#[inline]
pub fn restamp(value: f32, fill: f32) -> f32 {
    if value.is_nan() {
        fill
    } else {
        value
    }
}
