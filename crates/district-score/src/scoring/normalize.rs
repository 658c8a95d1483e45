use crate::table::{ConversionError, District};

/// Maps a pre-scaled value onto a higher-is-better scale.
pub fn normalize(value: f64, invert: bool) -> f64 {
    if invert {
        1.0 - value
    } else {
        value
    }
}

pub fn normalize_cell(
    district: &District,
    column: &str,
    invert: bool,
) -> Result<f64, ConversionError> {
    district
        .to_float(column)
        .map(|value| normalize(value, invert))
}

/// Mean over the finite values; `NaN` when none are left.
pub(crate) fn nan_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|value| !value.is_nan())
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
