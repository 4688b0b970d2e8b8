use argminmax::ArgMinMax;

/// Index of the largest value, preferring the LAST occurrence on ties.
/// Returns `None` for an empty slice.
pub fn last_index_of_max(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if v < b => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Index of the smallest value, preferring the LAST occurrence on ties.
pub fn last_index_of_min(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if v > b => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Lowest and highest value of a slice (`None` when empty).
pub fn get_min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    Some((values[values.argmin()], values[values.argmax()]))
}
