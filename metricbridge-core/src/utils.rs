use itertools::Itertools;

#[must_use]
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Quantile with linear interpolation between closest ranks. `sorted` must be ascending.
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Most frequent value; ties go to the smallest value.
#[must_use]
pub fn mode<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    values
        .into_iter()
        .counts()
        .into_iter()
        .sorted_by(|(a, count_a), (b, count_b)| count_b.cmp(count_a).then_with(|| a.cmp(b)))
        .next()
        .map(|(value, _)| value.to_owned())
}

/// Pairs of non-missing `(target, prediction)` values.
pub fn complete_pairs<'a>(
    target: &'a [Option<f64>],
    prediction: &'a [Option<f64>],
) -> impl Iterator<Item = (usize, f64, f64)> + 'a {
    target
        .iter()
        .zip(prediction)
        .enumerate()
        .filter_map(|(i, (t, p))| match (t, p) {
            (Some(t), Some(p)) if t.is_finite() && p.is_finite() => Some((i, *t, *p)),
            _ => None,
        })
}
