//! Label down-sampling for dense categorical or sequential axes.

/// At most this many evenly spaced labels (plus the forced last one).
pub const MAX_VISIBLE_LABELS: usize = 10;

/// Indices of the items that should carry a visible label.
///
/// All of them up to [`MAX_VISIBLE_LABELS`]; beyond that every `ceil(n / 10)`-th index from 0,
/// with the final index always included. The result is strictly ascending.
pub fn sample_label_indices(n: usize) -> Vec<usize> {
    if n <= MAX_VISIBLE_LABELS {
        return (0..n).collect();
    }
    let step = n.div_ceil(MAX_VISIBLE_LABELS);
    let mut out: Vec<usize> = (0..n).step_by(step).collect();
    if out.last() != Some(&(n - 1)) {
        out.push(n - 1);
    }
    out
}

/// Pair each sampled index with its item.
pub fn sampled_labels<T>(items: &[T]) -> Vec<(usize, &T)> {
    sample_label_indices(items.len())
        .into_iter()
        .map(|i| (i, &items[i]))
        .collect()
}
