//! Chart geometry for a category-axis line chart: one slot per sample,
//! samples laid out evenly left to right.

pub const PLOT_PADDING: f64 = 48.0;
pub const MIN_LABEL_SPACING: f64 = 96.0;

pub fn plot_width(width: f64) -> f64 {
    (width - 2.0 * PLOT_PADDING).max(0.0)
}

#[expect(clippy::cast_precision_loss)]
pub fn index_to_x(index: usize, count: usize, width: f64) -> f64 {
    let plot_width = plot_width(width);

    if count <= 1 {
        return PLOT_PADDING + plot_width / 2.0;
    }

    PLOT_PADDING + index as f64 / (count - 1) as f64 * plot_width
}

/// Closest slot under `x`, clamped to the plot.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn x_to_index(x: f64, count: usize, width: f64) -> Option<usize> {
    if count == 0 {
        return None;
    }

    let plot_width = plot_width(width);
    if count == 1 || plot_width < f64::EPSILON {
        return Some(0);
    }

    let ratio = ((x - PLOT_PADDING) / plot_width).clamp(0.0, 1.0);
    Some((ratio * (count - 1) as f64).round() as usize)
}

pub fn value_to_y(value: f64, max_value: f64, height: f64) -> f64 {
    let y_margin = y_margin(height);
    if max_value < f64::EPSILON {
        return height - y_margin;
    }

    let rev_factor = 1.0 / max_value;
    height - rev_factor * value * (height - 2.0 * y_margin) - y_margin
}

pub fn y_margin(height: f64) -> f64 {
    height / 10.0
}

/// Runs of consecutive present samples. The line is broken between runs.
pub fn segments(chart_data: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for (index, value) in chart_data.iter().enumerate() {
        match value {
            Some(value) => current.push((index, *value)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Samples with no present neighbour. A stroke through a single point paints
/// nothing, so these are drawn as dots.
pub fn isolated_points(
    segments: &[Vec<(usize, f64)>],
) -> impl Iterator<Item = (usize, f64)> + '_ {
    segments.iter().filter_map(|segment| match segment.as_slice() {
        [point] => Some(*point),
        _ => None,
    })
}

/// Draws every `stride`-th label so that labels don't overlap.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn label_stride(count: usize, width: f64) -> usize {
    let fitting = (plot_width(width) / MIN_LABEL_SPACING).floor().max(1.0) as usize;
    count.div_ceil(fitting).max(1)
}

/// Closest present sample to `index`, searching outward. Ties go left.
pub fn closest_present(chart_data: &[Option<f64>], index: usize) -> Option<(usize, f64)> {
    if index >= chart_data.len() {
        return None;
    }

    (0..chart_data.len()).find_map(|distance| {
        let left = index
            .checked_sub(distance)
            .and_then(|left| chart_data[left].map(|value| (left, value)));
        let right = chart_data
            .get(index + distance)
            .copied()
            .flatten()
            .map(|value| (index + distance, value));

        left.or(right)
    })
}
