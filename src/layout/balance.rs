use super::LayoutNode;

/// Minimum detail/overview height ratio before the detail column gets more
/// room.
pub(super) const BALANCE_RATIO: f64 = 1.30;
pub(super) const MAX_BALANCED_PADDING: f64 = 48.0;

fn occupied_height(nodes: &[LayoutNode], column: &[usize]) -> f64 {
    let top = column
        .iter()
        .map(|&node| nodes[node].y0)
        .fold(f64::INFINITY, f64::min);
    let bottom = column
        .iter()
        .map(|&node| nodes[node].y1)
        .fold(f64::NEG_INFINITY, f64::max);

    if top.is_finite() && bottom.is_finite() {
        (bottom - top).max(0.0)
    } else {
        0.0
    }
}

/// Padding for a second layout run when the detail column occupies less than
/// `BALANCE_RATIO` times the overview column's height. `None` means the first
/// run stands.
pub(super) fn balanced_padding(
    nodes: &[LayoutNode],
    columns: &[Vec<usize>],
    padding: &[f64],
    detail: usize,
    overview: usize,
) -> Option<Vec<f64>> {
    let detail_column = columns.get(detail)?;
    let overview_column = columns.get(overview)?;
    if detail_column.len() < 2 {
        return None;
    }

    let detail_height = occupied_height(nodes, detail_column);
    let overview_height = occupied_height(nodes, overview_column);
    if overview_height <= 0.0 {
        return None;
    }

    let ratio = detail_height / overview_height;
    if ratio >= BALANCE_RATIO {
        return None;
    }

    let deficit = BALANCE_RATIO * overview_height - detail_height;
    let current = padding.get(detail).copied()?;
    let increased = (current + deficit / (detail_column.len() - 1) as f64).min(MAX_BALANCED_PADDING);
    if increased <= current {
        return None;
    }

    log::debug!(
        "detail column at {ratio:.2}x overview height; padding {current:.1} -> {increased:.1}"
    );

    let mut balanced = padding.to_vec();
    balanced[detail] = increased;
    Some(balanced)
}
