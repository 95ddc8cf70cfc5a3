pub fn format_grams(grams: f64) -> String {
    const UNITS: [(&str, f64); 3] = [("g", 1.0), ("mg", 1e-3), ("µg", 1e-6)];

    if !grams.is_finite() || grams <= 0.0 {
        return "0 g".to_owned();
    }

    let mut unit = 0usize;
    while grams < UNITS[unit].1 && unit < UNITS.len() - 1 {
        unit += 1;
    }

    let (label, scale) = UNITS[unit];
    format!("{:.2} {label}", grams / scale)
}

/// Clamps negative and non-finite values to zero.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Horizontal coordinates live on a 1/64 px grid so `width - x` is exact.
pub fn snap_to_grid(value: f64) -> f64 {
    const GRID: f64 = 64.0;
    if value.is_finite() {
        (value * GRID).round() / GRID
    } else {
        0.0
    }
}
