//! Measurement conversions used by WordprocessingML attributes.
//!
//! Page geometry, indents and paragraph spacing are stored in twentieths of a
//! point (twips); font sizes in half-points; auto line spacing in 240ths of a
//! line.

pub fn twips_from_pt(points: f64) -> i64 {
    (points * 20.0).round() as i64
}

pub fn twips_from_cm(centimeters: f64) -> i64 {
    (centimeters * 1440.0 / 2.54).round() as i64
}

pub fn twips_from_mm(millimeters: f64) -> i64 {
    (millimeters * 1440.0 / 25.4).round() as i64
}

pub fn half_points(points: f64) -> i64 {
    (points * 2.0).round() as i64
}

pub fn line_240ths(multiple: f64) -> i64 {
    (multiple * 240.0).round() as i64
}
