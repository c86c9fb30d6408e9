//! Deterministic node layouts for planner fixtures.
//!
//! Layouts yield plain `[x, y, altitude]` triples so this crate stays free of
//! a dependency on the library under test.

/// A coordinate triple in `[x, y, altitude]` order.
pub type Coordinates = [f64; 3];

/// Places `count` points evenly on a horizontal circle.
///
/// # Examples
/// ```
/// use fogtier_test_support::layout::ring;
///
/// let points = ring([0.0, 0.0], 10.0, 4, 2.0);
/// assert_eq!(points.len(), 4);
/// assert!((points[0][0] - 10.0).abs() < 1e-9);
/// assert_eq!(points[3][2], 2.0);
/// ```
#[must_use]
pub fn ring(center: [f64; 2], radius: f64, count: usize, altitude: f64) -> Vec<Coordinates> {
    let step = std::f64::consts::TAU / count.max(1) as f64;
    (0..count)
        .map(|i| {
            let angle = step * i as f64;
            [
                center[0] + radius * angle.cos(),
                center[1] + radius * angle.sin(),
                altitude,
            ]
        })
        .collect()
}

/// Places `columns * rows` points on a square grid, row by row.
///
/// # Examples
/// ```
/// use fogtier_test_support::layout::grid;
///
/// let points = grid([100.0, 0.0], 3, 2, 5.0, 0.0);
/// assert_eq!(points.len(), 6);
/// assert_eq!(points[4], [105.0, 5.0, 0.0]);
/// ```
#[must_use]
pub fn grid(
    origin: [f64; 2],
    columns: usize,
    rows: usize,
    spacing: f64,
    altitude: f64,
) -> Vec<Coordinates> {
    (0..rows)
        .flat_map(|row| {
            (0..columns).map(move |column| {
                [
                    origin[0] + spacing * column as f64,
                    origin[1] + spacing * row as f64,
                    altitude,
                ]
            })
        })
        .collect()
}

/// Builds a town: one tight ring of devices per district centre.
///
/// Districts lie far enough apart that a clusterer bounded by a distance a
/// little over `2 * radius` separates them cleanly.
#[must_use]
pub fn districts(centres: &[[f64; 2]], radius: f64, per_district: usize) -> Vec<Coordinates> {
    centres
        .iter()
        .flat_map(|&centre| ring(centre, radius, per_district, 0.0))
        .collect()
}
