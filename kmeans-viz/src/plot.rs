//! SVG scatter rendering of a clustering result

use std::path::Path;

use kmeans::Point;
use plotlib::{
    page::Page,
    repr::Plot,
    style::{PointMarker, PointStyle},
    view::ContinuousView,
};

use crate::error::{VizError, VizResult};

const COLORS: [&str; 10] = [
    "#DD3355", // Red-pink
    "#33DD55", // Green
    "#3355DD", // Blue
    "#DDDD33", // Yellow
    "#FF7733", // Orange
    "#AA33DD", // Purple
    "#55AAAA", // Cyan
    "#AAAAAA", // Gray
    "#884400", // Brown
    "#DD33DD", // Magenta
];

/// Draw points coloured by label (first two coordinates) with centroids on top.
/// Colours repeat after ten clusters.
pub fn to_svg(points: &[Point], centroids: &[Point], labels: &[usize], path: &Path) -> VizResult<()> {
    if points.iter().chain(centroids.iter()).any(|p| p.len() < 2) {
        return Err(VizError::Plot("plotting needs at least two coordinates per point".to_string()));
    }

    let mut view = ContinuousView::new().x_label("x").y_label("y");
    for cluster in 0..centroids.len() {
        let members: Vec<(f64, f64)> = points.iter()
            .zip(labels.iter())
            .filter(|(_, label)| **label == cluster)
            .map(|(p, _)| (p[0], p[1]))
            .collect();
        if members.is_empty() {
            continue;
        }
        let scatter = Plot::new(members).point_style(
            PointStyle::new()
                .marker(PointMarker::Circle)
                .colour(COLORS[cluster % COLORS.len()]),
        );
        view = view.add(scatter);
    }

    let centres = Plot::new(centroids.iter().map(|c| (c[0], c[1])).collect()).point_style(
        PointStyle::new()
            .marker(PointMarker::Cross)
            .colour("#000000"),
    );
    view = view.add(centres);

    Page::single(&view)
        .save(path)
        .map_err(|e| VizError::Plot(e.to_string()))
}
