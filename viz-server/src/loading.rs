use std::path::Path;

use kmeans::{Point, tools::validate_points};
use kmeans_viz::{VizError, VizResult};
use serde_json::Value;
use tracing::debug;

/// Read a JSON array of numeric rows, e.g. `[[1.0, 2.0], [3, 4]]`.
pub async fn load_points(path: &Path) -> VizResult<Vec<Point>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let v: Value = serde_json::from_str(&contents)?;

    let rows = match &v {
        Value::Array(rows) => rows,
        _ => return Err(VizError::BadRequest(format!("{} does not hold a JSON array", path.display()))),
    };
    let points = rows.iter()
        .enumerate()
        .map(|(i, row)| parse_row(i, row))
        .collect::<VizResult<Vec<Point>>>()?;

    let dim = validate_points(&points)?;
    debug!(path = %path.display(), n_points = points.len(), dim, "points loaded");
    Ok(points)
}

fn parse_row(index: usize, row: &Value) -> VizResult<Point> {
    let values = row.as_array()
        .ok_or_else(|| VizError::BadRequest(format!("row {} is not an array", index)))?;
    values.iter()
        .map(|x| x.as_f64().ok_or_else(|| VizError::BadRequest(format!("row {} holds a non-numeric value: {}", index, x))))
        .collect()
}
