//! Size and anchor normalization for icons.
//!
//! Icon options accept a size or anchor as a single number, a `[x, y]` pair
//! or a point object. Everything downstream works on a concrete [`Point`].

use crate::{core::geo::Point, MapError, Result};
use serde::{Deserialize, Serialize};

/// A size or anchor the way icon options spell it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconSizeSpec {
    /// Same value on both axes
    Scalar(f64),
    /// `[x, y]`; any other length is rejected during normalization
    Pair(Vec<f64>),
    Point(Point),
}

impl IconSizeSpec {
    /// Parses a raw JSON option value.
    ///
    /// Anything that is not a number, a numeric array or an `{x, y}` object
    /// is an [`MapError::InvalidGeometry`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::Number(n) => n
                .as_f64()
                .map(IconSizeSpec::Scalar)
                .ok_or_else(|| invalid(format!("unrepresentable number {n}"))),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_f64()
                        .ok_or_else(|| invalid(format!("non-numeric pair element {item}")))
                })
                .collect::<Result<Vec<f64>>>()
                .map(IconSizeSpec::Pair),
            Value::Object(fields) => {
                let axis = |name: &str| {
                    fields
                        .get(name)
                        .and_then(Value::as_f64)
                        .ok_or_else(|| invalid(format!("point object is missing numeric `{name}`")))
                };
                Ok(IconSizeSpec::Point(Point::new(axis("x")?, axis("y")?)))
            }
            other => Err(invalid(format!("expected number, pair or point, got {other}"))),
        }
    }
}

impl From<f64> for IconSizeSpec {
    fn from(value: f64) -> Self {
        IconSizeSpec::Scalar(value)
    }
}

impl From<[f64; 2]> for IconSizeSpec {
    fn from(pair: [f64; 2]) -> Self {
        IconSizeSpec::Pair(pair.to_vec())
    }
}

impl From<(f64, f64)> for IconSizeSpec {
    fn from((x, y): (f64, f64)) -> Self {
        IconSizeSpec::Pair(vec![x, y])
    }
}

impl From<Point> for IconSizeSpec {
    fn from(point: Point) -> Self {
        IconSizeSpec::Point(point)
    }
}

fn invalid(message: String) -> MapError {
    MapError::InvalidGeometry(message)
}

/// Converts any accepted size form to a point
pub fn normalize_size(spec: &IconSizeSpec) -> Result<Point> {
    let point = match spec {
        IconSizeSpec::Scalar(value) => Point::new(*value, *value),
        IconSizeSpec::Pair(values) => match values.as_slice() {
            [x, y] => Point::new(*x, *y),
            other => {
                return Err(invalid(format!(
                    "size pair must have two elements, got {}",
                    other.len()
                )))
            }
        },
        IconSizeSpec::Point(point) => *point,
    };

    if !point.is_finite() {
        return Err(invalid(format!("non-finite size ({}, {})", point.x, point.y)));
    }
    Ok(point)
}

/// Like [`normalize_size`], but an absent spec stays absent
pub fn normalize_optional(spec: Option<&IconSizeSpec>) -> Result<Option<Point>> {
    spec.map(normalize_size).transpose()
}

/// Resolves the hot-spot of an icon.
///
/// An explicit anchor wins. Otherwise the anchor is the center of `size`,
/// truncated toward zero on each axis. No size and no anchor means no anchor.
pub fn compute_anchor(
    size: Option<Point>,
    explicit_anchor: Option<&IconSizeSpec>,
) -> Result<Option<Point>> {
    match explicit_anchor {
        Some(anchor) => normalize_size(anchor).map(Some),
        None => Ok(size.map(|size| size.divide_by(2.0).trunc())),
    }
}
