//! Closing prices -> coordinates in a 100 x 100 plotting box.
//!
//! The box has its origin top-left, so the highest close plots at `y = 0` and the
//! lowest at `y = 100`.
use serde::Serialize;
use std::fmt::Write;

/// Side length of the plotting box.
pub const EXTENT: f64 = 100.0;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Lazy iterator over the normalised points of a series; clone it to walk the
/// points again.
#[derive(Debug, Clone)]
pub struct Normalized<'a> {
    series: &'a [f64],
    min: f64,
    range: f64,
    index: usize,
}

/// Map `series` onto the plotting box.
///
/// A flat series has no spread to scale by, so its range is taken as `1` and every
/// point lands on `y = 100`. A single point sits at `x = 0`.
pub fn normalize(series: &[f64]) -> Normalized<'_> {
    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &value| {
            (min.min(value), max.max(value))
        });
    let range = max - min;
    let range = if range == 0.0 || !range.is_finite() {
        1.0
    } else {
        range
    };

    Normalized {
        series,
        min,
        range,
        index: 0,
    }
}

impl Iterator for Normalized<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        let value = *self.series.get(self.index)?;
        let n = self.series.len();
        let x = if n > 1 {
            self.index as f64 / (n - 1) as f64 * EXTENT
        } else {
            0.0
        };
        let y = EXTENT - ((value - self.min) / self.range) * EXTENT;
        self.index += 1;
        Some(Point { x, y })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.series.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Normalized<'_> {}

/// SVG `points` attribute: `"x,y x,y ..."`.
pub fn polyline(points: impl IntoIterator<Item = Point>) -> String {
    let mut out = String::new();
    for (i, point) in points.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", point.x, point.y);
    }
    out
}

/// Standalone SVG of the price line with a gradient-filled area under it.
pub fn svg(points: impl IntoIterator<Item = Point>) -> String {
    let line = polyline(points);
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" preserveAspectRatio="none">
  <defs>
    <linearGradient id="runnrGradient" x1="0" x2="0" y1="0" y2="1">
      <stop offset="0%" stop-color="#22c55e" stop-opacity="0.4" />
      <stop offset="100%" stop-color="#0a0a0a" stop-opacity="0" />
    </linearGradient>
  </defs>
  <polyline points="{line}" fill="none" stroke="#22c55e" stroke-width="1.5" />
  <polygon points="0,100 {line} 100,100" fill="url(#runnrGradient)" />
</svg>
"##
    )
}

/// Rasterise points onto a `width` x `height` character grid, one string per row.
/// Consecutive points are joined with vertical strokes so the line reads as
/// continuous.
pub fn plot(points: impl IntoIterator<Item = Point>, width: usize, height: usize) -> Vec<String> {
    if width == 0 || height == 0 {
        return vec![];
    }
    let mut grid = vec![vec![' '; width]; height];

    let cell = |extent: usize, value: f64| -> usize {
        let scaled = (value / EXTENT * (extent - 1) as f64).round();
        (scaled.max(0.0) as usize).min(extent - 1)
    };

    let mut last: Option<usize> = None;
    for point in points {
        let (col, row) = (cell(width, point.x), cell(height, point.y));
        if let Some(prev_row) = last {
            // fill the vertical gap between neighbours in the new column
            let (lo, hi) = (prev_row.min(row), prev_row.max(row));
            for r in lo..=hi {
                if grid[r][col] == ' ' {
                    grid[r][col] = '│';
                }
            }
        }
        grid[row][col] = '•';
        last = Some(row);
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_no_points() {
        assert_eq!(normalize(&[]).count(), 0);
        assert_eq!(polyline(normalize(&[])), "");
    }

    #[test]
    fn single_point_sits_at_origin_column() {
        let points: Vec<Point> = normalize(&[42.0]).collect();
        assert_eq!(points, vec![Point { x: 0.0, y: 100.0 }]);
    }

    #[test]
    fn constant_series_stays_finite() {
        let points: Vec<Point> = normalize(&[5.0, 5.0, 5.0, 5.0]).collect();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert!(points.iter().all(|p| p.y == 100.0));
        assert_eq!(points[3].x, 100.0);
    }

    #[test]
    fn extremes_map_to_box_edges() {
        let points: Vec<Point> = normalize(&[10.0, 20.0, 15.0]).collect();
        assert_eq!(points[0], Point { x: 0.0, y: 100.0 });
        assert_eq!(points[1], Point { x: 50.0, y: 0.0 });
        assert_eq!(points[2], Point { x: 100.0, y: 50.0 });
    }

    #[test]
    fn iterator_is_restartable_and_exact() {
        let series = [1.0, 3.0, 2.0];
        let points = normalize(&series);
        assert_eq!(points.len(), 3);
        let first: Vec<Point> = points.clone().collect();
        let second: Vec<Point> = points.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn polyline_formats_pairs() {
        assert_eq!(polyline(normalize(&[1.0, 2.0])), "0,100 100,0");
    }

    #[test]
    fn svg_closes_area_polygon() {
        let doc = svg(normalize(&[1.0, 2.0]));
        assert!(doc.contains(r#"<polyline points="0,100 100,0""#));
        assert!(doc.contains(r#"<polygon points="0,100 0,100 100,0 100,100""#));
    }

    #[test]
    fn plot_marks_corners() {
        let rows = plot(normalize(&[1.0, 2.0]), 5, 3);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.chars().count() == 5));
        assert_eq!(rows[2].chars().next(), Some('•'));
        assert_eq!(rows[0].chars().last(), Some('•'));
        assert_eq!(rows[1].chars().last(), Some('│'));
    }

    #[test]
    fn plot_of_nothing_is_blank() {
        assert!(plot(normalize(&[1.0]), 0, 4).is_empty());
        let rows = plot(normalize(&[]), 3, 2);
        assert_eq!(rows, vec!["   ".to_string(), "   ".to_string()]);
    }
}
