//! Standard sampling grid.
//!
//! Sixteen points on the y = 0 cross-section: four depth levels times four
//! horizontal positions. The horizontal positions are the interior points of
//! a five-way division of the analysis span, centred on the roadbed
//! centreline.
//!
//! ```text
//!        pile1                roadbed                pile2
//!          |     x1      x2   ───────   x3      x4     |
//!   z=1    |     W1      W2             W3      W4     |
//!   z=2    |     W5      W6             W7      W8     |
//!   z=3    |     W9      W10            W11     W12    |
//!   z=4    |     W13     W14            W15     W16    |
//! ```

use serde::{Deserialize, Serialize};

/// Sample depths (m)
pub const GRID_DEPTHS_M: [f64; 4] = [1.0, 2.0, 3.0, 4.0];

/// Minimum analysis span (m)
pub const MIN_ANALYSIS_SPAN_M: f64 = 20.0;

/// Analysis span as a multiple of roadbed width
pub const SPAN_WIDTH_RATIO: f64 = 1.5;

/// Equal divisions of the span; the interior division points are sampled
const SPAN_DIVISIONS: usize = 5;

/// Number of points in the standard grid
pub const GRID_POINT_COUNT: usize = GRID_DEPTHS_M.len() * (SPAN_DIVISIONS - 1);

/// A sample location below the roadbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationPoint {
    /// Point identifier, `W1` to `W16`
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Depth, positive downward
    pub z: f64,
}

/// Analysis span = max(20 m, 1.5 × roadbed width)
pub fn analysis_span(roadbed_width_m: f64) -> f64 {
    MIN_ANALYSIS_SPAN_M.max(SPAN_WIDTH_RATIO * roadbed_width_m)
}

/// Horizontal sample positions x_i = −span/2 + (i+1)·span/5, i = 0..3
pub fn horizontal_positions(span_m: f64) -> Vec<f64> {
    let spacing = span_m / SPAN_DIVISIONS as f64;
    (1..SPAN_DIVISIONS).map(|i| -span_m / 2.0 + spacing * i as f64).collect()
}

/// The 16 standard points, depth-major.
pub fn standard_points(roadbed_width_m: f64) -> Vec<CalculationPoint> {
    let positions = horizontal_positions(analysis_span(roadbed_width_m));
    GRID_DEPTHS_M
        .iter()
        .flat_map(|&z| positions.iter().map(move |&x| (x, z)))
        .enumerate()
        .map(|(i, (x, z))| CalculationPoint {
            id: format!("W{}", i + 1),
            x,
            y: 0.0,
            z,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_span_minimum() {
        assert_eq!(analysis_span(12.0), 20.0);
        assert_eq!(analysis_span(20.0), 30.0);
        // 1.5 × 13.4 = 20.1 > 20
        assert_relative_eq!(analysis_span(13.4), 20.1, epsilon = 1e-12);
    }

    #[test]
    fn test_positions_for_min_span() {
        let x = horizontal_positions(20.0);
        assert_eq!(x.len(), 4);
        for (got, want) in x.iter().zip([-6.0, -2.0, 2.0, 6.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_standard_points_layout() {
        let points = standard_points(12.0);
        assert_eq!(points.len(), GRID_POINT_COUNT);
        assert_eq!(points[0].id, "W1");
        assert_eq!(points[15].id, "W16");
        assert_eq!(points[3].z, 1.0);
        assert_eq!(points[4].z, 2.0);
        assert_relative_eq!(points[4].x, -6.0, epsilon = 1e-12);
        assert!(points.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn test_grid_is_symmetric() {
        let points = standard_points(30.0);
        for row in points.chunks(4) {
            assert_relative_eq!(row[0].x, -row[3].x, epsilon = 1e-12);
            assert_relative_eq!(row[1].x, -row[2].x, epsilon = 1e-12);
        }
    }
}
