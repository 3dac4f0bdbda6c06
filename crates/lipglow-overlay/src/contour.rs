//! Lip contour construction.
//!
//! The detector's outer-lip sequence starts at a fixed mouth corner. It is
//! split at the midpoint index into an upper and a lower arc, and each arc is
//! closed into its own polygon. The result is two separate regions rather
//! than one continuous lip outline.

use lipglow_models::{FacePoint, ScreenPoint};

use crate::path::{OverlayPath, Subpath};

/// Contours with this many points or fewer cannot describe a usable lip shape.
pub const MIN_LIP_CONTOUR_POINTS: usize = 10;

/// Build the two-region lip overlay.
///
/// `project` maps each face-local point into display space while the path
/// is built. Returns `None` when the sequence has `min_points` points or
/// fewer.
pub fn build_lip_contours<F>(
    points: &[FacePoint],
    min_points: usize,
    project: F,
) -> Option<OverlayPath>
where
    F: Fn(FacePoint) -> ScreenPoint,
{
    let count = points.len();
    if count <= min_points {
        return None;
    }

    let (upper, lower) = points.split_at(count / 2);

    let mut path = OverlayPath::new();
    path.append(Subpath::closed_polygon(upper.iter().map(|p| project(*p))));
    path.append(Subpath::closed_polygon(lower.iter().map(|p| project(*p))));
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::ScreenMapping;
    use lipglow_models::{NormalizedRect, Viewport};

    fn identity(p: FacePoint) -> ScreenPoint {
        ScreenPoint::new(p.x, p.y)
    }

    fn lip_points(n: usize) -> Vec<FacePoint> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                FacePoint::new(0.5 + 0.3 * t.cos(), 0.25 + 0.1 * t.sin())
            })
            .collect()
    }

    #[test]
    fn test_twenty_points_give_two_ten_point_subpaths() {
        let path = build_lip_contours(&lip_points(20), MIN_LIP_CONTOUR_POINTS, identity).unwrap();
        assert_eq!(path.subpaths().len(), 2);
        assert_eq!(path.subpaths()[0].len(), 10);
        assert_eq!(path.subpaths()[1].len(), 10);
        assert!(path.subpaths().iter().all(|s| s.is_closed()));
    }

    #[test]
    fn test_point_count_preserved_for_any_length() {
        for n in 11..40 {
            let path = build_lip_contours(&lip_points(n), MIN_LIP_CONTOUR_POINTS, identity).unwrap();
            assert_eq!(path.subpaths().len(), 2);
            assert!(path.subpaths().iter().all(|s| !s.is_empty() && s.is_closed()));
            assert_eq!(path.point_count(), n, "n = {}", n);
        }
    }

    #[test]
    fn test_odd_length_puts_extra_point_in_lower_arc() {
        let path = build_lip_contours(&lip_points(21), MIN_LIP_CONTOUR_POINTS, identity).unwrap();
        assert_eq!(path.subpaths()[0].len(), 10);
        assert_eq!(path.subpaths()[1].len(), 11);
    }

    #[test]
    fn test_short_sequences_are_skipped() {
        for n in 0..=10 {
            assert!(build_lip_contours(&lip_points(n), MIN_LIP_CONTOUR_POINTS, identity).is_none());
        }
    }

    #[test]
    fn test_arc_order_follows_input() {
        let points = lip_points(12);
        let path = build_lip_contours(&points, MIN_LIP_CONTOUR_POINTS, identity).unwrap();
        assert_eq!(path.subpaths()[0].points()[0], identity(points[0]));
        assert_eq!(path.subpaths()[1].points()[0], identity(points[6]));
    }

    #[test]
    fn test_projection_applied_per_point() {
        let mapping = ScreenMapping::new(NormalizedRect::new(0.25, 0.25, 0.5, 0.5), Viewport::new(1000.0, 1000.0));
        let mut points = lip_points(20);
        points[0] = FacePoint::new(0.0, 0.0);

        let path = build_lip_contours(&points, MIN_LIP_CONTOUR_POINTS, |p| mapping.project(p)).unwrap();
        let first = path.subpaths()[0].points()[0];
        assert!((first.x - 250.0).abs() < 1e-9);
        assert!((first.y - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_threshold() {
        assert!(build_lip_contours(&lip_points(12), 12, identity).is_none());
        assert!(build_lip_contours(&lip_points(13), 12, identity).is_some());
    }
}
