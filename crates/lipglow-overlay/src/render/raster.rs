//! Rasterisation of overlay paths into RGBA images.
//!
//! Every closed subpath is drawn into a coverage mask with
//! `imageproc::drawing::draw_polygon_mut`, so overlapping subpaths form a
//! union and each covered pixel is blended exactly once. Drawing is clipped
//! to the image, so shapes hanging off-screen draw only their visible part.

use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::path::{OverlayPath, Subpath};

/// Vertices are clamped to this distance from the origin before rounding.
const COORD_LIMIT: f64 = 1_048_576.0;

const COVERED: Luma<u8> = Luma([255]);

/// Fill `path` into `img` with `color`, blending by the colour's alpha.
pub fn fill_path(img: &mut RgbaImage, path: &OverlayPath, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || color[3] == 0 {
        return;
    }

    let mask = coverage_mask(w, h, path);
    for (x, y, coverage) in mask.enumerate_pixels() {
        if coverage[0] > 0 {
            blend_pixel(img.get_pixel_mut(x, y), color);
        }
    }
}

/// Union of all closed subpaths as a `w` x `h` mask.
pub fn coverage_mask(w: u32, h: u32, path: &OverlayPath) -> GrayImage {
    let mut mask = GrayImage::new(w, h);
    for sub in path.subpaths().iter().filter(|s| s.is_closed()) {
        if let Some(poly) = polygon_points(sub) {
            draw_polygon_mut(&mut mask, &poly, COVERED);
        }
    }
    mask
}

/// Integer vertices for `sub`, or `None` when nothing can be drawn.
fn polygon_points(sub: &Subpath) -> Option<Vec<Point<i32>>> {
    let mut poly = Vec::with_capacity(sub.len());
    for p in sub.points() {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        let x = p.x.clamp(-COORD_LIMIT, COORD_LIMIT).round() as i32;
        let y = p.y.clamp(-COORD_LIMIT, COORD_LIMIT).round() as i32;
        poly.push(Point::new(x, y));
    }

    // draw_polygon_mut rejects an explicit closing vertex
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    (poly.len() >= 3).then_some(poly)
}

/// Source-over blend of `src` onto `dst`.
fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let a = src[3] as f64 / 255.0;
    for c in 0..3 {
        let blended = src[c] as f64 * a + dst[c] as f64 * (1.0 - a);
        dst[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    let out_a = a + (dst[3] as f64 / 255.0) * (1.0 - a);
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::{build_lip_contours, MIN_LIP_CONTOUR_POINTS};
    use lipglow_models::{FacePoint, ScreenPoint};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const HALF_RED: Rgba<u8> = Rgba([255, 0, 0, 128]);

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Subpath {
        Subpath::closed_polygon(vec![
            ScreenPoint::new(x0, y0),
            ScreenPoint::new(x1, y0),
            ScreenPoint::new(x1, y1),
            ScreenPoint::new(x0, y1),
        ])
    }

    fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> OverlayPath {
        let mut path = OverlayPath::new();
        path.append(rect(x0, y0, x1, y1));
        path
    }

    fn count_colored(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p[0] > 0).count()
    }

    #[test]
    fn test_fills_rectangle_including_edges() {
        let mut img = RgbaImage::new(20, 20);
        fill_path(&mut img, &rect_path(2.0, 3.0, 6.0, 8.0), RED);
        assert_eq!(count_colored(&img), 5 * 6);
        assert_eq!(img.get_pixel(2, 3), &RED);
        assert_eq!(img.get_pixel(6, 8), &RED);
        assert_eq!(img.get_pixel(7, 8)[0], 0);
        assert_eq!(img.get_pixel(6, 9)[0], 0);
    }

    #[test]
    fn test_off_screen_is_clipped() {
        let mut img = RgbaImage::new(10, 10);
        fill_path(&mut img, &rect_path(-50.0, -50.0, 5.0, 5.0), RED);
        assert_eq!(count_colored(&img), 36);

        let mut img = RgbaImage::new(10, 10);
        fill_path(&mut img, &rect_path(100.0, 100.0, 200.0, 200.0), RED);
        assert_eq!(count_colored(&img), 0);
    }

    #[test]
    fn test_overlapping_subpaths_blend_once() {
        let mut path = rect_path(0.0, 0.0, 10.0, 10.0);
        path.append(rect(5.0, 5.0, 15.0, 15.0));

        let black = Rgba([0, 0, 0, 255]);
        let mut img = RgbaImage::from_pixel(20, 20, black);
        fill_path(&mut img, &path, HALF_RED);

        assert_eq!(img.get_pixel(2, 2)[0], 128);
        assert_eq!(img.get_pixel(12, 12)[0], 128);
        assert_eq!(img.get_pixel(7, 7)[0], 128);
        assert_eq!(img.get_pixel(18, 2), &black);
    }

    #[test]
    fn test_lip_arcs_overlap_is_filled() {
        // Upper arc traces [0,10]^2, lower arc traces [5,15]^2
        let points: Vec<FacePoint> = [
            (0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (5.0, 10.0), (0.0, 10.0),
            (5.0, 5.0), (10.0, 5.0), (15.0, 5.0), (15.0, 15.0), (10.0, 15.0), (5.0, 15.0),
        ]
        .iter()
        .map(|&(x, y)| FacePoint::new(x, y))
        .collect();
        let path =
            build_lip_contours(&points, MIN_LIP_CONTOUR_POINTS, |p| ScreenPoint::new(p.x, p.y))
                .unwrap();
        assert_eq!(path.subpaths().len(), 2);

        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        fill_path(&mut img, &path, HALF_RED);

        assert_eq!(img.get_pixel(2, 2)[0], 128);
        assert_eq!(img.get_pixel(12, 12)[0], 128);
        assert_eq!(img.get_pixel(7, 7)[0], 128);
    }

    #[test]
    fn test_explicit_closing_vertex_is_accepted() {
        let mut path = OverlayPath::new();
        path.append(Subpath::closed_polygon(vec![
            ScreenPoint::new(1.0, 1.0),
            ScreenPoint::new(4.0, 1.0),
            ScreenPoint::new(4.0, 4.0),
            ScreenPoint::new(1.0, 1.0),
        ]));
        let mask = coverage_mask(8, 8, &path);
        assert_eq!(mask.get_pixel(3, 2)[0], 255);
        assert_eq!(mask.get_pixel(1, 4)[0], 0);
    }

    #[test]
    fn test_half_alpha_blends_over_black() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        fill_path(&mut img, &rect_path(0.0, 0.0, 4.0, 4.0), HALF_RED);
        let p = img.get_pixel(1, 1);
        assert_eq!(p[0], 128);
        assert_eq!(p[1], 0);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn test_non_finite_subpath_is_skipped() {
        let mut path = rect_path(f64::NAN, 0.0, 5.0, 5.0);
        path.append(rect(6.0, 6.0, 8.0, 8.0));
        let mut img = RgbaImage::new(10, 10);
        fill_path(&mut img, &path, RED);
        assert_eq!(count_colored(&img), 9);
    }

    #[test]
    fn test_degenerate_subpath_draws_nothing() {
        let mut path = OverlayPath::new();
        path.append(Subpath::closed_polygon(vec![
            ScreenPoint::new(2.0, 2.0),
            ScreenPoint::new(2.1, 2.2),
        ]));
        let mut img = RgbaImage::new(4, 4);
        fill_path(&mut img, &path, RED);
        assert_eq!(count_colored(&img), 0);
    }
}
