use image::GrayImage;
use crate::{error::Result, traits::ContourExtractor, types::Contour};

/// Imageproc-based extractor that keeps only outermost boundaries.
///
/// Hole borders and any region nested inside a hole are discarded, and each
/// boundary is reduced with [`approximate_simple`]. The mask is padded with a
/// zero border first, so regions touching the image edge (or covering all of
/// it) still get an outer boundary.
#[derive(Debug, Clone, Default)]
pub struct ExternalContourExtractor;

impl ContourExtractor for ExternalContourExtractor {
    fn extract_contours(&self, binary_image: &GrayImage) -> Result<Vec<Contour>> {
        let mut padded = GrayImage::new(binary_image.width() + 2, binary_image.height() + 2);
        image::imageops::replace(&mut padded, binary_image, 1, 1);
        let contours = imageproc::contours::find_contours::<i32>(&padded);

        let result = contours
            .into_iter()
            .filter(|contour| contour.parent.is_none())
            .map(|contour| {
                let points: Vec<[i32; 2]> = contour.points.iter().map(|p| [p.x - 1, p.y - 1]).collect();
                Contour::new(approximate_simple(&points))
            })
            .filter(|contour| !contour.is_empty())
            .collect();

        Ok(result)
    }
}

/// Simple chain approximation of a closed 8-connected boundary.
///
/// A point is dropped when the step into it and the step out of it have the
/// same direction, so straight runs collapse to their end points.
pub fn approximate_simple(points: &[[i32; 2]]) -> Vec<[i32; 2]> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |from: [i32; 2], to: [i32; 2]| [(to[0] - from[0]).signum(), (to[1] - from[1]).signum()];

    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect()
}
