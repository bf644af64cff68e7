use image::{Rgb, RgbImage};
use imageproc::drawing::{BresenhamLineIter, draw_filled_circle_mut};
use crate::{error::Result, traits::ContourRenderer, types::Contour};

/// Dark yellow, the default contour colour.
pub const DEFAULT_HIGHLIGHT_COLOR: [u8; 3] = [200, 200, 0];
pub const DEFAULT_LINE_THICKNESS: u32 = 2;
pub const MAX_LINE_THICKNESS: u32 = 64;

/// Draws every contour as a closed polyline with a round brush.
///
/// The brush radius is `thickness / 2`, so lines are `2 * (thickness / 2) + 1`
/// pixels wide: odd thicknesses are exact and even ones round up to the next
/// odd width. Thickness is capped at [`MAX_LINE_THICKNESS`].
#[derive(Debug, Clone)]
pub struct ContourOverlay {
    pub color: Rgb<u8>,
    pub thickness: u32,
}

impl Default for ContourOverlay {
    fn default() -> Self {
        Self {
            color: Rgb(DEFAULT_HIGHLIGHT_COLOR),
            thickness: DEFAULT_LINE_THICKNESS,
        }
    }
}

impl ContourOverlay {
    pub fn new(color: [u8; 3], thickness: u32) -> Self {
        Self { color: Rgb(color), thickness }
    }

    fn stamp(&self, canvas: &mut RgbImage, center: (i32, i32)) {
        let radius = (self.thickness.min(MAX_LINE_THICKNESS) / 2) as i32;
        draw_filled_circle_mut(canvas, center, radius, self.color);
    }

    fn draw_contour(&self, canvas: &mut RgbImage, contour: &Contour) {
        let n = contour.points.len();
        for (i, &[x, y]) in contour.points.iter().enumerate() {
            self.stamp(canvas, (x, y));
            if n < 2 {
                continue;
            }
            let [nx, ny] = contour.points[(i + 1) % n];
            for point in BresenhamLineIter::new((x as f32, y as f32), (nx as f32, ny as f32)) {
                self.stamp(canvas, point);
            }
        }
    }
}

impl ContourRenderer for ContourOverlay {
    fn render(&self, canvas: &mut RgbImage, contours: &[Contour]) -> Result<()> {
        for contour in contours {
            self.draw_contour(canvas, contour);
        }
        Ok(())
    }
}
