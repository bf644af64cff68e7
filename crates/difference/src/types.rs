use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

/// Outer boundary of one connected changed region, in pixel coordinates.
///
/// Points form a closed polyline: the last point connects back to the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<[i32; 2]>,
}

impl Contour {
    pub fn new(points: Vec<[i32; 2]>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inclusive bounding box as `(min, max)`, or `None` for an empty contour.
    pub fn bounding_box(&self) -> Option<([i32; 2], [i32; 2])> {
        let first = *self.points.first()?;
        let (min, max) = self.points.iter().fold((first, first), |(min, max), &[x, y]| {
            ([min[0].min(x), min[1].min(y)], [max[0].max(x), max[1].max(y)])
        });
        Some((min, max))
    }
}

/// Everything produced by comparing one before/after pair.
#[derive(Debug, Clone)]
pub struct ComputedDifference {
    /// Binary change mask: 255 where the pair differs beyond the threshold, 0 elsewhere
    pub mask: GrayImage,
    /// External contours of the changed regions
    pub contours: Vec<Contour>,
    /// The before image in colour with every contour drawn on it
    pub canvas: RgbImage,
    pub image_width: u32,
    pub image_height: u32,
}

impl ComputedDifference {
    /// Number of mask samples marked as changed.
    pub fn changed_pixels(&self) -> usize {
        self.mask.pixels().filter(|p| p[0] > 0).count()
    }

    pub fn has_changes(&self) -> bool {
        !self.contours.is_empty()
    }
}
