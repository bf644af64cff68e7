use image::{GrayImage, Luma};
use crate::{error::Result, traits::DifferenceOperator};

/// Per-pixel `|before - after|`
#[derive(Debug, Clone, Default)]
pub struct AbsoluteDifference;

impl DifferenceOperator for AbsoluteDifference {
    fn difference(&self, before: &GrayImage, after: &GrayImage) -> Result<GrayImage> {
        Ok(GrayImage::from_fn(before.width(), before.height(), |x, y| {
            Luma([before.get_pixel(x, y)[0].abs_diff(after.get_pixel(x, y)[0])])
        }))
    }
}
