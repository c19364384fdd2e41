use common::diagnosis::bounding_box::BoundingBox;
use image::imageops::{self, FilterType};
use image::DynamicImage;
use ndarray::Array4;

const PAD_VALUE: f32 = 114.0 / 255.0;

/// Geometry of an aspect-preserving resize onto a square canvas, kept to map boxes back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: u32,
    pub pad_y: u32,
    pub resized_width: u32,
    pub resized_height: u32,
    pub width: u32,
    pub height: u32,
}

impl Letterbox {
    pub fn new(width: u32, height: u32, size: u32) -> Self {
        let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
        let resized_width = ((width as f32 * scale).round() as u32).clamp(1, size);
        let resized_height = ((height as f32 * scale).round() as u32).clamp(1, size);
        Self {
            scale,
            pad_x: (size - resized_width) / 2,
            pad_y: (size - resized_height) / 2,
            resized_width,
            resized_height,
            width,
            height,
        }
    }

    /// Maps a box from model input space back onto the original image.
    pub fn restore(&self, bounding_box: &BoundingBox) -> BoundingBox {
        let (pad_x, pad_y) = (self.pad_x as f32, self.pad_y as f32);
        BoundingBox::new(
            (bounding_box.x_min - pad_x) / self.scale,
            (bounding_box.y_min - pad_y) / self.scale,
            (bounding_box.x_max - pad_x) / self.scale,
            (bounding_box.y_max - pad_y) / self.scale,
        ).clamp(self.width as f32, self.height as f32)
    }
}

/// Builds the `[1, 3, size, size]` RGB input tensor scaled to `[0, 1]`.
pub fn letterbox(image: &DynamicImage, size: u32) -> (Array4<f32>, Letterbox) {
    let letterbox = Letterbox::new(image.width(), image.height(), size);
    let resized = imageops::resize(&image.to_rgb8(), letterbox.resized_width, letterbox.resized_height, FilterType::Triangle);
    let mut tensor = Array4::from_elem((1, 3, size as usize, size as usize), PAD_VALUE);
    let (offset_x, offset_y) = (letterbox.pad_x as usize, letterbox.pad_y as usize);
    for (x, y, pixel) in resized.enumerate_pixels() {
        for channel in 0..3 {
            tensor[[0, channel, y as usize + offset_y, x as usize + offset_x]] = pixel[channel] as f32 / 255.0;
        }
    }
    (tensor, letterbox)
}
