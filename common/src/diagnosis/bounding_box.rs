use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates of the image it was detected in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self::new(center_x - width / 2.0, center_y - height / 2.0, center_x + width / 2.0, center_y + height / 2.0)
    }

    pub fn width(&self) -> f32 {
        (self.x_max - self.x_min).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y_max - self.y_min).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over union, 0 when either box is degenerate.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let intersection = BoundingBox::new(
            self.x_min.max(other.x_min),
            self.y_min.max(other.y_min),
            self.x_max.min(other.x_max),
            self.y_max.min(other.y_max),
        ).area();
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 { 0.0 } else { intersection / union }
    }

    pub fn clamp(&self, width: f32, height: f32) -> Self {
        Self::new(
            self.x_min.clamp(0.0, width),
            self.y_min.clamp(0.0, height),
            self.x_max.clamp(0.0, width),
            self.y_max.clamp(0.0, height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let bounding_box = BoundingBox::new(10.0, 10.0, 50.0, 30.0);
        assert!((bounding_box.iou(&bounding_box) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let left = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let right = BoundingBox::new(20.0, 0.0, 30.0, 10.0);
        assert_eq!(left.iou(&right), 0.0);
    }

    #[test]
    fn iou_of_half_overlap() {
        let left = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let shifted = BoundingBox::new(5.0, 0.0, 15.0, 10.0);
        assert!((left.iou(&shifted) - 50.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn from_center_and_clamp() {
        let bounding_box = BoundingBox::from_center(5.0, 5.0, 20.0, 4.0).clamp(12.0, 12.0);
        assert_eq!(bounding_box, BoundingBox::new(0.0, 3.0, 12.0, 7.0));
    }
}
