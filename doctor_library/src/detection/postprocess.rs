use crate::detection::detector::DetectionError;
use crate::detection::letterbox::Letterbox;
use common::diagnosis::bounding_box::BoundingBox;
use common::diagnosis::detection::Detection;
use ndarray::{Array2, ArrayView2, Axis};

/// Lowest score that still takes part in suppression. Suppression never depends on the
/// user threshold above this value, so a higher threshold can only drop detections.
pub const CANDIDATE_FLOOR: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub bounding_box: BoundingBox,
    pub class_id: usize,
    pub confidence: f32,
}

/// Reshapes a `[1, 4 + classes, anchors]` (or transposed `[1, anchors, 4 + classes]`) output
/// into a `[4 + classes, anchors]` matrix.
pub fn prediction_matrix(shape: &[i64], data: &[f32], class_count: usize) -> Result<Array2<f32>, DetectionError> {
    let unexpected = || DetectionError::UnexpectedOutput(shape.to_vec());
    let &[1, rows, columns] = shape else {
        return Err(unexpected());
    };
    let rows = usize::try_from(rows).map_err(|_| unexpected())?;
    let columns = usize::try_from(columns).map_err(|_| unexpected())?;
    let view = ArrayView2::from_shape((rows, columns), data).map_err(|_| unexpected())?;
    let attributes = 4 + class_count;
    if rows == attributes {
        Ok(view.to_owned())
    } else if columns == attributes {
        Ok(view.t().to_owned())
    } else {
        Err(unexpected())
    }
}

pub fn decode_predictions(predictions: ArrayView2<f32>, threshold: f32, iou_threshold: f32, letterbox: &Letterbox, labels: &[String]) -> Vec<Detection> {
    let floor = threshold.min(CANDIDATE_FLOOR);
    let candidates = predictions.axis_iter(Axis(1))
        .filter_map(|column| {
            let (class_id, confidence) = best_class(column.iter().skip(4).copied())?;
            (confidence >= floor).then(|| Candidate {
                bounding_box: BoundingBox::from_center(column[0], column[1], column[2], column[3]),
                class_id,
                confidence,
            })
        })
        .collect();
    non_maximum_suppression(candidates, iou_threshold)
        .into_iter()
        .filter(|candidate| candidate.confidence >= threshold)
        .map(|candidate| Detection::new(
            letterbox.restore(&candidate.bounding_box),
            candidate.class_id,
            label_for(labels, candidate.class_id),
            candidate.confidence,
        ))
        .collect()
}

/// Greedy per-class suppression; the result is ordered by descending confidence.
pub fn non_maximum_suppression(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|left, right| right.confidence.total_cmp(&left.confidence));
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let overlaps = kept.iter().any(|other| {
            other.class_id == candidate.class_id && other.bounding_box.iou(&candidate.bounding_box) > iou_threshold
        });
        if !overlaps {
            kept.push(candidate);
        }
    }
    kept
}

pub fn label_for(labels: &[String], class_id: usize) -> String {
    labels.get(class_id).cloned().unwrap_or_else(|| format!("class_{class_id}"))
}

fn best_class(scores: impl Iterator<Item = f32>) -> Option<(usize, f32)> {
    scores.enumerate().fold(None, |best, (class_id, score)| match best {
        Some((_, best_score)) if best_score >= score => best,
        _ => Some((class_id, score)),
    })
}
