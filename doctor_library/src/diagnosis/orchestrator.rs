use crate::detection::detector::{decode_image, validate_threshold, DetectionError, Detector};
use crate::diagnosis::finding::{Diagnosis, Finding};
use crate::fetcher::search::SearchFetcher;
use crate::fetcher::summary::SummaryFetcher;
use crate::utils::config::Config;
use crate::utils::logging::*;
use common::diagnosis::detection::Detection;
use common::diagnosis::disease_info::DiseaseInfo;
use futures::future::join_all;
use futures::join;
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

/// Runs one upload from image bytes to findings: detect, then look up every distinct label.
pub struct Orchestrator<D, S, W> {
    config: Arc<Config>,
    detector: Arc<D>,
    summary_fetcher: S,
    search_fetcher: W,
}

impl<D: Detector, S: SummaryFetcher, W: SearchFetcher> Orchestrator<D, S, W> {
    pub fn new(config: Arc<Config>, detector: D, summary_fetcher: S, search_fetcher: W) -> Self {
        Self {
            config,
            detector: Arc::new(detector),
            summary_fetcher,
            search_fetcher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Invalid input stops the flow before any lookup; lookup failures only degrade their finding.
    pub async fn diagnose(&self, request_id: Uuid, image: Vec<u8>, threshold: f32) -> Result<Diagnosis, DetectionError> {
        let detections = match self.detect(image, threshold).await {
            Ok(detections) => detections,
            Err(err) => {
                logging_warning!(request_id, DiagnosisEntry::Rejected(err.to_string()), "");
                return Err(err);
            },
        };
        if detections.is_empty() {
            logging_information!(request_id, DiagnosisEntry::NoDetections(threshold), "");
            return Ok(Diagnosis::NoDetections);
        }
        logging_information!(request_id, DiagnosisEntry::Detected(detections.len(), threshold), "");
        let investigations = group_by_label(detections)
            .into_iter()
            .map(|(label, detections)| self.investigate(request_id, label, detections));
        let findings = join_all(investigations).await;
        logging_information!(request_id, DiagnosisEntry::Complete(findings.len()), "");
        Ok(Diagnosis::Findings(findings))
    }

    async fn detect(&self, image: Vec<u8>, threshold: f32) -> Result<Vec<Detection>, DetectionError> {
        validate_threshold(threshold)?;
        let detector = Arc::clone(&self.detector);
        task::spawn_blocking(move || {
            let image = decode_image(&image)?;
            detector.detect(&image, threshold)
        })
        .await
        .map_err(|err| DetectionError::Inference(SystemEntry::TaskPanickedError(err.to_string()).to_string()))?
    }

    async fn investigate(&self, request_id: Uuid, label: String, detections: Vec<Detection>) -> Finding {
        logging_debug!(request_id, DiagnosisEntry::Investigating(label.clone()), "");
        let prevention_query = prevention_query(&label, &self.config);
        let product_query = product_query(&label, &self.config);
        let max_results = self.config.max_results;
        let (summary, prevention, products) = join!(
            self.summary_fetcher.fetch_summary(&label),
            self.search_fetcher.search(&prevention_query, max_results),
            self.search_fetcher.search(&product_query, max_results)
        );
        let summary = match summary {
            Ok(summary) => summary,
            Err(err) => {
                logging_warning!(request_id, DiagnosisEntry::SummaryFallback(label.clone(), err.to_string()), "");
                err.fallback().to_string()
            },
        };
        Finding {
            disease_info: DiseaseInfo::new(label.as_str(), summary),
            label,
            detections,
            prevention_query,
            prevention,
            product_query,
            products,
        }
    }
}

pub fn prevention_query(label: &str, config: &Config) -> String {
    format!("{} prevention and cure {}", label, config.country_site_token)
}

pub fn product_query(label: &str, config: &Config) -> String {
    format!("{} pesticides fertilizers site:{}", label, config.marketplace_domain)
}

/// Groups detections by label, ordered by each label's first appearance.
pub fn group_by_label(detections: Vec<Detection>) -> Vec<(String, Vec<Detection>)> {
    let mut groups: Vec<(String, Vec<Detection>)> = Vec::new();
    for detection in detections {
        match groups.iter_mut().find(|(label, _)| *label == detection.label) {
            Some((_, group)) => group.push(detection),
            None => groups.push((detection.label.clone(), vec![detection])),
        }
    }
    groups
}

#[cfg(test)]
pub(crate) mod stubs {
    use super::*;
    use crate::fetcher::summary::FetchError;
    use common::diagnosis::search_result::SearchResult;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;
    use std::sync::Mutex;

    pub struct StubDetector {
        pub detections: Vec<Detection>,
    }

    impl Detector for StubDetector {
        fn detect(&self, _image: &DynamicImage, threshold: f32) -> Result<Vec<Detection>, DetectionError> {
            Ok(self.detections.iter().filter(|detection| detection.confidence >= threshold).cloned().collect())
        }
    }

    #[derive(Clone, Default)]
    pub struct StubSummary {
        pub calls: Arc<Mutex<Vec<String>>>,
        pub ambiguous: Vec<String>,
    }

    impl SummaryFetcher for StubSummary {
        async fn fetch_summary(&self, name: &str) -> Result<String, FetchError> {
            self.calls.lock().expect("stub lock").push(name.to_string());
            if self.ambiguous.iter().any(|ambiguous| ambiguous == name) {
                Err(FetchError::Ambiguous(name.to_string()))
            } else {
                Ok(format!("{name} is a plant disease."))
            }
        }
    }

    #[derive(Clone, Default)]
    pub struct StubSearch {
        pub queries: Arc<Mutex<Vec<String>>>,
    }

    impl SearchFetcher for StubSearch {
        async fn search(&self, query: &str, _max_results: usize) -> Vec<SearchResult> {
            self.queries.lock().expect("stub lock").push(query.to_string());
            vec![SearchResult::new(format!("About {query}"), "snippet", "https://www.amazon.in/item")]
        }
    }

    pub fn detection(label: &str, confidence: f32) -> Detection {
        Detection::new(common::diagnosis::bounding_box::BoundingBox::new(1.0, 1.0, 5.0, 5.0), 0, label, confidence)
    }

    pub fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbImage::new(8, 8).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).expect("encode test image");
        bytes
    }

    pub fn orchestrator(detections: Vec<Detection>, summary: StubSummary, search: StubSearch) -> Orchestrator<StubDetector, StubSummary, StubSearch> {
        let config = Arc::new(crate::utils::config::test_config());
        Orchestrator::new(config, StubDetector { detections }, summary, search)
    }
}

#[cfg(test)]
mod tests {
    use super::stubs::*;
    use super::*;
    use crate::fetcher::summary::FetchError;

    #[tokio::test]
    async fn single_detection_issues_one_summary_and_two_searches() {
        let (summary, search) = (StubSummary::default(), StubSearch::default());
        let orchestrator = orchestrator(vec![detection("Leaf Blight", 0.8)], summary.clone(), search.clone());
        let diagnosis = orchestrator.diagnose(Uuid::new_v4(), png_bytes(), 0.1).await.unwrap();
        let Diagnosis::Findings(findings) = diagnosis else {
            panic!("expected findings");
        };
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].disease_info.summary, "Leaf Blight is a plant disease.");
        assert_eq!(*summary.calls.lock().unwrap(), vec!["Leaf Blight".to_string()]);
        let mut queries = search.queries.lock().unwrap().clone();
        queries.sort();
        assert_eq!(queries, vec![
            "Leaf Blight pesticides fertilizers site:amazon.in".to_string(),
            "Leaf Blight prevention and cure site:.in".to_string(),
        ]);
        assert_eq!(findings[0].prevention_query, "Leaf Blight prevention and cure site:.in");
        assert_eq!(findings[0].product_query, "Leaf Blight pesticides fertilizers site:amazon.in");
    }

    #[tokio::test]
    async fn nothing_above_threshold_makes_no_calls() {
        let (summary, search) = (StubSummary::default(), StubSearch::default());
        let orchestrator = orchestrator(vec![detection("Leaf Blight", 0.05)], summary.clone(), search.clone());
        let diagnosis = orchestrator.diagnose(Uuid::new_v4(), png_bytes(), 0.1).await.unwrap();
        assert_eq!(diagnosis, Diagnosis::NoDetections);
        assert!(summary.calls.lock().unwrap().is_empty());
        assert!(search.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ambiguous_summary_falls_back_and_searches_continue() {
        let summary = StubSummary { ambiguous: vec!["Rust".to_string()], ..StubSummary::default() };
        let search = StubSearch::default();
        let orchestrator = orchestrator(vec![detection("Rust", 0.6)], summary, search.clone());
        let Diagnosis::Findings(findings) = orchestrator.diagnose(Uuid::new_v4(), png_bytes(), 0.1).await.unwrap() else {
            panic!("expected findings");
        };
        assert_eq!(findings[0].disease_info.summary, FetchError::Ambiguous(String::new()).fallback());
        assert_eq!(search.queries.lock().unwrap().len(), 2);
        assert_eq!(findings[0].prevention.len(), 1);
        assert_eq!(findings[0].products.len(), 1);
    }

    #[tokio::test]
    async fn repeated_labels_are_fetched_once() {
        let (summary, search) = (StubSummary::default(), StubSearch::default());
        let detections = vec![
            detection("Leaf Blight", 0.9),
            detection("Rust", 0.7),
            detection("Leaf Blight", 0.5),
        ];
        let orchestrator = orchestrator(detections, summary.clone(), search.clone());
        let Diagnosis::Findings(findings) = orchestrator.diagnose(Uuid::new_v4(), png_bytes(), 0.1).await.unwrap() else {
            panic!("expected findings");
        };
        assert_eq!(findings.iter().map(|finding| finding.label.as_str()).collect::<Vec<_>>(), vec!["Leaf Blight", "Rust"]);
        assert_eq!(findings[0].detections.len(), 2);
        assert_eq!(summary.calls.lock().unwrap().len(), 2);
        assert_eq!(search.queries.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn invalid_image_stops_before_fetching() {
        let (summary, search) = (StubSummary::default(), StubSearch::default());
        let orchestrator = orchestrator(vec![detection("Leaf Blight", 0.8)], summary.clone(), search.clone());
        let result = orchestrator.diagnose(Uuid::new_v4(), b"definitely not a png".to_vec(), 0.1).await;
        assert!(matches!(result, Err(DetectionError::InvalidImage(_))));
        assert!(summary.calls.lock().unwrap().is_empty());
        assert!(search.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_threshold_is_rejected() {
        let orchestrator = orchestrator(Vec::new(), StubSummary::default(), StubSearch::default());
        let result = orchestrator.diagnose(Uuid::new_v4(), png_bytes(), 1.5).await;
        assert!(matches!(result, Err(DetectionError::InvalidThreshold(_))));
    }

    #[test]
    fn grouping_keeps_first_appearance_order() {
        let groups = group_by_label(vec![detection("B", 0.9), detection("A", 0.8), detection("B", 0.1)]);
        assert_eq!(groups.iter().map(|(label, group)| (label.as_str(), group.len())).collect::<Vec<_>>(), vec![("B", 2), ("A", 1)]);
    }
}
