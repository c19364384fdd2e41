use crate::diagnosis::finding::{Diagnosis, Finding};
use common::diagnosis::search_result::SearchResult;

pub const NO_DETECTIONS: &str = "No diseases detected. Please try another image.";

/// Renders a diagnosis as Markdown, one section per finding in order.
pub fn render(diagnosis: &Diagnosis, marketplace_name: &str) -> String {
    match diagnosis {
        Diagnosis::NoDetections => NO_DETECTIONS.to_string(),
        Diagnosis::Findings(findings) => findings.iter()
            .map(|finding| render_finding(finding, marketplace_name))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn render_finding(finding: &Finding, marketplace_name: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("### Detected Disease: {}\n", finding.label));
    output.push_str(&format!(
        "{} region(s), highest confidence {:.2}\n\n",
        finding.detections.len(),
        finding.best_confidence()
    ));
    output.push_str(&format!("### Disease Information: {}\n", finding.disease_info.name));
    output.push_str(&format!("**Description**: {}\n\n", finding.disease_info.summary));
    if finding.prevention.is_empty() {
        output.push_str("**Prevention and Cure Information:** No information found.\n\n");
    } else {
        output.push_str("**Prevention and Cure Information:**\n");
        output.push_str(&render_results(&finding.prevention, "Read more"));
    }
    if finding.products.is_empty() {
        output.push_str("**Product Recommendations:** No products found.\n\n");
    } else {
        output.push_str(&format!("### Recommended Products from {}:\n", marketplace_name));
        output.push_str(&render_results(&finding.products, "Product Link"));
    }
    output.push_str("---\n");
    output
}

fn render_results(results: &[SearchResult], link_text: &str) -> String {
    let mut output = String::new();
    for result in results {
        output.push_str(&format!("- **Title**: {}\n", result.title));
        output.push_str(&format!("  **Description**: {}\n", result.snippet));
        output.push_str(&format!("  **Reference**: [{}]({})\n", link_text, result.link));
    }
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::diagnosis::bounding_box::BoundingBox;
    use common::diagnosis::detection::Detection;
    use common::diagnosis::disease_info::DiseaseInfo;

    fn finding(prevention: Vec<SearchResult>, products: Vec<SearchResult>) -> Finding {
        Finding {
            label: "Leaf Blight".to_string(),
            detections: vec![
                Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0, "Leaf Blight", 0.8),
                Detection::new(BoundingBox::new(20.0, 20.0, 30.0, 30.0), 0, "Leaf Blight", 0.4),
            ],
            disease_info: DiseaseInfo::new("Leaf Blight", "A fungal disease."),
            prevention_query: "Leaf Blight prevention and cure site:.in".to_string(),
            prevention,
            product_query: "Leaf Blight pesticides fertilizers site:amazon.in".to_string(),
            products,
        }
    }

    #[test]
    fn no_detections_message() {
        assert_eq!(render(&Diagnosis::NoDetections, "Amazon India"), NO_DETECTIONS);
    }

    #[test]
    fn empty_blocks_say_none_found() {
        let text = render_finding(&finding(Vec::new(), Vec::new()), "Amazon India");
        assert!(text.starts_with("### Detected Disease: Leaf Blight\n2 region(s), highest confidence 0.80"));
        assert!(text.contains("**Description**: A fungal disease."));
        assert!(text.contains("**Prevention and Cure Information:** No information found."));
        assert!(text.contains("**Product Recommendations:** No products found."));
        assert!(text.ends_with("---\n"));
    }

    #[test]
    fn results_are_listed_in_order() {
        let prevention = vec![
            SearchResult::new("First", "one", "https://www.amazon.in/1"),
            SearchResult::new("Second", "two", "https://www.amazon.in/2"),
        ];
        let products = vec![SearchResult::new("Spray", "copper", "https://www.amazon.in/spray")];
        let text = render_finding(&finding(prevention, products), "Amazon India");
        let first = text.find("- **Title**: First").unwrap_or(usize::MAX);
        let second = text.find("- **Title**: Second").unwrap_or(usize::MAX);
        assert!(first < second && second < text.len());
        assert!(text.contains("[Read more](https://www.amazon.in/1)"));
        assert!(text.contains("### Recommended Products from Amazon India:\n- **Title**: Spray"));
        assert!(text.contains("[Product Link](https://www.amazon.in/spray)"));
    }

    #[test]
    fn findings_are_separated() {
        let diagnosis = Diagnosis::Findings(vec![finding(Vec::new(), Vec::new()), finding(Vec::new(), Vec::new())]);
        assert_eq!(render(&diagnosis, "Amazon India").matches("---\n").count(), 2);
    }
}
