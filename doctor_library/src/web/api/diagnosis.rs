use crate::detection::detector::{DetectionError, Detector};
use crate::diagnosis::finding::Diagnosis;
use crate::diagnosis::orchestrator::Orchestrator;
use crate::diagnosis::presenter::render;
use crate::fetcher::search::SearchFetcher;
use crate::fetcher::summary::SummaryFetcher;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::utils::response::OperationStatus;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse, Scope};
use futures::{StreamExt, TryStreamExt};
use sanitize_filename::sanitize;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

const IMAGE_FIELD: &str = "image";
const THRESHOLD_FIELD: &str = "confidenceThreshold";
const THRESHOLD_FIELD_LIMIT: usize = 64;
const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn initialize<D: Detector, S: SummaryFetcher, W: SearchFetcher>() -> Scope {
    web::scope("/diagnosis")
        .service(web::resource("/upload").route(web::post().to(upload::<D, S, W>)))
}

#[derive(Serialize, Debug)]
pub struct DiagnosisReport {
    pub request_id: Uuid,
    pub markdown: String,
    pub diagnosis: Diagnosis,
}

/// Returned with every rejected upload so its request log can be looked up.
#[derive(Serialize, Debug)]
pub struct RequestReference {
    pub request_id: Uuid,
}

struct Upload {
    file_name: String,
    image: Vec<u8>,
    threshold: Option<f32>,
}

async fn upload<D: Detector, S: SummaryFetcher, W: SearchFetcher>(orchestrator: web::Data<Orchestrator<D, S, W>>, mut payload: Multipart) -> HttpResponse {
    let request_id = Uuid::new_v4();
    let config = orchestrator.config();
    let upload = match read_upload(&mut payload, config).await {
        Ok(upload) => upload,
        Err(entry) => {
            let message = entry.to_string();
            logging_warning!(request_id, DiagnosisEntry::Rejected(message.clone()), "");
            let status = OperationStatus::rejection(message, RequestReference { request_id });
            return match entry {
                IOEntry::UploadTooLarge(_) => HttpResponse::PayloadTooLarge().json(status),
                _ => HttpResponse::BadRequest().json(status),
            };
        },
    };
    let threshold = upload.threshold.unwrap_or(config.default_confidence);
    if !config.accepts_confidence(threshold) {
        let message = IOEntry::InvalidField(THRESHOLD_FIELD).to_string();
        logging_warning!(request_id, DiagnosisEntry::Rejected(message.clone()), format!("Threshold: {threshold}"));
        return HttpResponse::BadRequest().json(OperationStatus::rejection(message, RequestReference { request_id }));
    }
    logging_information!(request_id, DiagnosisEntry::UploadReceived(upload.file_name, upload.image.len(), threshold), "");
    match orchestrator.diagnose(request_id, upload.image, threshold).await {
        Ok(diagnosis) => {
            let markdown = render(&diagnosis, &config.marketplace_name);
            HttpResponse::Ok().json(OperationStatus::success(DiagnosisReport { request_id, markdown, diagnosis }))
        },
        Err(err @ (DetectionError::InvalidImage(_) | DetectionError::InvalidThreshold(_))) => {
            HttpResponse::BadRequest().json(OperationStatus::rejection(err.to_string(), RequestReference { request_id }))
        },
        Err(err) => HttpResponse::InternalServerError().json(OperationStatus::rejection(err.to_string(), RequestReference { request_id })),
    }
}

async fn read_upload(payload: &mut Multipart, config: &Config) -> Result<Upload, IOEntry> {
    let mut image = None;
    let mut threshold = None;
    while let Some(mut field) = payload.try_next().await.map_err(|err| IOEntry::PayloadError(err.to_string()))? {
        let content_disposition = field.content_disposition()
            .cloned()
            .ok_or_else(|| IOEntry::PayloadError("missing content disposition".to_string()))?;
        match content_disposition.get_name() {
            Some(IMAGE_FIELD) => {
                let file_name = content_disposition.get_filename()
                    .map(sanitize)
                    .filter(|file_name| !file_name.is_empty())
                    .ok_or(IOEntry::InvalidFileNameError)?;
                check_extension(&file_name)?;
                let data = read_field(&mut field, config.max_upload_size).await?;
                image = Some((file_name, data));
            },
            Some(THRESHOLD_FIELD) => {
                let data = read_field(&mut field, THRESHOLD_FIELD_LIMIT).await
                    .map_err(|_| IOEntry::InvalidField(THRESHOLD_FIELD))?;
                let value = String::from_utf8_lossy(&data).trim().parse::<f32>()
                    .map_err(|_| IOEntry::InvalidField(THRESHOLD_FIELD))?;
                threshold = Some(value);
            },
            _ => {
                read_field(&mut field, config.max_upload_size).await?;
            },
        }
    }
    let (file_name, image) = image.ok_or(IOEntry::MissingField(IMAGE_FIELD))?;
    Ok(Upload { file_name, image, threshold })
}

fn check_extension(file_name: &str) -> Result<(), IOEntry> {
    let extension = Path::new(file_name).extension()
        .and_then(|os_str| os_str.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(IOEntry::UnsupportedExtension(extension))
    }
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, IOEntry> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|err| IOEntry::PayloadError(err.to_string()))?;
        if data.len() + chunk.len() > limit {
            return Err(IOEntry::UploadTooLarge(limit));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
