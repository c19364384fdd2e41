use crate::utils::logging::Logger;
use actix_web::{get, web, HttpResponse, Responder, Scope};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use uuid::Uuid;

pub fn initialize() -> Scope {
    web::scope("/log")
        .service(system_log)
        .service(system_log_since)
        .service(request_log)
        .service(request_log_since)
}

#[get("/system_log")]
async fn system_log() -> impl Responder {
    let system_log = Logger::get_system_logs().await;
    HttpResponse::Ok().body(Logger::format_logs(&system_log))
}

#[get("/system_log/since/{since}")]
async fn system_log_since(since: web::Path<String>) -> impl Responder {
    match parse_datetime(&since.into_inner()) {
        Ok(since_time) => {
            let logs = Logger::get_system_logs_since(since_time).await;
            HttpResponse::Ok().body(Logger::format_logs(&logs))
        },
        Err(err) => HttpResponse::BadRequest().body(err),
    }
}

#[get("/{request_id}")]
async fn request_log(request_id: web::Path<Uuid>) -> impl Responder {
    match Logger::get_request_logs(request_id.into_inner()).await {
        Some(logs) => HttpResponse::Ok().body(Logger::format_logs(&logs)),
        None => HttpResponse::NotFound().body("Request not found."),
    }
}

#[get("/{request_id}/since/{since}")]
async fn request_log_since(argument: web::Path<(Uuid, String)>) -> impl Responder {
    let (request_id, since) = argument.into_inner();
    let since_time = match parse_datetime(&since) {
        Ok(since_time) => since_time,
        Err(err) => return HttpResponse::BadRequest().body(err),
    };
    match Logger::get_request_logs_since(request_id, since_time).await {
        Some(logs) => HttpResponse::Ok().body(Logger::format_logs(&logs)),
        None => HttpResponse::NotFound().body("Request not found."),
    }
}

/// Timestamps in paths use `%Y-%m-%d-%H-%M-%S`, local time.
fn parse_datetime(datetime_str: &str) -> Result<DateTime<Local>, String> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d-%H-%M-%S")
        .map_err(|_| "Invalid datetime format.".to_string())
        .and_then(|naive_date_time| {
            Local.from_local_datetime(&naive_date_time)
                .single()
                .ok_or("Invalid local datetime.".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging_information;
    use crate::utils::logging::DiagnosisEntry;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[::core::prelude::v1::test]
    fn datetime_uses_dashed_format() {
        let parsed = parse_datetime("2024-05-01-13-45-00").unwrap();
        assert_eq!(parsed.format("%H:%M").to_string(), "13:45");
        assert!(parse_datetime("2024-05-01T13:45:00").is_err());
    }

    #[actix_web::test]
    async fn request_log_is_served_as_text() {
        let request_id = Uuid::new_v4();
        logging_information!(request_id, DiagnosisEntry::Complete(2), "");
        let app = test::init_service(App::new().service(initialize())).await;
        let request = test::TestRequest::get().uri(&format!("/log/{request_id}")).to_request();
        let body = test::call_and_read_body(&app, request).await;
        assert!(String::from_utf8_lossy(&body).contains("Diagnosis completed with 2 distinct diseases"));
    }

    #[actix_web::test]
    async fn unknown_request_is_not_found() {
        let app = test::init_service(App::new().service(initialize())).await;
        let request = test::TestRequest::get().uri(&format!("/log/{}", Uuid::new_v4())).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_since_is_rejected() {
        let app = test::init_service(App::new().service(initialize())).await;
        let request = test::TestRequest::get().uri("/log/system_log/since/yesterday").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
