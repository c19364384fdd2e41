use crate::utils::config::Config;
use actix_web::{get, web, Responder, Scope};

pub fn initialize() -> Scope {
    web::scope("/config")
        .service(get_config)
}

/// Public view only: credentials and endpoints are never serialized.
#[get("/get")]
async fn get_config(config: web::Data<Config>) -> impl Responder {
    web::Json(config.get_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::test_config;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn config_exposes_slider_bounds_only() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .service(initialize())
        ).await;
        let request = test::TestRequest::get().uri("/config/get").to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["min_confidence"], Value::from(0.01_f32));
        assert_eq!(body["max_confidence"], Value::from(1.0_f32));
        assert!(body.get("api_key").is_none());
        assert!(body.get("search_endpoint").is_none());
    }
}
