use crate::utils::static_files::StaticFiles;
use actix_web::{HttpRequest, HttpResponse, Responder};
use mime_guess::from_path;

pub async fn default_route(req: HttpRequest) -> impl Responder {
    let request_path = req.path().trim_start_matches('/');
    let request_path = if request_path.is_empty() { "index.html" } else { request_path };
    match StaticFiles::get(request_path) {
        Some(content) => {
            let mime_type = from_path(request_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime_type.as_ref())
                .body(content.data.into_owned())
        },
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::web::route;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn root_serves_upload_page() {
        let app = test::init_service(App::new().default_service(route().to(default_route))).await;
        let response = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-type").unwrap().to_str().unwrap(), "text/html");
    }

    #[actix_web::test]
    async fn unknown_asset_is_not_found() {
        let app = test::init_service(App::new().default_service(route().to(default_route))).await;
        let response = test::call_service(&app, test::TestRequest::get().uri("/missing.css").to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
