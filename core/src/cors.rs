use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};

pub fn middleware(origin: &str) -> Cors {
    Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-user-id"),
        ])
        .allowed_origin(origin)
        .expose_headers(&[
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("x-ratelimit-remaining"),
            HeaderName::from_static("x-ratelimit-used"),
            header::RETRY_AFTER,
        ])
        .max_age(3600)
}
