use std::{future::Future, pin::Pin, sync::Arc};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::{Ready, ok};

use common::{
    error::Res,
    identity::{self, IdentityClaims},
};

/// Lifts the identity resolved by the upstream auth layer into request
/// extensions. Routes that need a user read `Res<IdentityClaims>` from
/// there; routes that don't are unaffected.
pub struct ExtractionMiddleware {}

impl ExtractionMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExtractionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = ExtractionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ExtractionMiddlewareService {
            service: Arc::new(service),
        })
    }
}

pub struct ExtractionMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for ExtractionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // resolved user id forwarded by the auth proxy
        let user_header = req
            .headers()
            .get("X-User-Id")
            .map(|v| v.to_str().unwrap_or_default().to_string());

        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            if let Some(value) = user_header {
                let claims_res = IdentityClaims::from_header(&value);
                req.extensions_mut().insert::<Res<IdentityClaims>>(claims_res);
            }
            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse, test, web};
    use uuid::Uuid;

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match identity::identity_from_request(&req) {
            Ok(claims) => HttpResponse::Ok().body(claims.user_id.to_string()),
            Err(err) => err.to_http_response(),
        }
    }

    #[actix_web::test]
    async fn valid_header_resolves_identity() {
        let app = test::init_service(
            App::new()
                .wrap(ExtractionMiddleware::new())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let user_id = Uuid::new_v4();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("X-User-Id", user_id.to_string()))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn missing_header_leaves_request_unauthenticated() {
        let app = test::init_service(
            App::new()
                .wrap(ExtractionMiddleware::new())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_header_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(ExtractionMiddleware::new())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("X-User-Id", "not-a-uuid"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
