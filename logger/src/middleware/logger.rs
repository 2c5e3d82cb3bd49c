use std::{sync::Arc, time::Instant};

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use colored::Colorize;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::info;

use common::identity::get_identity_or_error;

pub struct LoggerMiddleware {}

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Arc::new(service),
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let path = req.path().to_string();
        let ip = req
            .connection_info()
            .realip_remote_addr()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());

        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            let user_id = get_identity_or_error(&req).ok().map(|c| c.user_id);
            let started = Instant::now();

            let res = srv.call(req).await?;

            let status_code = res.status().as_u16();
            let colored_status = match status_code {
                200..=299 => status_code.to_string().green(),
                300..=399 => status_code.to_string().yellow(),
                400..=499 => status_code.to_string().bright_red(),
                _ => status_code.to_string().red(),
            };

            let colored_method = match method.as_str() {
                "GET" => method.blue(),
                "POST" => method.yellow(),
                "PUT" => method.purple(),
                "DELETE" => method.red(),
                _ => method.normal(),
            };

            info!(
                "[{}] {} {} {} ip={} user_id={}",
                colored_status,
                colored_method,
                path.bright_white(),
                format!("({}ms)", started.elapsed().as_millis()).bright_black(),
                ip.bright_cyan(),
                user_id
                    .map_or("None".to_string(), |id| id.to_string())
                    .bright_blue(),
            );

            Ok(res.map_into_boxed_body())
        })
    }
}
