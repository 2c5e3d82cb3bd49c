use actix_web::{
    Error, HttpResponse,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use dashmap::DashMap;
use std::{
    future::Future,
    pin::Pin,
    rc::Rc,
    sync::Arc,
    time::{Duration, Instant},
};

/// Per-IP fixed-window limiter protecting expensive endpoints from
/// burst abuse, independent of any subscription tier. State is
/// process-local memory; under horizontal scaling the effective limit
/// is per instance, which is acceptable for abuse damping.
pub struct BurstLimiter {
    state: Arc<BurstState>,
}

impl BurstLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            state: Arc::new(BurstState::new(max, window)),
        }
    }
}

struct Bucket {
    count: u32,
    window_start: Instant,
}

pub struct BurstState {
    buckets: DashMap<String, Bucket>,
    max: u32,
    window: Duration,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Rejected { retry_after_secs: u64 },
}

impl BurstState {
    pub fn new(max: u32, window: Duration) -> Self {
        BurstState {
            buckets: DashMap::new(),
            max,
            window,
        }
    }

    /// One admission attempt for `ip` at `now`. Counts the request if
    /// admitted. Buckets whose window has elapsed are evicted here;
    /// there is no background sweep.
    pub fn admit(&self, ip: &str, now: Instant) -> Admission {
        self.buckets
            .retain(|_, bucket| now.duration_since(bucket.window_start) < self.window);

        let mut bucket = self.buckets.entry(ip.to_string()).or_insert(Bucket {
            count: 0,
            window_start: now,
        });

        if now.duration_since(bucket.window_start) >= self.window {
            bucket.count = 0;
            bucket.window_start = now;
        }

        if bucket.count >= self.max {
            Admission::Rejected {
                retry_after_secs: self.window.as_secs(),
            }
        } else {
            bucket.count += 1;
            Admission::Allowed
        }
    }
}

/// Client address as seen through the usual proxy headers. Requests
/// with neither header share one "unknown" bucket.
fn client_ip(req: &ServiceRequest) -> String {
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            req.headers()
                .get("X-Real-IP")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

impl<S, B> Transform<S, ServiceRequest> for BurstLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = BurstLimiterService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(BurstLimiterService {
            service: Rc::new(service),
            state: self.state.clone(),
        }))
    }
}

pub struct BurstLimiterService<S> {
    service: Rc<S>,
    state: Arc<BurstState>,
}

impl<S, B> Service<ServiceRequest> for BurstLimiterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let state = self.state.clone();

        Box::pin(async move {
            let ip = client_ip(&req);

            match state.admit(&ip, Instant::now()) {
                Admission::Allowed => srv.call(req).await.map(|res| res.map_into_boxed_body()),
                Admission::Rejected { retry_after_secs } => {
                    log::warn!("Burst limit tripped for {}", ip);
                    let response = HttpResponse::TooManyRequests()
                        .insert_header((header::RETRY_AFTER, retry_after_secs))
                        .json(serde_json::json!({
                            "error": "Too many requests. Please try again later.",
                            "retryAfter": retry_after_secs,
                        }));
                    Ok(req.into_response(response))
                }
            }
        })
    }
}
