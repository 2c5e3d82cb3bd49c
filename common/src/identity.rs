use actix_web::{HttpMessage, HttpRequest, HttpResponse, dev::ServiceRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Res};

/// Identity resolved by the upstream auth layer. Token verification
/// happens before traffic reaches this service; we only receive the
/// resolved user id.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IdentityClaims {
    pub user_id: Uuid,
}

impl IdentityClaims {
    pub fn from_header(value: &str) -> Res<Self> {
        let user_id = value
            .parse::<Uuid>()
            .map_err(|e| AppError::Unauthorized(format!("Invalid user id header: {}", e)))?;

        Ok(IdentityClaims { user_id })
    }
}

/// Handler-side accessor for the claims the extractor middleware put
/// into request extensions.
pub fn identity_from_request(req: &HttpRequest) -> Res<IdentityClaims> {
    match req.extensions().get::<Res<IdentityClaims>>() {
        Some(Ok(claims)) => Ok(claims.clone()),
        Some(Err(err)) => Err(AppError::Unauthorized(err.to_string())),
        None => Err(AppError::Unauthorized("No identity provided".to_string())),
    }
}

pub fn get_identity_or_error(req: &ServiceRequest) -> Result<IdentityClaims, HttpResponse> {
    if let Some(claims_res) = req.extensions().get::<Res<IdentityClaims>>() {
        match claims_res {
            Ok(claims) => Ok(claims.clone()),
            Err(app_error) => Err(app_error.to_http_response()),
        }
    } else {
        Err(AppError::Unauthorized("No identity provided".to_string()).to_http_response())
    }
}
