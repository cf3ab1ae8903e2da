use crate::error::GatewayError;

/// Catch-all for unmatched paths, any method.
pub async fn not_found() -> Result<actix_web::HttpResponse, GatewayError> {
    Err(GatewayError::NotFound)
}
