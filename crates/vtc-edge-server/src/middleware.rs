use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{header, Method},
    middleware::Next,
    web, HttpResponse,
};
use tracing::info;
use vtc_time::Timestamp;

use crate::guard::{GuardDecision, NavigationGuard};

/// Sends navigations to protected pages without a usable credential to the
/// login page, keeping where they were headed in the query string
#[tracing::instrument(skip_all, fields(path = req.path()))]
pub async fn validate_navigation(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    if !matches!(*req.method(), Method::GET | Method::HEAD) {
        return Ok(next.call(req).await?.map_into_left_body());
    }

    let guard = req
        .app_data::<web::Data<NavigationGuard>>()
        .cloned()
        .ok_or_else(|| {
            actix_web::error::ErrorInternalServerError("navigation guard not configured")
        })?;
    let credential = extract_credential(&req, &guard.settings().cookie_name);

    match guard.decide(req.path(), credential.as_deref(), Timestamp::now()) {
        GuardDecision::Allow => Ok(next.call(req).await?.map_into_left_body()),
        GuardDecision::RedirectToLogin { location } => {
            info!(?location, "redirecting unauthenticated navigation");
            let response = HttpResponse::TemporaryRedirect()
                .insert_header((header::LOCATION, location))
                .finish();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

/// The cookie written by the dashboard, else a bearer token
fn extract_credential(req: &ServiceRequest, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = req.cookie(cookie_name) {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(ToString::to_string)
}
