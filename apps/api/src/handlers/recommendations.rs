use crate::{
    error::ApiError,
    models::{RecommendationResponse, UserQuery},
    services::{FormController, FormOutcome},
};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};

pub fn recommendations_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/recommendations").route(web::post().to(get_recommendations)));
}

/// Run the full flow for a JSON submission: look up matching poses, render
/// the chosen format and email it.
///
/// A failed delivery still returns the recommendations, with
/// `delivered: false` and the cause in `delivery_error`.
pub async fn get_recommendations(
    request: Json<UserQuery>,
    controller: web::Data<FormController>,
) -> Result<HttpResponse, ApiError> {
    let response = match controller.submit(&request).await {
        FormOutcome::Warning(message) => return Err(ApiError::InvalidInput(message)),
        FormOutcome::NoMatches => return Err(ApiError::NoMatches),
        FormOutcome::Failed(message) => return Err(ApiError::InternalError(message)),
        FormOutcome::Sent {
            recommendations,
            file_name,
        } => RecommendationResponse {
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
            file_name,
            delivered: true,
            delivery_error: None,
        },
        FormOutcome::DeliveryFailed {
            recommendations,
            file_name,
            error,
        } => RecommendationResponse {
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
            file_name,
            delivered: false,
            delivery_error: Some(error),
        },
    };

    Ok(HttpResponse::Ok().json(response))
}
