use crate::{
    error::{ApiError, Result},
    models::{DocumentRequest, MAX_AGE},
    services::FormController,
};
use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post,
    web::{self, Json},
    HttpResponse,
};
use log::info;

/// Render the recommendations and return the file directly instead of
/// emailing it.
#[post("/documents")]
pub async fn download_document(
    request: Json<DocumentRequest>,
    controller: web::Data<FormController>,
) -> Result<HttpResponse> {
    if request.health_issue.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "Please provide your health issue.".to_string(),
        ));
    }

    if request.age > MAX_AGE {
        return Err(ApiError::InvalidInput(format!(
            "Age must be between 0 and {}",
            MAX_AGE
        )));
    }

    let recommendations = controller
        .recommendation_service()
        .recommend(request.age, request.gender, &request.health_issue)
        .await?;
    if recommendations.is_empty() {
        return Err(ApiError::NoMatches);
    }

    let document = controller
        .renderer()
        .render(request.format, &recommendations)?;
    info!(
        "Serving {} ({} bytes) for download",
        document.file_name,
        document.len()
    );

    Ok(HttpResponse::Ok()
        .content_type(document.content_type.clone())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.file_name.clone())],
        })
        .body(document.bytes))
}
