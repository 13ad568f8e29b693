use crate::{
    models::{UserQuery, MAX_AGE},
    services::{FormController, FormOutcome},
    views::render_page,
};
use actix_web::{
    error::InternalError, get, http::header::ContentType, post, web, HttpResponse,
};
use log::{info, warn};

#[get("/")]
pub async fn form_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_page(None, None))
}

/// Handle a form submission. Every outcome, failures included, is rendered
/// inline on the page so the form stays usable.
#[post("/")]
pub async fn submit_form(
    form: web::Form<UserQuery>,
    controller: web::Data<FormController>,
) -> HttpResponse {
    let query = form.into_inner();
    info!("Form submission received for {}", query.email.trim());

    let outcome = controller.submit(&query).await;

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_page(Some(&query), Some(&outcome)))
}

/// Submissions that do not decode (empty or non-numeric age, unknown option)
/// get the form back with a warning instead of a plain-text 400.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| {
        warn!("Rejected malformed form submission: {}", err);

        let outcome = FormOutcome::Warning(format!(
            "Please enter your age as a whole number between 0 and {}.",
            MAX_AGE
        ));
        let page = HttpResponse::BadRequest()
            .content_type(ContentType::html())
            .body(render_page(None, Some(&outcome)));

        InternalError::from_response(err, page).into()
    })
}
