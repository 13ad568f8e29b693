use actix_web::{web, Scope};

use crate::handlers::{
    download_document, form_config, form_page, health_check, recommendations_config,
    submit_form,
};

/// Configure all routes for the JSON API
pub fn api_routes() -> Scope {
    web::scope("/api")
        .service(health_check)
        .service(download_document)
        .configure(recommendations_config)
}

/// Configure the server-rendered form page
pub fn form_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(form_config())
        .service(form_page)
        .service(submit_form);
}
