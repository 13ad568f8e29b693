pub mod documents;
pub mod form;
pub mod health;
pub mod recommendations;

pub use documents::download_document;
pub use form::{form_config, form_page, submit_form};
pub use health::health_check;
pub use recommendations::recommendations_config;
