use crate::{
    error::{ApiError, Result},
    models::{Recommendation, UserQuery},
    services::{
        documents::{DocumentRenderer, RenderedDocument},
        notifier::Mailer,
        recommendation::RecommendationService,
    },
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of one submission. Every variant leaves the form ready for the
/// next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// A required field was blank; nothing was queried or sent.
    Warning(String),
    /// The query ran but matched no poses; no email was sent.
    NoMatches,
    Sent {
        recommendations: Vec<Recommendation>,
        file_name: String,
    },
    /// The document was produced but could not be emailed.
    DeliveryFailed {
        recommendations: Vec<Recommendation>,
        file_name: String,
        error: String,
    },
    /// The lookup or rendering step failed.
    Failed(String),
}

impl FormOutcome {
    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            FormOutcome::Sent {
                recommendations, ..
            }
            | FormOutcome::DeliveryFailed {
                recommendations, ..
            } => recommendations,
            _ => &[],
        }
    }
}

/// Orchestrates a submission: lookup, render, email.
#[derive(Clone)]
pub struct FormController {
    recommendations: RecommendationService,
    renderer: DocumentRenderer,
    mailer: Arc<dyn Mailer>,
}

impl FormController {
    pub fn new(
        recommendations: RecommendationService,
        renderer: DocumentRenderer,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            recommendations,
            renderer,
            mailer,
        }
    }

    pub fn recommendation_service(&self) -> &RecommendationService {
        &self.recommendations
    }

    pub fn renderer(&self) -> &DocumentRenderer {
        &self.renderer
    }

    pub async fn submit(&self, query: &UserQuery) -> FormOutcome {
        let (recommendations, document) = match self.prepare(query).await {
            Ok(prepared) => prepared,
            Err(ApiError::InvalidInput(message)) => {
                warn!("Rejected submission: {}", message);
                return FormOutcome::Warning(message);
            }
            Err(ApiError::NoMatches) => {
                info!("No matching asanas for submission");
                return FormOutcome::NoMatches;
            }
            Err(e) => {
                error!("Submission failed before delivery: {}", e);
                return FormOutcome::Failed(e.to_string());
            }
        };

        let file_name = document.file_name.clone();
        match self.mailer.send(query.email.trim(), &document).await {
            Ok(()) => FormOutcome::Sent {
                recommendations,
                file_name,
            },
            Err(e) => FormOutcome::DeliveryFailed {
                recommendations,
                file_name,
                error: e.to_string(),
            },
        }
    }

    /// Validate, look up and render, without sending anything.
    pub async fn prepare(
        &self,
        query: &UserQuery,
    ) -> Result<(Vec<Recommendation>, RenderedDocument)> {
        query.validate()?;

        let recommendations = self
            .recommendations
            .recommend(query.age, query.gender, &query.health_issue)
            .await?;
        if recommendations.is_empty() {
            return Err(ApiError::NoMatches);
        }

        let document = self.renderer.render(query.format, &recommendations)?;
        Ok((recommendations, document))
    }
}
