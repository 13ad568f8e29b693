use crate::{
    error::Result,
    models::{Gender, Recommendation},
    services::{
        keywords::KeywordExtractor,
        pose_store::{PoseFilter, PoseStore},
    },
};
use std::sync::Arc;
use tracing::{debug, info};

/// Looks up poses matching a user's age, gender and health description.
#[derive(Clone)]
pub struct RecommendationService {
    extractor: KeywordExtractor,
    store: Arc<dyn PoseStore>,
}

impl RecommendationService {
    pub fn new(extractor: KeywordExtractor, store: Arc<dyn PoseStore>) -> Self {
        Self { extractor, store }
    }

    /// Matching `(name, health_issue)` pairs, ordered by pose name.
    pub async fn find_matching_poses(
        &self,
        age: u8,
        gender: Gender,
        health_issue: &str,
    ) -> Result<Vec<(String, String)>> {
        let keywords = self.extractor.extract(health_issue);
        let filter = PoseFilter::new(gender, age, keywords);

        if filter.is_unsatisfiable() {
            info!("No keywords extracted from health issue, skipping pose lookup");
            return Ok(Vec::new());
        }

        debug!(
            "Querying poses for age={} gender={} keywords={:?}",
            age, gender, filter.keywords
        );
        let poses = self.store.find_poses(&filter).await?;
        info!("Found {} matching poses", poses.len());

        Ok(poses
            .into_iter()
            .map(|pose| (pose.name, pose.health_issue))
            .collect())
    }

    pub async fn recommend(
        &self,
        age: u8,
        gender: Gender,
        health_issue: &str,
    ) -> Result<Vec<Recommendation>> {
        let matches = self.find_matching_poses(age, gender, health_issue).await?;
        Ok(matches
            .iter()
            .map(|(name, issue)| Recommendation::new(name, issue))
            .collect())
    }
}
