use crate::{
    error::{ApiError, Result},
    models::{Gender, PoseRecord},
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, FindOptions},
    Client,
};
use std::{collections::BTreeSet, fs, path::Path, time::Duration};
use tracing::{debug, info};

/// Stored gender value that applies to every form option.
pub const ALL_GENDERS: &str = "All";

/// Selection criteria for pose records.
///
/// A pose matches when its gender is the requested one or `"All"`, its
/// minimum age is at most the given age, and its health issue contains at
/// least one keyword, ignoring case. No keywords means no match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseFilter {
    pub gender: Gender,
    pub age: u8,
    pub keywords: BTreeSet<String>,
}

impl PoseFilter {
    pub fn new(gender: Gender, age: u8, keywords: BTreeSet<String>) -> Self {
        Self {
            gender,
            age,
            keywords,
        }
    }

    /// An empty keyword disjunction must select nothing; query engines
    /// disagree on what `$or: []` means, so it is never sent.
    pub fn is_unsatisfiable(&self) -> bool {
        self.keywords.is_empty()
    }

    /// The MongoDB query document, or `None` when nothing can match.
    pub fn to_document(&self) -> Option<Document> {
        if self.is_unsatisfiable() {
            return None;
        }

        let keyword_clauses: Vec<Document> = self
            .keywords
            .iter()
            .map(|keyword| {
                doc! { "health_issue": { "$regex": regex::escape(keyword), "$options": "i" } }
            })
            .collect();

        Some(doc! {
            "$and": [
                { "$or": [ { "gender": self.gender.as_str() }, { "gender": ALL_GENDERS } ] },
                { "min_age": { "$lte": i32::from(self.age) } },
                { "$or": keyword_clauses },
            ]
        })
    }

    /// Evaluate the same predicate as `to_document` against a record.
    pub fn matches(&self, pose: &PoseRecord) -> bool {
        let gender_ok = pose.gender == self.gender.as_str() || pose.gender == ALL_GENDERS;
        let age_ok = pose.min_age <= i32::from(self.age);
        let health_issue = pose.health_issue.to_lowercase();
        let keyword_ok = self
            .keywords
            .iter()
            .any(|keyword| health_issue.contains(&keyword.to_lowercase()));

        gender_ok && age_ok && keyword_ok
    }
}

/// Read-only access to the pose collection.
#[async_trait]
pub trait PoseStore: Send + Sync {
    /// Poses matching `filter`, ordered by pose name.
    async fn find_poses(&self, filter: &PoseFilter) -> Result<Vec<PoseRecord>>;
}

/// Pose store backed by a MongoDB collection.
///
/// A client is opened for each query and dropped when the query completes.
#[derive(Debug, Clone)]
pub struct MongoPoseStore {
    options: ClientOptions,
    database: String,
    collection: String,
    timeout: Duration,
}

impl MongoPoseStore {
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| ApiError::ConfigError(format!("Invalid MongoDB URI: {}", e)))?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        info!(
            "Configured MongoDB pose store {}.{} (timeout {:?})",
            database, collection, timeout
        );

        Ok(Self {
            options,
            database: database.to_string(),
            collection: collection.to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl PoseStore for MongoPoseStore {
    async fn find_poses(&self, filter: &PoseFilter) -> Result<Vec<PoseRecord>> {
        let Some(query) = filter.to_document() else {
            return Ok(Vec::new());
        };
        debug!("MongoDB pose query: {}", query);

        let client = Client::with_options(self.options.clone())?;
        let collection = client
            .database(&self.database)
            .collection::<PoseRecord>(&self.collection);

        let find_options = FindOptions::builder()
            .sort(doc! { "asana_name": 1 })
            .max_time(self.timeout)
            .build();

        let cursor = collection.find(query, find_options).await?;
        let poses: Vec<PoseRecord> = cursor.try_collect().await?;

        debug!("MongoDB returned {} poses", poses.len());
        Ok(poses)
    }
}

/// Pose store holding every record in memory, loaded from a JSON array.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPoseStore {
    poses: Vec<PoseRecord>,
}

impl InMemoryPoseStore {
    pub fn new(mut poses: Vec<PoseRecord>) -> Self {
        poses.sort_by(|a, b| a.name.cmp(&b.name));
        Self { poses }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to read poses file {}: {}",
                path.display(),
                e
            ))
        })?;
        let poses: Vec<PoseRecord> = serde_json::from_str(&raw)?;
        info!("Loaded {} poses from {}", poses.len(), path.display());
        Ok(Self::new(poses))
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

#[async_trait]
impl PoseStore for InMemoryPoseStore {
    async fn find_poses(&self, filter: &PoseFilter) -> Result<Vec<PoseRecord>> {
        if filter.is_unsatisfiable() {
            return Ok(Vec::new());
        }

        Ok(self
            .poses
            .iter()
            .filter(|pose| filter.matches(pose))
            .cloned()
            .collect())
    }
}
