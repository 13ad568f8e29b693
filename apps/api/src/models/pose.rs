use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};
use std::fmt;

/// A pose document as stored in the `yoga_asanas` collection. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    #[serde(rename = "asana_name")]
    pub name: String,
    pub health_issue: String,
    #[serde(deserialize_with = "deserialize_min_age")]
    pub min_age: i32,
    pub gender: String,
}

/// Accept `min_age` stored as any BSON/JSON number. Fractional ages round up,
/// so `17.5` still excludes a 17-year-old.
fn deserialize_min_age<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    struct MinAgeVisitor;

    impl<'de> Visitor<'de> for MinAgeVisitor {
        type Value = i32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a numeric minimum age")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i32, E> {
            Ok(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i32, E> {
            Ok(value.min(i32::MAX as u64) as i32)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i32, E> {
            if !value.is_finite() {
                return Err(E::custom(format!("invalid minimum age {}", value)));
            }
            // `as` saturates at the i32 bounds
            Ok(value.ceil() as i32)
        }
    }

    deserializer.deserialize_any(MinAgeVisitor)
}

/// Display line derived from a matching pose, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendation(String);

impl Recommendation {
    pub fn new(name: &str, health_issue: &str) -> Self {
        Self(format!("{}: Benefits {}", name, health_issue))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Recommendation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&PoseRecord> for Recommendation {
    fn from(pose: &PoseRecord) -> Self {
        Recommendation::new(&pose.name, &pose.health_issue)
    }
}
