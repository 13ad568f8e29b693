use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use pose::{PoseRecord, Recommendation};

mod pose;

/// Upper bound of the age input on the form.
pub const MAX_AGE: u8 = 120;

/// Gender options offered on the form. Pose records may additionally carry
/// `"All"`, which matches every option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Others];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "Others",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File format the recommendations are delivered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentFormat {
    #[default]
    #[serde(alias = "word", alias = "docx")]
    Word,
    #[serde(rename = "PDF", alias = "pdf", alias = "Pdf")]
    Pdf,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Word, DocumentFormat::Pdf];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentFormat::Word => "Word",
            DocumentFormat::Pdf => "PDF",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentFormat::Word => "Yoga_Recommendations.docx",
            DocumentFormat::Pdf => "Yoga_Recommendations.pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Pdf => "application/pdf",
        }
    }
}

/// One form submission. Lives for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    pub age: u8,
    pub gender: Gender,
    pub health_issue: String,
    pub email: String,
    #[serde(default)]
    pub format: DocumentFormat,
}

impl UserQuery {
    /// Presence checks on the two free-text fields, plus the age bound the
    /// number input enforces in the browser.
    pub fn validate(&self) -> Result<()> {
        if self.health_issue.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "Please provide your health issue and email address.".to_string(),
            ));
        }

        if self.age > MAX_AGE {
            return Err(ApiError::InvalidInput(format!(
                "Age must be between 0 and {}",
                MAX_AGE
            )));
        }

        Ok(())
    }
}

/// Request body for downloading a document without email delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub age: u8,
    pub gender: Gender,
    pub health_issue: String,
    #[serde(default)]
    pub format: DocumentFormat,
}

/// Response for the JSON recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<String>,
    pub file_name: String,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(health_issue: &str, email: &str) -> UserQuery {
        UserQuery {
            age: 30,
            gender: Gender::Female,
            health_issue: health_issue.to_string(),
            email: email.to_string(),
            format: DocumentFormat::Pdf,
        }
    }

    #[test]
    fn test_validate_requires_text_fields() {
        assert!(query("back pain", "x@y.com").validate().is_ok());
        assert!(matches!(
            query("   ", "x@y.com").validate(),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            query("back pain", "\n").validate(),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_age_bound() {
        let mut q = query("back pain", "x@y.com");
        q.age = 121;
        assert!(q.validate().is_err());
        q.age = 120;
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(DocumentFormat::Word.file_name(), "Yoga_Recommendations.docx");
        assert_eq!(DocumentFormat::Pdf.file_name(), "Yoga_Recommendations.pdf");
        let parsed: DocumentFormat = serde_json::from_str("\"PDF\"").unwrap();
        assert_eq!(parsed, DocumentFormat::Pdf);
    }
}
