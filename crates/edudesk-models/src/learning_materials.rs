//! Learning material metadata.
//!
//! The file itself lives in file storage under `file_path`; the row keeps
//! its SHA-256 `content_hash` and the subject it belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use edudesk_core::serde::{deserialize_optional_i64, deserialize_optional_string};

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct LearningMaterial {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub content_hash: String,
    /// Storage key; not exposed to clients.
    #[serde(skip)]
    pub file_path: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub subject_id: i64,
    pub created_by_id: Option<i64>,
    pub updated_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLearningMaterial {
    pub name: String,
    pub description: String,
    pub content_hash: String,
    pub file_path: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub subject_id: i64,
    pub created_by_id: Option<i64>,
}

/// Metadata update. `updated_by_id` is always recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearningMaterialPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub updated_by_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LearningMaterialFilter {
    /// Case-insensitive search on name and description
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
}

/// Text fields of the multipart upload form.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateLearningMaterialForm {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(max = 512))]
    pub description: String,
    #[validate(range(min = 1))]
    pub subject_id: i64,
}

/// A file received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// OpenAPI shape of the multipart upload.
#[derive(ToSchema)]
pub struct LearningMaterialUpload {
    pub name: String,
    pub description: Option<String>,
    pub subject_id: i64,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateLearningMaterialDto {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    #[validate(length(max = 512))]
    pub description: Option<String>,
}

impl UpdateLearningMaterialDto {
    pub fn into_patch(self, updated_by_id: i64) -> LearningMaterialPatch {
        LearningMaterialPatch {
            name: self.name,
            description: self.description,
            updated_by_id: Some(updated_by_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_is_not_serialized() {
        let material = LearningMaterial {
            id: 1,
            name: "Fractions".into(),
            description: String::new(),
            content_hash: "abc".into(),
            file_path: "materials/secret-key.pdf".into(),
            file_name: "fractions.pdf".into(),
            content_type: "application/pdf".into(),
            size_bytes: 3,
            subject_id: 2,
            created_by_id: Some(1),
            updated_by_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&material).unwrap();
        assert!(json.get("file_path").is_none());
        assert_eq!(json["content_hash"], "abc");
    }

    #[test]
    fn test_form_validation() {
        let form = CreateLearningMaterialForm {
            name: String::new(),
            description: "x".repeat(513),
            subject_id: 0,
        };
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("subject_id"));
    }
}
