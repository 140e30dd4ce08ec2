use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::users::UserSummary;

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct SubjectDetail {
    #[serde(flatten)]
    pub subject: Subject,
    pub created_by: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubject {
    pub name: String,
    pub description: String,
    pub created_by_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl SubjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 512))]
    pub description: String,
}

impl CreateSubjectDto {
    pub fn into_new_subject(self, created_by_id: i64) -> NewSubject {
        NewSubject {
            name: self.name,
            description: self.description,
            created_by_id: Some(created_by_id),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateSubjectDto {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    #[validate(length(max = 512))]
    pub description: Option<String>,
}

impl From<UpdateSubjectDto> for SubjectPatch {
    fn from(dto: UpdateSubjectDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
        }
    }
}
