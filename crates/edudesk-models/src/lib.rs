//! # Edudesk Models
//!
//! Domain models and DTOs for the Edudesk API.
//!
//! Each entity module holds one canonical version of every struct:
//! the row type (`FromRow`), the creation input, the partial-update patch,
//! the list filter, and the request DTOs with their validation rules.
//!
//! - [`users`]: students, teachers and the admin flag
//! - [`classes`]: classes and their membership
//! - [`subjects`]: subjects that group learning materials
//! - [`learning_materials`]: uploaded material metadata
//! - [`auth`]: login request and response
//! - [`validation`]: custom field validators

pub mod auth;
pub mod classes;
pub mod learning_materials;
pub mod subjects;
pub mod users;
pub mod validation;

pub use classes::{Class, ClassDetail, ClassPatch, NewClass};
pub use learning_materials::{LearningMaterial, LearningMaterialPatch, NewLearningMaterial};
pub use subjects::{NewSubject, Subject, SubjectDetail, SubjectPatch};
pub use users::{NewUser, User, UserDetail, UserFilter, UserPatch, UserRole, UserSummary};

use serde::Deserialize;
use utoipa::IntoParams;

use edudesk_core::serde::deserialize_optional_string;

/// Case-insensitive substring search on name and description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameFilter {
    /// Search text
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub query: Option<String>,
}
