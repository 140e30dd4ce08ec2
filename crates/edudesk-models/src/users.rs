//! User domain models and DTOs.
//!
//! A user is a student or a teacher; administrators are teachers (or
//! students) with `is_admin` set. Name, phone and email are unique across
//! all rows. The password hash never leaves the server.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, FromRow, Postgres, Type,
    encode::IsNull,
    error::BoxDynError,
    postgres::PgTypeInfo,
};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use edudesk_core::serde::{deserialize_optional_i64, deserialize_optional_string};

use crate::validation::{validate_phone, validate_update_password};

/// Stored as lowercase `TEXT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Teacher,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

impl Type<Postgres> for UserRole {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Postgres> for UserRole {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <&str as Encode<'q, Postgres>>::encode(self.as_str(), buf)
    }
}

impl<'r> Decode<'r, Postgres> for UserRole {
    fn decode(value: <Postgres as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<'r, Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub nickname: String,
    pub phone: String,
    pub email: String,
    pub role: UserRole,
    pub is_admin: bool,
    #[serde(skip)]
    pub password: String,
    pub class_id: Option<i64>,
    pub created_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_teacher(&self) -> bool {
        self.role == UserRole::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    /// Teachers and admins may use the teacher endpoints.
    pub fn can_teach(&self) -> bool {
        self.is_admin || self.is_teacher()
    }
}

/// Creator reference embedded in detail responses.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub nickname: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            nickname: user.nickname.clone(),
        }
    }
}

/// A user with the creator relation resolved.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub created_by: Option<UserSummary>,
}

/// Insert input. `password` is plain text when handed to the service and
/// the bcrypt hash once it reaches the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub nickname: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub is_admin: bool,
    pub class_id: Option<i64>,
    pub created_by_id: Option<i64>,
}

/// Partial update. Only `Some` fields are written.
///
/// `password` follows the same plain-then-hashed convention as
/// [`NewUser`]; an empty password is dropped by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub is_admin: Option<bool>,
    pub class_id: Option<Option<i64>>,
    pub password: Option<String>,
}

impl UserPatch {
    /// Column names this patch writes, in a fixed order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.name.is_some() {
            columns.push("name");
        }
        if self.nickname.is_some() {
            columns.push("nickname");
        }
        if self.phone.is_some() {
            columns.push("phone");
        }
        if self.email.is_some() {
            columns.push("email");
        }
        if self.role.is_some() {
            columns.push("role");
        }
        if self.is_admin.is_some() {
            columns.push("is_admin");
        }
        if self.class_id.is_some() {
            columns.push("class_id");
        }
        if self.password.is_some() {
            columns.push("password");
        }
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }
}

/// List filter. `query` matches name, nickname, phone or email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Case-insensitive search text
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub query: Option<String>,
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
}

/// Admin creates any user.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 2, max = 32))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub nickname: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 64))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_admin: bool,
}

impl CreateUserDto {
    pub fn into_new_user(self, created_by_id: i64) -> NewUser {
        NewUser {
            name: self.name,
            nickname: self.nickname,
            phone: self.phone,
            email: self.email,
            password: self.password,
            role: self.role,
            is_admin: self.is_admin,
            class_id: None,
            created_by_id: Some(created_by_id),
        }
    }
}

/// Teacher creates a student.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 2, max = 32))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub nickname: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 64))]
    pub password: String,
}

impl CreateStudentDto {
    pub fn into_new_user(self, created_by_id: i64) -> NewUser {
        NewUser {
            name: self.name,
            nickname: self.nickname,
            phone: self.phone,
            email: self.email,
            password: self.password,
            role: UserRole::Student,
            is_admin: false,
            class_id: None,
            created_by_id: Some(created_by_id),
        }
    }
}

/// Admin update. Absent fields are left unchanged.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 2, max = 32))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub nickname: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    /// Empty or absent keeps the current password
    #[validate(custom(function = "validate_update_password"))]
    pub password: Option<String>,
}

impl From<UpdateUserDto> for UserPatch {
    fn from(dto: UpdateUserDto) -> Self {
        Self {
            name: dto.name,
            nickname: dto.nickname,
            phone: dto.phone,
            email: dto.email,
            role: dto.role,
            password: dto.password,
            ..Default::default()
        }
    }
}

/// Teacher update of a student row.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 32))]
    pub nickname: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    /// Empty or absent keeps the current password
    #[validate(custom(function = "validate_update_password"))]
    pub password: Option<String>,
}

impl From<UpdateStudentDto> for UserPatch {
    fn from(dto: UpdateStudentDto) -> Self {
        Self {
            nickname: dto.nickname,
            phone: dto.phone,
            email: dto.email,
            password: dto.password,
            ..Default::default()
        }
    }
}

/// Self-service profile update: contact details only.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl From<UpdateProfileDto> for UserPatch {
    fn from(dto: UpdateProfileDto) -> Self {
        Self {
            phone: dto.phone,
            email: dto.email,
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 6, max = 64))]
    pub new_password: String,
}

#[derive(Deserialize, Debug, Clone, Copy, Validate, ToSchema)]
pub struct ToggleAdminDto {
    pub is_admin: bool,
}

#[derive(Deserialize, Debug, Clone, Copy, Validate, ToSchema)]
pub struct UpdateRoleDto {
    pub role: UserRole,
}

/// `class_id: null` removes the student from their class.
#[derive(Deserialize, Debug, Clone, Copy, Validate, ToSchema)]
pub struct AssignClassDto {
    #[validate(range(min = 1))]
    pub class_id: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UniqueField {
    Name,
    Phone,
    Email,
}

/// Probe whether a unique value is already taken.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ExistsDto {
    pub field: UniqueField,
    #[validate(length(min = 1, max = 64))]
    pub value: String,
    /// Row to ignore, typically the one being edited
    pub exclude_id: Option<i64>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub struct ExistsResponse {
    pub exists: bool,
}
