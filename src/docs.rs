use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use edudesk_core::{Empty, Meta};
use edudesk_models::auth::{LoginRequestDto, LoginResponse, LoginUser};
use edudesk_models::classes::{CreateClassDto, UpdateClassDto};
use edudesk_models::learning_materials::{LearningMaterialUpload, UpdateLearningMaterialDto};
use edudesk_models::subjects::{CreateSubjectDto, UpdateSubjectDto};
use edudesk_models::users::{
    AssignClassDto, ChangePasswordDto, CreateStudentDto, CreateUserDto, ExistsDto, ExistsResponse,
    ToggleAdminDto, UniqueField, UpdateProfileDto, UpdateRoleDto, UpdateStudentDto, UpdateUserDto,
};
use edudesk_models::{
    Class, ClassDetail, LearningMaterial, Subject, SubjectDetail, User, UserDetail, UserRole,
    UserSummary,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::liveness,
        crate::modules::health::readiness,
        crate::modules::auth::controller::login,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::change_password,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::toggle_admin,
        crate::modules::users::controller::update_role,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::list_students,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::assign_class,
        crate::modules::students::controller::user_exists,
        crate::modules::classes::controller::list_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::list_members,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::subjects::controller::list_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::learning_materials::controller::list_materials,
        crate::modules::learning_materials::controller::get_material,
        crate::modules::learning_materials::controller::download_material,
        crate::modules::learning_materials::controller::upload_material,
        crate::modules::learning_materials::controller::update_material,
        crate::modules::learning_materials::controller::delete_material,
    ),
    components(
        schemas(
            Meta,
            Empty,
            User,
            UserRole,
            UserSummary,
            UserDetail,
            CreateUserDto,
            UpdateUserDto,
            UpdateProfileDto,
            ChangePasswordDto,
            ToggleAdminDto,
            UpdateRoleDto,
            CreateStudentDto,
            UpdateStudentDto,
            AssignClassDto,
            UniqueField,
            ExistsDto,
            ExistsResponse,
            LoginRequestDto,
            LoginResponse,
            LoginUser,
            Class,
            ClassDetail,
            CreateClassDto,
            UpdateClassDto,
            Subject,
            SubjectDetail,
            CreateSubjectDto,
            UpdateSubjectDto,
            LearningMaterial,
            LearningMaterialUpload,
            UpdateLearningMaterialDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Authentication", description = "Login"),
        (name = "Users", description = "The caller's own profile"),
        (name = "Teacher", description = "Student management for teachers"),
        (name = "Admin", description = "User management for admins"),
        (name = "Classes", description = "Classes and their members"),
        (name = "Subjects", description = "Subjects"),
        (name = "Learning materials", description = "Uploaded learning materials")
    ),
    info(
        title = "Edudesk API",
        version = "0.1.0",
        description = "Users, classes, subjects and learning materials for a small school. Every response is wrapped in a `{meta, data}` envelope.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
