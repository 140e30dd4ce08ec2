use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use edudesk_config::SettingsHandle;
use edudesk_core::{
    Page, PageParams,
    file_storage::{FileStorage, LocalFileStorage},
};
use edudesk_db::{
    ClassRepository, LearningMaterialRepository, PgClassRepository, PgLearningMaterialRepository,
    PgPool, PgSubjectRepository, PgUserRepository, SubjectRepository, UserRepository,
    ensure_schema, init_db_pool,
};

use crate::modules::auth::service::AuthService;
use crate::modules::classes::service::ClassService;
use crate::modules::learning_materials::service::LearningMaterialService;
use crate::modules::subjects::service::SubjectService;
use crate::modules::users::service::UserService;

/// One repository per entity, behind its trait.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub classes: Arc<dyn ClassRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
    pub learning_materials: Arc<dyn LearningMaterialRepository>,
}

impl Repositories {
    pub fn postgres(db: &PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            classes: Arc::new(PgClassRepository::new(db.clone())),
            subjects: Arc::new(PgSubjectRepository::new(db.clone())),
            learning_materials: Arc::new(PgLearningMaterialRepository::new(db.clone())),
        }
    }
}

/// Shared application context handed to the router.
///
/// `db` is only used by the readiness probe; everything else goes through
/// the services, which are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub settings: SettingsHandle,
    pub db: Option<PgPool>,
    pub auth: AuthService,
    pub users: UserService,
    pub classes: ClassService,
    pub subjects: SubjectService,
    pub learning_materials: LearningMaterialService,
}

impl AppState {
    pub fn new(
        settings: SettingsHandle,
        db: Option<PgPool>,
        repos: Repositories,
        storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), settings.clone()),
            users: UserService::new(repos.users.clone(), settings.clone()),
            classes: ClassService::new(repos.classes.clone(), repos.users.clone()),
            subjects: SubjectService::new(
                repos.subjects.clone(),
                repos.learning_materials.clone(),
                repos.users.clone(),
            ),
            learning_materials: LearningMaterialService::new(
                repos.learning_materials,
                repos.subjects,
                storage,
            ),
            settings,
            db,
        }
    }

    /// Resolves `pn`/`ps` against the current pagination settings.
    pub fn page(&self, params: &PageParams) -> Page {
        let settings = self.settings.current();
        params.resolve(settings.app.default_ps, settings.app.max_ps)
    }
}

/// Connects to PostgreSQL, creates missing tables and seeds the bootstrap
/// admin when the users table is empty.
pub async fn init_app_state(settings: SettingsHandle) -> anyhow::Result<AppState> {
    let current = settings.current();

    let db = init_db_pool(&current.database)
        .await
        .context("failed to connect to database")?;
    ensure_schema(&db)
        .await
        .context("failed to create database schema")?;

    let storage = LocalFileStorage::new(
        current.storage.base_dir.clone(),
        current.storage.max_file_size,
    );
    info!(base_dir = %current.storage.base_dir.display(), "file storage ready");

    let state = AppState::new(
        settings.clone(),
        Some(db.clone()),
        Repositories::postgres(&db),
        Arc::new(storage),
    );

    state
        .users
        .ensure_bootstrap_admin(&current.admin)
        .await
        .map_err(|e| anyhow::anyhow!("failed to create bootstrap admin: {e}"))?;

    Ok(state)
}
