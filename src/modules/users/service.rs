use std::sync::Arc;

use tracing::{debug, info, instrument};

use edudesk_config::{AdminConfig, SettingsHandle};
use edudesk_core::{AppError, Page, PageData, hash_password_with_cost, verify_password};
use edudesk_db::{DbError, DbResultExt, UserRepository};
use edudesk_models::users::UniqueField;
use edudesk_models::{NewUser, User, UserDetail, UserFilter, UserPatch, UserRole, UserSummary};

/// Resolves a `created_by_id` to a summary. A creator that no longer exists
/// resolves to `None`.
pub async fn creator_summary(
    users: &dyn UserRepository,
    created_by_id: Option<i64>,
) -> Result<Option<UserSummary>, AppError> {
    let Some(id) = created_by_id else {
        return Ok(None);
    };

    match users.get(id).await {
        Ok(user) => Ok(Some(UserSummary::from(&user))),
        Err(DbError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    settings: SettingsHandle,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, settings: SettingsHandle) -> Self {
        Self { repo, settings }
    }

    fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password_with_cost(password, self.settings.current().app.bcrypt_cost)
    }

    /// Checks name, then phone, then email, stopping at the first value
    /// already held by another row.
    async fn ensure_unique(
        &self,
        name: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<i64>,
    ) -> Result<(), AppError> {
        if let Some(name) = name {
            if self.repo.is_name_exist(name, exclude_id).await? {
                return Err(AppError::already_exists("name"));
            }
        }
        if let Some(phone) = phone {
            if self.repo.is_phone_exist(phone, exclude_id).await? {
                return Err(AppError::already_exists("phone"));
            }
        }
        if let Some(email) = email {
            if self.repo.is_email_exist(email, exclude_id).await? {
                return Err(AppError::already_exists("email"));
            }
        }
        Ok(())
    }

    /// `new_user.password` is plain text here.
    #[instrument(skip(self, new_user), fields(name = %new_user.name, role = %new_user.role))]
    pub async fn create(&self, mut new_user: NewUser) -> Result<User, AppError> {
        self.ensure_unique(
            Some(&new_user.name),
            Some(&new_user.phone),
            Some(&new_user.email),
            None,
        )
        .await?;

        new_user.password = self.hash(&new_user.password)?;
        let user = self.repo.create(new_user).await?;

        info!(user_id = user.id, "user created");
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        self.repo.get(id).await.or_not_found("user")
    }

    #[instrument(skip(self))]
    pub async fn get_detail(&self, id: i64) -> Result<UserDetail, AppError> {
        let user = self.get(id).await?;
        let created_by = creator_summary(self.repo.as_ref(), user.created_by_id).await?;
        Ok(UserDetail { user, created_by })
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &UserFilter, page: Page) -> Result<PageData<User>, AppError> {
        let (items, total) = self.repo.list_and_count(filter, page).await?;
        debug!(total, returned = items.len(), "users listed");
        Ok(PageData::new(&page, total, items))
    }

    #[instrument(skip(self))]
    pub async fn list_students(
        &self,
        mut filter: UserFilter,
        page: Page,
    ) -> Result<PageData<User>, AppError> {
        filter.role = Some(UserRole::Student);
        self.list(&filter, page).await
    }

    /// Applies the `Some` fields of `patch`. A non-empty password is
    /// rehashed; an empty one keeps the stored hash.
    #[instrument(skip(self, patch), fields(columns = ?patch.columns()))]
    pub async fn update(&self, id: i64, mut patch: UserPatch) -> Result<User, AppError> {
        let current = self.get(id).await?;

        self.ensure_unique(
            patch.name.as_deref(),
            patch.phone.as_deref(),
            patch.email.as_deref(),
            Some(id),
        )
        .await?;

        patch.password = match patch.password.take() {
            Some(password) if !password.is_empty() => Some(self.hash(&password)?),
            _ => None,
        };

        if patch.is_empty() {
            return Ok(current);
        }

        let user = self.repo.update(id, &patch).await.or_not_found("user")?;
        info!(user_id = id, "user updated");
        Ok(user)
    }

    /// Update on behalf of `caller`. Non-admins may only touch students and
    /// nobody may change their own role.
    pub async fn update_as(
        &self,
        caller: &User,
        id: i64,
        patch: UserPatch,
    ) -> Result<User, AppError> {
        let target = self.get(id).await?;

        if !caller.is_admin && !target.is_student() {
            return Err(AppError::forbidden("teachers may only modify students"));
        }
        if caller.id == id && patch.role.is_some_and(|role| role != caller.role) {
            return Err(AppError::forbidden("cannot change your own role"));
        }

        self.update(id, patch).await
    }

    #[instrument(skip(self, old_password, new_password))]
    pub async fn update_password(
        &self,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        // A missing account reads the same as a wrong old password.
        let user = match self.repo.get(id).await {
            Ok(user) => user,
            Err(DbError::NotFound) => return Err(AppError::old_password_incorrect()),
            Err(e) => return Err(e.into()),
        };

        if !verify_password(old_password, &user.password)? {
            debug!(user_id = id, "old password mismatch");
            return Err(AppError::old_password_incorrect());
        }

        let patch = UserPatch {
            password: Some(self.hash(new_password)?),
            ..Default::default()
        };
        self.repo.update(id, &patch).await.or_not_found("user")?;

        info!(user_id = id, "password changed");
        Ok(())
    }

    /// Deleting a missing user succeeds.
    #[instrument(skip(self, caller), fields(caller_id = caller.id))]
    pub async fn delete(&self, caller: &User, id: i64) -> Result<(), AppError> {
        if caller.id == id {
            return Err(AppError::forbidden("cannot delete your own account"));
        }

        let target = match self.repo.get(id).await {
            Ok(user) => user,
            Err(DbError::NotFound) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        if !caller.is_admin && !target.is_student() {
            return Err(AppError::forbidden("teachers may only delete students"));
        }

        self.repo.delete(id).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }

    #[instrument(skip(self, caller), fields(caller_id = caller.id))]
    pub async fn toggle_admin(
        &self,
        caller: &User,
        id: i64,
        is_admin: bool,
    ) -> Result<User, AppError> {
        if caller.id == id && !is_admin {
            return Err(AppError::forbidden("cannot revoke your own admin privileges"));
        }

        let patch = UserPatch {
            is_admin: Some(is_admin),
            ..Default::default()
        };
        self.update(id, patch).await
    }

    #[instrument(skip(self, caller), fields(caller_id = caller.id))]
    pub async fn update_role(&self, caller: &User, id: i64, role: UserRole) -> Result<User, AppError> {
        if caller.id == id {
            return Err(AppError::forbidden("cannot change your own role"));
        }

        let patch = UserPatch {
            role: Some(role),
            ..Default::default()
        };
        self.update(id, patch).await
    }

    /// Sets or clears a user's class. The class must already be known to
    /// exist.
    pub async fn assign_class(
        &self,
        caller: &User,
        id: i64,
        class_id: Option<i64>,
    ) -> Result<User, AppError> {
        let patch = UserPatch {
            class_id: Some(class_id),
            ..Default::default()
        };
        self.update_as(caller, id, patch).await
    }

    pub async fn exists(
        &self,
        field: UniqueField,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        let exists = match field {
            UniqueField::Name => self.repo.is_name_exist(value, exclude_id).await?,
            UniqueField::Phone => self.repo.is_phone_exist(value, exclude_id).await?,
            UniqueField::Email => self.repo.is_email_exist(value, exclude_id).await?,
        };
        Ok(exists)
    }

    /// Creates the configured admin account if there are no users yet.
    pub async fn ensure_bootstrap_admin(&self, admin: &AdminConfig) -> Result<Option<User>, AppError> {
        if self.repo.count().await? > 0 {
            return Ok(None);
        }

        let user = self
            .create(NewUser {
                name: admin.name.clone(),
                nickname: admin.nickname.clone(),
                phone: admin.phone.clone(),
                email: admin.email.clone(),
                password: admin.password.clone(),
                role: UserRole::Teacher,
                is_admin: true,
                class_id: None,
                created_by_id: None,
            })
            .await?;

        info!(user_id = user.id, name = %user.name, "bootstrap admin created");
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edudesk_config::Settings;
    use edudesk_core::ErrorCode;
    use edudesk_db::memory::InMemoryUserRepository;

    fn service() -> UserService {
        let mut settings = Settings::default();
        settings.app.bcrypt_cost = 4;
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            SettingsHandle::new(settings),
        )
    }

    fn new_user(name: &str, phone: &str, role: UserRole) -> NewUser {
        NewUser {
            name: name.to_string(),
            nickname: name.to_uppercase(),
            phone: phone.to_string(),
            email: format!("{name}@example.com"),
            password: "secret1".to_string(),
            role,
            is_admin: false,
            class_id: None,
            created_by_id: None,
        }
    }

    async fn admin(svc: &UserService) -> User {
        let mut input = new_user("root", "100000", UserRole::Teacher);
        input.is_admin = true;
        svc.create(input).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let svc = service();
        let user = svc.create(new_user("ann", "111111", UserRole::Student)).await.unwrap();
        assert_ne!(user.password, "secret1");
        assert!(verify_password("secret1", &user.password).unwrap());
    }

    #[tokio::test]
    async fn test_create_reports_first_duplicate_field() {
        let svc = service();
        svc.create(new_user("ann", "111111", UserRole::Student)).await.unwrap();

        let err = svc.create(new_user("ann", "111111", UserRole::Student)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "name already exists");

        let err = svc.create(new_user("bob", "111111", UserRole::Student)).await.unwrap_err();
        assert_eq!(err.message, "phone already exists");

        let mut dup_email = new_user("cat", "222222", UserRole::Student);
        dup_email.email = "ann@example.com".to_string();
        let err = svc.create(dup_email).await.unwrap_err();
        assert_eq!(err.message, "email already exists");
    }

    #[tokio::test]
    async fn test_update_to_own_values_succeeds() {
        let svc = service();
        let user = svc.create(new_user("ann", "111111", UserRole::Student)).await.unwrap();

        let patch = UserPatch {
            name: Some("ann".into()),
            phone: Some("111111".into()),
            email: Some("ann@example.com".into()),
            ..Default::default()
        };
        let updated = svc.update(user.id, patch).await.unwrap();
        assert_eq!(updated.name, "ann");
    }

    #[tokio::test]
    async fn test_update_empty_password_keeps_hash() {
        let svc = service();
        let user = svc.create(new_user("ann", "111111", UserRole::Student)).await.unwrap();

        let patch = UserPatch {
            password: Some(String::new()),
            ..Default::default()
        };
        let updated = svc.update(user.id, patch).await.unwrap();
        assert_eq!(updated.password, user.password);

        let patch = UserPatch {
            password: Some("another1".into()),
            ..Default::default()
        };
        let updated = svc.update(user.id, patch).await.unwrap();
        assert!(verify_password("another1", &updated.password).unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let err = service()
            .update(404, UserPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_password_checks_old() {
        let svc = service();
        let user = svc.create(new_user("ann", "111111", UserRole::Student)).await.unwrap();

        let err = svc.update_password(user.id, "wrong", "newpass1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OldPasswordIncorrect);

        svc.update_password(user.id, "secret1", "newpass1").await.unwrap();
        let stored = svc.get(user.id).await.unwrap();
        assert!(verify_password("newpass1", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn test_update_password_for_missing_user_hides_account() {
        let svc = service();

        let err = svc.update_password(4242, "secret1", "newpass1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OldPasswordIncorrect);
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let svc = service();
        let root = admin(&svc).await;
        let teacher = svc.create(new_user("tom", "222222", UserRole::Teacher)).await.unwrap();
        let other = svc.create(new_user("tim", "333333", UserRole::Teacher)).await.unwrap();
        let student = svc.create(new_user("sue", "444444", UserRole::Student)).await.unwrap();

        let err = svc.delete(&root, root.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = svc.delete(&teacher, other.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        svc.delete(&teacher, student.id).await.unwrap();
        svc.delete(&root, other.id).await.unwrap();
        // already gone
        svc.delete(&root, other.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_cannot_revoke_own_admin_or_change_own_role() {
        let svc = service();
        let root = admin(&svc).await;

        let err = svc.toggle_admin(&root, root.id, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = svc.update_role(&root, root.id, UserRole::Student).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let patch = UserPatch {
            role: Some(UserRole::Student),
            ..Default::default()
        };
        let err = svc.update_as(&root, root.id, patch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_toggle_admin_and_role_on_others() {
        let svc = service();
        let root = admin(&svc).await;
        let tom = svc.create(new_user("tom", "222222", UserRole::Teacher)).await.unwrap();

        let promoted = svc.toggle_admin(&root, tom.id, true).await.unwrap();
        assert!(promoted.is_admin);

        let demoted = svc.update_role(&root, tom.id, UserRole::Student).await.unwrap();
        assert_eq!(demoted.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_teacher_may_only_update_students() {
        let svc = service();
        let teacher = svc.create(new_user("tom", "222222", UserRole::Teacher)).await.unwrap();
        let other = svc.create(new_user("tim", "333333", UserRole::Teacher)).await.unwrap();
        let student = svc.create(new_user("sue", "444444", UserRole::Student)).await.unwrap();

        let patch = UserPatch {
            nickname: Some("Sue".into()),
            ..Default::default()
        };
        let updated = svc.update_as(&teacher, student.id, patch.clone()).await.unwrap();
        assert_eq!(updated.nickname, "Sue");

        let err = svc.update_as(&teacher, other.id, patch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_exists_probe() {
        let svc = service();
        let user = svc.create(new_user("ann", "111111", UserRole::Student)).await.unwrap();

        assert!(svc.exists(UniqueField::Name, "ann", None).await.unwrap());
        assert!(!svc.exists(UniqueField::Name, "ann", Some(user.id)).await.unwrap());
        assert!(svc.exists(UniqueField::Email, "ann@example.com", None).await.unwrap());
        assert!(!svc.exists(UniqueField::Phone, "999999", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_bootstrap_admin_only_when_empty() {
        let svc = service();
        let created = svc
            .ensure_bootstrap_admin(&AdminConfig::default())
            .await
            .unwrap()
            .unwrap();
        assert!(created.is_admin);
        assert!(created.is_teacher());
        assert_eq!(created.created_by_id, None);

        assert!(svc.ensure_bootstrap_admin(&AdminConfig::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_detail_resolves_creator() {
        let svc = service();
        let root = admin(&svc).await;
        let mut input = new_user("ann", "111111", UserRole::Student);
        input.created_by_id = Some(root.id);
        let ann = svc.create(input).await.unwrap();

        let detail = svc.get_detail(ann.id).await.unwrap();
        assert_eq!(detail.created_by.unwrap().id, root.id);

        let detail = svc.get_detail(root.id).await.unwrap();
        assert!(detail.created_by.is_none());
    }

    #[tokio::test]
    async fn test_list_students_filters_role() {
        let svc = service();
        admin(&svc).await;
        svc.create(new_user("sue", "444444", UserRole::Student)).await.unwrap();

        let page = svc
            .list_students(UserFilter::default(), Page::new(None, None, 20, 100))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "sue");
    }
}
