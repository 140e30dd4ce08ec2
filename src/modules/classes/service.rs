use std::sync::Arc;

use tracing::{debug, info, instrument};

use edudesk_core::{AppError, Page, PageData};
use edudesk_db::{ClassRepository, DbResultExt, UserRepository};
use edudesk_models::{Class, ClassDetail, ClassPatch, NameFilter, NewClass, User, UserFilter};

use crate::modules::users::service::creator_summary;

#[derive(Clone)]
pub struct ClassService {
    repo: Arc<dyn ClassRepository>,
    users: Arc<dyn UserRepository>,
}

impl ClassService {
    pub fn new(repo: Arc<dyn ClassRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { repo, users }
    }

    #[instrument(skip(self, new_class), fields(name = %new_class.name))]
    pub async fn create(&self, new_class: NewClass) -> Result<Class, AppError> {
        if self.repo.is_name_exist(&new_class.name, None).await? {
            return Err(AppError::already_exists("name"));
        }

        let class = self.repo.create(new_class).await?;
        info!(class_id = class.id, "class created");
        Ok(class)
    }

    pub async fn get(&self, id: i64) -> Result<Class, AppError> {
        self.repo.get(id).await.or_not_found("class")
    }

    pub async fn ensure_exists(&self, id: i64) -> Result<(), AppError> {
        self.get(id).await.map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn get_detail(&self, id: i64) -> Result<ClassDetail, AppError> {
        let class = self.get(id).await?;
        let created_by = creator_summary(self.users.as_ref(), class.created_by_id).await?;
        Ok(ClassDetail { class, created_by })
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &NameFilter, page: Page) -> Result<PageData<Class>, AppError> {
        let (items, total) = self.repo.list_and_count(filter, page).await?;
        debug!(total, returned = items.len(), "classes listed");
        Ok(PageData::new(&page, total, items))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: ClassPatch) -> Result<Class, AppError> {
        let current = self.get(id).await?;

        if let Some(name) = &patch.name {
            if self.repo.is_name_exist(name, Some(id)).await? {
                return Err(AppError::already_exists("name"));
            }
        }
        if patch.is_empty() {
            return Ok(current);
        }

        let class = self.repo.update(id, &patch).await.or_not_found("class")?;
        info!(class_id = id, "class updated");
        Ok(class)
    }

    /// Members are detached before the class row goes away.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let detached = self.users.clear_class(id).await?;
        self.repo.delete(id).await?;
        info!(class_id = id, detached, "class deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn members(&self, id: i64, page: Page) -> Result<PageData<User>, AppError> {
        self.ensure_exists(id).await?;

        let filter = UserFilter {
            class_id: Some(id),
            ..Default::default()
        };
        let (items, total) = self.users.list_and_count(&filter, page).await?;
        Ok(PageData::new(&page, total, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edudesk_core::ErrorCode;
    use edudesk_db::memory::{InMemoryClassRepository, InMemoryUserRepository};
    use edudesk_models::{NewUser, UserPatch, UserRole};

    fn setup() -> (ClassService, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let svc = ClassService::new(Arc::new(InMemoryClassRepository::new()), users.clone());
        (svc, users)
    }

    fn new_class(name: &str) -> NewClass {
        NewClass {
            name: name.to_string(),
            description: String::new(),
            created_by_id: None,
        }
    }

    async fn student(users: &InMemoryUserRepository, name: &str, phone: &str) -> User {
        users
            .create(NewUser {
                name: name.into(),
                nickname: name.into(),
                phone: phone.into(),
                email: format!("{name}@example.com"),
                password: "hash".into(),
                role: UserRole::Student,
                is_admin: false,
                class_id: None,
                created_by_id: None,
            })
            .await
            .unwrap()
    }

    fn first_page() -> Page {
        Page::new(None, None, 20, 100)
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let (svc, _) = setup();
        svc.create(new_class("1A")).await.unwrap();

        let err = svc.create(new_class("1A")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "name already exists");
    }

    #[tokio::test]
    async fn test_rename_checks_other_rows_only() {
        let (svc, _) = setup();
        let a = svc.create(new_class("1A")).await.unwrap();
        svc.create(new_class("1B")).await.unwrap();

        let same = ClassPatch {
            name: Some("1A".into()),
            ..Default::default()
        };
        assert_eq!(svc.update(a.id, same).await.unwrap().name, "1A");

        let taken = ClassPatch {
            name: Some("1B".into()),
            ..Default::default()
        };
        assert_eq!(svc.update(a.id, taken).await.unwrap_err().code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_members_and_delete_clears_membership() {
        let (svc, users) = setup();
        let class = svc.create(new_class("1A")).await.unwrap();
        let ann = student(&users, "ann", "111111").await;
        student(&users, "bob", "222222").await;

        let patch = UserPatch {
            class_id: Some(Some(class.id)),
            ..Default::default()
        };
        users.update(ann.id, &patch).await.unwrap();

        let members = svc.members(class.id, first_page()).await.unwrap();
        assert_eq!(members.total, 1);
        assert_eq!(members.items[0].id, ann.id);

        svc.delete(class.id).await.unwrap();
        assert_eq!(users.get(ann.id).await.unwrap().class_id, None);
        assert_eq!(svc.get(class.id).await.unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(
            svc.members(class.id, first_page()).await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
