use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use edudesk_core::{AppError, Page, PageData};
use edudesk_db::{DbResultExt, LearningMaterialRepository, SubjectRepository, UserRepository};
use edudesk_models::{NameFilter, NewSubject, Subject, SubjectDetail, SubjectPatch};

use crate::modules::users::service::creator_summary;

#[derive(Clone)]
pub struct SubjectService {
    repo: Arc<dyn SubjectRepository>,
    materials: Arc<dyn LearningMaterialRepository>,
    users: Arc<dyn UserRepository>,
}

impl SubjectService {
    pub fn new(
        repo: Arc<dyn SubjectRepository>,
        materials: Arc<dyn LearningMaterialRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            repo,
            materials,
            users,
        }
    }

    #[instrument(skip(self, new_subject), fields(name = %new_subject.name))]
    pub async fn create(&self, new_subject: NewSubject) -> Result<Subject, AppError> {
        if self.repo.is_name_exist(&new_subject.name, None).await? {
            return Err(AppError::already_exists("name"));
        }

        let subject = self.repo.create(new_subject).await?;
        info!(subject_id = subject.id, "subject created");
        Ok(subject)
    }

    pub async fn get(&self, id: i64) -> Result<Subject, AppError> {
        self.repo.get(id).await.or_not_found("subject")
    }

    #[instrument(skip(self))]
    pub async fn get_detail(&self, id: i64) -> Result<SubjectDetail, AppError> {
        let subject = self.get(id).await?;
        let created_by = creator_summary(self.users.as_ref(), subject.created_by_id).await?;
        Ok(SubjectDetail {
            subject,
            created_by,
        })
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &NameFilter, page: Page) -> Result<PageData<Subject>, AppError> {
        let (items, total) = self.repo.list_and_count(filter, page).await?;
        debug!(total, returned = items.len(), "subjects listed");
        Ok(PageData::new(&page, total, items))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: SubjectPatch) -> Result<Subject, AppError> {
        let current = self.get(id).await?;

        if let Some(name) = &patch.name {
            if self.repo.is_name_exist(name, Some(id)).await? {
                return Err(AppError::already_exists("name"));
            }
        }
        if patch.is_empty() {
            return Ok(current);
        }

        let subject = self.repo.update(id, &patch).await.or_not_found("subject")?;
        info!(subject_id = id, "subject updated");
        Ok(subject)
    }

    /// Refused while learning materials still belong to the subject.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let materials = self.materials.count_by_subject(id).await?;
        if materials > 0 {
            warn!(subject_id = id, materials, "subject still has learning materials");
            return Err(AppError::conflict(format!(
                "subject still has {materials} learning material(s)"
            )));
        }

        self.repo.delete(id).await?;
        info!(subject_id = id, "subject deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edudesk_core::ErrorCode;
    use edudesk_db::memory::{
        InMemoryLearningMaterialRepository, InMemorySubjectRepository, InMemoryUserRepository,
    };
    use edudesk_models::NewLearningMaterial;

    fn setup() -> (SubjectService, Arc<InMemoryLearningMaterialRepository>) {
        let materials = Arc::new(InMemoryLearningMaterialRepository::new());
        let svc = SubjectService::new(
            Arc::new(InMemorySubjectRepository::new()),
            materials.clone(),
            Arc::new(InMemoryUserRepository::new()),
        );
        (svc, materials)
    }

    fn new_subject(name: &str) -> NewSubject {
        NewSubject {
            name: name.to_string(),
            description: "basics".to_string(),
            created_by_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_duplicate() {
        let (svc, _) = setup();
        let math = svc.create(new_subject("Math")).await.unwrap();
        assert_eq!(svc.get_detail(math.id).await.unwrap().subject.name, "Math");

        let err = svc.create(new_subject("Math")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_delete_refused_while_materials_exist() {
        let (svc, materials) = setup();
        let math = svc.create(new_subject("Math")).await.unwrap();

        let material = materials
            .create(NewLearningMaterial {
                name: "Algebra".into(),
                description: String::new(),
                content_hash: "abc".into(),
                file_path: "materials/a.pdf".into(),
                file_name: "a.pdf".into(),
                content_type: "application/pdf".into(),
                size_bytes: 3,
                subject_id: math.id,
                created_by_id: None,
            })
            .await
            .unwrap();

        let err = svc.delete(math.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        materials.delete(material.id).await.unwrap();
        svc.delete(math.id).await.unwrap();
        assert_eq!(svc.get(math.id).await.unwrap_err().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_empty_patch_returns_current() {
        let (svc, _) = setup();
        let math = svc.create(new_subject("Math")).await.unwrap();
        let same = svc.update(math.id, SubjectPatch::default()).await.unwrap();
        assert_eq!(same, math);
    }
}
