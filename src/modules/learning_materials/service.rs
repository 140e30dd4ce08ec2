use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use edudesk_core::file_storage::{FileStorage, content_hash};
use edudesk_core::{AppError, Page, PageData};
use edudesk_db::{DbError, DbResultExt, LearningMaterialRepository, SubjectRepository};
use edudesk_models::learning_materials::{
    CreateLearningMaterialForm, LearningMaterialFilter, UploadedFile,
};
use edudesk_models::{LearningMaterial, LearningMaterialPatch, NewLearningMaterial};

/// Storage key for a new upload: a random name under `materials/`, keeping
/// a short alphanumeric extension from the client's file name.
fn storage_key(file_name: &str) -> String {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 16)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    format!("materials/{}{extension}", Uuid::new_v4())
}

#[derive(Clone)]
pub struct LearningMaterialService {
    repo: Arc<dyn LearningMaterialRepository>,
    subjects: Arc<dyn SubjectRepository>,
    storage: Arc<dyn FileStorage>,
}

impl LearningMaterialService {
    pub fn new(
        repo: Arc<dyn LearningMaterialRepository>,
        subjects: Arc<dyn SubjectRepository>,
        storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            repo,
            subjects,
            storage,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.storage.max_file_size()
    }

    /// Stores the file, then records its metadata. The stored file is
    /// removed again if the row cannot be written.
    #[instrument(skip(self, form, file), fields(name = %form.name, subject_id = form.subject_id, size = file.content.len()))]
    pub async fn create(
        &self,
        form: CreateLearningMaterialForm,
        file: UploadedFile,
        created_by_id: i64,
    ) -> Result<LearningMaterial, AppError> {
        if self.repo.is_name_exist(&form.name, None).await? {
            return Err(AppError::already_exists("name"));
        }
        self.subjects
            .get(form.subject_id)
            .await
            .or_not_found("subject")?;
        if file.content.is_empty() {
            return Err(AppError::bad_request("uploaded file is empty"));
        }

        let key = storage_key(&file.file_name);
        let file_path = self.storage.save(&key, &file.content).await?;

        let new_material = NewLearningMaterial {
            name: form.name,
            description: form.description,
            content_hash: content_hash(&file.content),
            file_path,
            file_name: file.file_name,
            content_type: file.content_type,
            size_bytes: file.content.len() as i64,
            subject_id: form.subject_id,
            created_by_id: Some(created_by_id),
        };

        match self.repo.create(new_material).await {
            Ok(material) => {
                info!(material_id = material.id, key = %key, "learning material created");
                Ok(material)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    warn!(key = %key, error = %cleanup, "failed to remove orphaned upload");
                }
                Err(e.into())
            }
        }
    }

    pub async fn get(&self, id: i64) -> Result<LearningMaterial, AppError> {
        self.repo.get(id).await.or_not_found("learning material")
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &LearningMaterialFilter,
        page: Page,
    ) -> Result<PageData<LearningMaterial>, AppError> {
        let (items, total) = self.repo.list_and_count(filter, page).await?;
        debug!(total, returned = items.len(), "learning materials listed");
        Ok(PageData::new(&page, total, items))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: i64,
        patch: LearningMaterialPatch,
    ) -> Result<LearningMaterial, AppError> {
        self.get(id).await?;

        if let Some(name) = &patch.name {
            if self.repo.is_name_exist(name, Some(id)).await? {
                return Err(AppError::already_exists("name"));
            }
        }

        let material = self
            .repo
            .update(id, &patch)
            .await
            .or_not_found("learning material")?;
        info!(material_id = id, "learning material updated");
        Ok(material)
    }

    /// Removes the row, then the stored file. A file that cannot be removed
    /// is logged and left behind.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let material = match self.repo.get(id).await {
            Ok(material) => material,
            Err(DbError::NotFound) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        self.repo.delete(id).await?;
        if let Err(e) = self.storage.delete(&material.file_path).await {
            warn!(material_id = id, key = %material.file_path, error = %e, "failed to remove stored file");
        }

        info!(material_id = id, "learning material deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn content(&self, id: i64) -> Result<(LearningMaterial, Vec<u8>), AppError> {
        let material = self.get(id).await?;
        let bytes = self.storage.read(&material.file_path).await?;
        Ok((material, bytes))
    }
}
