/// Project resource coordination
///
/// Sits between the HTTP handlers and the storage/media layers: derives
/// slugs, orders blob writes against record transactions, and owns the
/// destructive tag-sync semantics.

use crate::media::MediaStore;
use crate::portfolio::slug::slugify;
use crate::portfolio::storage::{ProjectStorage, TaxonomyStorage};
use crate::portfolio::types::{
    EditFormData, FormOptions, Project, ProjectDetail, ProjectInput,
};
use chrono::Utc;
use uuid::Uuid;

/// Errors surfaced by the project service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coordinates project records, tag associations, and cover-image blobs
pub struct ProjectService {
    /// Project record persistence
    storage: ProjectStorage,
    /// Tag and category lookups for forms and referential checks
    taxonomy: TaxonomyStorage,
    /// Blob store holding uploaded cover images
    media: MediaStore,
}

impl ProjectService {
    /// Create the service over its storage and media backends
    pub fn new(storage: ProjectStorage, taxonomy: TaxonomyStorage, media: MediaStore) -> Self {
        Self {
            storage,
            taxonomy,
            media,
        }
    }

    /// List every project, most recently updated first
    pub async fn list(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.storage.list_projects().await?)
    }

    /// Create a project from validated form data
    ///
    /// The slug is derived from the submitted title. A cover image, when
    /// present, is stored before the record transaction and removed again
    /// if that transaction fails, so a failed create leaves no orphaned
    /// blob behind. Tag associations land in the same transaction as the
    /// record.
    pub async fn create(&self, input: ProjectInput) -> ServiceResult<Project> {
        self.check_references(&input).await?;

        let now = Utc::now().to_rfc3339();
        let mut project = Project {
            id: Uuid::new_v4().to_string(),
            slug: slugify(&input.title),
            title: input.title,
            description: input.description,
            category_id: input.category_id,
            cover_image: None,
            created_at: now.clone(),
            updated_at: now,
        };

        if let Some(image) = &input.cover_image {
            tracing::debug!(
                "Storing cover image '{}' ({:?})",
                image.filename,
                image.content_type
            );
            let key = self.media.store(&image.filename, &image.bytes).await?;
            project.cover_image = Some(key);
        }

        if let Err(e) = self.storage.insert_project(&project, &input.tags).await {
            // The record never landed; the stored blob must not outlive it
            self.discard_blob(project.cover_image.as_ref()).await;
            return Err(e.into());
        }

        tracing::info!("Created project: {} ({})", project.id, project.slug);

        Ok(project)
    }

    /// Fetch a project with its tags and resolved category
    ///
    /// Accepts the record id and falls back to slug lookup, since public
    /// show URLs address projects by slug.
    pub async fn retrieve(&self, id_or_slug: &str) -> ServiceResult<ProjectDetail> {
        let project = match self.storage.get_project(id_or_slug).await? {
            Some(project) => project,
            None => match self.storage.get_project_by_slug(id_or_slug).await? {
                Some(project) => project,
                None => return Err(ServiceError::NotFound(id_or_slug.to_string())),
            },
        };

        self.assemble_detail(project).await
    }

    /// Everything the edit form needs: the project plus the full option lists
    pub async fn prepare_edit(&self, id: &str) -> ServiceResult<EditFormData> {
        let project = self.retrieve(id).await?;

        Ok(EditFormData {
            project,
            categories: self.taxonomy.list_categories().await?,
            tags: self.taxonomy.list_tags().await?,
        })
    }

    /// Selectable options for the create form
    pub async fn form_options(&self) -> ServiceResult<FormOptions> {
        Ok(FormOptions {
            categories: self.taxonomy.list_categories().await?,
            tags: self.taxonomy.list_tags().await?,
        })
    }

    /// Update a project from validated form data
    ///
    /// The slug is re-derived from the submitted title and the tag set is
    /// replaced with exactly the submitted set (empty clears all). A new
    /// cover image supersedes the old blob: the new one is stored first and
    /// the old one removed only after the record transaction commits, so a
    /// failed update never loses the existing image.
    pub async fn update(&self, id: &str, input: ProjectInput) -> ServiceResult<Project> {
        self.check_references(&input).await?;

        let existing = match self.storage.get_project(id).await? {
            Some(project) => project,
            None => return Err(ServiceError::NotFound(id.to_string())),
        };

        let mut new_cover = None;
        if let Some(image) = &input.cover_image {
            tracing::debug!(
                "Storing replacement cover image '{}' ({:?})",
                image.filename,
                image.content_type
            );
            new_cover = Some(self.media.store(&image.filename, &image.bytes).await?);
        }

        let project = Project {
            id: existing.id.clone(),
            slug: slugify(&input.title),
            title: input.title,
            description: input.description,
            category_id: input.category_id,
            cover_image: new_cover.clone().or_else(|| existing.cover_image.clone()),
            created_at: existing.created_at.clone(),
            updated_at: Utc::now().to_rfc3339(),
        };

        match self.storage.update_project(&project, &input.tags).await {
            Ok(true) => {}
            Ok(false) => {
                // Row vanished between lookup and update
                self.discard_blob(new_cover.as_ref()).await;
                return Err(ServiceError::NotFound(id.to_string()));
            }
            Err(e) => {
                self.discard_blob(new_cover.as_ref()).await;
                return Err(e.into());
            }
        }

        if new_cover.is_some() {
            // The replacement is committed; drop the superseded blob
            self.discard_blob(existing.cover_image.as_ref()).await;
        }

        tracing::info!("Updated project: {} ({})", project.id, project.slug);

        Ok(project)
    }

    /// Delete a project, its tag associations, and its cover blob
    ///
    /// The record transaction runs first; the blob follows once the record
    /// is gone. Projects without a cover image perform no blob operation.
    pub async fn delete(&self, id: &str) -> ServiceResult<Project> {
        let deleted = match self.storage.delete_project(id).await? {
            Some(project) => project,
            None => return Err(ServiceError::NotFound(id.to_string())),
        };

        self.discard_blob(deleted.cover_image.as_ref()).await;

        tracing::info!("Deleted project: {} ({})", deleted.id, deleted.title);

        Ok(deleted)
    }

    /// Assemble the detail view for a project record
    async fn assemble_detail(&self, project: Project) -> ServiceResult<ProjectDetail> {
        let tags = self.storage.get_project_tags(&project.id).await?;
        let category = match &project.category_id {
            Some(category_id) => self.taxonomy.get_category(category_id).await?,
            None => None,
        };

        Ok(ProjectDetail {
            project,
            tags,
            category,
        })
    }

    /// Reject inputs referencing tags or categories that do not exist
    async fn check_references(&self, input: &ProjectInput) -> ServiceResult<()> {
        if !self.taxonomy.tags_exist(&input.tags).await? {
            return Err(ServiceError::InvalidInput(
                "Unknown tag id in tag set".to_string(),
            ));
        }

        if let Some(category_id) = &input.category_id {
            if self.taxonomy.get_category(category_id).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "Unknown category id: {}",
                    category_id
                )));
            }
        }

        Ok(())
    }

    /// Best-effort blob removal; failures are logged, never propagated
    async fn discard_blob(&self, key: Option<&String>) {
        if let Some(key) = key {
            if let Err(e) = self.media.delete(key).await {
                tracing::warn!("Failed to delete blob {}: {}", key, e);
            }
        }
    }
}
