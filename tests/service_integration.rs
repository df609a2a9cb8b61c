//! Integration tests for the project service
//!
//! These tests run the full stack below the HTTP layer: a real SQLite
//! pool, a temp-dir media store, and the service coordination between
//! them, covering:
//! - Slug derivation on create and update
//! - Destructive tag-set sync
//! - Cover-image blob lifecycle (replace, delete, failure compensation)
//! - NotFound and referential-validation errors

use showfolio::media::MediaStore;
use showfolio::portfolio::service::{ProjectService, ServiceError};
use showfolio::portfolio::storage::{ProjectStorage, TaxonomyStorage};
use showfolio::portfolio::types::{ProjectInput, UploadedImage};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tempfile::TempDir;

/// Everything a test needs to drive the service and inspect its backends
struct TestEnv {
    _temp_dir: TempDir,
    service: ProjectService,
    media: MediaStore,
    taxonomy: TaxonomyStorage,
    pool: SqlitePool,
}

/// Helper to build a service over a fresh database and media directory
async fn create_test_env() -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(options).await.unwrap();

    let storage = ProjectStorage::new(pool.clone());
    storage.init_schema().await.unwrap();
    let taxonomy = TaxonomyStorage::new(pool.clone());
    let media = MediaStore::new(temp_dir.path().join("media"));

    let service = ProjectService::new(storage, taxonomy.clone(), media.clone());

    TestEnv {
        _temp_dir: temp_dir,
        service,
        media,
        taxonomy,
        pool,
    }
}

fn input(title: &str) -> ProjectInput {
    ProjectInput {
        title: title.to_string(),
        description: "A test project".to_string(),
        ..Default::default()
    }
}

fn png_upload(name: &str) -> UploadedImage {
    UploadedImage {
        filename: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

#[tokio::test]
async fn create_derives_slug_from_title() {
    let env = create_test_env().await;

    let project = env.service.create(input("Hello World")).await.unwrap();
    assert_eq!(project.slug, "hello-world");

    // Retrievable by id and by slug
    let by_id = env.service.retrieve(&project.id).await.unwrap();
    assert_eq!(by_id.project.title, "Hello World");

    let by_slug = env.service.retrieve("hello-world").await.unwrap();
    assert_eq!(by_slug.project.id, project.id);
}

#[tokio::test]
async fn update_rederives_slug_from_new_title() {
    let env = create_test_env().await;

    let project = env.service.create(input("First Title")).await.unwrap();
    assert_eq!(project.slug, "first-title");

    let updated = env
        .service
        .update(&project.id, input("Second Title"))
        .await
        .unwrap();
    assert_eq!(updated.slug, "second-title");
    assert_eq!(updated.created_at, project.created_at);
}

#[tokio::test]
async fn create_with_tags_establishes_associations() {
    let env = create_test_env().await;

    let rust = env.taxonomy.create_tag("rust").await.unwrap();
    let web = env.taxonomy.create_tag("web").await.unwrap();

    let mut form = input("Tagged Project");
    form.tags = vec![rust.id.clone(), web.id.clone()];
    let project = env.service.create(form).await.unwrap();

    let detail = env.service.retrieve(&project.id).await.unwrap();
    let mut names: Vec<String> = detail.tags.iter().map(|t| t.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["rust", "web"]);
}

#[tokio::test]
async fn update_with_empty_tag_set_clears_associations() {
    let env = create_test_env().await;

    let tag = env.taxonomy.create_tag("rust").await.unwrap();
    let mut form = input("Tagged Project");
    form.tags = vec![tag.id.clone()];
    let project = env.service.create(form).await.unwrap();

    // Empty submission clears everything
    env.service
        .update(&project.id, input("Tagged Project"))
        .await
        .unwrap();

    let detail = env.service.retrieve(&project.id).await.unwrap();
    assert!(detail.tags.is_empty());
}

#[tokio::test]
async fn tag_sync_replaces_never_merges() {
    let env = create_test_env().await;

    let a = env.taxonomy.create_tag("a").await.unwrap();
    let b = env.taxonomy.create_tag("b").await.unwrap();
    let c = env.taxonomy.create_tag("c").await.unwrap();

    let mut form = input("Project");
    form.tags = vec![a.id.clone(), b.id.clone()];
    let project = env.service.create(form).await.unwrap();

    let mut resubmit = input("Project");
    resubmit.tags = vec![b.id.clone(), c.id.clone()];
    env.service.update(&project.id, resubmit).await.unwrap();

    let detail = env.service.retrieve(&project.id).await.unwrap();
    let mut names: Vec<String> = detail.tags.iter().map(|t| t.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["b", "c"]);
}

#[tokio::test]
async fn update_with_new_cover_replaces_blob() {
    let env = create_test_env().await;

    let mut form = input("Illustrated");
    form.cover_image = Some(png_upload("first.png"));
    let project = env.service.create(form).await.unwrap();

    let old_key = project.cover_image.clone().unwrap();
    assert!(env.media.exists(&old_key).await);

    let mut resubmit = input("Illustrated");
    resubmit.cover_image = Some(png_upload("second.png"));
    let updated = env.service.update(&project.id, resubmit).await.unwrap();

    let new_key = updated.cover_image.clone().unwrap();
    assert_ne!(new_key, old_key);
    assert!(env.media.exists(&new_key).await);
    assert!(!env.media.exists(&old_key).await);
}

#[tokio::test]
async fn update_without_cover_keeps_existing_blob() {
    let env = create_test_env().await;

    let mut form = input("Illustrated");
    form.cover_image = Some(png_upload("cover.png"));
    let project = env.service.create(form).await.unwrap();
    let key = project.cover_image.clone().unwrap();

    let updated = env
        .service
        .update(&project.id, input("Illustrated Again"))
        .await
        .unwrap();

    assert_eq!(updated.cover_image.as_deref(), Some(key.as_str()));
    assert!(env.media.exists(&key).await);
}

#[tokio::test]
async fn delete_removes_blob_when_present() {
    let env = create_test_env().await;

    let mut form = input("Illustrated");
    form.cover_image = Some(png_upload("cover.png"));
    let project = env.service.create(form).await.unwrap();
    let key = project.cover_image.clone().unwrap();

    env.service.delete(&project.id).await.unwrap();

    assert!(!env.media.exists(&key).await);
    let err = env.service.retrieve(&project.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn delete_without_blob_still_removes_record() {
    let env = create_test_env().await;

    let project = env.service.create(input("Plain")).await.unwrap();
    assert!(project.cover_image.is_none());

    env.service.delete(&project.id).await.unwrap();

    let err = env.service.retrieve(&project.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn retrieve_unknown_id_is_not_found() {
    let env = create_test_env().await;

    let err = env.service.retrieve("no-such-project").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn update_and_delete_of_unknown_id_are_not_found() {
    let env = create_test_env().await;

    let err = env
        .service
        .update("missing", input("Anything"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = env.service.delete("missing").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn unknown_tag_reference_is_rejected() {
    let env = create_test_env().await;

    let mut form = input("Project");
    form.tags = vec!["not-a-tag".to_string()];
    let err = env.service.create(form).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn unknown_category_reference_is_rejected() {
    let env = create_test_env().await;

    let mut form = input("Project");
    form.category_id = Some("not-a-category".to_string());
    let err = env.service.create(form).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn detail_resolves_category() {
    let env = create_test_env().await;

    let category = env.taxonomy.create_category("Web Apps").await.unwrap();
    let mut form = input("Categorized");
    form.category_id = Some(category.id.clone());
    let project = env.service.create(form).await.unwrap();

    let detail = env.service.retrieve(&project.id).await.unwrap();
    assert_eq!(detail.category.unwrap().name, "Web Apps");
}

#[tokio::test]
async fn edit_form_carries_full_option_lists() {
    let env = create_test_env().await;

    env.taxonomy.create_category("Web Apps").await.unwrap();
    env.taxonomy.create_category("CLI Tools").await.unwrap();
    env.taxonomy.create_tag("rust").await.unwrap();

    let project = env.service.create(input("Editable")).await.unwrap();

    let form = env.service.prepare_edit(&project.id).await.unwrap();
    assert_eq!(form.project.project.id, project.id);
    assert_eq!(form.categories.len(), 2);
    assert_eq!(form.tags.len(), 1);

    let options = env.service.form_options().await.unwrap();
    assert_eq!(options.categories.len(), 2);
    assert_eq!(options.tags.len(), 1);
}

#[tokio::test]
async fn list_returns_every_project() {
    let env = create_test_env().await;

    env.service.create(input("One")).await.unwrap();
    env.service.create(input("Two")).await.unwrap();
    env.service.create(input("Three")).await.unwrap();

    let projects = env.service.list().await.unwrap();
    assert_eq!(projects.len(), 3);
}

#[tokio::test]
async fn failed_create_leaves_no_orphan_blob() {
    let env = create_test_env().await;
    let tag = env.taxonomy.create_tag("rust").await.unwrap();

    // Break the association insert so the record transaction fails after
    // the blob was already stored
    sqlx::query("DROP TABLE project_tags")
        .execute(&env.pool)
        .await
        .unwrap();

    let mut form = input("Doomed");
    form.tags = vec![tag.id.clone()];
    form.cover_image = Some(png_upload("cover.png"));
    let err = env.service.create(form).await.unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));

    // No record landed
    let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM projects")
        .fetch_one(&env.pool)
        .await
        .unwrap()
        .get("count");
    assert_eq!(count, 0);

    // And the compensating cleanup removed the stored blob
    let image_dir = env._temp_dir.path().join("media").join("project_images");
    let leftovers = match std::fs::read_dir(&image_dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    };
    assert_eq!(leftovers, 0);
}
