/// SQLite persistence layer for projects, tags, and categories
///
/// Flat row storage with explicit association-table writes. Every
/// multi-step mutation (record + tag associations) runs inside a single
/// transaction so a half-written project can never be observed.

use crate::portfolio::types::{Category, Project, Tag};
use anyhow::Result;
use sqlx::{
    sqlite::{SqlitePool, SqliteRow},
    Row,
};
use uuid::Uuid;

/// SQLite-backed project storage
///
/// Owns schema initialization for the whole admin database and the CRUD
/// operations over projects and their tag associations.
#[derive(Debug, Clone)]
pub struct ProjectStorage {
    /// Connection pool for the admin database
    pool: SqlitePool,
}

impl ProjectStorage {
    /// Create new storage instance with database connection
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the admin database schema
    ///
    /// Safe to call multiple times (uses IF NOT EXISTS). The join table
    /// keeps FK cascades as a backstop, but the normal mutation paths
    /// delete associations explicitly inside their transactions.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tags (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category_id TEXT REFERENCES categories(id) ON DELETE SET NULL,
                cover_image TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS project_tags (
                project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                tag_id TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (project_id, tag_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Indexes for slug lookups and reverse tag queries
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_slug ON projects(slug)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_project_tags_tag ON project_tags(tag_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new project and its tag associations in one transaction
    pub async fn insert_project(&self, project: &Project, tag_ids: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO projects
                (id, title, slug, description, category_id, cover_image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.category_id)
        .bind(&project.cover_image)
        .bind(&project.created_at)
        .bind(&project.updated_at)
        .execute(&mut *tx)
        .await?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO project_tags (project_id, tag_id) VALUES (?, ?)")
                .bind(&project.id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Retrieve a project by id
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query(
            "SELECT id, title, slug, description, category_id, cover_image, created_at, updated_at \
             FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| project_from_row(&row)))
    }

    /// Retrieve a project by slug
    ///
    /// Slugs are not unique; collisions resolve to the most recently
    /// updated match.
    pub async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let row = sqlx::query(
            "SELECT id, title, slug, description, category_id, cover_image, created_at, updated_at \
             FROM projects WHERE slug = ? ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| project_from_row(&row)))
    }

    /// List all projects, most recently updated first
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(
            "SELECT id, title, slug, description, category_id, cover_image, created_at, updated_at \
             FROM projects ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(project_from_row).collect())
    }

    /// Tags currently associated with a project, ordered by name
    pub async fn get_project_tags(&self, project_id: &str) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name FROM tags t
            JOIN project_tags pt ON pt.tag_id = t.id
            WHERE pt.project_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Tag {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Update a project and destructively sync its tag set in one transaction
    ///
    /// The submitted tag set fully replaces the stored one; an empty set
    /// clears every association. Returns false when no such project exists.
    pub async fn update_project(&self, project: &Project, tag_ids: &[String]) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET title = ?, slug = ?, description = ?, category_id = ?, cover_image = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.category_id)
        .bind(&project.cover_image)
        .bind(&project.updated_at)
        .bind(&project.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM project_tags WHERE project_id = ?")
            .bind(&project.id)
            .execute(&mut *tx)
            .await?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO project_tags (project_id, tag_id) VALUES (?, ?)")
                .bind(&project.id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(true)
    }

    /// Delete a project and its tag associations in one transaction
    ///
    /// Returns the deleted record so the caller can clean up its cover
    /// blob, or None when no such project exists.
    pub async fn delete_project(&self, id: &str) -> Result<Option<Project>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, title, slug, description, category_id, cover_image, created_at, updated_at \
             FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let project = match row {
            Some(row) => project_from_row(&row),
            None => return Ok(None),
        };

        sqlx::query("DELETE FROM project_tags WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(project))
    }
}

/// Map a projects row onto the Project type
fn project_from_row(row: &SqliteRow) -> Project {
    Project {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        category_id: row.get("category_id"),
        cover_image: row.get("cover_image"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Storage for the tag and category lists the admin forms offer
///
/// Tags and categories are managed outside the project endpoints (seeded or
/// maintained by operator tooling); projects only reference them.
#[derive(Debug, Clone)]
pub struct TaxonomyStorage {
    pool: SqlitePool,
}

impl TaxonomyStorage {
    /// Create new storage instance with database connection
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tags ordered by name
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| Tag {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// List all categories ordered by name
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| Category {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Retrieve a single category by id
    pub async fn get_category(&self, id: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Category {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    /// Create a tag with a fresh id
    pub async fn create_tag(&self, name: &str) -> Result<Tag> {
        let tag = Tag {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };

        sqlx::query("INSERT INTO tags (id, name) VALUES (?, ?)")
            .bind(&tag.id)
            .bind(&tag.name)
            .execute(&self.pool)
            .await?;

        Ok(tag)
    }

    /// Create a category with a fresh id
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };

        sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
            .bind(&category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }

    /// Check that every id in the set names an existing tag
    pub async fn tags_exist(&self, tag_ids: &[String]) -> Result<bool> {
        for tag_id in tag_ids {
            let row = sqlx::query("SELECT 1 FROM tags WHERE id = ?")
                .bind(tag_id)
                .fetch_optional(&self.pool)
                .await?;
            if row.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
