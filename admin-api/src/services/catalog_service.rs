// Catalog service - videos, categories and creators CRUD
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::utils::slugify;

pub struct CatalogService {
    db: Database,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub creator_id: Option<Uuid>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: i32,
    pub is_premium: bool,
    pub is_published: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub position: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Creator {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVideo {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub creator_id: Option<Uuid>,
    #[validate(url)]
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub duration_seconds: i32,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub is_premium: Option<bool>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCreator {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCreator {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListVideosParams {
    pub page: u32,
    pub limit: u32,
    pub category_id: Option<Uuid>,
    pub published: Option<bool>,
    pub search: Option<String>,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ---- videos ----

    pub async fn list_videos(&self, params: ListVideosParams) -> Result<(Vec<Video>, i64)> {
        let offset = ((params.page - 1) * params.limit) as i64;
        let limit = params.limit as i64;

        let videos: Vec<Video> = sqlx::query_as(
            r#"
            SELECT *
            FROM videos
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::boolean IS NULL OR is_published = $2)
              AND ($3::text IS NULL OR title ILIKE '%' || $3 || '%')
            ORDER BY position, created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(params.category_id)
        .bind(params.published)
        .bind(&params.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db.pg)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM videos
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::boolean IS NULL OR is_published = $2)
              AND ($3::text IS NULL OR title ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(params.category_id)
        .bind(params.published)
        .bind(&params.search)
        .fetch_one(&self.db.pg)
        .await?;

        Ok((videos, total))
    }

    pub async fn get_video(&self, id: Uuid) -> Result<Video> {
        let video: Video = sqlx::query_as("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db.pg)
            .await?
            .ok_or(AppError::NotFound(format!("Video {} not found", id)))?;

        Ok(video)
    }

    pub async fn create_video(&self, payload: CreateVideo) -> Result<Video> {
        let video: Video = sqlx::query_as(
            r#"
            INSERT INTO videos (title, description, category_id, creator_id, video_url,
                                thumbnail_url, duration_seconds, is_premium, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.category_id)
        .bind(payload.creator_id)
        .bind(&payload.video_url)
        .bind(&payload.thumbnail_url)
        .bind(payload.duration_seconds)
        .bind(payload.is_premium)
        .bind(payload.position)
        .fetch_one(&self.db.pg)
        .await
        .map_err(reference_error)?;

        Ok(video)
    }

    pub async fn update_video(&self, id: Uuid, payload: UpdateVideo) -> Result<Video> {
        let video: Video = sqlx::query_as(
            r#"
            UPDATE videos SET
                title = COALESCE($2::text, title),
                description = COALESCE($3::text, description),
                category_id = COALESCE($4::uuid, category_id),
                creator_id = COALESCE($5::uuid, creator_id),
                video_url = COALESCE($6::text, video_url),
                thumbnail_url = COALESCE($7::text, thumbnail_url),
                duration_seconds = COALESCE($8::int, duration_seconds),
                is_premium = COALESCE($9::boolean, is_premium),
                position = COALESCE($10::int, position),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.category_id)
        .bind(payload.creator_id)
        .bind(&payload.video_url)
        .bind(&payload.thumbnail_url)
        .bind(payload.duration_seconds)
        .bind(payload.is_premium)
        .bind(payload.position)
        .fetch_optional(&self.db.pg)
        .await
        .map_err(reference_error)?
        .ok_or(AppError::NotFound(format!("Video {} not found", id)))?;

        Ok(video)
    }

    pub async fn set_video_published(&self, id: Uuid, published: bool) -> Result<Video> {
        let video: Video = sqlx::query_as(
            "UPDATE videos SET is_published = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(published)
        .fetch_optional(&self.db.pg)
        .await?
        .ok_or(AppError::NotFound(format!("Video {} not found", id)))?;

        Ok(video)
    }

    pub async fn delete_video(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.db.pg)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", id)));
        }

        Ok(())
    }

    // ---- categories ----

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories: Vec<Category> =
            sqlx::query_as("SELECT * FROM categories ORDER BY position, name")
                .fetch_all(&self.db.pg)
                .await?;

        Ok(categories)
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category> {
        let category: Category = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db.pg)
            .await?
            .ok_or(AppError::NotFound(format!("Category {} not found", id)))?;

        Ok(category)
    }

    pub async fn create_category(&self, payload: CreateCategory) -> Result<Category> {
        let slug = slugify(&payload.name);

        let category: Category = sqlx::query_as(
            "INSERT INTO categories (name, slug, position) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&payload.name)
        .bind(&slug)
        .bind(payload.position)
        .fetch_one(&self.db.pg)
        .await
        .map_err(|e| duplicate_error(e, &format!("Category slug '{}' already exists", slug)))?;

        Ok(category)
    }

    pub async fn update_category(&self, id: Uuid, payload: UpdateCategory) -> Result<Category> {
        let slug = payload.name.as_deref().map(slugify);

        let category: Category = sqlx::query_as(
            r#"
            UPDATE categories SET
                name = COALESCE($2::text, name),
                slug = COALESCE($3::text, slug),
                position = COALESCE($4::int, position),
                is_active = COALESCE($5::boolean, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&slug)
        .bind(payload.position)
        .bind(payload.is_active)
        .fetch_optional(&self.db.pg)
        .await
        .map_err(|e| duplicate_error(e, "Category slug already exists"))?
        .ok_or(AppError::NotFound(format!("Category {} not found", id)))?;

        Ok(category)
    }

    /// Delete a category. Refused while videos still reference it.
    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        let in_use: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE category_id = $1")
            .bind(id)
            .fetch_one(&self.db.pg)
            .await?;

        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Category has {} videos; move them first",
                in_use
            )));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.db.pg)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        Ok(())
    }

    // ---- creators ----

    pub async fn list_creators(&self) -> Result<Vec<Creator>> {
        let creators: Vec<Creator> = sqlx::query_as("SELECT * FROM creators ORDER BY name")
            .fetch_all(&self.db.pg)
            .await?;

        Ok(creators)
    }

    pub async fn get_creator(&self, id: Uuid) -> Result<Creator> {
        let creator: Creator = sqlx::query_as("SELECT * FROM creators WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db.pg)
            .await?
            .ok_or(AppError::NotFound(format!("Creator {} not found", id)))?;

        Ok(creator)
    }

    pub async fn create_creator(&self, payload: CreateCreator) -> Result<Creator> {
        let creator: Creator = sqlx::query_as(
            "INSERT INTO creators (name, bio, image_url) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&payload.name)
        .bind(&payload.bio)
        .bind(&payload.image_url)
        .fetch_one(&self.db.pg)
        .await?;

        Ok(creator)
    }

    pub async fn update_creator(&self, id: Uuid, payload: UpdateCreator) -> Result<Creator> {
        let creator: Creator = sqlx::query_as(
            r#"
            UPDATE creators SET
                name = COALESCE($2::text, name),
                bio = COALESCE($3::text, bio),
                image_url = COALESCE($4::text, image_url),
                is_active = COALESCE($5::boolean, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.bio)
        .bind(&payload.image_url)
        .bind(payload.is_active)
        .fetch_optional(&self.db.pg)
        .await?
        .ok_or(AppError::NotFound(format!("Creator {} not found", id)))?;

        Ok(creator)
    }

    /// Delete a creator. Their videos stay, with the creator link cleared.
    pub async fn delete_creator(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE videos SET creator_id = NULL WHERE creator_id = $1")
            .bind(id)
            .execute(&self.db.pg)
            .await?;

        let result = sqlx::query("DELETE FROM creators WHERE id = $1")
            .bind(id)
            .execute(&self.db.pg)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Creator {} not found", id)));
        }

        Ok(())
    }
}

fn reference_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::BadRequest("Unknown category or creator".to_string())
        }
        _ => AppError::from(e),
    }
}

fn duplicate_error(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::from(e),
    }
}
