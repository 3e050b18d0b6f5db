//! SQLite saved gift repository.
//!
//! Stores a full snapshot of the gift record next to the owner so the
//! dashboard never depends on the search result still being available.

use giftafy_core::repository::saved_gift::SavedGiftRepository;
use giftafy_types::account::UserId;
use giftafy_types::error::RepositoryError;
use giftafy_types::gift::{GiftRecord, SavedGift, SavedGiftId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

#[derive(Clone)]
pub struct SqliteSavedGiftRepository {
    pool: DatabasePool,
}

impl SqliteSavedGiftRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SavedGiftRow {
    id: String,
    user_id: String,
    title: String,
    price: String,
    original_price: Option<String>,
    images: String,
    rating: f64,
    reviews: i64,
    retailer: String,
    url: String,
    ai_recommendation: String,
    match_score: i64,
    is_trending: bool,
    sales: i64,
    is_favorite: bool,
    created_at: String,
}

impl SavedGiftRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            price: row.try_get("price")?,
            original_price: row.try_get("original_price")?,
            images: row.try_get("images")?,
            rating: row.try_get("rating")?,
            reviews: row.try_get("reviews")?,
            retailer: row.try_get("retailer")?,
            url: row.try_get("url")?,
            ai_recommendation: row.try_get("ai_recommendation")?,
            match_score: row.try_get("match_score")?,
            is_trending: row.try_get("is_trending")?,
            sales: row.try_get("sales")?,
            is_favorite: row.try_get("is_favorite")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_saved_gift(self) -> Result<SavedGift, RepositoryError> {
        let id = self
            .id
            .parse::<SavedGiftId>()
            .map_err(|e| RepositoryError::Query(format!("invalid saved gift id: {e}")))?;
        let user_id = self
            .user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let images: Vec<String> = serde_json::from_str(&self.images)
            .map_err(|e| RepositoryError::Query(format!("invalid images JSON: {e}")))?;

        Ok(SavedGift {
            id,
            user_id,
            gift: GiftRecord {
                title: self.title,
                price: self.price,
                original_price: self.original_price,
                images,
                rating: self.rating,
                reviews: u32::try_from(self.reviews).unwrap_or(0),
                retailer: self.retailer,
                url: self.url,
                ai_recommendation: self.ai_recommendation,
                match_score: u8::try_from(self.match_score).unwrap_or(0),
                is_trending: self.is_trending,
                sales: u32::try_from(self.sales).unwrap_or(0),
            },
            is_favorite: self.is_favorite,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl SavedGiftRepository for SqliteSavedGiftRepository {
    async fn create(&self, saved: &SavedGift) -> Result<SavedGift, RepositoryError> {
        let images_json = serde_json::to_string(&saved.gift.images)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let gift = &saved.gift;

        sqlx::query(
            "INSERT INTO saved_gifts (id, user_id, title, price, original_price, images, rating, reviews, retailer, url, ai_recommendation, match_score, is_trending, sales, is_favorite, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(saved.id.to_string())
        .bind(saved.user_id.to_string())
        .bind(&gift.title)
        .bind(&gift.price)
        .bind(&gift.original_price)
        .bind(&images_json)
        .bind(gift.rating)
        .bind(i64::from(gift.reviews))
        .bind(&gift.retailer)
        .bind(&gift.url)
        .bind(&gift.ai_recommendation)
        .bind(i64::from(gift.match_score))
        .bind(gift.is_trending)
        .bind(i64::from(gift.sales))
        .bind(saved.is_favorite)
        .bind(format_datetime(&saved.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(saved.clone())
    }

    async fn get(&self, id: &SavedGiftId) -> Result<Option<SavedGift>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM saved_gifts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let gift_row = SavedGiftRow::from_row(&row).map_err(query_error)?;
                Ok(Some(gift_row.into_saved_gift()?))
            }
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<SavedGift>, RepositoryError> {
        // UUIDv7 ids break ties between gifts saved within the same instant.
        let rows = sqlx::query(
            "SELECT * FROM saved_gifts WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut gifts = Vec::with_capacity(rows.len());
        for row in &rows {
            let gift_row = SavedGiftRow::from_row(row).map_err(query_error)?;
            gifts.push(gift_row.into_saved_gift()?);
        }
        Ok(gifts)
    }

    async fn set_favorite(&self, id: &SavedGiftId, is_favorite: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE saved_gifts SET is_favorite = ? WHERE id = ?")
            .bind(is_favorite)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &SavedGiftId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM saved_gifts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
