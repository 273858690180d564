use anyhow::Context;
use derive_builder::Builder;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub async fn connect(db_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("fail to open database {db_url}"))?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// In-memory database for tests. Kept to one connection: each sqlite
/// connection to `:memory:` opens a separate, empty database.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .context("fail to open in-memory database")?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(db_conn: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS review (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    reviewer      TEXT    NOT NULL,
    restaurant_id INTEGER NOT NULL,
    text          TEXT    NOT NULL CHECK (length(text) <= 2000),
    rating        INTEGER NOT NULL DEFAULT 1 CHECK (rating BETWEEN 1 AND 5),
    UNIQUE (reviewer, restaurant_id)
)"#,
    )
    .execute(db_conn)
    .await
    .context("fail to create review table")?;
    Ok(())
}

#[derive(Builder)]
pub struct NewReviewProps {
    #[builder(setter(into))]
    reviewer: String,
    restaurant_id: i64,
    #[builder(setter(into))]
    text: String,
    rating: u8,
}

/// Insert the review, or overwrite text and rating of the one this reviewer
/// already left for the restaurant.
pub async fn upsert_review(db_conn: &SqlitePool, prop: NewReviewProps) -> anyhow::Result<()> {
    let NewReviewProps {
        reviewer,
        restaurant_id,
        text,
        rating,
    } = prop;

    sqlx::query(
        r#"
INSERT INTO review
    (reviewer, restaurant_id, text, rating)
VALUES
    (?, ?, ?, ?)
ON CONFLICT (reviewer, restaurant_id) DO UPDATE SET
    text = excluded.text,
    rating = excluded.rating"#,
    )
    .bind(&reviewer)
    .bind(restaurant_id)
    .bind(text)
    .bind(i64::from(rating))
    .execute(db_conn)
    .await
    .with_context(|| format!("fail to save review of {reviewer} for {restaurant_id}"))?;

    tracing::info!("{reviewer} rated restaurant {restaurant_id} with {rating}");
    Ok(())
}

#[derive(Builder)]
pub struct GetReviewProps {
    #[builder(setter(into, strip_option), default)]
    restaurant_id: Option<i64>,
    #[builder(setter(into, strip_option), default)]
    reviewer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
pub struct Review {
    pub reviewer: String,
    pub restaurant_id: i64,
    pub text: String,
    pub rating: i64,
}

/// Reviews matching every given property, oldest first.
pub async fn get_reviews(db_conn: &SqlitePool, props: GetReviewProps) -> anyhow::Result<Vec<Review>> {
    let GetReviewProps {
        restaurant_id,
        reviewer,
    } = props;

    let rows = sqlx::query_as::<_, Review>(
        r#"
SELECT reviewer, restaurant_id, text, rating FROM review
WHERE (?1 IS NULL OR restaurant_id = ?1)
  AND (?2 IS NULL OR reviewer = ?2)
ORDER BY id"#,
    )
    .bind(restaurant_id)
    .bind(reviewer)
    .fetch_all(db_conn)
    .await
    .with_context(|| "fail to get reviews")?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(reviewer: &str, restaurant_id: i64, text: &str, rating: u8) -> NewReviewProps {
        NewReviewPropsBuilder::default()
            .reviewer(reviewer)
            .restaurant_id(restaurant_id)
            .text(text)
            .rating(rating)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_pair() {
        let db = connect_in_memory().await.unwrap();

        upsert_review(&db, review("avimitin", 16774318, "Decent crust", 3))
            .await
            .unwrap();
        upsert_review(&db, review("avimitin", 16774318, "Best in the village", 5))
            .await
            .unwrap();

        let reviews = get_reviews(
            &db,
            GetReviewPropsBuilder::default()
                .restaurant_id(16774318)
                .reviewer("avimitin")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, 5);
        assert_eq!(reviews[0].text, "Best in the village");
    }

    #[tokio::test]
    async fn test_reviews_are_scoped_by_restaurant() {
        let db = connect_in_memory().await.unwrap();

        upsert_review(&db, review("alice", 1, "Good", 4)).await.unwrap();
        upsert_review(&db, review("bob", 1, "Bad", 2)).await.unwrap();
        upsert_review(&db, review("alice", 2, "Fine", 3)).await.unwrap();

        let reviews = get_reviews(
            &db,
            GetReviewPropsBuilder::default()
                .restaurant_id(1)
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

        let reviewers: Vec<_> = reviews.iter().map(|r| r.reviewer.as_str()).collect();
        assert_eq!(reviewers, ["alice", "bob"]);

        let all = get_reviews(&db, GetReviewPropsBuilder::default().build().unwrap())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_schema_rejects_out_of_range_rating() {
        let db = connect_in_memory().await.unwrap();

        let result = upsert_review(&db, review("alice", 1, "Too good", 6)).await;
        assert!(result.is_err());
    }
}
