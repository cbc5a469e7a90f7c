use sqlx::PgPool;
use time::Date;

use crate::expenditures::repo_types::{Expenditure, ExpenditureChanges};

pub async fn insert(db: &PgPool, exp: &Expenditure) -> Result<Expenditure, sqlx::Error> {
    sqlx::query_as::<_, Expenditure>(
        r#"
        INSERT INTO expenditures (id, email, item_type, value, annotation, date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, email, item_type, value, annotation, date, created_at
        "#,
    )
    .bind(exp.id)
    .bind(&exp.email)
    .bind(&exp.item_type)
    .bind(exp.value)
    .bind(&exp.annotation)
    .bind(exp.date)
    .bind(exp.created_at)
    .fetch_one(db)
    .await
}

pub async fn list_by_email(db: &PgPool, email: &str) -> Result<Vec<Expenditure>, sqlx::Error> {
    sqlx::query_as::<_, Expenditure>(
        r#"
        SELECT id, email, item_type, value, annotation, date, created_at
        FROM expenditures
        WHERE email = $1
        ORDER BY date ASC, created_at ASC
        "#,
    )
    .bind(email)
    .fetch_all(db)
    .await
}

/// Update the most recently created expenditure of `email` on `date`.
pub async fn update_on_date(
    db: &PgPool,
    email: &str,
    date: Date,
    changes: &ExpenditureChanges,
) -> Result<Option<Expenditure>, sqlx::Error> {
    sqlx::query_as::<_, Expenditure>(
        r#"
        UPDATE expenditures
           SET item_type = $3, value = $4, annotation = $5, date = $6
         WHERE id = (
               SELECT id FROM expenditures
                WHERE email = $1 AND date = $2
                ORDER BY created_at DESC
                LIMIT 1
         )
        RETURNING id, email, item_type, value, annotation, date, created_at
        "#,
    )
    .bind(email)
    .bind(date)
    .bind(&changes.item_type)
    .bind(changes.value)
    .bind(&changes.annotation)
    .bind(changes.date)
    .fetch_optional(db)
    .await
}
