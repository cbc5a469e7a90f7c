use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::Date;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};
use crate::expenditures::repo;
use crate::expenditures::repo_types::{Expenditure, ExpenditureChanges, NewExpenditure};
use crate::storage::{Store, StoreError};

/// Postgres-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        Ok(Self { db })
    }
}

fn backend(e: sqlx::Error, what: &'static str) -> StoreError {
    StoreError::Backend(anyhow::Error::new(e).context(what))
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = user.into_user();
        User::insert(&self.db, &user).await.map_err(|e| {
            let unique = e
                .as_database_error()
                .map(|d| d.is_unique_violation())
                .unwrap_or(false);
            if unique {
                StoreError::Conflict(user.email.clone())
            } else {
                backend(e, "insert user")
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        User::find_by_email(&self.db, email)
            .await
            .map_err(|e| backend(e, "find user by email"))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        User::find_by_id(&self.db, id)
            .await
            .map_err(|e| backend(e, "find user by id"))
    }

    async fn add_expenditure(&self, exp: NewExpenditure) -> Result<Expenditure, StoreError> {
        repo::insert(&self.db, &exp.into_expenditure())
            .await
            .map_err(|e| backend(e, "insert expenditure"))
    }

    async fn list_expenditures(&self, email: &str) -> Result<Vec<Expenditure>, StoreError> {
        repo::list_by_email(&self.db, email)
            .await
            .map_err(|e| backend(e, "list expenditures"))
    }

    async fn update_expenditure(
        &self,
        email: &str,
        date: Date,
        changes: ExpenditureChanges,
    ) -> Result<Option<Expenditure>, StoreError> {
        repo::update_on_date(&self.db, email, date, &changes)
            .await
            .map_err(|e| backend(e, "update expenditure"))
    }
}
