use std::collections::HashMap;

use async_trait::async_trait;
use time::Date;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};
use crate::expenditures::repo_types::{Expenditure, ExpenditureChanges, NewExpenditure};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered: {0}")]
    Conflict(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence for users and their expenditures, keyed by normalized email.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn add_expenditure(&self, exp: NewExpenditure) -> Result<Expenditure, StoreError>;
    async fn list_expenditures(&self, email: &str) -> Result<Vec<Expenditure>, StoreError>;
    /// Update the most recently created expenditure of `email` on `date`.
    /// Returns `None` when there is none.
    async fn update_expenditure(
        &self,
        email: &str,
        date: Date,
        changes: ExpenditureChanges,
    ) -> Result<Option<Expenditure>, StoreError>;
}

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    expenditures: RwLock<Vec<Expenditure>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::Conflict(user.email));
        }
        let user = user.into_user();
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn add_expenditure(&self, exp: NewExpenditure) -> Result<Expenditure, StoreError> {
        let exp = exp.into_expenditure();
        self.expenditures.write().await.push(exp.clone());
        Ok(exp)
    }

    async fn list_expenditures(&self, email: &str) -> Result<Vec<Expenditure>, StoreError> {
        let mut rows: Vec<Expenditure> = self
            .expenditures
            .read()
            .await
            .iter()
            .filter(|e| e.email == email)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(rows)
    }

    async fn update_expenditure(
        &self,
        email: &str,
        date: Date,
        changes: ExpenditureChanges,
    ) -> Result<Option<Expenditure>, StoreError> {
        let mut all = self.expenditures.write().await;
        // Later pushes win ties on created_at.
        let target = all
            .iter_mut()
            .enumerate()
            .filter(|(_, e)| e.email == email && e.date == date)
            .max_by(|(ia, a), (ib, b)| a.created_at.cmp(&b.created_at).then(ia.cmp(ib)))
            .map(|(_, e)| e);
        Ok(target.map(|exp| {
            exp.apply(changes);
            exp.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    fn new_exp(email: &str, item_type: &str, date: Date) -> NewExpenditure {
        NewExpenditure {
            email: email.into(),
            item_type: item_type.into(),
            value: 200.0,
            annotation: "October purchase".into(),
            date,
        }
    }

    fn changes(date: Date) -> ExpenditureChanges {
        ExpenditureChanges {
            item_type: "Aluguel Atualizado".into(),
            value: 1600.0,
            annotation: "Ajuste de aluguel de outubro".into(),
            date,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("ana@domain.com")).await.unwrap();
        assert_eq!(
            store.find_user_by_id(user.id).await.unwrap().unwrap().email,
            "ana@domain.com"
        );
        let err = store.create_user(new_user("ana@domain.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_targets_owner_and_date() {
        let store = MemoryStore::new();
        let day = date!(2024 - 10 - 31);
        store.add_expenditure(new_exp("ana@domain.com", "Supermarket", day)).await.unwrap();
        store.add_expenditure(new_exp("bia@domain.com", "Supermarket", day)).await.unwrap();

        let updated = store
            .update_expenditure("ana@domain.com", day, changes(day))
            .await
            .unwrap()
            .expect("record on that date");
        assert_eq!(updated.item_type, "Aluguel Atualizado");
        assert_eq!(updated.value, 1600.0);

        let other = store.list_expenditures("bia@domain.com").await.unwrap();
        assert_eq!(other[0].item_type, "Supermarket");
    }

    #[tokio::test]
    async fn update_on_shared_date_picks_latest_record() {
        let store = MemoryStore::new();
        let day = date!(2024 - 10 - 31);
        store.add_expenditure(new_exp("ana@domain.com", "first", day)).await.unwrap();
        store.add_expenditure(new_exp("ana@domain.com", "second", day)).await.unwrap();

        store
            .update_expenditure("ana@domain.com", day, changes(day))
            .await
            .unwrap();

        let rows = store.list_expenditures("ana@domain.com").await.unwrap();
        let types: Vec<_> = rows.iter().map(|e| e.item_type.as_str()).collect();
        assert_eq!(types, ["first", "Aluguel Atualizado"]);
    }

    #[tokio::test]
    async fn update_without_match_returns_none() {
        let store = MemoryStore::new();
        let day = date!(2024 - 10 - 31);
        store.add_expenditure(new_exp("ana@domain.com", "Supermarket", day)).await.unwrap();
        let res = store
            .update_expenditure("ana@domain.com", date!(2024 - 11 - 01), changes(day))
            .await
            .unwrap();
        assert!(res.is_none());
    }
}
