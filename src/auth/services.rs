use lazy_static::lazy_static;
use tracing::{debug, error};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{NewUser, User};
use crate::storage::{Store, StoreError};

/// Hash the password and persist the user. Inputs must already be validated.
pub async fn create_user(
    store: &dyn Store,
    name: String,
    email: String,
    password: &str,
) -> anyhow::Result<User> {
    let password_hash = hash_password(password)?;
    let user = store
        .create_user(NewUser {
            name,
            email,
            password_hash,
        })
        .await?;
    Ok(user)
}

lazy_static! {
    static ref DUMMY_HASH: Option<String> = hash_password("fintrack-unknown-user-0").ok();
}

/// Argon2 hash checked when the email is unknown, so that branch costs
/// the same as a wrong password.
pub(crate) fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH.as_deref()
}

/// Look the user up and check the password. `None` covers every
/// credential failure so callers cannot tell which part was wrong.
pub async fn authenticate_user(
    store: &dyn Store,
    email: &str,
    password: &str,
) -> Result<Option<User>, StoreError> {
    let Some(user) = store.find_user_by_email(email).await? else {
        debug!("login for unknown email");
        if let Some(hash) = dummy_hash() {
            let _ = verify_password(password, hash);
        }
        return Ok(None);
    };
    match verify_password(password, &user.password_hash) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => {
            debug!(user_id = %user.id, "login with wrong password");
            Ok(None)
        }
        Err(e) => {
            error!(error = %e, user_id = %user.id, "stored hash unreadable");
            Ok(None)
        }
    }
}
