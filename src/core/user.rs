//! User accounts - registration, lookup and credential checks.

use crate::{
    core::{password, required_text},
    entities::{User, user},
    errors::{Error, Result},
    store::Store,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Values needed to open an account
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Login email
    pub email: String,
    /// Plain-text password; only its salted digest is stored
    pub password: String,
    /// Given name
    pub name: String,
    /// Family name
    pub surname: String,
    /// Optional phone number
    pub phone: Option<String>,
}

/// Trims and lower-cases an email so lookups are case-insensitive.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Finds a user by email, ignoring case and surrounding whitespace.
pub async fn find_user_by_email(store: &Store, email: &str) -> Result<Option<user::Model>> {
    store
        .users()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(store.conn())
        .await
        .map_err(Into::into)
}

/// Retrieves a user by id.
pub async fn get_user_by_id(store: &Store, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id)
        .one(store.conn())
        .await
        .map_err(Into::into)
}

/// Opens a new account.
///
/// # Errors
/// Returns an error if:
/// - The email is empty or has no `@` (`Error::Validation`)
/// - The password is empty (`Error::Validation`)
/// - Another account already uses the email (`Error::EmailTaken`)
#[instrument(skip(store, new_user), fields(email = %new_user.email))]
pub async fn register_user(store: &Store, new_user: NewUser) -> Result<user::Model> {
    let email = normalize_email(&new_user.email);
    if email.is_empty() || !email.contains('@') {
        return Err(Error::validation("email must be a valid address"));
    }
    if new_user.password.is_empty() {
        return Err(Error::validation("password cannot be empty"));
    }
    let name = required_text("name", &new_user.name)?;

    if find_user_by_email(store, &email).await?.is_some() {
        return Err(Error::EmailTaken { email });
    }

    let model = user::ActiveModel {
        email: Set(email),
        password_hash: Set(password::hash_password(&new_user.password)),
        name: Set(name),
        surname: Set(new_user.surname.trim().to_string()),
        phone: Set(new_user.phone.filter(|p| !p.trim().is_empty())),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(store.conn())
    .await?;
    info!("Registered user {}", model.id);
    Ok(model)
}

/// Returns the user when the email exists and the password matches.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(
    store: &Store,
    email: &str,
    password: &str,
) -> Result<Option<user::Model>> {
    if email.trim().is_empty() || password.is_empty() {
        return Ok(None);
    }
    let Some(user) = find_user_by_email(store, email).await? else {
        debug!("Login attempt for unknown email");
        return Ok(None);
    };
    if password::verify_password(password, &user.password_hash) {
        Ok(Some(user))
    } else {
        debug!("Login attempt with wrong password for user {}", user.id);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn new_user(email: &str, password: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: password.to_string(),
            name: "Ann".to_string(),
            surname: "Lee".to_string(),
            phone: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn test_register_and_authenticate() -> Result<()> {
        let store = setup_test_store().await?;
        let user = register_user(&store, new_user("  Ann@Example.com ", "pw")).await?;
        assert_eq!(user.email, "ann@example.com");
        assert_eq!(user.phone, None);
        assert_ne!(user.password_hash, "pw");

        let found = authenticate(&store, "ANN@example.com", "pw").await?;
        assert_eq!(found.map(|u| u.id), Some(user.id));

        assert!(authenticate(&store, "ann@example.com", "wrong").await?.is_none());
        assert!(authenticate(&store, "nobody@example.com", "pw").await?.is_none());
        assert!(authenticate(&store, "", "").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_email_is_unique() -> Result<()> {
        let store = setup_test_store().await?;
        register_user(&store, new_user("a@b.com", "x")).await?;

        let result = register_user(&store, new_user("A@B.COM", "y")).await;
        assert!(matches!(result, Err(Error::EmailTaken { email }) if email == "a@b.com"));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_validation() -> Result<()> {
        let store = setup_test_store().await?;
        assert!(matches!(
            register_user(&store, new_user("not-an-email", "x")).await,
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            register_user(&store, new_user("a@b.com", "")).await,
            Err(Error::Validation { .. })
        ));
        Ok(())
    }
}
