//! `POST /Authentication/TryLogin`

use super::error::AppError;
use crate::{
    core::{
        auth::{LOGIN_RESULT_HEADER, LoginResponse, LoginResult},
        user,
    },
    store::Store,
};
use axum::{
    Json,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

/// Fields of the login form
#[derive(Debug, Default)]
struct LoginFields {
    email: String,
    pass: String,
    remember: bool,
}

async fn read_fields(mut multipart: Multipart) -> Result<LoginFields, AppError> {
    let mut fields = LoginFields::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await?;
        match name.as_str() {
            "email" => fields.email = value,
            "pass" => fields.pass = value,
            "remember" => fields.remember = matches!(value.as_str(), "true" | "on" | "1"),
            _ => {}
        }
    }
    Ok(fields)
}

/// Checks the submitted credentials.
///
/// The outcome is reported in the `login_result` header and repeated in the
/// JSON body. Every rejection looks the same to the caller.
#[instrument(skip_all)]
pub async fn try_login(
    State(store): State<Store>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let fields = read_fields(multipart).await?;
    let result = match user::authenticate(&store, &fields.email, &fields.pass).await? {
        Some(user) => {
            info!("User {} logged in (remember: {})", user.id, fields.remember);
            LoginResult::Ok
        }
        None => LoginResult::Failed,
    };

    Ok((
        [(LOGIN_RESULT_HEADER, result.header_value())],
        Json(LoginResponse { result }),
    )
        .into_response())
}
