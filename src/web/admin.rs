//! Admin endpoints under `/admin/{entity}`.

use super::error::AppError;
use crate::{
    admin::{AdminEntity, FormSchema, FormValues},
    store::Store,
};
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

/// Body returned after a create
#[derive(Debug, Serialize)]
pub struct Created {
    /// Id of the new row
    pub id: i64,
}

/// `GET /admin/{entity}/form`
pub async fn create_form(
    State(store): State<Store>,
    Path(entity): Path<String>,
) -> Result<Json<FormSchema>, AppError> {
    let kind: AdminEntity = entity.parse()?;
    Ok(Json(kind.schema(&store, None).await?))
}

/// `GET /admin/{entity}/{id}/form`
pub async fn edit_form(
    State(store): State<Store>,
    Path((entity, id)): Path<(String, i64)>,
) -> Result<Json<FormSchema>, AppError> {
    let kind: AdminEntity = entity.parse()?;
    Ok(Json(kind.schema(&store, Some(id)).await?))
}

/// `POST /admin/{entity}`
pub async fn create(
    State(store): State<Store>,
    Path(entity): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let kind: AdminEntity = entity.parse()?;
    let id = kind.create(&store, &FormValues::from_pairs(pairs)).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// `POST /admin/{entity}/{id}`
pub async fn update(
    State(store): State<Store>,
    Path((entity, id)): Path<(String, i64)>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<StatusCode, AppError> {
    let kind: AdminEntity = entity.parse()?;
    kind.update(&store, id, &FormValues::from_pairs(pairs)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /admin/{entity}/{id}`
pub async fn delete(
    State(store): State<Store>,
    Path((entity, id)): Path<(String, i64)>,
) -> Result<StatusCode, AppError> {
    let kind: AdminEntity = entity.parse()?;
    kind.delete(&store, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
