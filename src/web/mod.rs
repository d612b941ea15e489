//! HTTP surface - axum router over a shared [`Store`].

pub mod admin;
pub mod auth;
pub mod error;

pub use error::AppError;

use crate::{core::auth::LOGIN_PATH, errors::Result, store::Store};
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::info;

/// Builds the application router.
pub fn router(store: Store) -> Router {
    Router::new()
        .route(LOGIN_PATH, post(auth::try_login))
        .route("/admin/{entity}", post(admin::create))
        .route("/admin/{entity}/form", get(admin::create_form))
        .route(
            "/admin/{entity}/{id}",
            post(admin::update).delete(admin::delete),
        )
        .route("/admin/{entity}/{id}/form", get(admin::edit_form))
        .with_state(store)
}

/// Binds `bind_address` and serves until the process is stopped.
pub async fn serve(store: Store, bind_address: &str) -> Result<()> {
    let listener = TcpListener::bind(bind_address).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(store)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::client::{LoginForm, LoginPanel, Navigation};
    use crate::core::auth::{INVALID_CREDENTIALS, LOGIN_RESULT_HEADER};
    use crate::core::product;
    use crate::test_utils::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, Response, StatusCode, header},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(store: &Store, request: Request<Body>) -> Response<Body> {
        router(store.clone()).oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn login_request(panel: &mut LoginPanel, email: &str, pass: &str) -> Request<Body> {
        let request = panel.submit(&LoginForm {
            email: email.to_string(),
            pass: pass.to_string(),
            remember: true,
        });
        Request::post(request.path)
            .header(header::CONTENT_TYPE, request.content_type())
            .body(Body::from(request.body))
            .unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn login_header(response: &Response<Body>) -> Option<&str> {
        response
            .headers()
            .get(LOGIN_RESULT_HEADER)
            .and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials() -> Result<()> {
        init_test_tracing();
        let store = setup_test_store().await?;
        create_test_user(&store, "ann@example.com").await?;

        let mut panel = LoginPanel::default();
        let response = send(&store, login_request(&mut panel, "ann@example.com", "secret")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(login_header(&response), Some("ok"));
        assert_eq!(panel.receive(login_header(&response)), Navigation::To("/Account"));

        let body = json_body(response).await;
        assert_eq!(body["result"], "ok");
        Ok(())
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() -> Result<()> {
        let store = setup_test_store().await?;
        create_test_user(&store, "ann@example.com").await?;

        let mut panel = LoginPanel::default();
        let response = send(&store, login_request(&mut panel, "ann@example.com", "wrong")).await;
        assert_eq!(login_header(&response), Some("failed"));
        assert_eq!(panel.receive(login_header(&response)), Navigation::Stay);
        assert_eq!(panel.errors(), [INVALID_CREDENTIALS]);

        let body = json_body(response).await;
        assert_eq!(body["result"], "failed");
        Ok(())
    }

    #[tokio::test]
    async fn test_login_with_empty_fields_is_uniform_failure() -> Result<()> {
        let store = setup_test_store().await?;
        let mut panel = LoginPanel::default();
        let response = send(&store, login_request(&mut panel, "", "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(login_header(&response), Some("failed"));
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_create_and_edit_product() -> Result<()> {
        let store = setup_test_store().await?;
        let category = create_test_category(&store, "Laptops").await?;

        let response = send(
            &store,
            form_post(
                "/admin/product",
                &format!("name=Laptop&cost=900&description=Fast&category={}", category.id),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_i64().unwrap();

        let response = send(
            &store,
            form_post(&format!("/admin/product/{id}"), "name=Ultrabook&cost=950"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let stored = product::get_product_by_id(&store, id).await?.unwrap();
        assert_eq!(stored.name, "Ultrabook");
        assert_eq!(stored.category_id, Some(category.id));

        let request = Request::get(format!("/admin/product/{id}/form"))
            .body(Body::empty())
            .unwrap();
        let response = send(&store, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let schema = json_body(response).await;
        assert_eq!(schema["id"], id);
        assert_eq!(schema["fields"][0]["name"], "name");
        assert_eq!(schema["fields"][0]["value"][0], "Ultrabook");
        assert_eq!(schema["fields"][3]["input"]["type"], "select");
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_errors_map_to_statuses() -> Result<()> {
        let store = setup_test_store().await?;

        let request = Request::get("/admin/user/form").body(Body::empty()).unwrap();
        assert_eq!(send(&store, request).await.status(), StatusCode::NOT_FOUND);

        let response = send(&store, form_post("/admin/product", "name=Laptop&cost=1&category=7")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&store, form_post("/admin/product", "name=Laptop&cost=lots")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let request = Request::delete("/admin/category/5").body(Body::empty()).unwrap();
        assert_eq!(send(&store, request).await.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_delete_of_purchased_product_is_unprocessable() -> Result<()> {
        let (store, user, product) = setup_with_user_and_product().await?;
        let mut cart = crate::core::cart::Cart::default();
        cart.add(product.id);
        crate::core::cart::checkout(&store, user.id, &mut cart).await?;

        let request = Request::delete(format!("/admin/product/{}", product.id))
            .body(Body::empty())
            .unwrap();
        let response = send(&store, request).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(product::get_product_by_id(&store, product.id).await?.is_some());
        Ok(())
    }
}
