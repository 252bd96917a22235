//! HTTP API for Postbook.
//!
//! Maps the account and post operations of [`postbook_store::Blog`] onto
//! REST routes, decodes query strings into store filters, and translates
//! store errors into status codes (not-found kinds to 404, validation and
//! decode failures to 400).

pub mod config;
pub mod error;
pub mod handler;
pub mod params;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::PostbookServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use postbook_store::Blog;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> Router {
        router::build_router(AppState::new(Blog::in_memory(), ServerConfig::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn add_user(app: &Router, name: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/user",
            Some(json!({ "name": name, "phonenumber": "555-0100" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn add_post(app: &Router, subject: &str, author: u64) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/post",
            Some(json!({ "subject": subject, "body": "text", "author": author })),
        )
        .await
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (status, body) = send(&app(), Method::GET, "/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "postbook-server");
    }

    #[tokio::test]
    async fn create_and_fetch_account() {
        let app = app();
        let created = add_user(&app, "Alice").await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["post_count"], 0);
        assert!(created["updated_at"].is_null());
        assert!(created["created_at"].is_string());

        let (status, fetched) = send(&app, Method::GET, "/user/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_account_without_name_is_400() {
        let (status, body) =
            send(&app(), Method::POST, "/user", Some(json!({ "phonenumber": "1" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/user")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_path_id_is_400() {
        let (status, _) = send(&app(), Method::GET, "/user/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_account_partially() {
        let app = app();
        add_user(&app, "Alice").await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/user/1",
            Some(json!({ "phonenumber": "555-0199" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Alice");
        assert_eq!(body["phonenumber"], "555-0199");
        assert!(body["updated_at"].is_string());
    }

    #[tokio::test]
    async fn update_missing_account_is_404() {
        let (status, _) = send(
            &app(),
            Method::PATCH,
            "/user/42",
            Some(json!({ "name": "Ghost" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_account_is_idempotent_and_keeps_posts() {
        let app = app();
        add_user(&app, "Alice").await;
        let (status, _) = add_post(&app, "Hello", 1).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::DELETE, "/user/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);

        let (status, body) = send(&app, Method::DELETE, "/user/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], false);

        let (status, _) = send(&app, Method::GET, "/user/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::GET, "/post/1", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn list_accounts_filters_and_sorts() {
        let app = app();
        for name in ["Alice", "Bob", "Carol"] {
            add_user(&app, name).await;
        }
        add_post(&app, "b1", 2).await;
        add_post(&app, "b2", 2).await;
        add_post(&app, "c1", 3).await;

        let (status, body) = send(&app, Method::GET, "/users?topPostsAmount=desc", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Bob", "Carol", "Alice"]);

        let (_, body) = send(&app, Method::GET, "/users?name=Bob,Dave", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Bob");

        let (_, body) = send(&app, Method::GET, "/users?sort=asc&offset=1&limit=1", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Carol");

        let (status, body) = send(&app, Method::GET, "/users?offset=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_accounts_rejects_bad_params() {
        let app = app();
        for uri in [
            "/users?sort=sideways",
            "/users?limit=-3",
            "/users?fromCreatedAt=last-week",
        ] {
            let (status, _) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn list_accounts_by_creation_date() {
        let app = app();
        add_user(&app, "Alice").await;
        let (_, body) = send(&app, Method::GET, "/users?from=2000-01-01&to=2999-12-31", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        let (_, body) = send(&app, Method::GET, "/users?toCreatedAt=2000-01-01", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_post_validates_author() {
        let app = app();
        let (status, _) = add_post(&app, "Hello", 1).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        add_user(&app, "Alice").await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/post",
            Some(json!({ "subject": "Hello", "author": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/post",
            Some(json!({ "subject": "", "author": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn post_lifecycle_tracks_author_count() {
        let app = app();
        add_user(&app, "Alice").await;
        let (status, post) = add_post(&app, "Hello", 1).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(post["id"], 1);
        assert_eq!(post["author"], 1);

        let (_, alice) = send(&app, Method::GET, "/user/1", None).await;
        assert_eq!(alice["post_count"], 1);

        let (status, updated) = send(
            &app,
            Method::PATCH,
            "/post/1",
            Some(json!({ "subject": "Hello again" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["subject"], "Hello again");
        assert_eq!(updated["body"], "text");

        let (status, _) = send(&app, Method::DELETE, "/post/1", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, alice) = send(&app, Method::GET, "/user/1", None).await;
        assert_eq!(alice["post_count"], 0);

        let (status, _) = send(&app, Method::PATCH, "/post/1", Some(json!({ "body": "x" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_posts_filters() {
        let app = app();
        add_user(&app, "Alice").await;
        add_user(&app, "Bob").await;
        add_post(&app, "rust news", 1).await;
        add_post(&app, "go news", 2).await;
        add_post(&app, "rust tips", 2).await;

        let (status, body) = send(&app, Method::GET, "/posts?subject=rust&author=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["subject"], "rust tips");

        let (_, body) = send(&app, Method::GET, "/posts?author=1,2&limit=2", None).await;
        let ids: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);

        let (status, _) = send(&app, Method::GET, "/posts?author=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
