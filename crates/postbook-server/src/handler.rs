//! Route handlers. Each one decodes its input, calls the [`Blog`] and maps
//! the outcome to a status code.
//!
//! [`Blog`]: postbook_store::Blog

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use postbook_store::{
    Account, AccountId, AccountPatch, NewAccount, NewPost, Post, PostId, PostPatch,
};
use serde_json::{json, Value};

use crate::error::ServerResult;
use crate::params::{AccountListParams, PostAddRequest, PostListParams};
use crate::state::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<Value> {
    Json(json!({
        "name": "postbook-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// GET /users - List accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    params: Result<Query<AccountListParams>, QueryRejection>,
) -> ServerResult<Json<Vec<Account>>> {
    let Query(params) = params?;
    let filter = params.into_filter(&state.config)?;
    Ok(Json(state.blog.list_accounts(&filter)?))
}

/// POST /user - Create an account
pub async fn create_account(
    State(state): State<AppState>,
    body: Result<Json<NewAccount>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Account>)> {
    let Json(req) = body?;
    let account = state.blog.create_account(req)?;
    tracing::info!(id = %account.id, "account created");
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /user/:id - Fetch one account
pub async fn get_account(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ServerResult<Json<Account>> {
    let Path(id) = id?;
    Ok(Json(state.blog.find_account(AccountId::new(id))?))
}

/// PATCH /user/:id - Change the name and/or contact number
pub async fn update_account(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<AccountPatch>, JsonRejection>,
) -> ServerResult<Json<Account>> {
    let Path(id) = id?;
    let Json(patch) = body?;
    Ok(Json(state.blog.update_account(AccountId::new(id), &patch)?))
}

/// DELETE /user/:id - Remove an account (posts are kept)
pub async fn delete_account(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ServerResult<Json<Value>> {
    let Path(id) = id?;
    let deleted = state.blog.delete_account(AccountId::new(id))?;
    Ok(Json(json!({ "deleted": deleted })))
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// GET /posts - List posts
pub async fn list_posts(
    State(state): State<AppState>,
    params: Result<Query<PostListParams>, QueryRejection>,
) -> ServerResult<Json<Vec<Post>>> {
    let Query(params) = params?;
    let filter = params.into_filter(&state.config)?;
    Ok(Json(state.blog.list_posts(&filter)?))
}

/// POST /post - Create a post for an existing author
pub async fn create_post(
    State(state): State<AppState>,
    body: Result<Json<PostAddRequest>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Post>)> {
    let Json(req) = body?;
    let post = state.blog.add_post(NewPost::try_from(req)?)?;
    tracing::info!(id = %post.id, author = %post.author, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /post/:id - Fetch one post
pub async fn get_post(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ServerResult<Json<Post>> {
    let Path(id) = id?;
    Ok(Json(state.blog.find_post(PostId::new(id))?))
}

/// PATCH /post/:id - Change the subject and/or body
pub async fn update_post(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<PostPatch>, JsonRejection>,
) -> ServerResult<Json<Post>> {
    let Path(id) = id?;
    let Json(patch) = body?;
    Ok(Json(state.blog.update_post(PostId::new(id), &patch)?))
}

/// DELETE /post/:id - Remove a post
pub async fn delete_post(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ServerResult<Json<Value>> {
    let Path(id) = id?;
    let deleted = state.blog.delete_post(PostId::new(id))?;
    Ok(Json(json!({ "deleted": deleted })))
}
