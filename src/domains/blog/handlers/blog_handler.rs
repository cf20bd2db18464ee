use crate::domains::blog::models::{
    AddressResponse, BlogStateResponse, CreatePostRequest, CreatePostResponse, InitUserRequest,
    InitUserResponse, ModalRequest, RefreshResponse,
};
use crate::domains::blog::program::pda;
use crate::domains::blog::services::identity::{avatar_url, random_name};
use crate::domains::blog::services::Profile;
use crate::shared::errors::BlogError;
use crate::shared::services::AppState;
use axum::{body::Bytes, extract::{Path, State}, http::StatusCode, Json};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

/// 본문이 비어 있으면 기본값, 있으면 반드시 올바른 JSON이어야 한다
fn parse_init_user_request(body: &[u8]) -> Result<InitUserRequest, BlogError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(InitUserRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| BlogError::InvalidRequest(format!("init-user body: {}", e)))
}

fn parse_wallet(wallet: &str) -> Result<Pubkey, BlogError> {
    Pubkey::from_str(wallet).map_err(|_| BlogError::InvalidPublicKey {
        public_key: wallet.to_string(),
    })
}

/// 블로그 상태 조회 핸들러
/// Get blog state handler
#[utoipa::path(
    get,
    path = "/api/blog/state",
    responses(
        (status = 200, description = "Current blog state", body = BlogStateResponse)
    ),
    tag = "Blog"
)]
pub async fn get_state(State(app_state): State<AppState>) -> Json<BlogStateResponse> {
    let snapshot = app_state.blog_state.blog_store.snapshot();
    Json(BlogStateResponse::from(&snapshot))
}

/// 사용자 초기화 핸들러
/// Init user handler
/// Note: 이름/아바타를 비우면 랜덤으로 생성
#[utoipa::path(
    post,
    path = "/api/blog/init-user",
    request_body(content = InitUserRequest, description = "Optional name/avatar"),
    responses(
        (status = 200, description = "User initialized", body = InitUserResponse),
        (status = 400, description = "Malformed body or wallet not connected"),
        (status = 409, description = "Another transaction is pending"),
        (status = 502, description = "Transaction failed")
    ),
    tag = "Blog"
)]
pub async fn init_user(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Json<InitUserResponse>, ErrorResponse> {
    let request = parse_init_user_request(&body).map_err(|e| -> ErrorResponse { e.into() })?;

    // 이름만 주면 아바타는 그 이름으로 생성
    let name = request.name.unwrap_or_else(random_name);
    let avatar = request.avatar.unwrap_or_else(|| avatar_url(&name));
    let profile = Profile::new(name, avatar);

    let signature = app_state
        .blog_state
        .blog_store
        .init_user_with(profile.clone())
        .await
        .map_err(|e: BlogError| -> ErrorResponse { e.into() })?;

    Ok(Json(InitUserResponse {
        signature: signature.to_string(),
        name: profile.name,
        avatar: profile.avatar,
    }))
}

/// 게시글 작성 핸들러
/// Create post handler
#[utoipa::path(
    post,
    path = "/api/blog/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post created", body = CreatePostResponse),
        (status = 400, description = "Wallet not connected or post index out of range"),
        (status = 409, description = "Another transaction is pending"),
        (status = 502, description = "Transaction failed")
    ),
    tag = "Blog"
)]
pub async fn create_post(
    State(app_state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<Json<CreatePostResponse>, ErrorResponse> {
    let submission = app_state
        .blog_state
        .blog_store
        .create_post(&request.title, &request.content)
        .await
        .map_err(|e: BlogError| -> ErrorResponse { e.into() })?;

    Ok(Json(CreatePostResponse::from(&submission)))
}

/// 작성 모달 열기/닫기 핸들러
/// Show/hide compose modal handler
#[utoipa::path(
    put,
    path = "/api/blog/modal",
    request_body = ModalRequest,
    responses(
        (status = 200, description = "Updated blog state", body = BlogStateResponse)
    ),
    tag = "Blog"
)]
pub async fn set_modal(
    State(app_state): State<AppState>,
    Json(request): Json<ModalRequest>,
) -> Json<BlogStateResponse> {
    let store = &app_state.blog_state.blog_store;
    store.set_show_modal(request.show);
    Json(BlogStateResponse::from(&store.snapshot()))
}

/// 새로고침 핸들러 (bootstrap 재실행)
/// Refresh handler: re-runs bootstrap
#[utoipa::path(
    post,
    path = "/api/blog/refresh",
    responses(
        (status = 200, description = "Bootstrap outcome", body = RefreshResponse)
    ),
    tag = "Blog"
)]
pub async fn refresh(State(app_state): State<AppState>) -> Json<RefreshResponse> {
    let outcome = app_state.blog_state.blog_store.refresh().await;
    Json(RefreshResponse::from(&outcome))
}

/// 사용자 PDA 조회 핸들러
/// Derive user account address
#[utoipa::path(
    get,
    path = "/api/blog/addresses/user/{wallet}",
    params(("wallet" = String, Path, description = "Wallet public key")),
    responses(
        (status = 200, description = "Derived address", body = AddressResponse),
        (status = 400, description = "Invalid public key")
    ),
    tag = "Blog"
)]
pub async fn get_user_address(
    State(app_state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<Json<AddressResponse>, ErrorResponse> {
    let wallet = parse_wallet(&wallet).map_err(|e| -> ErrorResponse { e.into() })?;
    let program_id = app_state.blog_state.blog_store.program_id();

    let (address, bump) = pda::user_address(&program_id, &wallet)
        .map_err(|e| -> ErrorResponse { e.into() })?;

    Ok(Json(AddressResponse {
        address: address.to_string(),
        bump,
    }))
}

/// 게시글 PDA 조회 핸들러
/// Derive post account address (index > 255 is rejected)
#[utoipa::path(
    get,
    path = "/api/blog/addresses/post/{wallet}/{index}",
    params(
        ("wallet" = String, Path, description = "Wallet public key"),
        ("index" = u64, Path, description = "Post index (0-255)")
    ),
    responses(
        (status = 200, description = "Derived address", body = AddressResponse),
        (status = 400, description = "Invalid public key or index out of range")
    ),
    tag = "Blog"
)]
pub async fn get_post_address(
    State(app_state): State<AppState>,
    Path((wallet, index)): Path<(String, u64)>,
) -> Result<Json<AddressResponse>, ErrorResponse> {
    let wallet = parse_wallet(&wallet).map_err(|e| -> ErrorResponse { e.into() })?;
    let program_id = app_state.blog_state.blog_store.program_id();

    let (address, bump) = pda::post_address(&program_id, &wallet, index)
        .map_err(|e| -> ErrorResponse { e.into() })?;

    Ok(Json(AddressResponse {
        address: address.to_string(),
        bump,
    }))
}
