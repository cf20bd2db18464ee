// Blog domain routes
// 블로그 도메인 라우터
use axum::{routing::{get, post, put}, Router};
use crate::domains::blog::handlers::blog_handler;
use crate::shared::services::AppState;

/// Create blog router
/// 블로그 라우터 생성
pub fn create_blog_router() -> Router<AppState> {
    Router::new()
        .route("/state", get(blog_handler::get_state))
        .route("/init-user", post(blog_handler::init_user))
        .route("/posts", post(blog_handler::create_post))
        .route("/modal", put(blog_handler::set_modal))
        .route("/refresh", post(blog_handler::refresh))
        .route("/addresses/user/:wallet", get(blog_handler::get_user_address))
        .route("/addresses/post/:wallet/:index", get(blog_handler::get_post_address))
}
