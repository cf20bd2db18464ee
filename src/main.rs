use anyhow::Context;
use axum::Router;
use axum::http::{HeaderValue, Method};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use blog_server::domains::blog::models::*;
use blog_server::domains::blog::services::{BootstrapOutcome, Profile};
use blog_server::routes::create_router;
use blog_server::shared::clients::{KeypairWallet, WalletSigner};
use blog_server::shared::config::BlogConfig;
use blog_server::shared::services::AppState;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        blog_server::domains::blog::handlers::blog_handler::get_state,
        blog_server::domains::blog::handlers::blog_handler::init_user,
        blog_server::domains::blog::handlers::blog_handler::create_post,
        blog_server::domains::blog::handlers::blog_handler::set_modal,
        blog_server::domains::blog::handlers::blog_handler::refresh,
        blog_server::domains::blog::handlers::blog_handler::get_user_address,
        blog_server::domains::blog::handlers::blog_handler::get_post_address
    ),
    components(schemas(
        BlogStateResponse,
        UserResponse,
        PostResponse,
        InitUserRequest,
        InitUserResponse,
        CreatePostRequest,
        CreatePostResponse,
        ModalRequest,
        RefreshResponse,
        AddressResponse,
        Profile
    )),
    tags(
        (name = "Blog", description = "Blog API endpoints (user profile and posts on Solana)")
    ),
    info(
        title = "Solana Blog Server",
        description = "Blog client backed by an on-chain Anchor program",
        version = "1.0.0"
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 설정 로드 (환경 변수)
    let config = BlogConfig::from_env()?;

    // AppState 생성 (IDL, RPC, 프로그램 클라이언트, 스토어)
    let app_state = AppState::new(&config)?;

    // 지갑 자동 연결 (키페어 파일이 있을 때만)
    match KeypairWallet::from_file(&config.wallet_path) {
        Ok(wallet) => {
            let wallet: Arc<dyn WalletSigner> = Arc::new(wallet);
            let outcome = app_state.blog_state.blog_store.connect_wallet(wallet).await;
            match outcome {
                BootstrapOutcome::Ready { posts } => log::info!("Bootstrap complete: {} posts", posts),
                BootstrapOutcome::Uninitialized => log::info!("No user account yet, POST /api/blog/init-user to create one"),
                other => log::warn!("Bootstrap finished with {:?}", other),
            }
        }
        Err(e) => log::warn!("Starting without a connected wallet: {}", e),
    }

    // CORS 설정
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .context(format!("Invalid BLOG_CORS_ORIGIN: {}", config.cors_origin))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .merge(SwaggerUi::new("/api").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .context(format!("Failed to bind {}", config.bind_addr))?;

    log::info!("Server running on http://{}", config.bind_addr);
    log::info!("Swagger UI available at http://{}/api", config.bind_addr);
    log::info!("RPC endpoint: {}", config.rpc_url());

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
