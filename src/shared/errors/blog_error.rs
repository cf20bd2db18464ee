use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 블로그 관련 에러
/// Blog-related errors
///
/// 스토어는 이 에러를 UI 상태로 올리지 않고 로그로 남긴 뒤 `Result`로만 돌려줍니다.
#[derive(Error, Debug, Clone)]
pub enum BlogError {
    /// 계정이 아직 초기화되지 않음 (신규 사용자 경로)
    /// Account does not exist yet (expected "new user" path)
    #[error("Account not found: address={address}")]
    AccountNotFound { address: String },

    /// 트랜잭션 생성/서명/전송/확인 실패
    /// Transaction build, signing, broadcast or confirmation failed
    #[error("Failed to submit transaction: {0}")]
    Submit(String),

    /// 잘못된 PDA 시드 (프로그래머 에러)
    /// Malformed seed input for address derivation
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// Public Key 파싱 실패
    /// Failed to parse public key
    #[error("Failed to parse public key: {public_key}")]
    InvalidPublicKey { public_key: String },

    /// 요청 본문이 잘못됨
    /// Malformed request body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 지갑이 연결되지 않음
    /// No wallet connected
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// 이미 다른 트랜잭션이 진행 중
    /// Another transaction is already pending
    #[error("Another transaction is already pending")]
    TransactionInFlight,

    /// 계정 데이터 디코딩 실패
    /// Failed to decode account data
    #[error("Failed to decode account {address}: {reason}")]
    AccountDecode { address: String, reason: String },

    /// Solana RPC 에러 (조회)
    /// Solana RPC error on read paths
    #[error("Solana RPC error: {0}")]
    Rpc(String),

    /// IDL 파일이 잘못됨
    /// Invalid program interface description
    #[error("Invalid IDL: {0}")]
    InvalidIdl(String),

    /// 지갑 서명 실패 / 키페어 로드 실패
    /// Wallet failed to load or sign
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// 설정 에러
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BlogError {
    /// 로그/응답에 쓰는 짧은 종류 이름
    /// Short kind name used in logs and bootstrap outcomes
    pub fn kind(&self) -> &'static str {
        match self {
            BlogError::AccountNotFound { .. } => "account_not_found",
            BlogError::Submit(_) => "submit_error",
            BlogError::InvalidSeed(_) => "invalid_seed",
            BlogError::InvalidPublicKey { .. } => "invalid_public_key",
            BlogError::InvalidRequest(_) => "invalid_request",
            BlogError::WalletNotConnected => "wallet_not_connected",
            BlogError::TransactionInFlight => "transaction_in_flight",
            BlogError::AccountDecode { .. } => "account_decode",
            BlogError::Rpc(_) => "rpc_error",
            BlogError::InvalidIdl(_) => "invalid_idl",
            BlogError::Wallet(_) => "wallet_error",
            BlogError::Config(_) => "config_error",
        }
    }
}

/// BlogError를 HTTP 응답으로 변환
impl From<BlogError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: BlogError) -> Self {
        let status = match &err {
            BlogError::AccountNotFound { .. } => StatusCode::NOT_FOUND,
            BlogError::InvalidSeed(_) => StatusCode::BAD_REQUEST,
            BlogError::InvalidPublicKey { .. } => StatusCode::BAD_REQUEST,
            BlogError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BlogError::WalletNotConnected => StatusCode::BAD_REQUEST,
            BlogError::TransactionInFlight => StatusCode::CONFLICT,
            BlogError::Submit(_) => StatusCode::BAD_GATEWAY,
            BlogError::Rpc(_) => StatusCode::BAD_GATEWAY,
            BlogError::AccountDecode { .. } => StatusCode::BAD_GATEWAY,
            BlogError::Wallet(_) => StatusCode::UNAUTHORIZED,
            BlogError::InvalidIdl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BlogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": err.to_string(), "kind": err.kind() })))
    }
}
