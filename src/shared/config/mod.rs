// =====================================================
// BlogConfig - 실행 설정 (환경 변수)
// =====================================================
// 역할: RPC 엔드포인트, IDL 경로, 지갑 경로, 서버 주소를 환경 변수에서 읽는다.
//
// BLOG_RPC_URL      클러스터 이름(devnet/localnet/...) 또는 URL (기본값: devnet)
// BLOG_COMMITMENT   processed | confirmed | finalized (기본값: confirmed)
// BLOG_IDL_PATH     IDL JSON 경로 (기본값: idl/blog.json)
// BLOG_WALLET_PATH  키페어 파일 (기본값: ~/.config/solana/id.json)
// BLOG_BIND_ADDR    서버 주소 (기본값: 0.0.0.0:3002)
// BLOG_CORS_ORIGIN  프론트엔드 origin (기본값: http://localhost:3003)
// =====================================================

use crate::shared::errors::BlogError;
use anchor_client::Cluster;
use solana_sdk::commitment_config::CommitmentConfig;
use std::str::FromStr;

pub const DEFAULT_CLUSTER: &str = "devnet";
pub const DEFAULT_IDL_PATH: &str = "idl/blog.json";
pub const DEFAULT_WALLET_PATH: &str = "~/.config/solana/id.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3002";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3003";

/// 실행 설정
/// Runtime configuration
#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub cluster: Cluster,
    pub commitment: CommitmentConfig,
    pub idl_path: String,
    pub wallet_path: String,
    pub bind_addr: String,
    pub cors_origin: String,
}

impl BlogConfig {
    /// 환경 변수에서 설정 읽기
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, BlogError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 읽기 (테스트에서 사용)
    /// Read configuration through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BlogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let rpc = get("BLOG_RPC_URL", DEFAULT_CLUSTER);
        let cluster = Cluster::from_str(&rpc)
            .map_err(|e| BlogError::Config(format!("Invalid BLOG_RPC_URL '{}': {}", rpc, e)))?;

        let commitment = parse_commitment(&get("BLOG_COMMITMENT", "confirmed"))?;

        Ok(Self {
            cluster,
            commitment,
            idl_path: get("BLOG_IDL_PATH", DEFAULT_IDL_PATH),
            wallet_path: get("BLOG_WALLET_PATH", DEFAULT_WALLET_PATH),
            bind_addr: get("BLOG_BIND_ADDR", DEFAULT_BIND_ADDR),
            cors_origin: get("BLOG_CORS_ORIGIN", DEFAULT_CORS_ORIGIN),
        })
    }

    /// RPC HTTP URL
    pub fn rpc_url(&self) -> &str {
        self.cluster.url()
    }
}

fn parse_commitment(value: &str) -> Result<CommitmentConfig, BlogError> {
    match value.to_lowercase().as_str() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(BlogError::Config(format!("Invalid BLOG_COMMITMENT: {}", other))),
    }
}
