use std::sync::Arc;
use crate::domains::blog::program::{BlogProgram, ProgramIdl, RpcBlogProgram};
use crate::domains::blog::services::state::BlogState;
use crate::shared::clients::SolanaClient;
use crate::shared::config::BlogConfig;
use crate::shared::errors::BlogError;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 역할: 시작 시 한 번 만들어 라우터에 주입 (전역 조회 없음)
#[derive(Clone)]
pub struct AppState {
    pub blog_state: BlogState,
}

impl AppState {
    /// Create AppState from config
    /// 설정 → IDL → RPC 클라이언트 → 프로그램 클라이언트 → 스토어 순서로 조합
    pub fn new(config: &BlogConfig) -> Result<Self, BlogError> {
        // 1. IDL 로드 (프로그램 주소)
        let idl = ProgramIdl::load(&config.idl_path)?;
        let program_id = idl.program_id()?;

        // 2. RPC 클라이언트
        let solana_client = SolanaClient::new(config.rpc_url(), config.commitment);

        log::info!(
            "Blog program {} ({}) via {} [{:?}]",
            program_id,
            idl.name.as_deref().unwrap_or("unnamed"),
            solana_client.rpc_url(),
            solana_client.commitment().commitment
        );

        // 3. 프로그램 클라이언트 + 스토어
        let program: Arc<dyn BlogProgram> = Arc::new(RpcBlogProgram::new(solana_client, program_id));
        Ok(Self::with_program(program))
    }

    /// 프로그램 클라이언트를 직접 주입 (테스트에서 Mock 사용)
    /// Build with an injected program client
    pub fn with_program(program: Arc<dyn BlogProgram>) -> Self {
        Self {
            blog_state: BlogState::new(program),
        }
    }
}
