// =====================================================
// 블로그 프로그램 클라이언트 모듈
// Blog Program Client Module
// =====================================================
// 구조:
// - pda: 계정 주소 계산
// - instruction: 명령어 인코딩/디코딩
// - idl: 프로그램 인터페이스 설명(IDL) 로더
// - rpc: 실제 RPC 구현
// - mock: 테스트용 인메모리 구현
//
// 스토어는 BlogProgram trait만 알고, 네트워크 구현은 주입받는다.
// =====================================================

pub mod pda;
pub mod instruction;
pub mod idl;
pub mod rpc;
pub mod mock;

use crate::domains::blog::models::{PostRecord, UserAccount};
use crate::shared::clients::WalletSigner;
use crate::shared::errors::BlogError;
use async_trait::async_trait;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Signature};

pub use idl::ProgramIdl;
pub use mock::MockBlogProgram;
pub use rpc::RpcBlogProgram;

/// 원격 블로그 프로그램 인터페이스
/// Remote Blog Program interface
///
/// 세 호출 모두 비동기이며 서로 독립적으로 실패할 수 있습니다.
///
/// # 구현체
/// - `RpcBlogProgram`: Solana RPC로 조회/전송
/// - `MockBlogProgram`: 테스트용 인메모리 원장
#[async_trait]
pub trait BlogProgram: Send + Sync {
    /// 배포된 프로그램 ID
    fn program_id(&self) -> Pubkey;

    /// 사용자 계정 조회
    /// Fetch a user account
    ///
    /// # Returns
    /// * `Err(AccountNotFound)` - 아직 초기화되지 않은 사용자 (정상 경로)
    async fn fetch_user(&self, address: &Pubkey) -> Result<UserAccount, BlogError>;

    /// 모든 게시글 조회 (작성자 무관, 순서 없음)
    /// Fetch every post account of the program, unordered
    async fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, BlogError>;

    /// 명령어 서명/전송 후 확인까지 대기
    /// Build, sign (via the wallet) and send an instruction, waiting for confirmation
    async fn submit(
        &self,
        instruction: Instruction,
        signer: &dyn WalletSigner,
    ) -> Result<Signature, BlogError>;
}
