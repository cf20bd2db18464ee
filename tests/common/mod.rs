// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 모든 통합 테스트에서 공통으로 사용하는 셋업 함수 제공
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let (program, store) = setup_test();
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use blog_server::domains::blog::program::{pda, BlogProgram, MockBlogProgram};
use blog_server::domains::blog::services::BlogStore;
use blog_server::shared::clients::{KeypairWallet, WalletSigner};
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use std::str::FromStr;
use std::sync::Arc;

// 테스트용 상수 (idl/blog.json과 같은 주소)
pub const TEST_PROGRAM_ID: &str = "BpuyPHpxtx8s56p9GFimBZDuTppbyvULwk6fZLo7CH74";

pub fn program_id() -> Pubkey {
    Pubkey::from_str(TEST_PROGRAM_ID).unwrap()
}

/// Mock 프로그램 + 스토어 생성 (지갑 미연결)
pub fn setup_test() -> (Arc<MockBlogProgram>, BlogStore) {
    let _ = env_logger::builder().is_test(true).try_init();
    let program = Arc::new(MockBlogProgram::new(program_id()));
    let store = BlogStore::new(program.clone() as Arc<dyn BlogProgram>);
    (program, store)
}

/// 새 테스트 지갑
pub fn new_wallet() -> Arc<KeypairWallet> {
    Arc::new(KeypairWallet::new(Keypair::new()))
}

pub fn as_signer(wallet: &Arc<KeypairWallet>) -> Arc<dyn WalletSigner> {
    wallet.clone()
}

pub fn user_pda(wallet: &Pubkey) -> Pubkey {
    pda::user_address(&program_id(), wallet).unwrap().0
}

pub fn post_pda(wallet: &Pubkey, index: u64) -> Pubkey {
    pda::post_address(&program_id(), wallet, index).unwrap().0
}

/// 조건이 참이 될 때까지 다른 태스크에 양보
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
