use anyhow::{Context, Result};
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::sync::Arc;

/// Solana RPC 클라이언트
/// Thin wrapper over the nonblocking RPC client used by the blog program client
#[derive(Clone)]
pub struct SolanaClient {
    rpc_client: Arc<RpcClient>,
    rpc_url: String,
    commitment: CommitmentConfig,
}

impl SolanaClient {
    /// SolanaClient 생성
    /// Create SolanaClient for the given endpoint and commitment
    pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        let rpc_client = Arc::new(RpcClient::new_with_commitment(
            rpc_url.to_string(),
            commitment,
        ));

        Self {
            rpc_client,
            rpc_url: rpc_url.to_string(),
            commitment,
        }
    }

    /// 계정 정보 조회
    /// Get account information (None if the account does not exist)
    pub async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .rpc_client
            .get_account_with_commitment(pubkey, self.commitment)
            .await
            .context(format!("Failed to get account {}", pubkey))?;

        Ok(response.value)
    }

    /// 프로그램 소유 계정 중 데이터 앞부분이 discriminator와 일치하는 계정 조회
    /// Get all program accounts whose data starts with the given discriminator
    pub async fn get_program_accounts_by_discriminator(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Account)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                0,
                discriminator,
            ))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        self.rpc_client
            .get_program_accounts_with_config(program_id, config)
            .await
            .context(format!("Failed to get program accounts for {}", program_id))
    }

    /// 최신 블록해시 조회 (트랜잭션 서명에 필요)
    /// Get latest blockhash (required for transaction signing)
    pub async fn get_latest_blockhash(&self) -> Result<Hash> {
        self.rpc_client
            .get_latest_blockhash()
            .await
            .context("Failed to get latest blockhash")
    }

    /// 트랜잭션 전송 및 확인 대기
    /// Send transaction and wait for confirmation
    pub async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.rpc_client
            .send_and_confirm_transaction(transaction)
            .await
            .context("Failed to send and confirm transaction")
    }

    /// RPC URL 반환
    /// Get RPC URL
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }
}
