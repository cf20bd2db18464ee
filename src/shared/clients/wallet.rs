// Wallet boundary
// 지갑 경계: 스토어는 키를 직접 다루지 않고 서명만 위임한다
use crate::shared::errors::BlogError;
use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
    signer::Signer,
    transaction::Transaction,
};
use std::path::Path;

/// 외부 지갑 인터페이스
/// External wallet capability
///
/// 현재 공개키와 트랜잭션 서명 기능만 노출합니다.
/// Exposes the connected public key and a signing capability; key material never leaves it.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// 연결된 지갑의 공개키
    fn pubkey(&self) -> Pubkey;

    /// 트랜잭션 서명 (recent blockhash는 이미 설정되어 있어야 함)
    /// Sign a transaction whose recent blockhash is already set
    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, BlogError>;
}

/// 키페어 파일 기반 지갑
/// Wallet backed by a Solana CLI keypair file
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// 키페어 파일 로드 (`~` 확장 지원)
    /// Load keypair from file (supports `~` expansion)
    pub fn from_file(path: &str) -> Result<Self, BlogError> {
        let expanded = shellexpand::tilde(path).to_string();
        if !Path::new(&expanded).exists() {
            return Err(BlogError::Wallet(format!("Keypair file not found: {}", expanded)));
        }

        let keypair = read_keypair_file(&expanded)
            .map_err(|e| BlogError::Wallet(format!("Failed to read keypair from {}: {}", expanded, e)))?;

        Ok(Self { keypair })
    }
}

#[async_trait]
impl WalletSigner for KeypairWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(&self, mut transaction: Transaction) -> Result<Transaction, BlogError> {
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_sign(&[&self.keypair], blockhash)
            .map_err(|e| BlogError::Wallet(format!("Failed to sign transaction: {}", e)))?;

        Ok(transaction)
    }
}
