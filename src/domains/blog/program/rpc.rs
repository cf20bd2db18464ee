use super::BlogProgram;
use crate::domains::blog::models::{AnchorAccount, PostAccount, PostRecord, UserAccount};
use crate::shared::clients::{SolanaClient, WalletSigner};
use crate::shared::errors::BlogError;
use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

/// Solana RPC 기반 블로그 프로그램 클라이언트
/// Blog program client over Solana RPC
#[derive(Clone)]
pub struct RpcBlogProgram {
    solana_client: SolanaClient,
    program_id: Pubkey,
}

impl RpcBlogProgram {
    pub fn new(solana_client: SolanaClient, program_id: Pubkey) -> Self {
        Self {
            solana_client,
            program_id,
        }
    }
}

#[async_trait]
impl BlogProgram for RpcBlogProgram {
    fn program_id(&self) -> Pubkey {
        self.program_id
    }

    async fn fetch_user(&self, address: &Pubkey) -> Result<UserAccount, BlogError> {
        let account = self
            .solana_client
            .get_account(address)
            .await
            .map_err(|e| BlogError::Rpc(format!("{:#}", e)))?
            .ok_or_else(|| BlogError::AccountNotFound {
                address: address.to_string(),
            })?;

        // 다른 프로그램 소유 계정은 디코딩하지 않음
        if account.owner != self.program_id {
            return Err(BlogError::AccountDecode {
                address: address.to_string(),
                reason: format!("owned by {}, expected {}", account.owner, self.program_id),
            });
        }

        UserAccount::try_from_account_data(address, &account.data)
    }

    async fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, BlogError> {
        let accounts = self
            .solana_client
            .get_program_accounts_by_discriminator(&self.program_id, &PostAccount::discriminator())
            .await
            .map_err(|e| BlogError::Rpc(format!("{:#}", e)))?;

        let mut posts = Vec::with_capacity(accounts.len());
        for (address, account) in accounts {
            match PostAccount::try_from_account_data(&address, &account.data) {
                Ok(post) => posts.push(PostRecord {
                    address,
                    account: post,
                }),
                Err(e) => log::warn!("Skipping undecodable post account: {}", e),
            }
        }

        log::debug!("Fetched {} post accounts from {}", posts.len(), self.solana_client.rpc_url());
        Ok(posts)
    }

    async fn submit(
        &self,
        instruction: Instruction,
        signer: &dyn WalletSigner,
    ) -> Result<Signature, BlogError> {
        // 1. 최신 블록해시
        let blockhash = self
            .solana_client
            .get_latest_blockhash()
            .await
            .map_err(|e| BlogError::Submit(format!("{:#}", e)))?;

        // 2. 지갑이 fee payer
        let payer = signer.pubkey();
        let message = Message::new_with_blockhash(&[instruction], Some(&payer), &blockhash);
        let transaction = Transaction::new_unsigned(message);

        // 3. 서명은 지갑에 위임
        let transaction = signer
            .sign_transaction(transaction)
            .await
            .map_err(|e| BlogError::Submit(e.to_string()))?;

        // 4. 전송 및 확인 대기
        self.solana_client
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(|e| BlogError::Submit(format!("{:#}", e)))
    }
}
