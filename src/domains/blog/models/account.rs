// On-chain account layouts
// 온체인 계정 구조 (Anchor: 8바이트 discriminator + borsh)
use crate::domains::blog::program::instruction::account_discriminator;
use crate::shared::errors::BlogError;
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_sdk::pubkey::Pubkey;

/// Anchor discriminator 길이
pub const DISCRIMINATOR_LEN: usize = 8;

/// 사용자 계정
/// User account, stored at PDA ["user", authority]
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UserAccount {
    pub name: String,
    pub avatar: String,
    pub authority: Pubkey,
    /// 다음 게시글이 사용할 index
    pub last_post_id: u8,
    pub post_count: u8,
}

/// 게시글 계정
/// Post account, stored at PDA ["post", authority, [id]]
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PostAccount {
    pub id: u8,
    pub title: String,
    pub content: String,
    /// 작성자의 UserAccount 주소
    pub user: Pubkey,
    pub authority: Pubkey,
}

/// 주소와 함께 조회된 게시글
/// A post account together with its address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub address: Pubkey,
    pub account: PostAccount,
}

/// Anchor 계정 공통 인코딩/디코딩
/// Shared Anchor account encoding
pub trait AnchorAccount: AnchorSerialize + AnchorDeserialize + Sized {
    /// IDL에 나오는 계정 타입 이름
    const NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator(Self::NAME)
    }

    /// 계정 데이터 디코딩 (discriminator 확인 후 borsh)
    /// Decode raw account data. Trailing bytes (unused allocated space) are ignored.
    fn try_from_account_data(address: &Pubkey, data: &[u8]) -> Result<Self, BlogError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(BlogError::AccountDecode {
                address: address.to_string(),
                reason: format!("data too short: {} bytes", data.len()),
            });
        }

        let (discriminator, mut body) = data.split_at(DISCRIMINATOR_LEN);
        if discriminator != Self::discriminator() {
            return Err(BlogError::AccountDecode {
                address: address.to_string(),
                reason: format!("not a {} account", Self::NAME),
            });
        }

        Self::deserialize(&mut body).map_err(|e| BlogError::AccountDecode {
            address: address.to_string(),
            reason: e.to_string(),
        })
    }

    /// 계정 데이터 인코딩
    fn to_account_data(&self) -> Result<Vec<u8>, BlogError> {
        let mut data = Self::discriminator().to_vec();
        let body = self
            .try_to_vec()
            .map_err(|e| BlogError::Submit(format!("Failed to encode {}: {}", Self::NAME, e)))?;
        data.extend_from_slice(&body);
        Ok(data)
    }
}

impl AnchorAccount for UserAccount {
    const NAME: &'static str = "UserAccount";
}

impl AnchorAccount for PostAccount {
    const NAME: &'static str = "PostAccount";
}
