// =====================================================
// PDA 계산기 (Account Address Deriver)
// =====================================================
// 프로그램 내부와 같은 알고리즘으로 주소를 계산하므로
// 네트워크 왕복 없이 클라이언트와 프로그램이 같은 주소를 얻는다.
//
// user PDA: ["user", wallet]
// post PDA: ["post", wallet, [index]]  (index는 1바이트)
// =====================================================

use crate::shared::errors::BlogError;
use solana_sdk::pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};

pub const USER_SEED: &[u8] = b"user";
pub const POST_SEED: &[u8] = b"post";

/// 한 사용자가 가질 수 있는 최대 post index
/// Highest post index encodable in the single-byte seed
pub const MAX_POST_INDEX: u64 = u8::MAX as u64;

/// 시드로 PDA와 bump 계산
/// Derive a program address and its bump seed
///
/// # Errors
/// * `InvalidSeed` - 시드가 너무 많거나(bump 포함 16개 초과), 32바이트를 넘거나, 유효한 bump가 없을 때
pub fn derive_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8), BlogError> {
    // bump 시드 자리를 하나 남겨둔다
    if seeds.len() >= MAX_SEEDS {
        return Err(BlogError::InvalidSeed(format!(
            "too many seeds: {} (max {})",
            seeds.len(),
            MAX_SEEDS - 1
        )));
    }

    if let Some((i, seed)) = seeds.iter().enumerate().find(|(_, s)| s.len() > MAX_SEED_LEN) {
        return Err(BlogError::InvalidSeed(format!(
            "seed #{} is {} bytes (max {})",
            i,
            seed.len(),
            MAX_SEED_LEN
        )));
    }

    Pubkey::try_find_program_address(seeds, program_id)
        .ok_or_else(|| BlogError::InvalidSeed("no viable bump seed".to_string()))
}

/// 사용자 계정 주소
/// User account address: ["user", wallet]
pub fn user_address(program_id: &Pubkey, wallet: &Pubkey) -> Result<(Pubkey, u8), BlogError> {
    derive_address(&[USER_SEED, wallet.as_ref()], program_id)
}

/// 게시글 계정 주소
/// Post account address: ["post", wallet, [index]]
///
/// index가 255를 넘으면 1바이트로 잘라내지 않고 `InvalidSeed`로 거부한다.
pub fn post_address(
    program_id: &Pubkey,
    wallet: &Pubkey,
    index: u64,
) -> Result<(Pubkey, u8), BlogError> {
    let index_byte = u8::try_from(index).map_err(|_| {
        BlogError::InvalidSeed(format!(
            "post index {} does not fit in one byte (max {})",
            index, MAX_POST_INDEX
        ))
    })?;

    derive_address(&[POST_SEED, wallet.as_ref(), &[index_byte]], program_id)
}
