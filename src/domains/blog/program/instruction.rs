// =====================================================
// 블로그 프로그램 명령어 인코딩
// Blog program instruction encoding
// =====================================================
// Anchor 규칙:
// - 명령어 데이터 = sha256("global:<snake_case 이름>")[..8] + borsh(args)
// - 계정 데이터   = sha256("account:<타입 이름>")[..8] + borsh(account)
// =====================================================

use crate::domains::blog::program::pda;
use crate::shared::errors::BlogError;
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

pub const INIT_USER: &str = "init_user";
pub const CREATE_POST: &str = "create_post";

/// 빌더가 만드는 계정 순서 (IDL 검증에 사용)
/// Account order produced by the builders below
pub const INIT_USER_ACCOUNTS: [&str; 3] = ["user_account", "authority", "system_program"];
pub const CREATE_POST_ACCOUNTS: [&str; 4] =
    ["post_account", "user_account", "authority", "system_program"];

fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", namespace, name).as_bytes());
    let hash = hasher.finalize();

    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash[..8]);
    discriminator
}

/// 명령어 discriminator
/// Instruction discriminator for a snake_case instruction name
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    sighash("global", name)
}

/// 계정 discriminator
/// Account discriminator for an account type name
pub fn account_discriminator(name: &str) -> [u8; 8] {
    sighash("account", name)
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct InitUserArgs {
    pub name: String,
    pub avatar: String,
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatePostArgs {
    pub title: String,
    pub content: String,
}

/// 디코딩된 블로그 명령어
/// A decoded blog instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogInstruction {
    InitUser(InitUserArgs),
    CreatePost(CreatePostArgs),
}

impl BlogInstruction {
    /// 명령어 데이터 디코딩
    /// Decode instruction data
    pub fn decode(data: &[u8]) -> Result<Self, BlogError> {
        if data.len() < 8 {
            return Err(BlogError::Submit(format!(
                "instruction data too short: {} bytes",
                data.len()
            )));
        }

        let (discriminator, body) = data.split_at(8);
        let decode_err = |e: std::io::Error| BlogError::Submit(format!("Failed to decode instruction args: {}", e));

        if discriminator == instruction_discriminator(INIT_USER) {
            Ok(BlogInstruction::InitUser(
                InitUserArgs::try_from_slice(body).map_err(decode_err)?,
            ))
        } else if discriminator == instruction_discriminator(CREATE_POST) {
            Ok(BlogInstruction::CreatePost(
                CreatePostArgs::try_from_slice(body).map_err(decode_err)?,
            ))
        } else {
            Err(BlogError::Submit("unknown instruction discriminator".to_string()))
        }
    }
}

fn encode<T: AnchorSerialize>(name: &str, args: &T) -> Result<Vec<u8>, BlogError> {
    let mut data = instruction_discriminator(name).to_vec();
    let body = args
        .try_to_vec()
        .map_err(|e| BlogError::Submit(format!("Failed to encode {} args: {}", name, e)))?;
    data.extend_from_slice(&body);
    Ok(data)
}

/// init_user 명령어 생성
/// Build the init-user instruction
///
/// 계정: user_account (w), authority (s, w), system_program
pub fn init_user(
    program_id: &Pubkey,
    authority: &Pubkey,
    name: &str,
    avatar: &str,
) -> Result<Instruction, BlogError> {
    let (user_account, _) = pda::user_address(program_id, authority)?;
    let data = encode(
        INIT_USER,
        &InitUserArgs {
            name: name.to_string(),
            avatar: avatar.to_string(),
        },
    )?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(user_account, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

/// create_post 명령어 생성 (게시글 주소도 함께 반환)
/// Build the create-post instruction; also returns the derived post address
///
/// 계정: post_account (w), user_account (w), authority (s, w), system_program
pub fn create_post(
    program_id: &Pubkey,
    authority: &Pubkey,
    post_index: u64,
    title: &str,
    content: &str,
) -> Result<(Instruction, Pubkey), BlogError> {
    let (user_account, _) = pda::user_address(program_id, authority)?;
    let (post_account, _) = pda::post_address(program_id, authority, post_index)?;
    let data = encode(
        CREATE_POST,
        &CreatePostArgs {
            title: title.to_string(),
            content: content.to_string(),
        },
    )?;

    let instruction = Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(post_account, false),
            AccountMeta::new(user_account, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    };

    Ok((instruction, post_account))
}
