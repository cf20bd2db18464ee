// 프로그램 인터페이스 설명(IDL) 로더
// Anchor IDL loader: program address + the instructions/accounts this client relies on
use super::instruction::{CREATE_POST, CREATE_POST_ACCOUNTS, INIT_USER, INIT_USER_ACCOUNTS};
use crate::shared::errors::BlogError;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

const REQUIRED_ACCOUNTS: [&str; 2] = ["UserAccount", "PostAccount"];

#[derive(Debug, Clone, Deserialize)]
pub struct IdlInstruction {
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<IdlAccountItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlAccountItem {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlTypeDef {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdlMetadata {
    #[serde(default)]
    pub address: Option<String>,
}

/// Anchor IDL (필요한 부분만)
/// Subset of an Anchor IDL document.
/// Both the legacy layout (`metadata.address`) and the 0.30 layout (top-level `address`) are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramIdl {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub instructions: Vec<IdlInstruction>,
    #[serde(default)]
    pub accounts: Vec<IdlTypeDef>,
    #[serde(default)]
    pub metadata: IdlMetadata,
}

impl ProgramIdl {
    /// IDL 파일 로드 및 검증
    /// Load and validate an IDL file
    pub fn load(path: &str) -> Result<Self, BlogError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| BlogError::InvalidIdl(format!("Failed to read {}: {}", path, e)))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, BlogError> {
        let idl: ProgramIdl = serde_json::from_str(json)
            .map_err(|e| BlogError::InvalidIdl(format!("Failed to parse IDL: {}", e)))?;
        idl.validate()?;
        Ok(idl)
    }

    /// 배포된 프로그램 주소
    /// Deployed program address
    pub fn program_id(&self) -> Result<Pubkey, BlogError> {
        let address = self
            .address
            .as_deref()
            .or(self.metadata.address.as_deref())
            .ok_or_else(|| BlogError::InvalidIdl("missing program address".to_string()))?;

        Pubkey::from_str(address)
            .map_err(|e| BlogError::InvalidIdl(format!("invalid program address {}: {}", address, e)))
    }

    /// IDL에 명령어가 있는지 (camelCase/snake_case 모두 허용)
    pub fn has_instruction(&self, snake_name: &str) -> bool {
        self.instructions
            .iter()
            .any(|ix| to_snake_case(&ix.name) == snake_name)
    }

    /// 명령어의 계정 이름 목록 (snake_case로 정규화)
    pub fn instruction_accounts(&self, snake_name: &str) -> Option<Vec<String>> {
        self.instructions
            .iter()
            .find(|ix| to_snake_case(&ix.name) == snake_name)
            .map(|ix| ix.accounts.iter().map(|acc| to_snake_case(&acc.name)).collect())
    }

    pub fn has_account(&self, name: &str) -> bool {
        self.accounts.iter().any(|acc| acc.name == name)
    }

    fn validate(&self) -> Result<(), BlogError> {
        self.program_id()?;

        for instruction in [INIT_USER, CREATE_POST] {
            if !self.has_instruction(instruction) {
                return Err(BlogError::InvalidIdl(format!(
                    "program does not expose instruction '{}'",
                    instruction
                )));
            }
        }

        // 명령어 빌더는 계정 순서를 고정으로 쓰므로 IDL과 같아야 한다
        for (instruction, expected) in [
            (INIT_USER, &INIT_USER_ACCOUNTS[..]),
            (CREATE_POST, &CREATE_POST_ACCOUNTS[..]),
        ] {
            let accounts = self.instruction_accounts(instruction).unwrap_or_default();
            if accounts != expected {
                return Err(BlogError::InvalidIdl(format!(
                    "instruction '{}' expects accounts {:?}, IDL declares {:?}",
                    instruction, expected, accounts
                )));
            }
        }

        for account in REQUIRED_ACCOUNTS {
            if !self.has_account(account) {
                return Err(BlogError::InvalidIdl(format!(
                    "program does not define account '{}'",
                    account
                )));
            }
        }

        Ok(())
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
