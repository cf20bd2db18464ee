use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::blog::models::{PostRecord, UserAccount};
use crate::domains::blog::services::{BlogSnapshot, BootstrapOutcome, PostSubmission};

/// 사용자 계정 응답
/// User account response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "Brave Otter")]
    pub name: String,
    pub avatar: String,
    /// 지갑 주소
    /// Wallet (authority) public key
    #[schema(example = "7xKXtg2CW87d97TXJSDpbD5jBheTqA83TZRuJosgAsU")]
    pub authority: String,
    #[schema(example = 3)]
    pub last_post_id: u8,
    pub post_count: u8,
}

impl From<&UserAccount> for UserResponse {
    fn from(user: &UserAccount) -> Self {
        Self {
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            authority: user.authority.to_string(),
            last_post_id: user.last_post_id,
            post_count: user.post_count,
        }
    }
}

/// 게시글 응답
/// Post response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// 게시글 계정 주소 (PDA)
    pub address: String,
    pub id: u8,
    #[schema(example = "Hi")]
    pub title: String,
    #[schema(example = "World")]
    pub content: String,
    /// 작성자 UserAccount 주소
    pub user: String,
    pub authority: String,
}

impl From<&PostRecord> for PostResponse {
    fn from(record: &PostRecord) -> Self {
        Self {
            address: record.address.to_string(),
            id: record.account.id,
            title: record.account.title.clone(),
            content: record.account.content.clone(),
            user: record.account.user.to_string(),
            authority: record.account.authority.to_string(),
        }
    }
}

/// 블로그 상태 응답 (UI 읽기 표면)
/// Blog state response: user, initialized, transactionPending, showModal, posts
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogStateResponse {
    pub wallet: Option<String>,
    pub user: Option<UserResponse>,
    pub initialized: bool,
    pub transaction_pending: bool,
    pub show_modal: bool,
    pub last_post_id: u8,
    pub posts: Vec<PostResponse>,
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl From<&BlogSnapshot> for BlogStateResponse {
    fn from(snapshot: &BlogSnapshot) -> Self {
        Self {
            wallet: snapshot.wallet.map(|w| w.to_string()),
            user: snapshot.user.as_ref().map(UserResponse::from),
            initialized: snapshot.initialized,
            transaction_pending: snapshot.transaction_pending,
            show_modal: snapshot.show_modal,
            last_post_id: snapshot.last_post_id,
            posts: snapshot.posts.iter().map(PostResponse::from).collect(),
            last_refreshed: snapshot.last_refreshed,
        }
    }
}

/// 사용자 초기화 요청 (비우면 랜덤 이름/아바타)
/// Init user request; omitted fields are generated
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InitUserRequest {
    #[schema(example = "Alice")]
    pub name: Option<String>,
    #[schema(example = "https://x/a.png")]
    pub avatar: Option<String>,
}

/// 사용자 초기화 응답
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitUserResponse {
    pub signature: String,
    pub name: String,
    pub avatar: String,
}

/// 게시글 작성 요청
/// Create post request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    #[schema(example = "Hi")]
    pub title: String,
    #[schema(example = "World")]
    pub content: String,
}

/// 게시글 작성 응답
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub signature: String,
    pub post_address: String,
    pub post_index: u8,
}

impl From<&PostSubmission> for CreatePostResponse {
    fn from(submission: &PostSubmission) -> Self {
        Self {
            signature: submission.signature.to_string(),
            post_address: submission.post_address.to_string(),
            post_index: submission.post_index,
        }
    }
}

/// 작성 모달 열기/닫기 요청
#[derive(Debug, Deserialize, ToSchema)]
pub struct ModalRequest {
    pub show: bool,
}

/// 새로고침(bootstrap) 응답
/// Bootstrap outcome response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// ready | uninitialized | fetch_failed | stale | no_wallet
    #[schema(example = "ready")]
    pub outcome: String,
    pub posts: Option<usize>,
    pub error: Option<String>,
}

impl From<&BootstrapOutcome> for RefreshResponse {
    fn from(outcome: &BootstrapOutcome) -> Self {
        let (name, posts, error) = match outcome {
            BootstrapOutcome::Ready { posts } => ("ready", Some(*posts), None),
            BootstrapOutcome::Uninitialized => ("uninitialized", None, None),
            BootstrapOutcome::FetchFailed(err) => ("fetch_failed", None, Some(err.to_string())),
            BootstrapOutcome::Stale => ("stale", None, None),
            BootstrapOutcome::NoWallet => ("no_wallet", None, None),
        };

        Self {
            outcome: name.to_string(),
            posts,
            error,
        }
    }
}

/// PDA 조회 응답
/// Derived address response
#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub address: String,
    pub bump: u8,
}
