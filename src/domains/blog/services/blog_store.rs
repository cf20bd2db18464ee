use crate::domains::blog::models::{PostRecord, UserAccount};
use crate::domains::blog::program::{instruction, pda, BlogProgram};
use crate::domains::blog::services::identity::Profile;
use crate::shared::clients::WalletSigner;
use crate::shared::errors::BlogError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// 스토어 입력 (프로그램 클라이언트 + 연결된 지갑)
/// 둘 중 하나라도 바뀌면 세션(epoch)이 새로 시작된다.
struct StoreInputs {
    program: Arc<dyn BlogProgram>,
    wallet: Option<Arc<dyn WalletSigner>>,
    epoch: u64,
}

/// UI에 보이는 로컬 상태 (지갑 재연결 시 초기화)
#[derive(Default)]
struct LocalState {
    user: Option<UserAccount>,
    initialized: bool,
    show_modal: bool,
    last_post_id: u8,
    posts: Vec<PostRecord>,
    last_refreshed: Option<DateTime<Utc>>,
    /// 마지막으로 반영된 bootstrap 번호 (이보다 이른 bootstrap 결과는 버림)
    applied_seq: u64,
}

/// 렌더링 계층에 노출되는 상태 스냅샷
/// Read surface exposed to rendering consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogSnapshot {
    pub wallet: Option<Pubkey>,
    pub user: Option<UserAccount>,
    pub initialized: bool,
    pub transaction_pending: bool,
    pub show_modal: bool,
    pub last_post_id: u8,
    pub posts: Vec<PostRecord>,
    pub last_refreshed: Option<DateTime<Utc>>,
}

/// bootstrap 결과
/// Which branch a bootstrap took
#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    /// 사용자 계정과 게시글을 불러옴
    Ready { posts: usize },
    /// 사용자 계정 없음 (init_user 필요)
    Uninitialized,
    /// 조회 실패 (Uninitialized와 같이 처리됨)
    FetchFailed(BlogError),
    /// 그 사이에 지갑/프로그램이 바뀌었거나, 더 나중의 bootstrap/전송이 먼저 반영되어 결과를 버림
    Stale,
    /// 연결된 지갑 없음
    NoWallet,
}

/// 게시글 전송 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSubmission {
    pub signature: Signature,
    pub post_address: Pubkey,
    pub post_index: u8,
}

/// 트랜잭션 진행 플래그를 잡고, drop 시 항상 해제한다
/// Single-flight guard: clears `transaction_pending` on every exit path
struct PendingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, BlogError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BlogError::TransactionInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 블로그 상태 스토어
/// Blog State Store
///
/// 역할: 현재 사용자, 초기화 여부, 트랜잭션 진행 여부, 작성 모달, 게시글 목록을 보관하고
/// `init_user` / `create_post` 두 가지 변경 명령과 bootstrap(조회) 효과를 제공한다.
///
/// 에러 정책:
/// - 조회/전송 에러는 로그로 남기고 상태를 오염시키지 않는다
/// - 호출자는 `Result` / `BootstrapOutcome`으로 어느 경로였는지 확인할 수 있다
///
/// 동시성:
/// - `transaction_pending`은 실제 상호 배제 플래그 (동시 호출은 `TransactionInFlight`)
/// - bootstrap 결과는 시작할 때의 epoch가 아직 유효하고,
///   더 나중에 시작한 bootstrap이나 성공한 전송이 먼저 반영되지 않았을 때만 반영된다
pub struct BlogStore {
    inputs: RwLock<StoreInputs>,
    state: RwLock<LocalState>,
    transaction_pending: AtomicBool,
    bootstrap_seq: AtomicU64,
}

impl BlogStore {
    /// 스토어 생성 (지갑 미연결 상태)
    pub fn new(program: Arc<dyn BlogProgram>) -> Self {
        Self {
            inputs: RwLock::new(StoreInputs {
                program,
                wallet: None,
                epoch: 0,
            }),
            state: RwLock::new(LocalState::default()),
            transaction_pending: AtomicBool::new(false),
            bootstrap_seq: AtomicU64::new(0),
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 입력 변경 (Inputs)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// 지갑 연결 후 bootstrap
    /// Connect a wallet, start a new session and bootstrap it
    pub async fn connect_wallet(&self, wallet: Arc<dyn WalletSigner>) -> BootstrapOutcome {
        log::info!("Wallet connected: {}", wallet.pubkey());
        self.replace_inputs(|inputs| inputs.wallet = Some(wallet));
        self.bootstrap().await
    }

    /// 지갑 연결 해제
    pub fn disconnect_wallet(&self) {
        log::info!("Wallet disconnected");
        self.replace_inputs(|inputs| inputs.wallet = None);
    }

    /// 프로그램 클라이언트 교체 후 (지갑이 있으면) bootstrap
    /// Replace the program client; bootstraps again when a wallet is connected
    pub async fn set_program(&self, program: Arc<dyn BlogProgram>) -> BootstrapOutcome {
        log::info!("Program client set: {}", program.program_id());
        self.replace_inputs(|inputs| inputs.program = program);
        self.bootstrap().await
    }

    fn replace_inputs<F>(&self, update: F)
    where
        F: FnOnce(&mut StoreInputs),
    {
        // 순서: inputs → state (bootstrap 반영과 같은 순서)
        let mut inputs = self.inputs.write();
        update(&mut inputs);
        inputs.epoch += 1;
        *self.state.write() = LocalState::default();
    }

    fn current_inputs(&self) -> (u64, Arc<dyn BlogProgram>, Option<Arc<dyn WalletSigner>>) {
        let inputs = self.inputs.read();
        (inputs.epoch, inputs.program.clone(), inputs.wallet.clone())
    }

    fn connected(&self) -> Result<(u64, Arc<dyn BlogProgram>, Arc<dyn WalletSigner>), BlogError> {
        let (epoch, program, wallet) = self.current_inputs();
        let wallet = wallet.ok_or(BlogError::WalletNotConnected)?;
        Ok((epoch, program, wallet))
    }

    /// create_post용: 세션과 현재 last_post_id를 한 번에 읽는다 (inputs → state)
    fn connected_with_index(
        &self,
    ) -> Result<(u64, Arc<dyn BlogProgram>, Arc<dyn WalletSigner>, u8), BlogError> {
        let inputs = self.inputs.read();
        let wallet = inputs.wallet.clone().ok_or(BlogError::WalletNotConnected)?;
        let post_index = self.state.read().last_post_id;
        Ok((inputs.epoch, inputs.program.clone(), wallet, post_index))
    }

    /// 지금까지 시작된 bootstrap 결과는 모두 전송 이전 상태이므로 반영하지 않게 한다
    fn supersede_bootstraps(&self, state: &mut LocalState) {
        state.applied_seq = state.applied_seq.max(self.bootstrap_seq.load(Ordering::Acquire));
    }

    /// epoch가 그대로일 때만 상태 변경을 반영
    fn apply_if_current<F>(&self, epoch: u64, update: F) -> bool
    where
        F: FnOnce(&mut LocalState),
    {
        let inputs = self.inputs.read();
        if inputs.epoch != epoch {
            return false;
        }
        update(&mut self.state.write());
        true
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 조회 (Bootstrap)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// 사용자 계정과 게시글 목록을 다시 불러온다
    /// Re-read the user account and all posts for the connected wallet
    ///
    /// # 처리 과정
    /// 1. user PDA 계산
    /// 2. fetch_user (없으면 Uninitialized)
    /// 3. fetch_all_posts
    /// 4. 세션이 그대로이고 더 나중의 bootstrap/전송이 반영되지 않았으면 한 번에 반영
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let (epoch, program, wallet) = self.current_inputs();
        let Some(wallet) = wallet else {
            return BootstrapOutcome::NoWallet;
        };
        let authority = wallet.pubkey();
        let seq = self.bootstrap_seq.fetch_add(1, Ordering::AcqRel) + 1;

        let fetched = Self::fetch_user_and_posts(program.as_ref(), &authority).await;

        let mut outcome = BootstrapOutcome::Stale;
        self.apply_if_current(epoch, |state| {
            if seq <= state.applied_seq {
                return;
            }
            state.applied_seq = seq;
            state.last_refreshed = Some(Utc::now());
            match fetched {
                Ok((user, posts)) => {
                    log::info!(
                        "Loaded user '{}' (last_post_id={}) and {} posts",
                        user.name,
                        user.last_post_id,
                        posts.len()
                    );
                    outcome = BootstrapOutcome::Ready { posts: posts.len() };
                    state.initialized = true;
                    state.last_post_id = user.last_post_id;
                    state.user = Some(user);
                    state.posts = posts;
                }
                Err(err) => {
                    match &err {
                        BlogError::AccountNotFound { .. } => {
                            log::info!("No user found for {}: {}", authority, err);
                            outcome = BootstrapOutcome::Uninitialized;
                        }
                        _ => {
                            log::warn!("Bootstrap failed for {}, treating as uninitialized: {}", authority, err);
                            outcome = BootstrapOutcome::FetchFailed(err.clone());
                        }
                    }
                    state.initialized = false;
                    state.user = None;
                    state.last_post_id = 0;
                    state.posts.clear();
                }
            }
        });

        if matches!(outcome, BootstrapOutcome::Stale) {
            log::debug!("Discarding stale bootstrap #{} for {}", seq, authority);
        }
        outcome
    }

    /// bootstrap과 같음 (사용자가 요청한 새로고침)
    pub async fn refresh(&self) -> BootstrapOutcome {
        self.bootstrap().await
    }

    async fn fetch_user_and_posts(
        program: &dyn BlogProgram,
        authority: &Pubkey,
    ) -> Result<(UserAccount, Vec<PostRecord>), BlogError> {
        let (user_address, _) = pda::user_address(&program.program_id(), authority)?;
        let user = program.fetch_user(&user_address).await?;
        let posts = program.fetch_all_posts().await?;
        Ok((user, posts))
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 변경 명령 (Commands)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// 랜덤 이름/아바타로 사용자 계정 생성
    /// Initialize the user account with a random profile
    pub async fn init_user(&self) -> Result<Signature, BlogError> {
        self.init_user_with(Profile::random()).await
    }

    /// 주어진 이름/아바타로 사용자 계정 생성
    /// Initialize the user account with the given profile
    ///
    /// 성공 시 `initialized = true`. 실패 시 `initialized`는 그대로.
    /// 어느 경우든 반환 시점에 `transaction_pending`은 false.
    pub async fn init_user_with(&self, profile: Profile) -> Result<Signature, BlogError> {
        let (epoch, program, wallet) = self.connected()?;
        let _pending = PendingGuard::acquire(&self.transaction_pending)?;

        let result = Self::submit_init_user(program.as_ref(), wallet.as_ref(), &profile).await;

        match result {
            Ok(signature) => {
                log::info!("User initialized as '{}': {}", profile.name, signature);
                self.apply_if_current(epoch, |state| {
                    state.initialized = true;
                    self.supersede_bootstraps(state);
                });
                Ok(signature)
            }
            Err(err) => {
                log::error!("Error initializing user: {}", err);
                Err(err)
            }
        }
    }

    async fn submit_init_user(
        program: &dyn BlogProgram,
        wallet: &dyn WalletSigner,
        profile: &Profile,
    ) -> Result<Signature, BlogError> {
        let ix = instruction::init_user(
            &program.program_id(),
            &wallet.pubkey(),
            &profile.name,
            &profile.avatar,
        )?;
        program.submit(ix, wallet).await
    }

    /// 게시글 작성
    /// Create a post at index `last_post_id`
    ///
    /// 성공 시 작성 모달을 닫는다. 실패 시 모달은 열린 채로 둔다 (재시도용).
    /// 로컬 `last_post_id` / `posts`는 다음 bootstrap 전까지 바뀌지 않는다.
    pub async fn create_post(&self, title: &str, content: &str) -> Result<PostSubmission, BlogError> {
        let (epoch, program, wallet, post_index) = self.connected_with_index()?;
        let _pending = PendingGuard::acquire(&self.transaction_pending)?;

        let result = Self::submit_create_post(
            program.as_ref(),
            wallet.as_ref(),
            post_index,
            title,
            content,
        )
        .await;

        match result {
            Ok((signature, post_address)) => {
                log::info!("Post #{} created at {}: {}", post_index, post_address, signature);
                self.apply_if_current(epoch, |state| {
                    state.show_modal = false;
                    self.supersede_bootstraps(state);
                });
                Ok(PostSubmission {
                    signature,
                    post_address,
                    post_index,
                })
            }
            Err(err) => {
                log::error!("Error creating post #{}: {}", post_index, err);
                Err(err)
            }
        }
    }

    async fn submit_create_post(
        program: &dyn BlogProgram,
        wallet: &dyn WalletSigner,
        post_index: u8,
        title: &str,
        content: &str,
    ) -> Result<(Signature, Pubkey), BlogError> {
        let (ix, post_address) = instruction::create_post(
            &program.program_id(),
            &wallet.pubkey(),
            u64::from(post_index),
            title,
            content,
        )?;
        let signature = program.submit(ix, wallet).await?;
        Ok((signature, post_address))
    }

    /// 작성 모달 열기/닫기
    pub fn set_show_modal(&self, show: bool) {
        self.state.write().show_modal = show;
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 읽기 (Read surface)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    pub fn snapshot(&self) -> BlogSnapshot {
        let inputs = self.inputs.read();
        let state = self.state.read();
        BlogSnapshot {
            wallet: inputs.wallet.as_ref().map(|w| w.pubkey()),
            user: state.user.clone(),
            initialized: state.initialized,
            transaction_pending: self.is_transaction_pending(),
            show_modal: state.show_modal,
            last_post_id: state.last_post_id,
            posts: state.posts.clone(),
            last_refreshed: state.last_refreshed,
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.inputs.read().program.program_id()
    }

    pub fn wallet(&self) -> Option<Pubkey> {
        self.inputs.read().wallet.as_ref().map(|w| w.pubkey())
    }

    pub fn user(&self) -> Option<UserAccount> {
        self.state.read().user.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    pub fn is_transaction_pending(&self) -> bool {
        self.transaction_pending.load(Ordering::Acquire)
    }

    pub fn show_modal(&self) -> bool {
        self.state.read().show_modal
    }

    pub fn last_post_id(&self) -> u8 {
        self.state.read().last_post_id
    }

    pub fn posts(&self) -> Vec<PostRecord> {
        self.state.read().posts.clone()
    }
}
