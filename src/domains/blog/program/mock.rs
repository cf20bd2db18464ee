use super::{instruction::BlogInstruction, pda, BlogProgram};
use crate::domains::blog::models::{AnchorAccount, PostAccount, PostRecord, UserAccount};
use crate::shared::clients::WalletSigner;
use crate::shared::errors::BlogError;
use async_trait::async_trait;
use parking_lot::Mutex;
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// 다음 호출 한 번에 주입할 실패
#[derive(Default)]
struct InjectedFailures {
    fetch_user: Option<BlogError>,
    fetch_posts: Option<BlogError>,
    submit: Option<BlogError>,
}

/// 다음 fetch_all_posts 한 번만 멈추는 gate
#[derive(Default)]
struct OneShotGate {
    armed: Option<Arc<Semaphore>>,
    held: Option<Arc<Semaphore>>,
}

/// Mock 블로그 프로그램 (테스트용 인메모리 원장)
/// In-memory blog program for tests
///
/// 계정 데이터를 실제와 같은 Anchor 바이트 형식으로 보관하고,
/// 명령어를 디코딩해 온체인 프로그램과 같은 PDA 규칙으로 처리합니다.
/// 실패 주입과 호출 일시정지(gate)로 에러 경로와 동시성 경로를 재현할 수 있습니다.
pub struct MockBlogProgram {
    program_id: Pubkey,
    ledger: Mutex<HashMap<Pubkey, Vec<u8>>>,
    submitted: Mutex<Vec<Instruction>>,
    failures: Mutex<InjectedFailures>,
    submit_gate: Mutex<Option<Arc<Semaphore>>>,
    fetch_user_gates: Mutex<HashMap<Pubkey, Arc<Semaphore>>>,
    fetch_posts_gate: Mutex<OneShotGate>,
}

impl MockBlogProgram {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            ledger: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            failures: Mutex::new(InjectedFailures::default()),
            submit_gate: Mutex::new(None),
            fetch_user_gates: Mutex::new(HashMap::new()),
            fetch_posts_gate: Mutex::new(OneShotGate::default()),
        }
    }

    /// 사용자 계정을 직접 만들어 둔다 (이미 가입한 사용자 시나리오)
    /// Seed an existing user account; returns its address
    pub fn seed_user(
        &self,
        authority: &Pubkey,
        name: &str,
        avatar: &str,
        last_post_id: u8,
    ) -> Result<Pubkey, BlogError> {
        let (address, _) = pda::user_address(&self.program_id, authority)?;
        let user = UserAccount {
            name: name.to_string(),
            avatar: avatar.to_string(),
            authority: *authority,
            last_post_id,
            post_count: last_post_id,
        };
        self.ledger.lock().insert(address, user.to_account_data()?);
        Ok(address)
    }

    /// 원장에 있는 사용자 계정 조회 (검증용)
    pub fn user(&self, authority: &Pubkey) -> Option<UserAccount> {
        let (address, _) = pda::user_address(&self.program_id, authority).ok()?;
        let ledger = self.ledger.lock();
        let data = ledger.get(&address)?;
        UserAccount::try_from_account_data(&address, data).ok()
    }

    /// 원장에 저장된 게시글 수
    pub fn post_count(&self) -> usize {
        let discriminator = PostAccount::discriminator();
        self.ledger
            .lock()
            .values()
            .filter(|data| data.starts_with(&discriminator))
            .count()
    }

    /// 지금까지 성공적으로 처리된 명령어
    pub fn submitted(&self) -> Vec<Instruction> {
        self.submitted.lock().clone()
    }

    pub fn fail_next_fetch_user(&self, err: BlogError) {
        self.failures.lock().fetch_user = Some(err);
    }

    pub fn fail_next_fetch_posts(&self, err: BlogError) {
        self.failures.lock().fetch_posts = Some(err);
    }

    pub fn fail_next_submit(&self, err: BlogError) {
        self.failures.lock().submit = Some(err);
    }

    /// resume_submits()가 호출될 때까지 submit을 멈춘다
    pub fn pause_submits(&self) {
        *self.submit_gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn resume_submits(&self) {
        if let Some(gate) = self.submit_gate.lock().take() {
            gate.close();
        }
    }

    /// 특정 주소의 fetch_user를 resume_fetch_user()까지 멈춘다
    pub fn pause_fetch_user(&self, address: Pubkey) {
        self.fetch_user_gates
            .lock()
            .insert(address, Arc::new(Semaphore::new(0)));
    }

    pub fn resume_fetch_user(&self, address: &Pubkey) {
        if let Some(gate) = self.fetch_user_gates.lock().remove(address) {
            gate.close();
        }
    }

    /// 다음 fetch_all_posts 호출 한 번만 resume_fetch_posts()까지 멈춘다
    /// (그 뒤의 호출은 바로 진행)
    pub fn pause_next_fetch_posts(&self) {
        self.fetch_posts_gate.lock().armed = Some(Arc::new(Semaphore::new(0)));
    }

    /// 멈춘 fetch_all_posts 호출이 대기 중인지
    pub fn is_fetch_posts_held(&self) -> bool {
        self.fetch_posts_gate.lock().held.is_some()
    }

    pub fn resume_fetch_posts(&self) {
        let mut gate = self.fetch_posts_gate.lock();
        for sem in [gate.armed.take(), gate.held.take()].into_iter().flatten() {
            sem.close();
        }
    }

    // 닫힌 semaphore는 acquire가 즉시 Err를 돌려주므로 대기가 풀린다
    async fn wait_gate(gate: Option<Arc<Semaphore>>) {
        if let Some(gate) = gate {
            let _ = gate.acquire().await;
        }
    }

    /// 온체인 프로그램과 같은 규칙으로 명령어 처리
    fn process(&self, instruction: &Instruction, payer: &Pubkey) -> Result<(), BlogError> {
        if instruction.program_id != self.program_id {
            return Err(BlogError::Submit(format!(
                "unknown program: {}",
                instruction.program_id
            )));
        }

        let account_at = |i: usize| {
            instruction
                .accounts
                .get(i)
                .ok_or_else(|| BlogError::Submit(format!("missing account #{}", i)))
        };

        match BlogInstruction::decode(&instruction.data)? {
            BlogInstruction::InitUser(args) => {
                let user_meta = account_at(0)?;
                let authority_meta = account_at(1)?;
                check_signer(authority_meta.pubkey, authority_meta.is_signer, payer)?;

                let (expected, _) = pda::user_address(&self.program_id, &authority_meta.pubkey)?;
                if user_meta.pubkey != expected {
                    return Err(BlogError::Submit("ConstraintSeeds: user_account".to_string()));
                }

                let mut ledger = self.ledger.lock();
                if ledger.contains_key(&expected) {
                    return Err(BlogError::Submit(format!(
                        "account {} already in use",
                        expected
                    )));
                }

                let user = UserAccount {
                    name: args.name,
                    avatar: args.avatar,
                    authority: authority_meta.pubkey,
                    last_post_id: 0,
                    post_count: 0,
                };
                ledger.insert(expected, user.to_account_data()?);
                Ok(())
            }
            BlogInstruction::CreatePost(args) => {
                let post_meta = account_at(0)?;
                let user_meta = account_at(1)?;
                let authority_meta = account_at(2)?;
                check_signer(authority_meta.pubkey, authority_meta.is_signer, payer)?;

                let mut ledger = self.ledger.lock();
                let mut user = match ledger.get(&user_meta.pubkey) {
                    Some(data) => UserAccount::try_from_account_data(&user_meta.pubkey, data)?,
                    None => {
                        return Err(BlogError::Submit(
                            "AccountNotInitialized: user_account".to_string(),
                        ))
                    }
                };
                if user.authority != authority_meta.pubkey {
                    return Err(BlogError::Submit("ConstraintHasOne: authority".to_string()));
                }

                let (expected, _) = pda::post_address(
                    &self.program_id,
                    &authority_meta.pubkey,
                    u64::from(user.last_post_id),
                )?;
                if post_meta.pubkey != expected {
                    return Err(BlogError::Submit("ConstraintSeeds: post_account".to_string()));
                }
                if ledger.contains_key(&expected) {
                    return Err(BlogError::Submit(format!(
                        "account {} already in use",
                        expected
                    )));
                }

                let post = PostAccount {
                    id: user.last_post_id,
                    title: args.title,
                    content: args.content,
                    user: user_meta.pubkey,
                    authority: authority_meta.pubkey,
                };
                user.last_post_id = user
                    .last_post_id
                    .checked_add(1)
                    .ok_or_else(|| BlogError::Submit("last_post_id overflow".to_string()))?;
                user.post_count = user.post_count.saturating_add(1);

                ledger.insert(expected, post.to_account_data()?);
                ledger.insert(user_meta.pubkey, user.to_account_data()?);
                Ok(())
            }
        }
    }
}

fn check_signer(authority: Pubkey, is_signer: bool, payer: &Pubkey) -> Result<(), BlogError> {
    if !is_signer || authority != *payer {
        return Err(BlogError::Submit(format!(
            "missing signature for {}",
            authority
        )));
    }
    Ok(())
}

#[async_trait]
impl BlogProgram for MockBlogProgram {
    fn program_id(&self) -> Pubkey {
        self.program_id
    }

    async fn fetch_user(&self, address: &Pubkey) -> Result<UserAccount, BlogError> {
        let gate = self.fetch_user_gates.lock().get(address).cloned();
        Self::wait_gate(gate).await;

        if let Some(err) = self.failures.lock().fetch_user.take() {
            return Err(err);
        }

        let ledger = self.ledger.lock();
        let data = ledger.get(address).ok_or_else(|| BlogError::AccountNotFound {
            address: address.to_string(),
        })?;
        UserAccount::try_from_account_data(address, data)
    }

    async fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, BlogError> {
        let gate = {
            let mut gate = self.fetch_posts_gate.lock();
            let armed = gate.armed.take();
            if armed.is_some() {
                gate.held = armed.clone();
            }
            armed
        };
        Self::wait_gate(gate).await;

        if let Some(err) = self.failures.lock().fetch_posts.take() {
            return Err(err);
        }

        let discriminator = PostAccount::discriminator();
        let ledger = self.ledger.lock();
        ledger
            .iter()
            .filter(|(_, data)| data.starts_with(&discriminator))
            .map(|(address, data)| {
                Ok(PostRecord {
                    address: *address,
                    account: PostAccount::try_from_account_data(address, data)?,
                })
            })
            .collect()
    }

    async fn submit(
        &self,
        instruction: Instruction,
        signer: &dyn WalletSigner,
    ) -> Result<Signature, BlogError> {
        let gate = self.submit_gate.lock().clone();
        Self::wait_gate(gate).await;

        if let Some(err) = self.failures.lock().submit.take() {
            return Err(err);
        }

        // 실제와 같이 지갑에 서명을 맡기고 검증한다
        let payer = signer.pubkey();
        let message = Message::new_with_blockhash(
            std::slice::from_ref(&instruction),
            Some(&payer),
            &Hash::new_unique(),
        );
        let transaction = signer
            .sign_transaction(Transaction::new_unsigned(message))
            .await
            .map_err(|e| BlogError::Submit(e.to_string()))?;
        transaction
            .verify()
            .map_err(|e| BlogError::Submit(format!("signature verification failed: {}", e)))?;

        self.process(&instruction, &payer)?;
        self.submitted.lock().push(instruction);

        Ok(transaction.signatures[0])
    }
}
