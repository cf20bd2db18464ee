// =====================================================
// 블로그 스토어 통합 테스트
// =====================================================

mod common;
use common::*;
use blog_server::domains::blog::program::instruction::{BlogInstruction, InitUserArgs};
use blog_server::domains::blog::program::{BlogProgram, MockBlogProgram};
use blog_server::domains::blog::services::{BootstrapOutcome, Profile};
use blog_server::shared::clients::WalletSigner;
use blog_server::shared::errors::BlogError;
use std::sync::Arc;

/// 테스트: 계정이 없는 지갑 연결
///
/// bootstrap 후 초기화되지 않은 상태여야 하고 게시글 목록은 비어 있어야 합니다.
#[tokio::test]
async fn test_connect_without_user_account_is_uninitialized() {
    let (_program, store) = setup_test();
    let wallet = new_wallet();

    let outcome = store.connect_wallet(as_signer(&wallet)).await;

    assert!(matches!(outcome, BootstrapOutcome::Uninitialized), "got {:?}", outcome);
    assert!(!store.is_initialized());
    assert!(store.user().is_none());
    assert!(store.posts().is_empty());
    assert!(!store.is_transaction_pending());
    assert_eq!(store.wallet(), Some(wallet.pubkey()));
}

/// 테스트: 신규 사용자 초기화 시나리오 (Alice)
///
/// 파생된 user 주소로 init_user 명령어가 전송되고 initialized가 true가 되어야 합니다.
#[tokio::test]
async fn test_init_user_scenario() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    store.connect_wallet(as_signer(&wallet)).await;
    assert!(!store.is_initialized());

    let result = store
        .init_user_with(Profile::new("Alice", "https://x/a.png"))
        .await;

    assert!(result.is_ok(), "init_user failed: {:?}", result.err());
    assert!(store.is_initialized());
    assert!(!store.is_transaction_pending());

    // 전송된 명령어 확인
    let submitted = program.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].accounts[0].pubkey, user_pda(&wallet.pubkey()));
    assert_eq!(
        BlogInstruction::decode(&submitted[0].data).unwrap(),
        BlogInstruction::InitUser(InitUserArgs {
            name: "Alice".to_string(),
            avatar: "https://x/a.png".to_string(),
        })
    );

    // 원장에 계정이 생성됨
    let user = program.user(&wallet.pubkey()).unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.last_post_id, 0);

    // 다음 bootstrap에서 사용자 정보가 채워짐
    let outcome = store.refresh().await;
    assert!(matches!(outcome, BootstrapOutcome::Ready { posts: 0 }));
    assert_eq!(store.user().unwrap().name, "Alice");
}

/// 테스트: 랜덤 프로필로 초기화
#[tokio::test]
async fn test_init_user_with_random_profile() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    store.connect_wallet(as_signer(&wallet)).await;

    store.init_user().await.unwrap();

    let user = program.user(&wallet.pubkey()).unwrap();
    assert!(user.name.contains(' '));
    assert!(user.avatar.starts_with("https://"));
}

/// 테스트: init_user 실패 (강제 실패 주입)
///
/// initialized는 그대로 false, transaction_pending은 false로 돌아와야 합니다.
#[tokio::test]
async fn test_init_user_failure_leaves_state_untouched() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    store.connect_wallet(as_signer(&wallet)).await;

    program.fail_next_submit(BlogError::Submit("blockhash not found".to_string()));
    let result = store.init_user_with(Profile::new("Alice", "https://x/a.png")).await;

    assert!(matches!(result, Err(BlogError::Submit(_))));
    assert!(!store.is_initialized());
    assert!(!store.is_transaction_pending());
    assert!(program.user(&wallet.pubkey()).is_none());
}

/// 테스트: 이미 존재하는 사용자에게 다시 init_user
///
/// 원격 프로그램이 거부하고, 로컬 상태는 성공을 주장하지 않아야 합니다.
#[tokio::test]
async fn test_init_user_twice_is_rejected_remotely() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Bob", "https://x/b.png", 0).unwrap();
    store.connect_wallet(as_signer(&wallet)).await;
    assert!(store.is_initialized());

    let result = store.init_user().await;

    assert!(matches!(result, Err(BlogError::Submit(_))));
    assert!(!store.is_transaction_pending());
    assert_eq!(program.user(&wallet.pubkey()).unwrap().name, "Bob");
}

/// 테스트: 게시글 작성 시나리오 (last_post_id = 3)
///
/// index 3(4가 아님)으로 주소를 계산하고, 성공 시 모달이 닫히며,
/// 로컬 게시글 목록은 다음 bootstrap 전까지 바뀌지 않습니다.
#[tokio::test]
async fn test_create_post_uses_current_last_post_id() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Carol", "https://x/c.png", 3).unwrap();

    let outcome = store.connect_wallet(as_signer(&wallet)).await;
    assert!(matches!(outcome, BootstrapOutcome::Ready { posts: 0 }));
    assert_eq!(store.last_post_id(), 3);

    store.set_show_modal(true);
    let submission = store.create_post("Hi", "World").await.unwrap();

    assert_eq!(submission.post_index, 3);
    assert_eq!(submission.post_address, post_pda(&wallet.pubkey(), 3));
    assert_ne!(submission.post_address, post_pda(&wallet.pubkey(), 4));
    assert!(!store.show_modal());
    assert!(!store.is_transaction_pending());

    // 낙관적 업데이트 없음: 로컬 상태는 그대로
    assert!(store.posts().is_empty());
    assert_eq!(store.last_post_id(), 3);

    // 원장에는 반영됨
    assert_eq!(program.post_count(), 1);
    assert_eq!(program.user(&wallet.pubkey()).unwrap().last_post_id, 4);

    // 새로고침 후에 보임
    let outcome = store.refresh().await;
    assert!(matches!(outcome, BootstrapOutcome::Ready { posts: 1 }));
    let posts = store.posts();
    assert_eq!(posts[0].account.title, "Hi");
    assert_eq!(posts[0].account.content, "World");
    assert_eq!(posts[0].account.id, 3);
    assert_eq!(store.last_post_id(), 4);
}

/// 테스트: 새로고침 없이 두 번째 게시글 작성
///
/// 로컬 last_post_id가 오래되어 이미 사용된 주소를 계산하므로 원격에서 거부됩니다.
#[tokio::test]
async fn test_second_post_without_refresh_hits_stale_index() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Dave", "https://x/d.png", 0).unwrap();
    store.connect_wallet(as_signer(&wallet)).await;

    store.create_post("first", "post").await.unwrap();

    store.set_show_modal(true);
    let second = store.create_post("second", "post").await;
    assert!(matches!(second, Err(BlogError::Submit(_))));
    assert!(store.show_modal());

    store.refresh().await;
    let third = store.create_post("second", "post").await.unwrap();
    assert_eq!(third.post_index, 1);
    assert_eq!(program.post_count(), 2);
}

/// 테스트: create_post 실패 시 모달 유지
#[tokio::test]
async fn test_create_post_failure_keeps_modal_open() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Erin", "https://x/e.png", 0).unwrap();
    store.connect_wallet(as_signer(&wallet)).await;
    store.set_show_modal(true);

    program.fail_next_submit(BlogError::Submit("insufficient funds".to_string()));
    let result = store.create_post("Hi", "World").await;

    assert!(matches!(result, Err(BlogError::Submit(_))));
    assert!(store.show_modal());
    assert!(!store.is_transaction_pending());
    assert_eq!(program.post_count(), 0);
}

/// 테스트: user 조회 에러는 not-found와 같이 처리
#[tokio::test]
async fn test_fetch_user_error_is_treated_as_not_found() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Frank", "https://x/f.png", 1).unwrap();

    program.fail_next_fetch_user(BlogError::Rpc("connection reset".to_string()));
    let outcome = store.connect_wallet(as_signer(&wallet)).await;

    assert!(matches!(outcome, BootstrapOutcome::FetchFailed(BlogError::Rpc(_))));
    assert!(!store.is_initialized());
    assert!(store.user().is_none());
    assert!(store.posts().is_empty());

    // 다음 새로고침은 정상
    assert!(matches!(store.refresh().await, BootstrapOutcome::Ready { .. }));
    assert!(store.is_initialized());
}

/// 테스트: 게시글 조회 실패 시 부분 상태가 남지 않음
#[tokio::test]
async fn test_fetch_posts_error_leaves_no_partial_state() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Grace", "https://x/g.png", 2).unwrap();

    program.fail_next_fetch_posts(BlogError::Rpc("timeout".to_string()));
    let outcome = store.connect_wallet(as_signer(&wallet)).await;

    assert!(matches!(outcome, BootstrapOutcome::FetchFailed(_)));
    assert!(!store.is_initialized());
    assert!(store.user().is_none());
    assert_eq!(store.last_post_id(), 0);
}

/// 테스트: 게시글 목록은 작성자와 무관하게 전체
#[tokio::test]
async fn test_posts_include_every_author() {
    let (program, store) = setup_test();
    let alice = new_wallet();
    let bob = new_wallet();
    program.seed_user(&alice.pubkey(), "Alice", "https://x/a.png", 0).unwrap();
    program.seed_user(&bob.pubkey(), "Bob", "https://x/b.png", 0).unwrap();

    store.connect_wallet(as_signer(&bob)).await;
    store.create_post("from bob", "hello").await.unwrap();

    store.connect_wallet(as_signer(&alice)).await;
    store.create_post("from alice", "hello").await.unwrap();

    store.refresh().await;
    let mut titles: Vec<String> = store.posts().into_iter().map(|p| p.account.title).collect();
    titles.sort();
    assert_eq!(titles, vec!["from alice".to_string(), "from bob".to_string()]);
}

/// 테스트: 지갑 없이 명령 호출
#[tokio::test]
async fn test_commands_require_connected_wallet() {
    let (program, store) = setup_test();

    assert!(matches!(store.bootstrap().await, BootstrapOutcome::NoWallet));
    assert!(matches!(store.init_user().await, Err(BlogError::WalletNotConnected)));
    assert!(matches!(
        store.create_post("Hi", "World").await,
        Err(BlogError::WalletNotConnected)
    ));
    assert!(!store.is_transaction_pending());
    assert!(program.submitted().is_empty());
}

/// 테스트: 진행 중인 트랜잭션이 있을 때 다른 명령은 거부
///
/// transaction_pending은 실제 상호 배제 플래그입니다.
#[tokio::test]
async fn test_concurrent_commands_are_rejected() {
    let (program, store) = setup_test();
    let store = Arc::new(store);
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Heidi", "https://x/h.png", 0).unwrap();
    store.connect_wallet(as_signer(&wallet)).await;

    program.pause_submits();
    let background = store.clone();
    let handle = tokio::spawn(async move { background.create_post("Hi", "World").await });

    wait_until(|| store.is_transaction_pending()).await;

    let second = store.init_user().await;
    assert!(matches!(second, Err(BlogError::TransactionInFlight)));
    let third = store.create_post("again", "again").await;
    assert!(matches!(third, Err(BlogError::TransactionInFlight)));
    assert!(store.is_transaction_pending());

    program.resume_submits();
    let first = handle.await.unwrap();
    assert!(first.is_ok(), "first create_post failed: {:?}", first.err());
    assert!(!store.is_transaction_pending());
    assert_eq!(program.submitted().len(), 1);
}

/// 테스트: 진행 중인 명령이 취소되어도 transaction_pending은 해제
#[tokio::test]
async fn test_cancelled_command_releases_pending_flag() {
    let (program, store) = setup_test();
    let store = Arc::new(store);
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Ivan", "https://x/i.png", 0).unwrap();
    store.connect_wallet(as_signer(&wallet)).await;

    program.pause_submits();
    let background = store.clone();
    let handle = tokio::spawn(async move { background.create_post("Hi", "World").await });
    wait_until(|| store.is_transaction_pending()).await;

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
    assert!(!store.is_transaction_pending());

    program.resume_submits();
    assert!(store.create_post("Hi", "World").await.is_ok());
}

/// 테스트: 빠른 지갑 전환 시 이전 bootstrap 결과는 버려짐
#[tokio::test]
async fn test_stale_bootstrap_is_discarded() {
    let (program, store) = setup_test();
    let store = Arc::new(store);
    let alice = new_wallet();
    let bob = new_wallet();
    program.seed_user(&alice.pubkey(), "Alice", "https://x/a.png", 5).unwrap();

    // Alice의 조회를 멈춰둔 채 연결
    program.pause_fetch_user(user_pda(&alice.pubkey()));
    let background = store.clone();
    let alice_signer = as_signer(&alice);
    let handle = tokio::spawn(async move { background.connect_wallet(alice_signer).await });
    wait_until(|| store.wallet() == Some(alice.pubkey())).await;

    // Bob으로 전환 (Bob은 계정 없음)
    let outcome = store.connect_wallet(as_signer(&bob)).await;
    assert!(matches!(outcome, BootstrapOutcome::Uninitialized));

    // Alice 응답이 늦게 도착
    program.resume_fetch_user(&user_pda(&alice.pubkey()));
    let stale = handle.await.unwrap();
    assert!(matches!(stale, BootstrapOutcome::Stale), "got {:?}", stale);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.wallet, Some(bob.pubkey()));
    assert!(!snapshot.initialized);
    assert!(snapshot.user.is_none());
    assert_eq!(snapshot.last_post_id, 0);
}

/// 테스트: 지갑 연결 해제 시 로컬 상태 초기화
#[tokio::test]
async fn test_disconnect_resets_local_state() {
    let (program, store) = setup_test();
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Judy", "https://x/j.png", 1).unwrap();
    store.connect_wallet(as_signer(&wallet)).await;
    store.set_show_modal(true);
    assert!(store.is_initialized());

    store.disconnect_wallet();

    let snapshot = store.snapshot();
    assert!(snapshot.wallet.is_none());
    assert!(!snapshot.initialized);
    assert!(!snapshot.show_modal);
    assert!(snapshot.user.is_none());
    assert!(snapshot.posts.is_empty());
}

/// 테스트: 프로그램 클라이언트 교체 시 다시 bootstrap
#[tokio::test]
async fn test_set_program_bootstraps_again() {
    let (_first, store) = setup_test();
    let wallet = new_wallet();
    assert!(matches!(
        store.connect_wallet(as_signer(&wallet)).await,
        BootstrapOutcome::Uninitialized
    ));

    let second = Arc::new(MockBlogProgram::new(program_id()));
    second.seed_user(&wallet.pubkey(), "Mallory", "https://x/m.png", 0).unwrap();

    let outcome = store.set_program(second.clone() as Arc<dyn BlogProgram>).await;
    assert!(matches!(outcome, BootstrapOutcome::Ready { .. }));
    assert_eq!(store.user().unwrap().name, "Mallory");
}

/// 테스트: 같은 세션에서 겹친 새로고침
///
/// 먼저 시작한 새로고침(A)이 나중에 끝나도, 더 나중에 시작한 새로고침(B)의
/// 결과를 덮어쓰지 않아야 합니다. 그래야 다음 게시글이 현재 last_post_id를 씁니다.
#[tokio::test]
async fn test_overlapping_refreshes_keep_newest_result() {
    let (program, store) = setup_test();
    let store = Arc::new(store);
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Kim", "https://x/k.png", 0).unwrap();
    store.connect_wallet(as_signer(&wallet)).await;

    // A: user(last_post_id=0)를 읽은 뒤 게시글 조회에서 멈춤
    program.pause_next_fetch_posts();
    let background = store.clone();
    let refresh_a = tokio::spawn(async move { background.refresh().await });
    wait_until(|| program.is_fetch_posts_held()).await;

    store.create_post("first", "post").await.unwrap();

    // B: 게시글 작성 이후 상태를 끝까지 읽음
    let refresh_b = store.refresh().await;
    assert!(matches!(refresh_b, BootstrapOutcome::Ready { posts: 1 }));
    assert_eq!(store.last_post_id(), 1);

    // A가 늦게 끝남 → 버려져야 함
    program.resume_fetch_posts();
    let outcome_a = refresh_a.await.unwrap();
    assert!(matches!(outcome_a, BootstrapOutcome::Stale), "got {:?}", outcome_a);
    assert_eq!(store.last_post_id(), 1);
    assert_eq!(store.posts().len(), 1);

    let next = store.create_post("second", "post").await.unwrap();
    assert_eq!(next.post_index, 1);
    assert_eq!(program.post_count(), 2);
}

/// 테스트: 게시글 작성 전에 시작된 새로고침 결과는 작성 후에 반영하지 않음
#[tokio::test]
async fn test_refresh_started_before_post_is_discarded() {
    let (program, store) = setup_test();
    let store = Arc::new(store);
    let wallet = new_wallet();
    program.seed_user(&wallet.pubkey(), "Lee", "https://x/l.png", 0).unwrap();
    store.connect_wallet(as_signer(&wallet)).await;
    store.set_show_modal(true);

    program.pause_next_fetch_posts();
    let background = store.clone();
    let refresh = tokio::spawn(async move { background.refresh().await });
    wait_until(|| program.is_fetch_posts_held()).await;

    store.create_post("first", "post").await.unwrap();

    program.resume_fetch_posts();
    let outcome = refresh.await.unwrap();
    assert!(matches!(outcome, BootstrapOutcome::Stale), "got {:?}", outcome);
    assert!(!store.show_modal());

    // 다음 새로고침은 작성된 게시글을 반영
    assert!(matches!(store.refresh().await, BootstrapOutcome::Ready { posts: 1 }));
    assert_eq!(store.last_post_id(), 1);
}

/// 테스트: 지갑 전환 후 게시글은 새 지갑의 last_post_id로 작성
#[tokio::test]
async fn test_create_post_after_wallet_switch_uses_new_session_index() {
    let (program, store) = setup_test();
    let alice = new_wallet();
    let bob = new_wallet();
    program.seed_user(&alice.pubkey(), "Alice", "https://x/a.png", 5).unwrap();
    program.seed_user(&bob.pubkey(), "Bob", "https://x/b.png", 2).unwrap();

    store.connect_wallet(as_signer(&alice)).await;
    assert_eq!(store.last_post_id(), 5);
    store.connect_wallet(as_signer(&bob)).await;

    let submission = store.create_post("Hi", "World").await.unwrap();
    assert_eq!(submission.post_index, 2);
    assert_eq!(submission.post_address, post_pda(&bob.pubkey(), 2));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.wallet, Some(bob.pubkey()));
    assert_eq!(snapshot.user.unwrap().name, "Bob");
}
