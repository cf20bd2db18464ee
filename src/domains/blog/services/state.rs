// Blog domain state
// 블로그 도메인 상태
use crate::domains::blog::program::BlogProgram;
use crate::domains::blog::services::BlogStore;
use std::sync::Arc;

/// Blog domain state
/// 블로그 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct BlogState {
    pub blog_store: Arc<BlogStore>,
}

impl BlogState {
    /// Create BlogState with a program client
    /// 프로그램 클라이언트를 주입받아 스토어 생성 (지갑은 나중에 연결)
    pub fn new(program: Arc<dyn BlogProgram>) -> Self {
        Self {
            blog_store: Arc::new(BlogStore::new(program)),
        }
    }
}
