// Solana blog client: 지갑 연결, 사용자 초기화, 게시글 작성/조회
pub mod domains;
pub mod routes;
pub mod shared;
