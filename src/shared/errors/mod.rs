// Errors module: 커스텀 에러 타입
// Errors module: custom error types
pub mod blog_error;

pub use blog_error::*;
