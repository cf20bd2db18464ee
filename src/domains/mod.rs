// Domains module
pub mod blog;
