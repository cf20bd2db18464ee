pub mod account;
pub mod blog;

pub use account::*;
pub use blog::*;
