// Shared clients
pub mod solana;
pub mod wallet;

pub use solana::SolanaClient;
pub use wallet::{KeypairWallet, WalletSigner};
