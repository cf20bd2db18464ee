pub mod blog_store;
pub mod identity;
pub mod state;

pub use blog_store::{BlogSnapshot, BlogStore, BootstrapOutcome, PostSubmission};
pub use identity::Profile;
pub use state::BlogState;
