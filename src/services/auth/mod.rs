pub mod compare;
pub mod credential;
pub mod secret_store;
pub mod signed_token;
pub mod verdict;
pub mod verifier;

pub use secret_store::SecretStore;
pub use verdict::{AuthFailure, Scheme, Verdict};
pub use verifier::Authenticator;
