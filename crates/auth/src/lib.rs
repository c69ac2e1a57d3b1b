//! `shelfline-auth`: client-side session bookkeeping.
//!
//! The backend issues and validates tokens; this crate only remembers the
//! token between runs and answers "is there one?". There is no refresh and no
//! expiry check: an expired token is discovered when the API answers 401.

pub mod dto;
pub mod error;
pub mod session;
pub mod token_store;

pub use dto::{LoginRequest, RegisterRequest, TokenResponse, UserProfile};
pub use error::AuthError;
pub use session::Session;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
