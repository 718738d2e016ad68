//! Grants, bearer tokens, and the OIDC token exchange.

pub mod exchange;
pub mod grant;
pub mod token;

pub use exchange::*;
pub use grant::*;
pub use token::*;
