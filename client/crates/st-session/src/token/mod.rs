mod access_claims;
mod token_pair;
mod token_store;

pub use access_claims::AccessClaims;
pub use token_pair::TokenPair;
pub(crate) use token_store::TokenStore;
