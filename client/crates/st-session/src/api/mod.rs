mod api_client;
mod client_identity;

pub use api_client::ApiClient;
pub use client_identity::ClientIdentity;
