mod auth_provider;
mod auth_response;
mod session_manager;
mod user_info;

pub use auth_provider::AuthProvider;
pub use session_manager::SessionManager;
pub use user_info::UserInfo;
