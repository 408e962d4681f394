mod profile_client;
mod profile_update_data;
mod user_profile;

pub use profile_client::ProfileClient;
pub use profile_update_data::ProfileUpdateData;
pub use user_profile::UserProfile;
