use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity providers the gateway accepts ID tokens from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Apple,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Apple => "apple",
        }
    }

    pub(crate) fn sign_in_endpoint(&self) -> &'static str {
        match self {
            AuthProvider::Google => "/auth/google",
            AuthProvider::Apple => "/auth/apple",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
