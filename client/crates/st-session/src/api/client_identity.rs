use reqwest::RequestBuilder;

const HEADER_CLIENT_PLATFORM: &str = "X-Client-Platform";
const HEADER_CLIENT_VERSION: &str = "X-Client-Version";
const HEADER_APP_VERSION: &str = "X-App-Version";
const HEADER_DEVICE_ID: &str = "X-Device-ID";

/// Identification headers sent with every gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub platform: String,
    pub version: String,
    pub device_id: String,
}

impl ClientIdentity {
    pub fn new(
        platform: impl Into<String>,
        version: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            version: version.into(),
            device_id: device_id.into(),
        }
    }

    pub(crate) fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(HEADER_CLIENT_PLATFORM, &self.platform)
            .header(HEADER_CLIENT_VERSION, &self.version)
            .header(HEADER_APP_VERSION, &self.version)
            .header(HEADER_DEVICE_ID, &self.device_id)
    }
}
