use std::env;

const DEFAULT_HTTP_ADDRESS: &str = "0.0.0.0:3000";

/// Listener settings, read from `HWPROJ_HTTP*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub http_address: String,
    pub https: Option<HttpsSettings>,
    /// Serve the OpenAPI document under `/doc`.
    pub doc: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpsSettings {
    pub address: String,
    pub cert: String,
    pub private_key: String,
}

impl HttpSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let https_address = var("HWPROJ_HTTPS_ADDRESS");
        let https = (!https_address.is_empty()).then(|| HttpsSettings {
            address: https_address,
            cert: var("HWPROJ_HTTPS_CERT"),
            private_key: var("HWPROJ_HTTPS_PRIVATE_KEY"),
        });

        let http_address = lookup("HWPROJ_HTTP_ADDRESS")
            .filter(|x| !x.is_empty())
            .unwrap_or_else(|| DEFAULT_HTTP_ADDRESS.to_owned());

        Self {
            http_address,
            https,
            doc: var("HWPROJ_HTTP_DOC") == "true",
        }
    }
}
