//! API endpoint URLs.

/// Production API host.
pub const DEFAULT_HOST: &str = "https://msgapi.umeng.com";

/// Send and upload endpoints of one API host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub send: String,
    pub upload: String,
}

impl Endpoints {
    pub fn new(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        Self {
            send: format!("{host}/api/send"),
            upload: format!("{host}/upload"),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_host() {
        let endpoints = Endpoints::new("http://localhost:8080/");
        assert_eq!(endpoints.send, "http://localhost:8080/api/send");
        assert_eq!(endpoints.upload, "http://localhost:8080/upload");
    }
}
