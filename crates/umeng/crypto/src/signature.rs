//! Umeng request signatures.

use umeng_core::SignatureError;

/// HTTP method of a signed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the request signature.
///
/// Lowercase hex MD5 of `method || url || body || secret`, where `url` is the
/// full endpoint URL without the signature parameter.
pub fn sign(method: Method, url: &str, body: &str, secret: &str) -> String {
    let mut context = md5::Context::new();
    context.consume(method.as_str());
    context.consume(url);
    context.consume(body);
    context.consume(secret);
    format!("{:x}", context.compute())
}

/// A finalized request body together with its signature.
///
/// The signature covers exactly the body stored here, and travels as the
/// `sign` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: Method,
    url: String,
    body: String,
    signature: String,
}

impl SignedRequest {
    /// Sign a finalized body.
    pub fn new(
        method: Method,
        url: impl Into<String>,
        body: impl Into<String>,
        secret: &str,
    ) -> Result<Self, SignatureError> {
        let url = url.into();
        let body = body.into();

        if secret.is_empty() {
            return Err(SignatureError::MissingSecret);
        }
        if method == Method::Post && body.is_empty() {
            return Err(SignatureError::EmptyBody);
        }

        let signature = sign(method, &url, &body, secret);
        tracing::trace!(method = %method, url = %url, "request signed");

        Ok(Self {
            method,
            url,
            body,
            signature,
        })
    }

    /// Sign a POST body.
    pub fn post(
        url: impl Into<String>,
        body: impl Into<String>,
        secret: &str,
    ) -> Result<Self, SignatureError> {
        Self::new(Method::Post, url, body, secret)
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Endpoint URL without the signature.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Query parameters to append to [`Self::url`].
    pub fn query(&self) -> [(&'static str, &str); 1] {
        [("sign", self.signature.as_str())]
    }

    /// URL with the `sign` query parameter appended.
    pub fn signed_url(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}sign={}", self.url, separator, self.signature)
    }

    /// Check the signature against a secret.
    pub fn verify(&self, secret: &str) -> bool {
        sign(self.method, &self.url, &self.body, secret) == self.signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://msgapi.umeng.com/api/send";
    const BODY: &str = r#"{"appkey":"k","timestamp":"1"}"#;

    #[test]
    fn test_sign_is_md5_of_concatenation() {
        let expected = format!(
            "{:x}",
            md5::compute(format!("POST{URL}{BODY}secret").as_bytes())
        );
        assert_eq!(sign(Method::Post, URL, BODY, "secret"), expected);
    }

    #[test]
    fn test_sign_is_deterministic() {
        let first = sign(Method::Post, URL, BODY, "secret");
        let second = sign(Method::Post, URL, BODY, "secret");
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_every_input_changes_signature() {
        let base = sign(Method::Post, URL, BODY, "secret");
        assert_ne!(base, sign(Method::Get, URL, BODY, "secret"));
        assert_ne!(base, sign(Method::Post, "https://msgapi.umeng.com/upload", BODY, "secret"));
        assert_ne!(base, sign(Method::Post, URL, r#"{"appkey":"k","timestamp":"2"}"#, "secret"));
        assert_ne!(base, sign(Method::Post, URL, BODY, "other"));
    }

    #[test]
    fn test_signed_url_appends_sign() {
        let request = SignedRequest::post(URL, BODY, "secret").unwrap();
        assert_eq!(
            request.signed_url(),
            format!("{URL}?sign={}", request.signature())
        );
        assert!(!request.body().contains(request.signature()));
        assert!(request.verify("secret"));
        assert!(!request.verify("wrong"));
    }

    #[test]
    fn test_preconditions() {
        assert!(matches!(
            SignedRequest::post(URL, BODY, ""),
            Err(SignatureError::MissingSecret)
        ));
        assert!(matches!(
            SignedRequest::post(URL, "", "secret"),
            Err(SignatureError::EmptyBody)
        ));
        assert!(SignedRequest::new(Method::Get, URL, "", "secret").is_ok());
    }
}
