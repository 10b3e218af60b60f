//! Request building for every (cast type, platform) pair.

use umeng_core::{
    Addressing, CastProfile, CastType, FILE_ALIAS_TYPE, FieldSet, Platform, PushError,
    PushRequest, PushSettings, SignatureError, TagFilter, ValidationError,
};
use umeng_crypto::SignedRequest;

use crate::{Endpoints, Transport, Uploader};

/// Audience as supplied by the caller, before uploads and filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every device (broadcast).
    All,
    /// A single token or a comma-joined token list (unicast).
    Devices(String),
    /// Tokens to upload as a file (filecast).
    DeviceFile(Vec<String>),
    /// Tags every target device must carry (groupcast).
    Tags(Vec<String>),
    /// Alias of a given type (customizedcast).
    Alias { alias: String, alias_type: String },
    /// Aliases to upload as a file (customizedcast).
    AliasFile(Vec<String>),
}

impl Audience {
    pub fn cast_type(&self) -> CastType {
        match self {
            Self::All => CastType::Broadcast,
            Self::Devices(_) => CastType::Unicast,
            Self::DeviceFile(_) => CastType::Filecast,
            Self::Tags(_) => CastType::Groupcast,
            Self::Alias { .. } | Self::AliasFile(_) => CastType::Customizedcast,
        }
    }
}

/// A built request and its signed form.
#[derive(Debug, Clone)]
pub struct BuiltPush {
    pub request: PushRequest,
    pub signed: SignedRequest,
}

/// Builds signed send requests from one settings snapshot.
pub struct RequestBuilder<'a, T> {
    transport: &'a T,
    endpoints: &'a Endpoints,
    settings: &'a PushSettings,
    secret: &'a str,
}

impl<'a, T: Transport> RequestBuilder<'a, T> {
    pub fn new(
        transport: &'a T,
        endpoints: &'a Endpoints,
        settings: &'a PushSettings,
        secret: &'a str,
    ) -> Self {
        Self {
            transport,
            endpoints,
            settings,
            secret,
        }
    }

    /// Validate, upload if needed, merge fields and sign.
    ///
    /// Local checks run before the upload, so a rejected input never
    /// reaches the network.
    pub async fn build(
        &self,
        platform: Platform,
        audience: &Audience,
        values: &FieldSet,
        extra: &FieldSet,
    ) -> Result<BuiltPush, PushError> {
        let profile = CastProfile::new(platform, audience.cast_type());

        if self.secret.is_empty() {
            return Err(SignatureError::MissingSecret.into());
        }
        PushRequest::check_fields(profile, values, extra)?;

        let addressing = self.resolve(profile, audience).await?;
        let request = PushRequest::assemble(profile, self.settings, &addressing, values, extra)?;
        let signed = SignedRequest::post(&self.endpoints.send, request.to_body(), self.secret)?;

        Ok(BuiltPush { request, signed })
    }

    async fn resolve(
        &self,
        profile: CastProfile,
        audience: &Audience,
    ) -> Result<Addressing, PushError> {
        let addressing = match audience {
            Audience::All => Addressing::None,
            Audience::Devices(tokens) => Addressing::device_tokens(tokens),
            Audience::Tags(tags) => Addressing::Filter(TagFilter::new(tags.iter().cloned())),
            Audience::Alias { alias, alias_type } => Addressing::Alias {
                alias: alias.clone(),
                alias_type: alias_type.clone(),
            },
            Audience::DeviceFile(tokens) => Addressing::File {
                file_id: self.upload(profile, tokens).await?,
                alias_type: None,
            },
            Audience::AliasFile(aliases) => Addressing::File {
                file_id: self.upload(profile, aliases).await?,
                alias_type: Some(FILE_ALIAS_TYPE.to_string()),
            },
        };
        Ok(addressing)
    }

    async fn upload(&self, profile: CastProfile, entries: &[String]) -> Result<String, PushError> {
        // Blank lines would upload as empty tokens.
        if entries.is_empty() || entries.iter().any(|e| e.trim().is_empty()) {
            return Err(ValidationError::MissingAddressing {
                cast: profile.cast_type,
                expected: profile.cast_type.expected_audience(),
            }
            .into());
        }

        let uploader = Uploader::new(self.transport, &self.endpoints.upload, self.settings, self.secret);
        Ok(uploader.upload_entries(entries).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use serde_json::json;

    fn settings() -> PushSettings {
        PushSettings::new("app-key").with_timestamp("1700000000")
    }

    #[tokio::test]
    async fn test_groupcast_filter() {
        let transport = RecordingTransport::new();
        let endpoints = Endpoints::default();
        let settings = settings();
        let builder = RequestBuilder::new(&transport, &endpoints, &settings, "secret");

        let built = builder
            .build(
                Platform::Android,
                &Audience::Tags(vec!["vip".into(), "new".into()]),
                &FieldSet::new(),
                &FieldSet::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            built.request.field("filter"),
            Some(&json!({"where": {"and": [{"tag": "vip"}, {"tag": "new"}]}}))
        );
        assert!(built.request.field("device_tokens").is_none());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_filecast_uses_uploaded_file_id() {
        let transport = RecordingTransport::new();
        let endpoints = Endpoints::default();
        let settings = settings();
        let builder = RequestBuilder::new(&transport, &endpoints, &settings, "secret");

        let built = builder
            .build(
                Platform::Ios,
                &Audience::DeviceFile(vec!["t1".into(), "t2".into()]),
                &FieldSet::new(),
                &FieldSet::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            built.request.fields().get_str("file_id"),
            Some(RecordingTransport::FILE_ID)
        );
        assert!(!built.signed.body().contains("t1"));
        assert_eq!(transport.upload_bodies()[0]["content"], "t1\nt2");
    }

    #[tokio::test]
    async fn test_alias_file_pins_alias_type() {
        let transport = RecordingTransport::new();
        let endpoints = Endpoints::default();
        let settings = settings();
        let builder = RequestBuilder::new(&transport, &endpoints, &settings, "secret");

        let built = builder
            .build(
                Platform::Android,
                &Audience::AliasFile(vec!["u1".into(), "u2".into()]),
                &FieldSet::new(),
                &FieldSet::new(),
            )
            .await
            .unwrap();

        assert_eq!(built.request.fields().get_str("alias_type"), Some(FILE_ALIAS_TYPE));
        assert_eq!(built.request.fields().get_str("type"), Some("customizedcast"));
        assert_eq!(transport.upload_bodies()[0]["content"], "u1\nu2");
    }

    #[tokio::test]
    async fn test_invalid_fields_checked_before_upload() {
        let transport = RecordingTransport::new();
        let endpoints = Endpoints::default();
        let settings = settings();
        let builder = RequestBuilder::new(&transport, &endpoints, &settings, "secret");

        let err = builder
            .build(
                Platform::Android,
                &Audience::DeviceFile(vec!["t1".into()]),
                &FieldSet::new().with("file_id", "mine"),
                &FieldSet::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PushError::Validation(ValidationError::ReservedKey(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_upload_list_is_validation_error() {
        let transport = RecordingTransport::new();
        let endpoints = Endpoints::default();
        let settings = settings();
        let builder = RequestBuilder::new(&transport, &endpoints, &settings, "secret");

        let err = builder
            .build(
                Platform::Android,
                &Audience::DeviceFile(Vec::new()),
                &FieldSet::new(),
                &FieldSet::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PushError::Validation(ValidationError::MissingAddressing { .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_blank_entry_in_upload_list_is_validation_error() {
        let transport = RecordingTransport::new();
        let endpoints = Endpoints::default();
        let settings = settings();
        let builder = RequestBuilder::new(&transport, &endpoints, &settings, "secret");

        for audience in [
            Audience::DeviceFile(vec!["t1".into(), "".into(), "t2".into()]),
            Audience::AliasFile(vec!["u1".into(), "  ".into()]),
        ] {
            let err = builder
                .build(Platform::Ios, &audience, &FieldSet::new(), &FieldSet::new())
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                PushError::Validation(ValidationError::MissingAddressing { .. })
            ));
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_secret_never_uploads() {
        let transport = RecordingTransport::new();
        let endpoints = Endpoints::default();
        let settings = settings();
        let builder = RequestBuilder::new(&transport, &endpoints, &settings, "");

        let err = builder
            .build(
                Platform::Android,
                &Audience::DeviceFile(vec!["t1".into()]),
                &FieldSet::new(),
                &FieldSet::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PushError::Signature(SignatureError::MissingSecret)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_signature_covers_body() {
        let transport = RecordingTransport::new();
        let endpoints = Endpoints::default();
        let settings = settings();
        let builder = RequestBuilder::new(&transport, &endpoints, &settings, "secret");

        let built = builder
            .build(
                Platform::Ios,
                &Audience::Devices("abc".into()),
                &FieldSet::new().with("alert", "hello"),
                &FieldSet::new().with("deeplink", "app://x"),
            )
            .await
            .unwrap();

        assert_eq!(built.signed.url(), endpoints.send);
        assert_eq!(built.signed.body(), built.request.to_body());
        assert!(built.signed.verify("secret"));

        let body: serde_json::Value = serde_json::from_str(built.signed.body()).unwrap();
        assert_eq!(body["payload"]["aps"]["alert"], "hello");
        assert_eq!(body["payload"]["deeplink"], "app://x");
    }
}
