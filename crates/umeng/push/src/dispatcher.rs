//! Push dispatcher: the caller-facing entry point.

use umeng_core::{FieldSet, Platform, PushError, PushSettings, TransportError, current_timestamp};

use crate::{
    Audience, DEFAULT_TIMEOUT, Endpoints, HttpTransport, PushFailure, PushOutcome, RequestBuilder,
    Transport,
};

/// App credentials from the Umeng console.
#[derive(Clone)]
pub struct Credentials {
    app_key: String,
    app_master_secret: String,
}

impl Credentials {
    pub fn new(app_key: impl Into<String>, app_master_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_master_secret: app_master_secret.into(),
        }
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_master_secret", &"<redacted>")
            .finish()
    }
}

/// Sends pushes for one app.
///
/// The timestamp is stamped at construction and only changes through
/// [`Dispatcher::update_timestamp`] or [`Dispatcher::set_timestamp`]; long-lived
/// dispatchers must refresh it themselves. Setters take `&mut self`, and every
/// send works on its own snapshot of the settings.
pub struct Dispatcher<T> {
    credentials: Credentials,
    timestamp: String,
    production_mode: bool,
    allow_empty_tag_filter: bool,
    dry_run: bool,
    endpoints: Endpoints,
    transport: T,
}

impl Dispatcher<HttpTransport> {
    /// Create a dispatcher talking to the production API over HTTPS.
    pub fn connect(credentials: Credentials) -> Result<Self, TransportError> {
        Ok(Self::new(credentials, HttpTransport::new(DEFAULT_TIMEOUT)?))
    }
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher over a transport.
    pub fn new(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            timestamp: current_timestamp(),
            production_mode: true,
            allow_empty_tag_filter: false,
            dry_run: false,
            endpoints: Endpoints::default(),
            transport,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Re-stamp the timestamp with the current time.
    pub fn update_timestamp(&mut self) -> &mut Self {
        self.timestamp = current_timestamp();
        self
    }

    pub fn set_timestamp(&mut self, timestamp: impl Into<String>) -> &mut Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// `false` delivers to registered test devices only.
    pub fn set_production_mode(&mut self, production_mode: bool) -> &mut Self {
        self.production_mode = production_mode;
        self
    }

    /// Production mode as sent on the wire: `"true"` or `"false"`.
    pub fn production_mode(&self) -> &'static str {
        if self.production_mode { "true" } else { "false" }
    }

    /// Allow groupcasts with no tags.
    pub fn set_allow_empty_tag_filter(&mut self, allow: bool) -> &mut Self {
        self.allow_empty_tag_filter = allow;
        self
    }

    /// Return signed requests instead of transmitting them.
    pub fn set_dry_run(&mut self, dry_run: bool) -> &mut Self {
        self.dry_run = dry_run;
        self
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of the state a send is built from.
    pub fn settings(&self) -> PushSettings {
        PushSettings::new(self.credentials.app_key())
            .with_timestamp(self.timestamp.as_str())
            .with_production_mode(self.production_mode)
            .with_empty_tag_filter(self.allow_empty_tag_filter)
    }

    /// Build, sign and transmit one push.
    pub async fn send(
        &self,
        platform: Platform,
        audience: Audience,
        values: FieldSet,
        extra: FieldSet,
    ) -> PushOutcome {
        let settings = self.settings();
        let cast = audience.cast_type();
        let builder = RequestBuilder::new(
            &self.transport,
            &self.endpoints,
            &settings,
            &self.credentials.app_master_secret,
        );

        tracing::info!(platform = %platform, cast = %cast, "building push");

        let built = match builder.build(platform, &audience, &values, &extra).await {
            Ok(built) => built,
            Err(e) => {
                tracing::warn!(platform = %platform, cast = %cast, error = %e, "push not built");
                return PushOutcome::failure(e);
            }
        };

        if self.dry_run {
            tracing::info!(url = %built.signed.url(), "dry run, push not sent");
            return PushOutcome::Prepared(built.signed);
        }

        match self.transport.execute(&built.signed).await {
            Ok(response) if response.is_success() => {
                tracing::info!(
                    platform = %platform,
                    cast = %cast,
                    msg_id = response.msg_id(),
                    task_id = response.task_id(),
                    "push accepted"
                );
                PushOutcome::Sent(response)
            }
            Ok(response) => {
                let failure = PushFailure::rejected(&response);
                tracing::warn!(platform = %platform, cast = %cast, error = %failure, "push rejected");
                PushOutcome::Failed(failure)
            }
            Err(e) => {
                tracing::warn!(platform = %platform, cast = %cast, error = %e, "push transport failed");
                PushOutcome::failure(PushError::from(e))
            }
        }
    }

    pub async fn send_android_broadcast(&self, values: FieldSet, extra: FieldSet) -> PushOutcome {
        self.send(Platform::Android, Audience::All, values, extra).await
    }

    /// `device_tokens` is one token or a comma-joined list.
    pub async fn send_android_unicast(
        &self,
        values: FieldSet,
        extra: FieldSet,
        device_tokens: &str,
    ) -> PushOutcome {
        let audience = Audience::Devices(device_tokens.to_string());
        self.send(Platform::Android, audience, values, extra).await
    }

    pub async fn send_android_filecast(
        &self,
        values: FieldSet,
        extra: FieldSet,
        tokens: &[impl AsRef<str> + Sync],
    ) -> PushOutcome {
        let audience = Audience::DeviceFile(owned(tokens));
        self.send(Platform::Android, audience, values, extra).await
    }

    pub async fn send_android_groupcast(
        &self,
        values: FieldSet,
        extra: FieldSet,
        tags: &[impl AsRef<str> + Sync],
    ) -> PushOutcome {
        let audience = Audience::Tags(owned(tags));
        self.send(Platform::Android, audience, values, extra).await
    }

    pub async fn send_android_customizedcast(
        &self,
        values: FieldSet,
        extra: FieldSet,
        alias: &str,
        alias_type: &str,
    ) -> PushOutcome {
        let audience = Audience::Alias {
            alias: alias.to_string(),
            alias_type: alias_type.to_string(),
        };
        self.send(Platform::Android, audience, values, extra).await
    }

    pub async fn send_android_customizedcast_file(
        &self,
        values: FieldSet,
        extra: FieldSet,
        aliases: &[impl AsRef<str> + Sync],
    ) -> PushOutcome {
        let audience = Audience::AliasFile(owned(aliases));
        self.send(Platform::Android, audience, values, extra).await
    }

    pub async fn send_ios_broadcast(&self, values: FieldSet, custom: FieldSet) -> PushOutcome {
        self.send(Platform::Ios, Audience::All, values, custom).await
    }

    /// `device_tokens` is one token or a comma-joined list.
    pub async fn send_ios_unicast(
        &self,
        values: FieldSet,
        custom: FieldSet,
        device_tokens: &str,
    ) -> PushOutcome {
        let audience = Audience::Devices(device_tokens.to_string());
        self.send(Platform::Ios, audience, values, custom).await
    }

    pub async fn send_ios_filecast(
        &self,
        values: FieldSet,
        custom: FieldSet,
        tokens: &[impl AsRef<str> + Sync],
    ) -> PushOutcome {
        let audience = Audience::DeviceFile(owned(tokens));
        self.send(Platform::Ios, audience, values, custom).await
    }

    pub async fn send_ios_groupcast(
        &self,
        values: FieldSet,
        custom: FieldSet,
        tags: &[impl AsRef<str> + Sync],
    ) -> PushOutcome {
        let audience = Audience::Tags(owned(tags));
        self.send(Platform::Ios, audience, values, custom).await
    }

    pub async fn send_ios_customizedcast(
        &self,
        values: FieldSet,
        custom: FieldSet,
        alias: &str,
        alias_type: &str,
    ) -> PushOutcome {
        let audience = Audience::Alias {
            alias: alias.to_string(),
            alias_type: alias_type.to_string(),
        };
        self.send(Platform::Ios, audience, values, custom).await
    }

    pub async fn send_ios_customizedcast_file(
        &self,
        values: FieldSet,
        custom: FieldSet,
        aliases: &[impl AsRef<str> + Sync],
    ) -> PushOutcome {
        let audience = Audience::AliasFile(owned(aliases));
        self.send(Platform::Ios, audience, values, custom).await
    }
}

fn owned(entries: &[impl AsRef<str>]) -> Vec<String> {
    entries.iter().map(|e| e.as_ref().to_string()).collect()
}
