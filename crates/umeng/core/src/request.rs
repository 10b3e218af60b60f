//! Push request assembly.

use serde_json::Value;

use crate::{AddressingKind, CastProfile, CastType, FieldSet, Platform, TagFilter, ValidationError};

/// Fields carrying the sender identity. Caller values never override these.
pub const IDENTITY_KEYS: [&str; 4] = ["appkey", "timestamp", "type", "production_mode"];

/// Fields carrying the audience. Only [`Addressing`] sets these.
pub const ADDRESSING_KEYS: [&str; 5] = ["device_tokens", "alias", "alias_type", "file_id", "filter"];

/// `alias_type` sent with a file-based customizedcast.
pub const FILE_ALIAS_TYPE: &str = "xx";

/// Resolved audience of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Addressing {
    /// Broadcast to every device.
    None,
    /// One token or a comma-joined token list, exactly as given.
    DeviceTokens(String),
    /// Application-defined alias.
    Alias { alias: String, alias_type: String },
    /// File id returned by the upload endpoint.
    File {
        file_id: String,
        alias_type: Option<String>,
    },
    /// Tag filter (groupcast).
    Filter(TagFilter),
}

impl Addressing {
    pub fn device_tokens(tokens: impl Into<String>) -> Self {
        Self::DeviceTokens(tokens.into())
    }

    /// Non-blank entries of a token list. The list itself is sent unchanged.
    fn token_count(tokens: &str) -> usize {
        tokens.split(',').filter(|t| !t.trim().is_empty()).count()
    }

    pub fn kind(&self) -> Option<AddressingKind> {
        match self {
            Self::None => None,
            Self::DeviceTokens(_) => Some(AddressingKind::DeviceTokens),
            Self::Alias { .. } => Some(AddressingKind::Alias),
            Self::File { .. } => Some(AddressingKind::File),
            Self::Filter(_) => Some(AddressingKind::Filter),
        }
    }

    fn validate(&self, profile: CastProfile, allow_empty_filter: bool) -> Result<(), ValidationError> {
        let cast = profile.cast_type;
        let missing = || ValidationError::MissingAddressing {
            cast,
            expected: cast.expected_audience(),
        };

        if !profile.accepts(self.kind()) {
            return Err(match self.kind() {
                None => missing(),
                Some(given) => ValidationError::UnsupportedAddressing { cast, given },
            });
        }

        match self {
            Self::None => Ok(()),
            Self::DeviceTokens(tokens) if Self::token_count(tokens) == 0 => Err(missing()),
            Self::DeviceTokens(_) => Ok(()),
            Self::Alias { alias, alias_type } if alias.is_empty() || alias_type.is_empty() => {
                Err(missing())
            }
            Self::Alias { .. } => Ok(()),
            Self::File { file_id, .. } if file_id.is_empty() => Err(missing()),
            Self::File { .. } => Ok(()),
            Self::Filter(filter) if filter.is_empty() && !allow_empty_filter => {
                Err(ValidationError::EmptyTagFilter)
            }
            Self::Filter(_) => Ok(()),
        }
    }

    fn apply(&self, fields: &mut FieldSet) {
        match self {
            Self::None => {}
            Self::DeviceTokens(tokens) => {
                fields.insert("device_tokens", tokens.as_str());
            }
            Self::Alias { alias, alias_type } => {
                fields.insert("alias", alias.as_str());
                fields.insert("alias_type", alias_type.as_str());
            }
            Self::File {
                file_id,
                alias_type,
            } => {
                fields.insert("file_id", file_id.as_str());
                if let Some(alias_type) = alias_type {
                    fields.insert("alias_type", alias_type.as_str());
                }
            }
            Self::Filter(filter) => {
                fields.insert("filter", filter.to_value());
            }
        }
    }

    /// Wire `type`; a unicast to several tokens is a listcast.
    fn wire_type(&self, cast: CastType) -> &'static str {
        match self {
            Self::DeviceTokens(tokens)
                if cast == CastType::Unicast && Self::token_count(tokens) > 1 =>
            {
                "listcast"
            }
            _ => cast.as_str(),
        }
    }
}

/// Dispatcher state captured once per send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSettings {
    /// Application key.
    pub app_key: String,
    /// Seconds since the epoch, as a string.
    pub timestamp: String,
    /// `false` targets registered test devices only.
    pub production_mode: bool,
    /// Accept groupcasts with an empty tag filter.
    pub allow_empty_tag_filter: bool,
}

impl PushSettings {
    /// Create settings stamped with the current time, in production mode.
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            timestamp: current_timestamp(),
            production_mode: true,
            allow_empty_tag_filter: false,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_production_mode(mut self, production_mode: bool) -> Self {
        self.production_mode = production_mode;
        self
    }

    pub fn with_empty_tag_filter(mut self, allow: bool) -> Self {
        self.allow_empty_tag_filter = allow;
        self
    }

    /// Production mode as sent on the wire.
    pub fn production_mode_value(&self) -> &'static str {
        if self.production_mode { "true" } else { "false" }
    }
}

/// Current Unix time in seconds, as a string.
pub fn current_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// A fully merged push request for one (cast type, platform) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PushRequest {
    profile: CastProfile,
    fields: FieldSet,
    extra: FieldSet,
}

impl PushRequest {
    /// Merge identity, audience, platform defaults and caller values.
    ///
    /// Order on the wire: identity fields, audience fields, platform defaults,
    /// then caller keys not already present. Caller values replace defaults in
    /// place; identity fields are re-applied last.
    pub fn assemble(
        profile: CastProfile,
        settings: &PushSettings,
        addressing: &Addressing,
        values: &FieldSet,
        extra: &FieldSet,
    ) -> Result<Self, ValidationError> {
        Self::check_fields(profile, values, extra)?;
        addressing.validate(profile, settings.allow_empty_tag_filter)?;

        let identity = FieldSet::new()
            .with("appkey", settings.app_key.as_str())
            .with("timestamp", settings.timestamp.as_str())
            .with("type", addressing.wire_type(profile.cast_type))
            .with("production_mode", settings.production_mode_value());

        if let Some(key) = values.keys().find(|k| IDENTITY_KEYS.contains(k)) {
            tracing::debug!(key, "ignoring identity field in caller values");
        }

        let mut fields = identity.clone();
        addressing.apply(&mut fields);
        fields.merge(&profile.defaults());
        fields.merge(values);
        fields.merge(&identity);

        Ok(Self {
            profile,
            fields,
            extra: extra.clone(),
        })
    }

    /// Reject caller fields that would clash with the request structure.
    pub fn check_fields(
        profile: CastProfile,
        values: &FieldSet,
        extra: &FieldSet,
    ) -> Result<(), ValidationError> {
        if let Some(key) = values
            .keys()
            .find(|k| ADDRESSING_KEYS.contains(k) || crate::LAYOUT_KEYS.contains(k))
        {
            return Err(ValidationError::ReservedKey(key.to_string()));
        }
        if profile.platform == Platform::Ios && extra.contains_key("aps") {
            return Err(ValidationError::ReservedCustomKey("aps".to_string()));
        }
        Ok(())
    }

    pub fn platform(&self) -> Platform {
        self.profile.platform
    }

    pub fn cast_type(&self) -> CastType {
        self.profile.cast_type
    }

    /// Merged predefined fields, flat.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Android `extra` or iOS customized fields.
    pub fn extra(&self) -> &FieldSet {
        &self.extra
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Nested JSON body as the API expects it.
    pub fn to_wire(&self) -> Value {
        crate::encode_wire(self.profile.platform, &self.fields, &self.extra)
    }

    /// Serialized body, ready to sign.
    pub fn to_body(&self) -> String {
        self.to_wire().to_string()
    }
}
