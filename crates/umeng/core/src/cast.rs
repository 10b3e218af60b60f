//! Platform and cast-type matrix.

use crate::{FieldSet, ValidationError};

/// Target device platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Required notification fields, in wire order, before caller values apply.
    pub fn defaults(self) -> FieldSet {
        match self {
            Self::Android => FieldSet::new()
                .with("display_type", "notification")
                .with("ticker", "")
                .with("title", "")
                .with("text", "")
                .with("after_open", "go_app"),
            Self::Ios => FieldSet::new()
                .with("alert", "")
                .with("badge", 0)
                .with("sound", "chime")
                .with("content-available", 1),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Android => write!(f, "android"),
            Self::Ios => write!(f, "ios"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            _ => Err(ValidationError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Audience-selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastType {
    /// Every device of the app.
    Broadcast,
    /// Devices named by token.
    Unicast,
    /// Devices listed in an uploaded file.
    Filecast,
    /// Devices matching a tag filter.
    Groupcast,
    /// Devices registered under an alias.
    Customizedcast,
}

impl CastType {
    /// Name used for the `type` field on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::Unicast => "unicast",
            Self::Filecast => "filecast",
            Self::Groupcast => "groupcast",
            Self::Customizedcast => "customizedcast",
        }
    }

    /// Addressing kinds this cast type can be sent with.
    pub fn accepts(self) -> &'static [AddressingKind] {
        match self {
            Self::Broadcast => &[],
            Self::Unicast => &[AddressingKind::DeviceTokens],
            Self::Filecast => &[AddressingKind::File],
            Self::Groupcast => &[AddressingKind::Filter],
            Self::Customizedcast => &[AddressingKind::Alias, AddressingKind::File],
        }
    }

    /// Human description of the required audience, for error messages.
    pub fn expected_audience(self) -> &'static str {
        match self {
            Self::Broadcast => "no audience",
            Self::Unicast => "device tokens",
            Self::Filecast => "an uploaded token file",
            Self::Groupcast => "a tag filter",
            Self::Customizedcast => "an alias or an uploaded alias file",
        }
    }
}

impl std::fmt::Display for CastType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the audience carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingKind {
    DeviceTokens,
    Alias,
    File,
    Filter,
}

impl std::fmt::Display for AddressingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeviceTokens => write!(f, "device tokens"),
            Self::Alias => write!(f, "alias"),
            Self::File => write!(f, "file id"),
            Self::Filter => write!(f, "tag filter"),
        }
    }
}

/// Configuration of one (cast type, platform) builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastProfile {
    pub platform: Platform,
    pub cast_type: CastType,
}

impl CastProfile {
    pub const fn new(platform: Platform, cast_type: CastType) -> Self {
        Self {
            platform,
            cast_type,
        }
    }

    /// Every supported combination.
    pub const ALL: [CastProfile; 10] = [
        CastProfile::new(Platform::Android, CastType::Broadcast),
        CastProfile::new(Platform::Android, CastType::Unicast),
        CastProfile::new(Platform::Android, CastType::Filecast),
        CastProfile::new(Platform::Android, CastType::Groupcast),
        CastProfile::new(Platform::Android, CastType::Customizedcast),
        CastProfile::new(Platform::Ios, CastType::Broadcast),
        CastProfile::new(Platform::Ios, CastType::Unicast),
        CastProfile::new(Platform::Ios, CastType::Filecast),
        CastProfile::new(Platform::Ios, CastType::Groupcast),
        CastProfile::new(Platform::Ios, CastType::Customizedcast),
    ];

    pub fn defaults(&self) -> FieldSet {
        self.platform.defaults()
    }

    pub fn accepts(&self, kind: Option<AddressingKind>) -> bool {
        match kind {
            None => self.cast_type.accepts().is_empty(),
            Some(kind) => self.cast_type.accepts().contains(&kind),
        }
    }
}
