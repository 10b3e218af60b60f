//! Wire layout of the push body.
//!
//! Predefined fields are flat in a [`FieldSet`]; the API nests them:
//!
//! ```text
//! { <root keys>,
//!   "payload": { "display_type", "body": {..}, "extra": {..} },   // android
//!   "payload": { "aps": {..}, <customized keys> },               // ios
//!   "policy": {..} }
//! ```

use serde_json::{Map, Value};

use crate::{FieldSet, Platform};

/// Keys placed at the top level of the body.
pub const ROOT_KEYS: &[&str] = &[
    "appkey",
    "timestamp",
    "type",
    "device_tokens",
    "alias",
    "alias_type",
    "file_id",
    "filter",
    "production_mode",
    "feedback",
    "description",
    "thirdparty_id",
];

/// Objects built by [`encode_wire`] itself.
pub const LAYOUT_KEYS: &[&str] = &["payload", "policy"];

/// Keys placed under `policy`.
pub const POLICY_KEYS: &[&str] = &["start_time", "expire_time", "max_send_num", "out_biz_no"];

const ANDROID_PAYLOAD_KEYS: &[&str] = &["display_type"];

const ANDROID_BODY_KEYS: &[&str] = &[
    "ticker",
    "title",
    "text",
    "builder_id",
    "icon",
    "largeIcon",
    "img",
    "play_vibrate",
    "play_lights",
    "play_sound",
    "sound",
    "after_open",
    "url",
    "activity",
    "custom",
];

const IOS_APS_KEYS: &[&str] = &["alert", "badge", "sound", "content-available"];

/// Where a predefined field lands in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Root,
    Payload,
    /// `payload.body` on Android, `payload.aps` on iOS.
    Notification,
    Policy,
}

/// Section for a predefined key. Unrecognized keys stay at the root.
pub fn section(platform: Platform, key: &str) -> Section {
    if ROOT_KEYS.contains(&key) {
        return Section::Root;
    }
    if POLICY_KEYS.contains(&key) {
        return Section::Policy;
    }
    match platform {
        Platform::Android if ANDROID_PAYLOAD_KEYS.contains(&key) => Section::Payload,
        Platform::Android if ANDROID_BODY_KEYS.contains(&key) => Section::Notification,
        Platform::Ios if IOS_APS_KEYS.contains(&key) => Section::Notification,
        _ => Section::Root,
    }
}

/// Nest flat predefined fields and the extra/custom set into the API body.
pub fn encode_wire(platform: Platform, fields: &FieldSet, extra: &FieldSet) -> Value {
    let mut root = Map::new();
    let mut payload = Map::new();
    let mut notification = Map::new();
    let mut policy = Map::new();

    for (key, value) in fields.iter() {
        let target = match section(platform, key) {
            Section::Root => &mut root,
            Section::Payload => &mut payload,
            Section::Notification => &mut notification,
            Section::Policy => &mut policy,
        };
        target.insert(key.to_string(), value.clone());
    }

    match platform {
        Platform::Android => {
            payload.insert("body".to_string(), Value::Object(notification));
            if !extra.is_empty() {
                payload.insert("extra".to_string(), extra.clone().into());
            }
        }
        Platform::Ios => {
            payload.insert("aps".to_string(), Value::Object(notification));
            for (key, value) in extra.iter() {
                payload.insert(key.to_string(), value.clone());
            }
        }
    }

    root.insert("payload".to_string(), Value::Object(payload));
    if !policy.is_empty() {
        root.insert("policy".to_string(), Value::Object(policy));
    }

    Value::Object(root)
}
