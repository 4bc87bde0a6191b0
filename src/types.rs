//! Form state shared by the encoder, the renderer and the history store.
//!
//! The JSON shape is the one the studio persists: camelCase keys, the payload
//! kind under `type`, payload sub-records next to the flattened styling
//! fields. Deserialization is lenient so that old or hand-edited history
//! entries still load: missing keys and `null` values fall back to defaults,
//! unknown enum strings fall back to the enum's default.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{DEFAULT_BG_COLOR, DEFAULT_FG_COLOR, DEFAULT_GRADIENT_END, DEFAULT_SIZE};

/// Deserializes `null` as `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
        default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Unknown names map to the default variant.
            pub fn parse_or_default(text: &str) -> Self {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == text)
                    .unwrap_or_default()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = Option::<String>::deserialize(deserializer)?;
                Ok(text
                    .map(|text| Self::parse_or_default(&text))
                    .unwrap_or_default())
            }
        }
    };
}

/// Payload kind selected in the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QrType {
    Url,
    Text,
    Phone,
    Email,
    WhatsApp,
    Wifi,
    Location,
    /// A `type` tag this build does not know. Encodes to an empty payload.
    Unrecognized,
}

impl QrType {
    /// The selectable kinds, in form order.
    pub const ALL: [QrType; 7] = [
        QrType::Url,
        QrType::Text,
        QrType::Phone,
        QrType::Email,
        QrType::WhatsApp,
        QrType::Wifi,
        QrType::Location,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QrType::Url => "url",
            QrType::Text => "text",
            QrType::Phone => "phone",
            QrType::Email => "email",
            QrType::WhatsApp => "whatsapp",
            QrType::Wifi => "wifi",
            QrType::Location => "location",
            QrType::Unrecognized => "unrecognized",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QrType::Url => "URL",
            QrType::Text => "Text",
            QrType::Phone => "Phone",
            QrType::Email => "Email",
            QrType::WhatsApp => "WhatsApp",
            QrType::Wifi => "Wi-Fi",
            QrType::Location => "Location",
            QrType::Unrecognized => "Unknown",
        }
    }
}

impl Default for QrType {
    fn default() -> Self {
        QrType::Url
    }
}

impl FromStr for QrType {
    type Err = std::convert::Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(QrType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == text)
            .unwrap_or(QrType::Unrecognized))
    }
}

impl fmt::Display for QrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QrType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QrType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QrTypeVisitor)
    }
}

/// Strings name a kind, `null` means the default, any other value is unrecognized.
struct QrTypeVisitor;

impl<'de> Visitor<'de> for QrTypeVisitor {
    type Value = QrType;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a payload kind")
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<QrType, E> {
        Ok(text.parse().unwrap_or(QrType::Unrecognized))
    }

    fn visit_unit<E: de::Error>(self) -> Result<QrType, E> {
        Ok(QrType::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<QrType, E> {
        Ok(QrType::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<QrType, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<QrType, E> {
        Ok(QrType::Unrecognized)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<QrType, E> {
        Ok(QrType::Unrecognized)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<QrType, E> {
        Ok(QrType::Unrecognized)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<QrType, E> {
        Ok(QrType::Unrecognized)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<QrType, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(QrType::Unrecognized)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<QrType, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(QrType::Unrecognized)
    }
}

wire_enum! {
    /// Authentication type of a Wi-Fi network.
    pub enum Encryption {
        Wpa => "WPA",
        Wep => "WEP",
        /// Open network.
        NoPass => "nopass",
    }
    default Wpa
}

wire_enum! {
    /// Error correction level, from 7% (`L`) up to 30% (`H`) recoverable codewords.
    pub enum ErrorLevel {
        Low => "L",
        Medium => "M",
        Quartile => "Q",
        High => "H",
    }
    default Quartile
}

wire_enum! {
    /// Shape of the data modules.
    pub enum DotStyle {
        Square => "square",
        Dots => "dots",
        Rounded => "rounded",
        ExtraRounded => "extra-rounded",
    }
    default Square
}

wire_enum! {
    /// Shape of the three finder patterns.
    pub enum EyeStyle {
        Square => "square",
        Dot => "dot",
        ExtraRounded => "extra-rounded",
    }
    default Square
}

wire_enum! {
    pub enum GradientType {
        None => "none",
        Linear => "linear",
        Radial => "radial",
    }
    default None
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailFields {
    #[serde(deserialize_with = "lenient")]
    pub address: String,
    #[serde(deserialize_with = "lenient")]
    pub subject: String,
    #[serde(deserialize_with = "lenient")]
    pub body: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppFields {
    #[serde(deserialize_with = "lenient")]
    pub phone: String,
    #[serde(deserialize_with = "lenient")]
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiFields {
    #[serde(deserialize_with = "lenient")]
    pub ssid: String,
    #[serde(deserialize_with = "lenient")]
    pub password: String,
    pub encryption: Encryption,
    #[serde(deserialize_with = "lenient")]
    pub hidden: bool,
}

/// Coordinates as typed, in decimal degrees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationFields {
    #[serde(deserialize_with = "lenient")]
    pub lat: String,
    #[serde(deserialize_with = "lenient")]
    pub lng: String,
}

/// `null` on a styling field means that field's default, not the type's zero.
macro_rules! style_defaults {
    ($($field:ident: $ty:ty),* $(,)?) => {
        mod style_default {
            use super::*;

            $(
                pub(super) fn $field<'de, D: Deserializer<'de>>(
                    deserializer: D,
                ) -> Result<$ty, D::Error> {
                    Ok(Option::<$ty>::deserialize(deserializer)?
                        .unwrap_or_else(|| Style::default().$field))
                }
            )*
        }
    };
}

style_defaults! {
    fg_color: String,
    bg_color: String,
    size: u32,
    margin: bool,
    gradient_color1: String,
    gradient_color2: String,
    gradient_rotation: f64,
}

/// Visual options. Only the renderer reads these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    #[serde(deserialize_with = "style_default::fg_color")]
    pub fg_color: String,
    #[serde(deserialize_with = "style_default::bg_color")]
    pub bg_color: String,
    /// Export edge length in pixels.
    #[serde(deserialize_with = "style_default::size")]
    pub size: u32,
    pub level: ErrorLevel,
    #[serde(deserialize_with = "style_default::margin")]
    pub margin: bool,
    pub dots_pattern: DotStyle,
    pub eye_style: EyeStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    pub gradient_type: GradientType,
    #[serde(deserialize_with = "style_default::gradient_color1")]
    pub gradient_color1: String,
    #[serde(deserialize_with = "style_default::gradient_color2")]
    pub gradient_color2: String,
    /// Degrees, clockwise.
    #[serde(deserialize_with = "style_default::gradient_rotation")]
    pub gradient_rotation: f64,
    /// Image as a data URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Style {
    /// Color of the finder patterns.
    pub fn eye_color(&self) -> &str {
        match self.eye_color.as_deref() {
            Some(color) if !color.is_empty() => color,
            _ => &self.fg_color,
        }
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref().filter(|logo| !logo.is_empty())
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg_color: DEFAULT_FG_COLOR.to_owned(),
            bg_color: DEFAULT_BG_COLOR.to_owned(),
            size: DEFAULT_SIZE,
            level: ErrorLevel::default(),
            margin: true,
            dots_pattern: DotStyle::default(),
            eye_style: EyeStyle::default(),
            eye_color: None,
            gradient_type: GradientType::default(),
            gradient_color1: DEFAULT_FG_COLOR.to_owned(),
            gradient_color2: DEFAULT_GRADIENT_END.to_owned(),
            gradient_rotation: 0.0,
            logo: None,
        }
    }
}

/// Complete form state. Every payload kind keeps its fields so that
/// switching the kind back and forth does not lose input; `kind` selects
/// the one that gets encoded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRecord {
    #[serde(rename = "type")]
    pub kind: QrType,
    #[serde(deserialize_with = "lenient")]
    pub url: String,
    #[serde(deserialize_with = "lenient")]
    pub text: String,
    #[serde(deserialize_with = "lenient")]
    pub phone: String,
    #[serde(deserialize_with = "lenient")]
    pub email: EmailFields,
    #[serde(deserialize_with = "lenient")]
    pub whatsapp: WhatsAppFields,
    #[serde(deserialize_with = "lenient")]
    pub wifi: WifiFields,
    #[serde(deserialize_with = "lenient")]
    pub location: LocationFields,
    #[serde(flatten)]
    pub style: Style,
}

/// A saved form configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub name: String,
    /// Unix time in milliseconds.
    pub created_at: i64,
    #[serde(flatten)]
    pub record: FormRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_use_form_defaults() {
        let record: FormRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record, FormRecord::default());
        assert_eq!(record.kind, QrType::Url);
        assert_eq!(record.wifi.encryption, Encryption::Wpa);
        assert_eq!(record.style.level, ErrorLevel::Quartile);
        assert_eq!(record.style.size, 1024);
        assert!(record.style.margin);
    }

    #[test]
    fn test_null_sub_records_degrade_to_empty() {
        let record: FormRecord = serde_json::from_value(json!({
            "type": "email",
            "email": null,
            "whatsapp": { "phone": null, "message": "hi" },
            "wifi": { "encryption": null, "hidden": null },
            "location": null,
        }))
        .unwrap();

        assert_eq!(record.kind, QrType::Email);
        assert_eq!(record.email, EmailFields::default());
        assert_eq!(record.whatsapp.phone, "");
        assert_eq!(record.whatsapp.message, "hi");
        assert_eq!(record.wifi.encryption, Encryption::Wpa);
        assert!(!record.wifi.hidden);
        assert_eq!(record.location, LocationFields::default());
    }

    #[test]
    fn test_unknown_type_tag() {
        let record: FormRecord = serde_json::from_value(json!({ "type": "vcard" })).unwrap();
        assert_eq!(record.kind, QrType::Unrecognized);

        let record: FormRecord = serde_json::from_value(json!({ "type": null })).unwrap();
        assert_eq!(record.kind, QrType::Url);

        for tag in &[json!(3), json!(true), json!(["url"]), json!({ "kind": "url" })] {
            let record: FormRecord = serde_json::from_value(json!({ "type": tag })).unwrap();
            assert_eq!(record.kind, QrType::Unrecognized, "{}", tag);
        }
    }

    #[test]
    fn test_null_style_fields_use_style_defaults() {
        let record: FormRecord = serde_json::from_str(
            r#"{
                "type": "text",
                "fgColor": null,
                "bgColor": null,
                "size": null,
                "level": null,
                "margin": null,
                "dotsPattern": null,
                "eyeStyle": null,
                "eyeColor": null,
                "gradientType": null,
                "gradientColor1": null,
                "gradientColor2": null,
                "gradientRotation": null,
                "logo": null
            }"#,
        )
        .unwrap();

        assert_eq!(record.kind, QrType::Text);
        assert_eq!(record.style, Style::default());
    }

    #[test]
    fn test_null_style_field_keeps_its_neighbours() {
        let record: FormRecord = serde_json::from_value(json!({
            "type": "text",
            "margin": null,
            "size": 512,
            "gradientRotation": null,
            "fgColor": "#112233",
        }))
        .unwrap();

        assert!(record.style.margin);
        assert_eq!(record.style.size, 512);
        assert_eq!(record.style.gradient_rotation, 0.0);
        assert_eq!(record.style.fg_color, "#112233");
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let record: FormRecord = serde_json::from_value(json!({
            "wifi": { "encryption": "WPA3" },
            "level": "X",
            "dotsPattern": "classy",
            "eyeStyle": "",
            "gradientType": "conic",
        }))
        .unwrap();

        assert_eq!(record.wifi.encryption, Encryption::Wpa);
        assert_eq!(record.style.level, ErrorLevel::Quartile);
        assert_eq!(record.style.dots_pattern, DotStyle::Square);
        assert_eq!(record.style.eye_style, EyeStyle::Square);
        assert_eq!(record.style.gradient_type, GradientType::None);
    }

    #[test]
    fn test_serializes_flat_camel_case() {
        let mut record = FormRecord::default();
        record.kind = QrType::WhatsApp;
        record.wifi.encryption = Encryption::NoPass;
        record.style.gradient_type = GradientType::Radial;

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "whatsapp");
        assert_eq!(value["wifi"]["encryption"], "nopass");
        assert_eq!(value["fgColor"], "#0f172a");
        assert_eq!(value["gradientType"], "radial");
        assert_eq!(value["gradientColor2"], "#3b82f6");
        assert!(value.get("logo").is_none());
        assert!(value.get("style").is_none());
    }

    #[test]
    fn test_history_item_is_flat() {
        let value = json!({
            "id": "abc",
            "name": "Office Wi-Fi",
            "createdAt": 1_700_000_000_000_i64,
            "type": "wifi",
            "wifi": { "ssid": "Office", "password": "secret", "encryption": "WEP", "hidden": true },
            "fgColor": "#112233",
            "rounded": false,
        });

        let item: HistoryItem = serde_json::from_value(value).unwrap();
        assert_eq!(item.id, "abc");
        assert_eq!(item.created_at, 1_700_000_000_000);
        assert_eq!(item.record.kind, QrType::Wifi);
        assert_eq!(item.record.wifi.ssid, "Office");
        assert_eq!(item.record.wifi.encryption, Encryption::Wep);
        assert_eq!(item.record.style.fg_color, "#112233");

        let again = serde_json::to_value(&item).unwrap();
        assert_eq!(again["name"], "Office Wi-Fi");
        assert_eq!(again["wifi"]["ssid"], "Office");
    }

    #[test]
    fn test_eye_color_falls_back_to_foreground() {
        let mut style = Style::default();
        assert_eq!(style.eye_color(), "#0f172a");

        style.eye_color = Some(String::new());
        assert_eq!(style.eye_color(), "#0f172a");

        style.eye_color = Some("#ff0000".to_owned());
        assert_eq!(style.eye_color(), "#ff0000");
    }

    #[test]
    fn test_type_from_str() {
        assert_eq!("wifi".parse::<QrType>(), Ok(QrType::Wifi));
        assert_eq!("WIFI".parse::<QrType>(), Ok(QrType::Unrecognized));
        assert_eq!(Encryption::parse_or_default("nopass"), Encryption::NoPass);
    }
}
