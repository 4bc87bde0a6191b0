//! Turns a [`FormRecord`] into the literal text embedded in the QR code.
//!
//! Encoding is total: every record produces a string, missing input becomes
//! an empty substitution and an unrecognized kind yields `""`.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::{EmailFields, FormRecord, LocationFields, QrType, WhatsAppFields, WifiFields};

/// Bytes escaped by URI component encoding: everything but
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The active payload of a form, borrowed from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payload<'a> {
    Url(&'a str),
    Text(&'a str),
    Phone(&'a str),
    Email(&'a EmailFields),
    WhatsApp(&'a WhatsAppFields),
    Wifi(&'a WifiFields),
    Location(&'a LocationFields),
    Unrecognized,
}

impl FormRecord {
    pub fn payload(&self) -> Payload<'_> {
        match self.kind {
            QrType::Url => Payload::Url(&self.url),
            QrType::Text => Payload::Text(&self.text),
            QrType::Phone => Payload::Phone(&self.phone),
            QrType::Email => Payload::Email(&self.email),
            QrType::WhatsApp => Payload::WhatsApp(&self.whatsapp),
            QrType::Wifi => Payload::Wifi(&self.wifi),
            QrType::Location => Payload::Location(&self.location),
            QrType::Unrecognized => Payload::Unrecognized,
        }
    }
}

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Url(url) => f.write_str(url),
            Payload::Text(text) => f.write_str(text),
            Payload::Phone(phone) => write!(f, "tel:{}", phone),
            Payload::Email(email) => write!(
                f,
                "mailto:{}?subject={}&body={}",
                email.address,
                encode_uri_component(&email.subject),
                encode_uri_component(&email.body),
            ),
            Payload::WhatsApp(whatsapp) => {
                f.write_str("https://wa.me/")?;
                for digit in whatsapp.phone.chars().filter(char::is_ascii_digit) {
                    write!(f, "{}", digit)?;
                }
                write!(f, "?text={}", encode_uri_component(&whatsapp.message))
            }
            Payload::Wifi(wifi) => write!(
                f,
                "WIFI:S:{};T:{};P:{};H:{};;",
                wifi.ssid,
                wifi.encryption,
                wifi.password,
                if wifi.hidden { "true" } else { "" },
            ),
            Payload::Location(location) => write!(
                f,
                "https://www.google.com/maps/search/?api=1&query={},{}",
                or_zero(&location.lat),
                or_zero(&location.lng),
            ),
            Payload::Unrecognized => Ok(()),
        }
    }
}

/// The string to embed in the QR code for `record`.
pub fn encode(record: &FormRecord) -> String {
    record.payload().to_string()
}

/// Percent-encodes `text` the way URI components are encoded in query strings.
pub fn encode_uri_component(text: &str) -> impl fmt::Display + '_ {
    utf8_percent_encode(text, URI_COMPONENT)
}

fn or_zero(coordinate: &str) -> &str {
    if coordinate.is_empty() {
        "0"
    } else {
        coordinate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Encryption;

    fn record(kind: QrType) -> FormRecord {
        FormRecord {
            kind,
            ..FormRecord::default()
        }
    }

    #[test]
    fn test_url_and_text_are_verbatim() {
        let mut url = record(QrType::Url);
        url.url = "https://a.com".to_owned();
        assert_eq!(encode(&url), "https://a.com");

        let mut text = record(QrType::Text);
        text.text = "any ;:, text & more".to_owned();
        assert_eq!(encode(&text), "any ;:, text & more");

        assert_eq!(encode(&record(QrType::Url)), "");
        assert_eq!(encode(&record(QrType::Text)), "");
    }

    #[test]
    fn test_phone() {
        let mut phone = record(QrType::Phone);
        phone.phone = "+1 234".to_owned();
        assert_eq!(encode(&phone), "tel:+1 234");
        assert_eq!(encode(&record(QrType::Phone)), "tel:");
    }

    #[test]
    fn test_email() {
        let mut email = record(QrType::Email);
        email.email = EmailFields {
            address: "a@b.com".to_owned(),
            subject: "Hi there".to_owned(),
            body: String::new(),
        };
        assert_eq!(encode(&email), "mailto:a@b.com?subject=Hi%20there&body=");

        email.email.address = "a+b@c.com".to_owned();
        email.email.body = "Line 1\nA&B=C".to_owned();
        assert_eq!(
            encode(&email),
            "mailto:a+b@c.com?subject=Hi%20there&body=Line%201%0AA%26B%3DC"
        );

        assert_eq!(encode(&record(QrType::Email)), "mailto:?subject=&body=");
    }

    #[test]
    fn test_whatsapp_strips_non_digits() {
        let mut whatsapp = record(QrType::WhatsApp);
        whatsapp.whatsapp = WhatsAppFields {
            phone: "+1 (234) 567-890".to_owned(),
            message: "Hello!".to_owned(),
        };
        assert_eq!(encode(&whatsapp), "https://wa.me/1234567890?text=Hello!");

        // Only ASCII digits survive.
        whatsapp.whatsapp.phone = "١٢ 34".to_owned();
        whatsapp.whatsapp.message = String::new();
        assert_eq!(encode(&whatsapp), "https://wa.me/34?text=");
    }

    #[test]
    fn test_wifi() {
        let mut wifi = record(QrType::Wifi);
        wifi.wifi = WifiFields {
            ssid: "Net".to_owned(),
            password: "pw".to_owned(),
            encryption: Encryption::Wep,
            hidden: true,
        };
        assert_eq!(encode(&wifi), "WIFI:S:Net;T:WEP;P:pw;H:true;;");

        wifi.wifi.encryption = Encryption::Wpa;
        wifi.wifi.hidden = false;
        assert_eq!(encode(&wifi), "WIFI:S:Net;T:WPA;P:pw;H:;;");

        wifi.wifi.encryption = Encryption::NoPass;
        wifi.wifi.password = String::new();
        assert_eq!(encode(&wifi), "WIFI:S:Net;T:nopass;P:;H:;;");
    }

    #[test]
    fn test_wifi_special_characters_are_not_escaped() {
        let mut wifi = record(QrType::Wifi);
        wifi.wifi.ssid = r"a;b,c:d\e".to_owned();
        wifi.wifi.password = "p;w".to_owned();
        assert_eq!(encode(&wifi), r"WIFI:S:a;b,c:d\e;T:WPA;P:p;w;H:;;");
    }

    #[test]
    fn test_location() {
        let mut location = record(QrType::Location);
        location.location = LocationFields {
            lat: "40.7".to_owned(),
            lng: "-74.0".to_owned(),
        };
        assert_eq!(
            encode(&location),
            "https://www.google.com/maps/search/?api=1&query=40.7,-74.0"
        );

        location.location.lng = String::new();
        assert_eq!(
            encode(&location),
            "https://www.google.com/maps/search/?api=1&query=40.7,0"
        );
        assert_eq!(
            encode(&record(QrType::Location)),
            "https://www.google.com/maps/search/?api=1&query=0,0"
        );
    }

    #[test]
    fn test_unrecognized_kind_is_empty() {
        let mut unknown = record(QrType::Unrecognized);
        unknown.url = "https://ignored.example".to_owned();
        unknown.text = "ignored".to_owned();
        assert_eq!(encode(&unknown), "");
    }

    #[test]
    fn test_only_active_kind_is_encoded() {
        let mut form = record(QrType::Phone);
        form.url = "https://a.com".to_owned();
        form.phone = "123".to_owned();
        assert_eq!(encode(&form), "tel:123");

        form.kind = QrType::Url;
        assert_eq!(encode(&form), "https://a.com");
    }

    #[test]
    fn test_uri_component_reserved_set() {
        assert_eq!(
            encode_uri_component("-_.!~*'()").to_string(),
            "-_.!~*'()"
        );
        assert_eq!(
            encode_uri_component("a b&c=d/e?f#g+h@i:j;k,l$").to_string(),
            "a%20b%26c%3Dd%2Fe%3Ff%23g%2Bh%40i%3Aj%3Bk%2Cl%24"
        );
        assert_eq!(encode_uri_component("ü€").to_string(), "%C3%BC%E2%82%AC");
        assert_eq!(encode_uri_component("%").to_string(), "%25");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let mut email = record(QrType::Email);
        email.email.subject = "Grüße aus Wien".to_owned();
        assert_eq!(encode(&email), encode(&email.clone()));
    }

    #[test]
    fn test_decoded_from_json() {
        let record: FormRecord = serde_json::from_str(
            r#"{"type":"whatsapp","whatsapp":{"phone":"+43 660 1234","message":null}}"#,
        )
        .unwrap();
        assert_eq!(encode(&record), "https://wa.me/436601234?text=");

        let record: FormRecord = serde_json::from_str(r#"{"type":"sms","text":"x"}"#).unwrap();
        assert_eq!(encode(&record), "");
    }
}
