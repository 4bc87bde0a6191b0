//! Form-level checks shown next to the inputs. The encoder does not depend
//! on these; it encodes whatever it is given.

use thiserror::Error;
use url::Url;

use crate::config::SIZE_RANGE;
use crate::types::{FormRecord, GradientType, QrType};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid URL")]
    InvalidUrl,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Size must be between {min} and {max} pixels")]
    SizeOutOfRange { min: u32, max: u32 },
    #[error("{field} must be a hex color like #1a2b3c")]
    InvalidColor { field: &'static str },
}

/// Returns every problem with the active payload kind and the styling.
pub fn validate(record: &FormRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match record.kind {
        QrType::Url if !record.url.is_empty() && Url::parse(&record.url).is_err() => {
            errors.push(ValidationError::InvalidUrl);
        }
        QrType::Email
            if !record.email.address.is_empty() && !is_email_address(&record.email.address) =>
        {
            errors.push(ValidationError::InvalidEmail);
        }
        _ => {}
    }

    let style = &record.style;
    if !SIZE_RANGE.contains(&style.size) {
        errors.push(ValidationError::SizeOutOfRange {
            min: *SIZE_RANGE.start(),
            max: *SIZE_RANGE.end(),
        });
    }

    let mut colors = vec![
        ("Foreground color", Some(style.fg_color.as_str())),
        ("Background color", Some(style.bg_color.as_str())),
        ("Eye color", style.eye_color.as_deref().filter(|c| !c.is_empty())),
    ];
    if style.gradient_type != GradientType::None {
        colors.push(("Gradient start color", Some(style.gradient_color1.as_str())));
        colors.push(("Gradient end color", Some(style.gradient_color2.as_str())));
    }
    for (field, color) in colors {
        if let Some(color) = color {
            if !is_hex_color(color) {
                errors.push(ValidationError::InvalidColor { field });
            }
        }
    }

    errors
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
fn is_email_address(address: &str) -> bool {
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = address.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
        }
        _ => false,
    }
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: QrType) -> FormRecord {
        FormRecord {
            kind,
            ..FormRecord::default()
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        for kind in QrType::ALL.iter().copied() {
            assert!(validate(&record(kind)).is_empty(), "{}", kind);
        }
    }

    #[test]
    fn test_url() {
        let mut form = record(QrType::Url);
        form.url = "https://example.com/path?q=1".to_owned();
        assert!(validate(&form).is_empty());

        form.url = "example.com".to_owned();
        assert_eq!(validate(&form), vec![ValidationError::InvalidUrl]);

        // Only the active kind is checked.
        form.kind = QrType::Text;
        assert!(validate(&form).is_empty());
    }

    #[test]
    fn test_email() {
        let mut form = record(QrType::Email);
        for valid in &["a@b.co", "first.last+tag@sub.example.org"] {
            form.email.address = (*valid).to_owned();
            assert!(validate(&form).is_empty(), "{}", valid);
        }
        for invalid in &["a@b", "@b.com", "a@@b.com", "a b@c.com", "a@b..com", "a@.com"] {
            form.email.address = (*invalid).to_owned();
            assert_eq!(validate(&form), vec![ValidationError::InvalidEmail], "{}", invalid);
        }
    }

    #[test]
    fn test_size_range() {
        let mut form = record(QrType::Text);
        form.style.size = 127;
        assert_eq!(
            validate(&form),
            vec![ValidationError::SizeOutOfRange { min: 128, max: 1024 }]
        );
        form.style.size = 128;
        assert!(validate(&form).is_empty());
        form.style.size = 1025;
        assert_eq!(validate(&form).len(), 1);
    }

    #[test]
    fn test_colors() {
        let mut form = record(QrType::Text);
        form.style.fg_color = "#abc".to_owned();
        form.style.bg_color = "white".to_owned();
        form.style.eye_color = Some(String::new());
        form.style.gradient_color2 = "#12345".to_owned();
        assert_eq!(
            validate(&form),
            vec![ValidationError::InvalidColor {
                field: "Background color"
            }]
        );

        form.style.gradient_type = GradientType::Linear;
        let errors = validate(&form);
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[1].to_string(),
            "Gradient end color must be a hex color like #1a2b3c"
        );
    }
}
