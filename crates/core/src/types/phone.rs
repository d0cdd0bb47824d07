//! Phone number normalization for the phone-addressed channels.

use serde::{Deserialize, Serialize};

/// Errors that can occur when normalizing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty after cleanup.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits, spaces, dashes and a
    /// leading plus.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A dialable phone number in international form.
///
/// Gateway providers expect `+<country><subscriber>`. Customer records are
/// frequently stored as bare national numbers with stray spaces or dashes, so
/// normalization strips the separators and prepends a default country code
/// when no `+` prefix is present.
///
/// ## Examples
///
/// ```
/// use storeline_core::PhoneNumber;
///
/// let phone = PhoneNumber::normalize("99988 877-77", "+91").expect("valid");
/// assert_eq!(phone.as_str(), "+919998887777");
///
/// // Already international: kept as-is
/// let phone = PhoneNumber::normalize("+14155238886", "+91").expect("valid");
/// assert_eq!(phone.as_str(), "+14155238886");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize a raw phone string into international form.
    ///
    /// Spaces and dashes are stripped. Numbers without a leading `+` are
    /// assumed to be national and get `default_country_code` (e.g. `"+91"`)
    /// prepended.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError`] if the input is empty or contains characters
    /// that are not digits, separators or a leading plus.
    pub fn normalize(raw: &str, default_country_code: &str) -> Result<Self, PhoneError> {
        let mut cleaned = String::with_capacity(raw.len());
        for (i, c) in raw.trim().chars().enumerate() {
            match c {
                ' ' | '-' => {}
                '+' if i == 0 => cleaned.push(c),
                c if c.is_ascii_digit() => cleaned.push(c),
                c => return Err(PhoneError::InvalidCharacter(c)),
            }
        }

        if cleaned.is_empty() || cleaned == "+" {
            return Err(PhoneError::Empty);
        }

        if cleaned.starts_with('+') {
            Ok(Self(cleaned))
        } else {
            Ok(Self(format!("{default_country_code}{cleaned}")))
        }
    }

    /// The normalized number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The WhatsApp-addressed form of this number (`whatsapp:+...`).
    #[must_use]
    pub fn whatsapp_address(&self) -> String {
        format!("whatsapp:{}", self.0)
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_national_number_gets_country_code() {
        let phone = PhoneNumber::normalize("9998887777", "+91").expect("valid");
        assert_eq!(phone.as_str(), "+919998887777");
    }

    #[test]
    fn test_separators_are_stripped() {
        let phone = PhoneNumber::normalize("999-888 77 77", "+91").expect("valid");
        assert_eq!(phone.as_str(), "+919998887777");
    }

    #[test]
    fn test_international_number_passes_through() {
        let phone = PhoneNumber::normalize("+14155238886", "+91").expect("valid");
        assert_eq!(phone.as_str(), "+14155238886");
    }

    #[test]
    fn test_whatsapp_address() {
        let phone = PhoneNumber::normalize("9998887777", "+91").expect("valid");
        assert_eq!(phone.whatsapp_address(), "whatsapp:+919998887777");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(PhoneNumber::normalize("  ", "+91"), Err(PhoneError::Empty));
        assert_eq!(PhoneNumber::normalize("+", "+91"), Err(PhoneError::Empty));
    }

    #[test]
    fn test_invalid_character_rejected() {
        assert_eq!(
            PhoneNumber::normalize("99988x7777", "+91"),
            Err(PhoneError::InvalidCharacter('x'))
        );
        // plus is only allowed in the first position
        assert_eq!(
            PhoneNumber::normalize("99+88", "+91"),
            Err(PhoneError::InvalidCharacter('+'))
        );
    }
}
