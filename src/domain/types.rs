//! Strongly-typed value objects used by domain entities.
//!
//! Each wrapper enforces the same rules the customer forms apply, so a value
//! that made it into a [`crate::domain::client::NewClient`] can be sent to the
//! backend without further checks.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Maximum length accepted for a customer name.
pub const CLIENT_NAME_MAX_LEN: usize = 255;
/// Maximum length accepted for a phone number.
pub const PHONE_MAX_LEN: usize = 20;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided string is longer than allowed.
    #[error("value cannot exceed {0} characters")]
    TooLong(usize),
    /// Name contained characters other than letters, spaces, hyphens and apostrophes.
    #[error("invalid name")]
    InvalidName,
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Page size outside of the supported set.
    #[error("unsupported page size: {0}")]
    InvalidPerPage(usize),
}

/// Unique identifier for a customer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub struct ClientId(i64);

impl ClientId {
    /// Creates a new identifier ensuring it is greater than zero.
    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveId)
        }
    }

    /// Returns the raw `i64` backing this identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ClientId {
    type Error = TypeConstraintError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientId> for i64 {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

impl FromStr for ClientId {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| TypeConstraintError::NonPositiveId)?;
        Self::new(raw)
    }
}

/// Generates the shared accessor and conversion impls for string newtypes.
macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Returns `true` for characters allowed in a customer name.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c.is_whitespace()
        || matches!(
            c,
            '\'' | '-' | 'Á' | 'É' | 'Í' | 'Ó' | 'Ú' | 'á' | 'é' | 'í' | 'ó' | 'ú' | 'Ñ' | 'ñ'
        )
}

/// Returns `true` for characters allowed in a phone number.
pub fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '(' | ')' | '+' | '-')
}

/// Customer display name: trimmed, non-empty, letters only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientName(String);

impl ClientName {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if trimmed.chars().count() > CLIENT_NAME_MAX_LEN {
            return Err(TypeConstraintError::TooLong(CLIENT_NAME_MAX_LEN));
        }
        if !trimmed.chars().all(is_name_char) {
            return Err(TypeConstraintError::InvalidName);
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(ClientName);

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClientEmail(String);

impl ClientEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        // The validator accepts dotless domains; the backend does not.
        let has_dotted_domain = normalized
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'));
        if normalized.validate_email() && has_dotted_domain {
            Ok(Self(normalized))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }
}

string_newtype_impls!(ClientEmail);

/// Contact phone number as typed by the user, restricted to dialable characters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if trimmed.chars().count() > PHONE_MAX_LEN {
            return Err(TypeConstraintError::TooLong(PHONE_MAX_LEN));
        }
        if !trimmed.chars().all(is_phone_char) {
            return Err(TypeConstraintError::InvalidPhone);
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(PhoneNumber);

/// Number of customers shown on one page of the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PerPage {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PerPage {
    /// All supported page sizes in ascending order.
    pub const ALL: [PerPage; 3] = [PerPage::Ten, PerPage::TwentyFive, PerPage::Fifty];

    pub const fn get(self) -> usize {
        match self {
            PerPage::Ten => 10,
            PerPage::TwentyFive => 25,
            PerPage::Fifty => 50,
        }
    }
}

impl Display for PerPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<usize> for PerPage {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(PerPage::Ten),
            25 => Ok(PerPage::TwentyFive),
            50 => Ok(PerPage::Fifty),
            other => Err(TypeConstraintError::InvalidPerPage(other)),
        }
    }
}

impl From<PerPage> for usize {
    fn from(value: PerPage) -> Self {
        value.get()
    }
}

impl FromStr for PerPage {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<usize>()
            .map_err(|_| TypeConstraintError::InvalidPerPage(0))?;
        Self::try_from(raw)
    }
}
