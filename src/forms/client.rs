use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::{
    CLIENT_NAME_MAX_LEN, ClientEmail, ClientName, PHONE_MAX_LEN, PhoneNumber, is_name_char,
    is_phone_char,
};
use crate::forms::FormError;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(invalid("required", "El nombre es requerido"));
    }
    if name.chars().count() > CLIENT_NAME_MAX_LEN {
        return Err(invalid(
            "length",
            "El nombre no puede exceder 255 caracteres",
        ));
    }
    if !name.chars().all(is_name_char) {
        return Err(invalid(
            "name_chars",
            "El nombre sólo puede contener letras, espacios, guiones y apóstrofes",
        ));
    }
    Ok(())
}

fn validate_email_field(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(invalid("required", "El email es requerido"));
    }
    if !email.validate_email() {
        return Err(invalid("email", "El formato del email no es válido"));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.chars().count() > PHONE_MAX_LEN {
        return Err(invalid(
            "length",
            "El teléfono no puede exceder 20 caracteres",
        ));
    }
    if !phone.chars().all(is_phone_char) {
        return Err(invalid(
            "phone_chars",
            "El teléfono sólo puede contener dígitos y los caracteres + - ( ) y espacios",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
/// Form data for creating or editing a customer.
pub struct ClientForm {
    /// Display name.
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    /// Contact email address.
    #[validate(custom(function = "validate_email_field"))]
    pub email: String,
    /// Optional contact phone number.
    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

impl ClientForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            phone: phone
                .map(|phone| phone.into().trim().to_string())
                .filter(|phone| !phone.is_empty()),
        }
    }

    fn into_parts(self) -> Result<(ClientName, ClientEmail, Option<PhoneNumber>), FormError> {
        self.validate()?;

        let name = ClientName::new(self.name)?;
        let email = ClientEmail::new(self.email)?;
        let phone = self
            .phone
            .filter(|phone| !phone.trim().is_empty())
            .map(PhoneNumber::new)
            .transpose()?;

        Ok((name, email, phone))
    }

    /// Validates the form and converts it into a creation payload.
    pub fn into_new_client(self) -> Result<NewClient, FormError> {
        let (name, email, phone) = self.into_parts()?;
        Ok(NewClient::new(name, email, phone))
    }

    /// Validates the form and converts it into an update payload.
    pub fn into_update_client(self) -> Result<UpdateClient, FormError> {
        let (name, email, phone) = self.into_parts()?;
        Ok(UpdateClient::new(name, email, phone))
    }
}
