// src/common/validation.rs

use std::borrow::Cow;

use validator::ValidationError;

/// Remove tudo que não for dígito ("123.456.789-01" -> "12345678901").
pub fn only_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn is_digits_with_len(value: &str, allowed: std::ops::RangeInclusive<usize>) -> bool {
    allowed.contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_cpf(value: &str) -> bool {
    is_digits_with_len(value, 11..=11)
}

pub fn is_valid_whatsapp(value: &str) -> bool {
    is_digits_with_len(value, 10..=11)
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

// Usados pelo `#[validate(custom(...))]` dos payloads.
pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    if is_valid_cpf(value) {
        Ok(())
    } else {
        Err(error("cpf", "CPF deve conter 11 dígitos numéricos"))
    }
}

pub fn validate_whatsapp(value: &str) -> Result<(), ValidationError> {
    if is_valid_whatsapp(value) {
        Ok(())
    } else {
        Err(error(
            "whatsapp",
            "WhatsApp deve conter 10 ou 11 dígitos numéricos",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_requires_exactly_eleven_digits() {
        assert!(is_valid_cpf("12345678901"));
        assert!(!is_valid_cpf("1234567890"));
        assert!(!is_valid_cpf("123456789012"));
        assert!(!is_valid_cpf("123.456.789-01"));
        assert!(!is_valid_cpf("1234567890a"));
        assert!(!is_valid_cpf(""));
    }

    #[test]
    fn whatsapp_accepts_ten_or_eleven_digits() {
        assert!(is_valid_whatsapp("1199999999"));
        assert!(is_valid_whatsapp("11999999999"));
        assert!(!is_valid_whatsapp("119999999"));
        assert!(!is_valid_whatsapp("119999999999"));
        assert!(!is_valid_whatsapp("(11) 99999-9999"));
    }

    #[test]
    fn only_digits_strips_cpf_mask() {
        assert_eq!(only_digits("123.456.789-01"), "12345678901");
        assert_eq!(only_digits("abc"), "");
    }

    #[test]
    fn custom_validators_carry_portuguese_messages() {
        let err = validate_cpf("123").unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("CPF deve conter 11 dígitos numéricos")
        );
        assert!(validate_whatsapp("11999999999").is_ok());
    }
}
