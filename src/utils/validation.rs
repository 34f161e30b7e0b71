use crate::utils::error::{LibraryError, Result};
use chrono::Datelike;
use regex::Regex;
use std::net::SocketAddr;
use std::sync::LazyLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s]+$").expect("title pattern"));
static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name pattern"));
static ISBN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{10}$").expect("isbn pattern"));
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").expect("phone pattern"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern")
});

pub const EARLIEST_PUBLICATION_YEAR: i32 = 1700;

// ---- configuration values ----

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_socket_addr(field_name: &str, value: &str) -> Result<()> {
    value
        .parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_header_name(field_name: &str, value: &str) -> Result<()> {
    axum::http::HeaderName::from_bytes(value.as_bytes())
        .map(|_| ())
        .map_err(|_| LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Not a valid HTTP header name".to_string(),
        })
}

// ---- request fields ----

fn validate_pattern(field_name: &str, value: &str, pattern: &Regex, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibraryError::validation(field_name, "must not be blank"));
    }
    if !pattern.is_match(value) {
        return Err(LibraryError::validation(field_name, message));
    }
    Ok(())
}

pub fn validate_title(field_name: &str, value: &str) -> Result<()> {
    validate_pattern(
        field_name,
        value,
        &TITLE,
        "only letters, numbers, and spaces are allowed",
    )
}

pub fn validate_person_name(field_name: &str, value: &str) -> Result<()> {
    validate_pattern(
        field_name,
        value,
        &PERSON_NAME,
        "only letters and spaces are allowed",
    )
}

pub fn validate_isbn(field_name: &str, value: &str) -> Result<()> {
    validate_pattern(
        field_name,
        value,
        &ISBN,
        "must be in the format xxx-xxxxxxxxxx",
    )
}

pub fn validate_phone_number(field_name: &str, value: &str) -> Result<()> {
    validate_pattern(field_name, value, &PHONE, "must be 10 digits")
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    validate_pattern(field_name, value, &EMAIL, "must be a valid email address")
}

/// Years from 1700 up to the current calendar year.
pub fn validate_publication_year(field_name: &str, value: i32) -> Result<()> {
    let latest = chrono::Utc::now().year();
    if value < EARLIEST_PUBLICATION_YEAR || value > latest {
        return Err(LibraryError::validation(
            field_name,
            format!(
                "must be between {} and {}",
                EARLIEST_PUBLICATION_YEAR, latest
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("cache.max_entries", 5, 1).is_ok());
        assert!(validate_positive_number("cache.max_entries", 0, 1).is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind_address", "127.0.0.1:8080").is_ok());
        assert!(validate_socket_addr("server.bind_address", "[::1]:0").is_ok());
        assert!(validate_socket_addr("server.bind_address", "localhost").is_err());
    }

    #[test]
    fn test_book_fields() {
        assert!(validate_title("title", "Dune 2").is_ok());
        assert!(validate_title("title", "Dune: Messiah").is_err());
        assert!(validate_title("title", "   ").is_err());

        assert!(validate_isbn("isbn", "123-1111111111").is_ok());
        assert!(validate_isbn("isbn", "1231111111111").is_err());
        assert!(validate_isbn("isbn", "123-111111111").is_err());

        assert!(validate_publication_year("publicationYear", 1965).is_ok());
        assert!(validate_publication_year("publicationYear", 1699).is_err());
        assert!(validate_publication_year("publicationYear", 9999).is_err());
    }

    #[test]
    fn test_patron_fields() {
        assert!(validate_person_name("name", "Ada Lovelace").is_ok());
        assert!(validate_person_name("name", "Ada 2").is_err());

        assert!(validate_phone_number("phoneNumber", "0123456789").is_ok());
        assert!(validate_phone_number("phoneNumber", "012345678").is_err());

        assert!(validate_email("emailAddress", "ada@example.com").is_ok());
        assert!(validate_email("emailAddress", "ada.example.com").is_err());
    }

    #[test]
    fn test_request_errors_are_validation_errors() {
        let err = validate_isbn("isbn", "nope").unwrap_err();
        assert!(matches!(err, LibraryError::ValidationError { .. }));
        assert_eq!(
            err.to_string(),
            "Validation error on isbn: must be in the format xxx-xxxxxxxxxx"
        );
    }
}
