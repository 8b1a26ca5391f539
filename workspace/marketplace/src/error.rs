use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field-scoped validation messages, keyed by field name.
///
/// Image errors use indexed keys such as `images.0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`. A field may collect several messages.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// Copies the messages of a `validator` run, skipping fields that already failed.
    pub fn extend_from_validator(&mut self, errors: &validator::ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            if self.contains(&field) {
                continue;
            }
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", field));
                self.add(field.clone(), message);
            }
        }
    }

    /// `Ok(())` when nothing was recorded, otherwise a `Validation` error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(MarketplaceError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = FieldErrors::new();
        field_errors.extend_from_validator(&errors);
        field_errors
    }
}

/// Error types of the marketplace core
#[derive(Error, Debug)]
pub enum MarketplaceError {
    /// One or more fields failed validation; nothing was written
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The actor may not perform the action; nothing was written
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i32 },

    /// The operation would leave the system without an administrator
    #[error("The last administrator cannot be removed")]
    LastAdmin,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Storage error: {0}")]
    Storage(#[from] object_store::Error),
}

impl MarketplaceError {
    /// A validation error carrying a single field message.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        MarketplaceError::Validation(errors)
    }

    pub fn forbidden(action: impl Into<String>) -> Self {
        MarketplaceError::Forbidden(action.into())
    }
}

/// Result type for marketplace operations
pub type Result<T> = std::result::Result<T, MarketplaceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "Too short."))]
        name: String,
        #[validate(range(min = 1))]
        count: u32,
    }

    #[test]
    fn test_collects_multiple_messages_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("price", "Price must be a valid number.");
        errors.add("price", "Price cannot be negative.");
        errors.add("city", "City is required.");

        assert_eq!(errors.get("price").map(|m| m.len()), Some(2));
        assert_eq!(
            errors.to_string(),
            "city: City is required.; price: Price must be a valid number.; price: Price cannot be negative."
        );
    }

    #[test]
    fn test_validator_errors_keep_custom_messages() {
        let sample = Sample {
            name: "ab".to_string(),
            count: 0,
        };
        let errors = FieldErrors::from(sample.validate().unwrap_err());

        assert_eq!(errors.get("name"), Some(&["Too short.".to_string()][..]));
        assert_eq!(
            errors.get("count"),
            Some(&["The count field is invalid.".to_string()][..])
        );
    }

    #[test]
    fn test_earlier_field_errors_take_precedence() {
        let sample = Sample {
            name: "ab".to_string(),
            count: 2,
        };
        let mut errors = FieldErrors::new();
        errors.add("name", "Name is required.");
        errors.extend_from_validator(&sample.validate().unwrap_err());

        assert_eq!(errors.get("name"), Some(&["Name is required.".to_string()][..]));
    }

    #[test]
    fn test_empty_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
        assert!(matches!(
            MarketplaceError::invalid("status", "bad").to_string().as_str(),
            "Validation failed: status: bad"
        ));
    }
}
