//! Listing form validation.
//!
//! All problems are collected before failing so the caller can annotate
//! every field at once.

use model::PropertyStatus;
use rust_decimal::Decimal;
use validator::Validate;

use crate::actor::Actor;
use crate::error::{FieldErrors, MarketplaceError, Result};
use crate::images::{CheckedImage, ImageUpload, check_uploads};
use crate::moderation::INVALID_STATUS;
use crate::policy;
use crate::search::filled;

/// Largest price a `DECIMAL(12, 2)` column holds.
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Listing fields as submitted. Everything is optional text until checked.
#[derive(Debug, Clone, Default, Validate)]
pub struct PropertyForm {
    #[validate(
        required(message = "Property title is required."),
        length(max = 255, message = "Title may not be longer than 255 characters.")
    )]
    pub title: Option<String>,
    #[validate(required(message = "Description is required."))]
    pub description: Option<String>,
    #[validate(required(message = "Price is required."))]
    pub price: Option<String>,
    #[validate(required(message = "Surface area is required."))]
    pub surface_area: Option<String>,
    #[validate(required(message = "Number of bedrooms is required."))]
    pub bedrooms: Option<String>,
    #[validate(
        required(message = "City is required."),
        length(max = 255, message = "City may not be longer than 255 characters.")
    )]
    pub city: Option<String>,
    #[validate(
        required(message = "Neighborhood is required."),
        length(max = 255, message = "Neighborhood may not be longer than 255 characters.")
    )]
    pub neighborhood: Option<String>,
    /// Only administrators may send a status.
    pub status: Option<String>,
}

impl PropertyForm {
    /// Trims every value and turns blanks into `None`.
    fn normalized(&self) -> Self {
        let clean = |value: &Option<String>| filled(value).map(str::to_string);
        Self {
            title: clean(&self.title),
            description: clean(&self.description),
            price: clean(&self.price),
            surface_area: clean(&self.surface_area),
            bedrooms: clean(&self.bedrooms),
            city: clean(&self.city),
            neighborhood: clean(&self.neighborhood),
            status: clean(&self.status),
        }
    }
}

/// Validated listing attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAttributes {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub surface_area: i32,
    pub bedrooms: i32,
    pub city: String,
    pub neighborhood: String,
    /// Explicit status, only ever set for administrators
    pub status: Option<PropertyStatus>,
}

/// A submission that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub attributes: PropertyAttributes,
    pub images: Vec<CheckedImage>,
}

/// Validates a listing form and its images on behalf of `actor`.
pub fn validate_submission(
    actor: &Actor,
    form: &PropertyForm,
    uploads: Vec<ImageUpload>,
) -> Result<ValidatedSubmission> {
    let form = form.normalized();
    let mut errors = FieldErrors::new();

    let price = form.price.as_deref().and_then(|raw| parse_price(raw, &mut errors));
    let surface_area = form.surface_area.as_deref().and_then(|raw| {
        parse_whole(raw, "surface_area", "Surface area must be a whole number.", &mut errors)
    });
    if surface_area.is_some_and(|s| s < 1) {
        errors.add("surface_area", "Surface area must be at least 1 square meter.");
    }
    let bedrooms = form.bedrooms.as_deref().and_then(|raw| {
        parse_whole(raw, "bedrooms", "Number of bedrooms must be a whole number.", &mut errors)
    });
    match bedrooms {
        Some(b) if b < 0 => errors.add("bedrooms", "Number of bedrooms cannot be negative."),
        Some(b) if b > 20 => errors.add("bedrooms", "Maximum 20 bedrooms allowed."),
        _ => {}
    }

    let status = match form.status.as_deref() {
        None => None,
        Some(_) if !policy::is_admin(actor) => {
            errors.add("status", "Only administrators may change the status.");
            None
        }
        Some(raw) => match raw.parse::<PropertyStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                errors.add("status", INVALID_STATUS);
                None
            }
        },
    };

    if let Err(validation_errors) = form.validate() {
        errors.extend_from_validator(&validation_errors);
    }

    let images = check_uploads(uploads, &mut errors);
    errors.into_result()?;

    let (
        Some(title),
        Some(description),
        Some(price),
        Some(surface_area),
        Some(bedrooms),
        Some(city),
        Some(neighborhood),
    ) = (
        form.title,
        form.description,
        price,
        surface_area,
        bedrooms,
        form.city,
        form.neighborhood,
    )
    else {
        // Unreachable once no field error was recorded
        return Err(MarketplaceError::invalid("form", "The submission is incomplete."));
    };

    Ok(ValidatedSubmission {
        attributes: PropertyAttributes {
            title,
            description,
            price,
            surface_area,
            bedrooms,
            city,
            neighborhood,
            status,
        },
        images,
    })
}

fn parse_price(raw: &str, errors: &mut FieldErrors) -> Option<Decimal> {
    let Ok(price) = raw.parse::<Decimal>() else {
        errors.add("price", "Price must be a valid number.");
        return None;
    };
    if price < Decimal::ZERO {
        errors.add("price", "Price cannot be negative.");
        return None;
    }
    let price = price.round_dp(2);
    if price > MAX_PRICE {
        errors.add("price", "Price is too large.");
        return None;
    }
    Some(price)
}

fn parse_whole(raw: &str, field: &str, message: &str, errors: &mut FieldErrors) -> Option<i32> {
    match raw.parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, message);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::png_upload;
    use model::UserRole;

    const AGENT: Actor = Actor { id: 2, role: UserRole::Agent };
    const ADMIN: Actor = Actor { id: 1, role: UserRole::Admin };

    fn valid_form() -> PropertyForm {
        PropertyForm {
            title: Some("  Bright loft  ".to_string()),
            description: Some("Open plan loft near the canal".to_string()),
            price: Some("250000".to_string()),
            surface_area: Some("120".to_string()),
            bedrooms: Some("3".to_string()),
            city: Some("Brussels".to_string()),
            neighborhood: Some("Ixelles".to_string()),
            status: None,
        }
    }

    fn field_errors(result: Result<ValidatedSubmission>) -> FieldErrors {
        match result {
            Err(MarketplaceError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other.map(|s| s.attributes)),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed_and_parsed() {
        let submission = validate_submission(&AGENT, &valid_form(), vec![png_upload("a.png")]).unwrap();
        let attributes = submission.attributes;
        assert_eq!(attributes.title, "Bright loft");
        assert_eq!(attributes.price, Decimal::new(250_000, 0));
        assert_eq!(attributes.surface_area, 120);
        assert_eq!(attributes.bedrooms, 3);
        assert_eq!(attributes.status, None);
        assert_eq!(submission.images.len(), 1);
    }

    #[test]
    fn test_every_violated_field_is_reported() {
        let form = PropertyForm {
            title: Some("   ".to_string()),
            description: None,
            price: Some("-1".to_string()),
            surface_area: Some("0".to_string()),
            bedrooms: Some("21".to_string()),
            city: None,
            neighborhood: Some("x".repeat(256)),
            status: None,
        };
        let errors = field_errors(validate_submission(&AGENT, &form, vec![]));

        assert_eq!(errors.get("title"), Some(&["Property title is required.".to_string()][..]));
        assert!(errors.contains("description"));
        assert_eq!(errors.get("price"), Some(&["Price cannot be negative.".to_string()][..]));
        assert_eq!(
            errors.get("surface_area"),
            Some(&["Surface area must be at least 1 square meter.".to_string()][..])
        );
        assert_eq!(errors.get("bedrooms"), Some(&["Maximum 20 bedrooms allowed.".to_string()][..]));
        assert_eq!(errors.get("city"), Some(&["City is required.".to_string()][..]));
        assert!(errors.contains("neighborhood"));
    }

    #[test]
    fn test_malformed_numbers() {
        let form = PropertyForm {
            price: Some("a lot".to_string()),
            surface_area: Some("12.5".to_string()),
            bedrooms: Some("three".to_string()),
            ..valid_form()
        };
        let errors = field_errors(validate_submission(&AGENT, &form, vec![]));
        assert_eq!(errors.get("price"), Some(&["Price must be a valid number.".to_string()][..]));
        assert_eq!(
            errors.get("surface_area"),
            Some(&["Surface area must be a whole number.".to_string()][..])
        );
        assert_eq!(
            errors.get("bedrooms"),
            Some(&["Number of bedrooms must be a whole number.".to_string()][..])
        );
    }

    #[test]
    fn test_boundaries_are_accepted() {
        let form = PropertyForm {
            price: Some("0".to_string()),
            surface_area: Some("1".to_string()),
            bedrooms: Some("0".to_string()),
            ..valid_form()
        };
        assert!(validate_submission(&AGENT, &form, vec![]).is_ok());

        let form = PropertyForm {
            price: Some("9999999999.99".to_string()),
            bedrooms: Some("20".to_string()),
            ..valid_form()
        };
        assert!(validate_submission(&AGENT, &form, vec![]).is_ok());

        let form = PropertyForm {
            price: Some("10000000000".to_string()),
            ..valid_form()
        };
        let errors = field_errors(validate_submission(&AGENT, &form, vec![]));
        assert!(errors.contains("price"));
    }

    #[test]
    fn test_status_is_admin_only() {
        let form = PropertyForm {
            status: Some("published".to_string()),
            ..valid_form()
        };
        let errors = field_errors(validate_submission(&AGENT, &form, vec![]));
        assert_eq!(
            errors.get("status"),
            Some(&["Only administrators may change the status.".to_string()][..])
        );

        let submission = validate_submission(&ADMIN, &form, vec![]).unwrap();
        assert_eq!(submission.attributes.status, Some(PropertyStatus::Published));

        let form = PropertyForm {
            status: Some("sold".to_string()),
            ..valid_form()
        };
        let errors = field_errors(validate_submission(&ADMIN, &form, vec![]));
        assert_eq!(errors.get("status"), Some(&[INVALID_STATUS.to_string()][..]));
    }

    #[test]
    fn test_image_errors_fail_the_whole_submission() {
        let bad = ImageUpload::new(Some("doc.pdf".to_string()), b"%PDF-1.4 fake".to_vec());
        let errors = field_errors(validate_submission(
            &AGENT,
            &valid_form(),
            vec![png_upload("a.png"), bad],
        ));
        assert!(errors.contains("images.1"));
        assert!(!errors.contains("images.0"));
    }
}
