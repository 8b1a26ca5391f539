use axum::extract::Multipart;
use marketplace::{ImageUpload, PropertyForm};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Body size accepted on listing submissions: ten full-size images plus the form fields.
pub const MAX_SUBMISSION_BYTES: usize = 10 * 2 * 1024 * 1024 + 512 * 1024;

/// Reads a listing submission: text fields into a `PropertyForm`, files under
/// `images` (or `images[]`) into uploads, in the order they were sent.
pub async fn read_property_submission(
    mut multipart: Multipart,
) -> Result<(PropertyForm, Vec<ImageUpload>), ApiError> {
    let mut form = PropertyForm::default();
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart stream: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "images" || name == "images[]" {
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read image file: {}", e)))?;
            debug!("Received image {:?} ({} bytes)", file_name, data.len());
            uploads.push(ImageUpload::new(file_name, data));
            continue;
        }

        let slot = match name.as_str() {
            "title" => &mut form.title,
            "description" => &mut form.description,
            "price" => &mut form.price,
            "surface_area" => &mut form.surface_area,
            "bedrooms" => &mut form.bedrooms,
            "city" => &mut form.city,
            "neighborhood" => &mut form.neighborhood,
            "status" => &mut form.status,
            _ => {
                warn!("Unknown multipart field: {}", name);
                continue;
            }
        };
        let text = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;
        *slot = Some(text);
    }

    Ok((form, uploads))
}
