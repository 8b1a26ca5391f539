//! Listing images: upload checks and the backing object store.

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::{FieldErrors, Result};

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;
/// Most images accepted in one create or update.
pub const MAX_IMAGES_PER_SUBMISSION: usize = 10;
/// Prefix under which listing images are stored.
pub const IMAGE_PREFIX: &str = "properties";

const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// A file received from the client, not yet checked.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub data: Bytes,
}

impl ImageUpload {
    pub fn new(file_name: Option<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name,
            data: data.into(),
        }
    }
}

/// An upload whose content was sniffed as an accepted image.
#[derive(Debug, Clone)]
pub struct CheckedImage {
    data: Bytes,
    extension: &'static str,
}

impl CheckedImage {
    pub fn extension(&self) -> &'static str {
        self.extension
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Checks every upload, recording one error per rejected file under `images.<n>`.
///
/// The file type comes from the content, never from the client's file name.
pub fn check_uploads(uploads: Vec<ImageUpload>, errors: &mut FieldErrors) -> Vec<CheckedImage> {
    if uploads.len() > MAX_IMAGES_PER_SUBMISSION {
        errors.add(
            "images",
            format!("You may upload at most {} images at once.", MAX_IMAGES_PER_SUBMISSION),
        );
    }

    let mut checked = Vec::with_capacity(uploads.len());
    for (index, upload) in uploads.into_iter().enumerate() {
        let field = format!("images.{}", index);
        let kind = match infer::get(&upload.data) {
            Some(kind) if kind.matcher_type() == infer::MatcherType::Image => kind,
            _ => {
                debug!("Rejected upload {:?}: not an image", upload.file_name);
                errors.add(field, "Each file must be an image.");
                continue;
            }
        };
        if !ACCEPTED_MIME_TYPES.contains(&kind.mime_type()) {
            errors.add(field, "Images must be in JPEG, PNG, JPG, or WebP format.");
            continue;
        }
        if upload.data.len() > MAX_IMAGE_BYTES {
            errors.add(field, "Each image must be smaller than 2MB.");
            continue;
        }
        checked.push(CheckedImage {
            data: upload.data,
            extension: kind.extension(),
        });
    }
    checked
}

/// File storage for listing images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    store: Arc<dyn ObjectStore>,
}

impl ImageStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Stores files on disk below `root`, creating the directory if needed.
    pub fn local(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| object_store::Error::Generic {
            store: "LocalFileSystem",
            source: Box::new(e),
        })?;
        let store = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Writes the image under a fresh name and returns its relative path.
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn put(&self, image: &CheckedImage) -> Result<String> {
        let location = ObjectPath::from(format!(
            "{}/{}.{}",
            IMAGE_PREFIX,
            Uuid::new_v4(),
            image.extension
        ));
        self.store.put(&location, image.data.clone().into()).await?;
        debug!("Stored image at {}", location);
        Ok(location.to_string())
    }

    /// Deletes a stored file. Failures are logged and reported as `false`.
    #[instrument(skip(self))]
    pub async fn remove(&self, path: &str) -> bool {
        match self.store.delete(&ObjectPath::from(path)).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to delete image file {}: {}", path, e);
                false
            }
        }
    }

    pub async fn exists(&self, path: &str) -> Result<bool> {
        match self.store.head(&ObjectPath::from(path)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{block_removal, jpeg_upload, local_store, png_upload};

    fn webp_upload() -> ImageUpload {
        let mut data = b"RIFF\x24\x00\x00\x00WEBPVP8 ".to_vec();
        data.extend_from_slice(&[0u8; 32]);
        ImageUpload::new(Some("photo.webp".to_string()), data)
    }

    #[test]
    fn test_accepts_jpeg_png_and_webp() {
        let mut errors = FieldErrors::new();
        let checked = check_uploads(
            vec![jpeg_upload("a.jpg"), png_upload("b.png"), webp_upload()],
            &mut errors,
        );
        assert!(errors.is_empty(), "{}", errors);
        let extensions: Vec<_> = checked.iter().map(|c| c.extension()).collect();
        assert_eq!(extensions, vec!["jpg", "png", "webp"]);
    }

    #[test]
    fn test_rejects_each_bad_file_individually() {
        let gif = ImageUpload::new(Some("anim.gif".to_string()), b"GIF89a\x01\x00\x01\x00".to_vec());
        let text = ImageUpload::new(Some("notes.png".to_string()), b"just some text".to_vec());
        let mut huge = png_upload("big.png");
        let mut data = huge.data.to_vec();
        data.resize(MAX_IMAGE_BYTES + 1, 0);
        huge.data = data.into();

        let mut errors = FieldErrors::new();
        let checked = check_uploads(vec![png_upload("ok.png"), gif, text, huge], &mut errors);

        assert_eq!(checked.len(), 1);
        assert!(!errors.contains("images.0"));
        assert_eq!(
            errors.get("images.1"),
            Some(&["Images must be in JPEG, PNG, JPG, or WebP format.".to_string()][..])
        );
        assert_eq!(
            errors.get("images.2"),
            Some(&["Each file must be an image.".to_string()][..])
        );
        assert_eq!(
            errors.get("images.3"),
            Some(&["Each image must be smaller than 2MB.".to_string()][..])
        );
    }

    #[test]
    fn test_too_many_files() {
        let uploads = (0..=MAX_IMAGES_PER_SUBMISSION)
            .map(|i| png_upload(&format!("{}.png", i)))
            .collect();
        let mut errors = FieldErrors::new();
        check_uploads(uploads, &mut errors);
        assert!(errors.contains("images"));
    }

    #[tokio::test]
    async fn test_put_and_remove() {
        let store = ImageStore::in_memory();
        let mut errors = FieldErrors::new();
        let checked = check_uploads(vec![png_upload("a.png")], &mut errors);

        let path = store.put(&checked[0]).await.unwrap();
        assert!(path.starts_with("properties/"));
        assert!(path.ends_with(".png"));
        assert!(store.exists(&path).await.unwrap());

        assert!(store.remove(&path).await);
        assert!(!store.exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_reports_failures() {
        let (dir, store) = local_store();
        let mut errors = FieldErrors::new();
        let checked = check_uploads(vec![png_upload("a.png"), png_upload("b.png")], &mut errors);
        let kept = store.put(&checked[0]).await.unwrap();
        let blocked = store.put(&checked[1]).await.unwrap();
        block_removal(dir.path(), &blocked);

        assert!(!store.remove(&blocked).await);
        assert!(store.remove(&kept).await);
        assert!(!store.exists(&kept).await.unwrap());
    }
}
