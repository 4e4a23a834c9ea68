//! Image upload handling
//!
//! Validates and persists multipart image fields for the product handlers.
//! Accepted formats are png/jpg/jpeg; content is verified by decoding, not
//! just by extension.

use std::path::PathBuf;
use uuid::Uuid;

use crate::core::ServerState;
use crate::utils::AppError;

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image extensions
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg"];

/// Validate an uploaded image: size, extension, decodable content
pub fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::validation("Empty image file provided"));
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::validation(format!(
            "Invalid image type '{}'. Supported: {}",
            ext_lower,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!(
            "Invalid image file ({}): {}",
            ext_lower, e
        )));
    }

    Ok(())
}

/// Persist an uploaded image and return its public URL path
/// (`/public/uploads/{filename}`).
///
/// Filenames are `{sanitized original stem}-{uuid}.{ext}` so concurrent
/// uploads of the same file never collide.
pub async fn save_image(
    state: &ServerState,
    original_name: &str,
    data: Vec<u8>,
) -> Result<String, AppError> {
    let path = PathBuf::from(original_name);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            AppError::validation(format!("Invalid file extension for: {original_name}"))
        })?;

    validate_image(&data, &ext)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    let filename = format!("{}-{}.{}", stem, Uuid::new_v4(), ext);
    let uploads_dir = state.uploads_dir();

    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create uploads directory: {e}")))?;

    let file_path = uploads_dir.join(&filename);
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;

    tracing::info!(
        original_name = %original_name,
        filename = %filename,
        size = data.len(),
        "Image uploaded"
    );

    Ok(format!("/public/uploads/{filename}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid 1x1 PNG
    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::new(1, 1);
        let mut buf = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buf),
            image::ImageFormat::Png,
        )
        .unwrap();
        buf
    }

    #[test]
    fn accepts_valid_png() {
        assert!(validate_image(&tiny_png(), "png").is_ok());
    }

    #[test]
    fn rejects_unsupported_extension() {
        assert!(validate_image(&tiny_png(), "webp").is_err());
        assert!(validate_image(&tiny_png(), "gif").is_err());
    }

    #[test]
    fn rejects_non_image_content() {
        assert!(validate_image(b"not an image at all", "png").is_err());
    }

    #[test]
    fn rejects_empty_file() {
        assert!(validate_image(&[], "png").is_err());
    }
}
