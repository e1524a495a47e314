//! Profile image upload and removal.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::caller::Caller;
use crate::error::IdentityError;
use crate::provider::IdentityProvider;
use crate::types::{AvatarImage, AvatarUpload};

/// 5 MiB.
pub const MAX_AVATAR_BYTES: u64 = 5 * 1024 * 1024;

pub struct AvatarManager {
    provider: Arc<dyn IdentityProvider>,
}

impl AvatarManager {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Validate locally, then upload. The returned URL replaces the old one.
    pub async fn upload(
        &self,
        caller: &Caller,
        upload: &AvatarUpload,
    ) -> Result<AvatarImage, IdentityError> {
        let user_id = caller.require_user()?;
        let content_type = validate_upload(upload)?;

        let user = self
            .provider
            .upload_profile_image(user_id, upload, content_type)
            .await?;
        let image_url = user
            .image_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                IdentityError::InvalidResponse("upload response has no image_url".to_string())
            })?;
        info!(bytes = upload.size(), content_type, "profile image uploaded");
        Ok(AvatarImage { image_url })
    }

    /// Clear the image. The caller then renders [`fallback_initial`].
    pub async fn remove(&self, caller: &Caller) -> Result<(), IdentityError> {
        let user_id = caller.require_user()?;
        self.provider.delete_profile_image(user_id).await?;
        info!("profile image removed");
        Ok(())
    }
}

/// Size then type check. Returns the canonical MIME type to send.
pub fn validate_upload(upload: &AvatarUpload) -> Result<&'static str, IdentityError> {
    let size = upload.size();
    if size > MAX_AVATAR_BYTES {
        return Err(IdentityError::FileTooLarge {
            size,
            limit: MAX_AVATAR_BYTES,
        });
    }

    let declared = upload
        .content_type
        .as_deref()
        .and_then(|raw| raw.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .filter(|mime| !mime.is_empty());

    // Browsers report unknown files as octet-stream; the extension decides then.
    let canonical = match declared {
        Some(mime) if mime != "application/octet-stream" => canonical_image_mime(&mime),
        _ => Path::new(&upload.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| mime_for_extension(&ext.to_ascii_lowercase())),
    };

    canonical.ok_or_else(|| {
        IdentityError::UnsupportedType(
            upload
                .content_type
                .clone()
                .unwrap_or_else(|| upload.file_name.clone()),
        )
    })
}

fn canonical_image_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "image/png" => Some("image/png"),
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("image/jpeg"),
        "image/webp" => Some("image/webp"),
        "image/gif" => Some("image/gif"),
        _ => None,
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Placeholder shown when there is no image: first letter of the display
/// name, else of the email, upper-cased; `?` when neither has one.
pub fn fallback_initial(display_name: Option<&str>, email: Option<&str>) -> char {
    [display_name, email]
        .into_iter()
        .flatten()
        .find_map(|s| s.chars().find(|c| c.is_alphanumeric()))
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}
