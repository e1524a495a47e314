//! Profile image payloads.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// A candidate profile image picked by the user.
///
/// # Example
/// ```
/// use warden::types::AvatarUpload;
///
/// let upload = AvatarUpload::builder()
///     .file_name("me.png".to_string())
///     .content_type("image/png".to_string())
///     .bytes(vec![0x89, b'P', b'N', b'G'])
///     .build();
/// assert_eq!(upload.size(), 4);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// The user's current profile image. An empty URL means "no image".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarImage {
    pub image_url: String,
}
