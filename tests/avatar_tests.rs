mod common;

use pretty_assertions::assert_eq;
use warden::avatar::MAX_AVATAR_BYTES;
use warden::caller::Caller;
use warden::error::ErrorKind;
use warden::types::AvatarUpload;

use common::{facade, png, RecordingProvider, USER_ID};

#[tokio::test]
async fn oversized_image_never_reaches_provider() {
    let provider = RecordingProvider::shared();

    let result = facade(&provider)
        .upload_avatar(&Caller::new(USER_ID), &png("big.png", 6 * 1024 * 1024))
        .await;

    assert_eq!(result.error, Some(ErrorKind::FileTooLarge));
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn non_image_is_rejected() {
    let provider = RecordingProvider::shared();
    let upload = AvatarUpload::builder()
        .file_name("notes.txt".to_string())
        .content_type("text/plain".to_string())
        .bytes(b"hello".to_vec())
        .build();

    let result = facade(&provider)
        .upload_avatar(&Caller::new(USER_ID), &upload)
        .await;

    assert_eq!(result.error, Some(ErrorKind::UnsupportedType));
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn upload_at_limit_returns_new_url() {
    let provider = RecordingProvider::shared();

    let result = facade(&provider)
        .upload_avatar(
            &Caller::new(USER_ID),
            &png("me.png", MAX_AVATAR_BYTES as usize),
        )
        .await;

    let image = result.data.expect("uploaded");
    assert_eq!(image.image_url, "https://img.example.com/me.png");
    assert_eq!(
        provider.calls(),
        vec!["upload_profile_image:image/png".to_string()]
    );
}

#[tokio::test]
async fn octet_stream_upload_uses_extension() {
    let provider = RecordingProvider::shared();
    let upload = AvatarUpload::builder()
        .file_name("me.JPG".to_string())
        .content_type("application/octet-stream".to_string())
        .bytes(vec![0xff, 0xd8, 0xff])
        .build();

    let result = facade(&provider)
        .upload_avatar(&Caller::new(USER_ID), &upload)
        .await;

    assert!(result.ok);
    assert_eq!(
        provider.calls(),
        vec!["upload_profile_image:image/jpeg".to_string()]
    );
}

#[tokio::test]
async fn remove_clears_image() {
    let provider = RecordingProvider::shared();
    let facade = facade(&provider);
    let caller = Caller::new(USER_ID);
    facade.upload_avatar(&caller, &png("me.png", 64)).await;

    let removed = facade.remove_avatar(&caller).await;
    assert!(removed.ok);

    let account = facade.load_account(&caller).await.data.unwrap();
    assert_eq!(account.image_url, "");
}

#[tokio::test]
async fn failed_upload_is_reported() {
    let provider = RecordingProvider::shared();
    provider.fail("upload_profile_image");

    let result = facade(&provider)
        .upload_avatar(&Caller::new(USER_ID), &png("me.png", 64))
        .await;

    assert_eq!(result.error, Some(ErrorKind::UpstreamError));
    assert_eq!(result.data, None);
}
