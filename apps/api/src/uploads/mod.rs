// Profile photo uploads: validation happens before any bytes leave the
// process; accepted photos are written to S3 and referenced by public URL.

pub mod handlers;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl PhotoFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(PhotoFormat::Jpeg),
            "image/png" => Some(PhotoFormat::Png),
            "image/webp" => Some(PhotoFormat::Webp),
            "image/gif" => Some(PhotoFormat::Gif),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "image/jpeg",
            PhotoFormat::Png => "image/png",
            PhotoFormat::Webp => "image/webp",
            PhotoFormat::Gif => "image/gif",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "jpg",
            PhotoFormat::Png => "png",
            PhotoFormat::Webp => "webp",
            PhotoFormat::Gif => "gif",
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Multipart field 'photo' is required")]
    MissingPhoto,

    #[error("Photo is empty")]
    Empty,

    #[error("Unsupported photo type '{0}'; use JPEG, PNG, WebP or GIF")]
    UnsupportedType(String),

    #[error("Photo is {size} bytes; the limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("Malformed multipart body: {0}")]
    Multipart(String),
}

impl UploadError {
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::MissingPhoto => "MISSING_PHOTO",
            UploadError::Empty => "EMPTY_PHOTO",
            UploadError::UnsupportedType(_) => "UNSUPPORTED_MEDIA_TYPE",
            UploadError::TooLarge { .. } => "PHOTO_TOO_LARGE",
            UploadError::Multipart(_) => "INVALID_MULTIPART",
        }
    }
}

/// Checks type and size of an uploaded photo.
pub fn validate_photo(
    content_type: Option<&str>,
    size: usize,
    limit: usize,
) -> Result<PhotoFormat, UploadError> {
    let content_type = content_type.unwrap_or("application/octet-stream");
    let format = PhotoFormat::from_content_type(content_type)
        .ok_or_else(|| UploadError::UnsupportedType(content_type.to_string()))?;
    if size == 0 {
        return Err(UploadError::Empty);
    }
    if size > limit {
        return Err(UploadError::TooLarge { size, limit });
    }
    Ok(format)
}

/// Object storage for validated photos. Returns a stable public reference.
///
/// Carried in `AppState` as `Arc<dyn PhotoStore>`.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn put_photo(
        &self,
        owner_id: Uuid,
        format: PhotoFormat,
        bytes: Bytes,
    ) -> Result<String, AppError>;
}

pub fn photo_key(owner_id: Uuid, photo_id: Uuid, format: PhotoFormat) -> String {
    format!("photos/{owner_id}/{photo_id}.{}", format.extension())
}

pub fn public_url(base: &str, bucket: &str, key: &str) -> String {
    format!("{}/{bucket}/{key}", base.trim_end_matches('/'))
}

pub struct S3PhotoStore {
    s3: S3Client,
    bucket: String,
    public_base: String,
}

impl S3PhotoStore {
    pub fn new(s3: S3Client, bucket: String, public_base: String) -> Self {
        Self {
            s3,
            bucket,
            public_base,
        }
    }
}

#[async_trait]
impl PhotoStore for S3PhotoStore {
    async fn put_photo(
        &self,
        owner_id: Uuid,
        format: PhotoFormat,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        let key = photo_key(owner_id, Uuid::new_v4(), format);
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(format.content_type())
            .send()
            .await
            .map_err(|e| AppError::S3(format!("Photo upload failed: {e}")))?;

        info!("Uploaded photo to s3://{}/{}", self.bucket, key);
        Ok(public_url(&self.public_base, &self.bucket, &key))
    }
}
