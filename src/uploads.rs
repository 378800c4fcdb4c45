//! Image uploads sent as `multipart/form-data` in a field named `file`.
//!
//! Files land on local disk under `<directory>/<kind>/` and are served
//! back under `/uploads/<kind>/`.

use std::{error::Error, fmt::Debug, path::PathBuf};

use actix_multipart::Multipart;
use actix_web::{body::BoxBody, http::StatusCode, HttpResponse, ResponseError};
use anyhow::Context;
use futures_util::StreamExt;
use thiserror::Error;
use uuid::Uuid;

use crate::{configuration::UploadSettings, response::error_response, telemetry::spawn_blocking_with_tracing, utils::error_fmt_chain};

pub const UPLOAD_FIELD: &str = "file";
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind{
    ProductImage,
    VendorLogo,
    Avatar,
}

impl UploadKind {
    pub fn folder(&self) -> &'static str{
        match self {
            UploadKind::ProductImage => "products",
            UploadKind::VendorLogo => "logos",
            UploadKind::Avatar => "avatars"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat{
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn from_mime(mime: &str) -> Option<ImageFormat>{
        match mime {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            _ => None
        }
    }

    pub fn extension(&self) -> &'static str{
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp"
        }
    }

    // Leading bytes must agree with the declared content type
    pub fn matches_signature(&self, bytes: &[u8]) -> bool{
        match self {
            ImageFormat::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            ImageFormat::Png => bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
            ImageFormat::Webp => bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
        }
    }
}

#[derive(Error)]
pub enum UploadError{
    #[error("Expected a multipart field named `file`")]
    MissingFile,
    #[error("Only JPEG, PNG and WEBP images are allowed")]
    UnsupportedType,
    #[error("File content does not match its declared type")]
    SignatureMismatch,
    #[error("File is larger than the {0} byte limit")]
    TooLarge(usize),
    #[error("Malformed multipart payload")]
    MalformedPayload(#[source] actix_multipart::MultipartError),
    #[error("Failed to store uploaded file")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::UnsupportedType | UploadError::SignatureMismatch => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::MissingFile | UploadError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            UploadError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        error_response(self.status_code(), self.to_string())
    }
}

// Image read from the request, not yet written to disk
#[derive(Debug)]
pub struct ReceivedImage{
    pub format: ImageFormat,
    pub bytes: Vec<u8>
}

#[tracing::instrument("Reading uploaded image", skip_all)]
pub async fn read_image(mut payload: Multipart, max_bytes: usize) -> Result<ReceivedImage, UploadError>{
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(UploadError::MalformedPayload)?;

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let format = field
            .content_type()
            .and_then(|mime| ImageFormat::from_mime(mime.essence_str()))
            .ok_or(UploadError::UnsupportedType)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(UploadError::MalformedPayload)?;

            if bytes.len() + chunk.len() > max_bytes {
                return Err(UploadError::TooLarge(max_bytes))
            }
            bytes.extend_from_slice(&chunk);
        }

        if !format.matches_signature(&bytes) {
            return Err(UploadError::SignatureMismatch)
        }

        return Ok(ReceivedImage{ format, bytes })
    }

    Err(UploadError::MissingFile)
}

// Writes the image and returns its public url
#[tracing::instrument("Storing uploaded image", skip(settings, image), fields(size = image.bytes.len()))]
pub async fn store_image(
    settings: &UploadSettings,
    kind: UploadKind,
    image: ReceivedImage
) -> Result<String, UploadError>{
    let file_name = format!("{}.{}", Uuid::new_v4(), image.format.extension());
    let folder = PathBuf::from(&settings.directory).join(kind.folder());
    let path = folder.join(&file_name);

    spawn_blocking_with_tracing(move || {
        std::fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create upload folder {}", folder.display()))?;
        std::fs::write(&path, &image.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(format!("{}/{}/{}", PUBLIC_PREFIX, kind.folder(), file_name))
}

// Best effort removal of a previously stored image
#[tracing::instrument("Removing replaced image", skip(settings))]
pub async fn remove_image(settings: &UploadSettings, public_url: &str){
    let relative = match public_url.strip_prefix(PUBLIC_PREFIX) {
        Some(r) => r.trim_start_matches('/').to_string(),
        None => return
    };

    if relative.split('/').any(|segment| segment == ".." || segment.is_empty()) {
        tracing::warn!("Refusing to remove suspicious path {}", public_url);
        return
    }

    let path = PathBuf::from(&settings.directory).join(relative);
    let res = spawn_blocking_with_tracing(move || std::fs::remove_file(path)).await;

    match res {
        Ok(Ok(())) => {},
        Ok(Err(e)) => tracing::warn!("Failed to remove old image: {}", e),
        Err(e) => tracing::warn!("Failed due to threadpool error: {}", e)
    }
}
