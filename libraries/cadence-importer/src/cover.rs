//! Cover image previews

use crate::CoverImage;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Displayable `data:` URL for a picked cover image
pub fn cover_preview(cover: &CoverImage) -> String {
    let mime = if cover.mime.trim().is_empty() {
        guess_mime(&cover.name)
    } else {
        cover.mime.trim()
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(&cover.bytes))
}

fn guess_mime(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
