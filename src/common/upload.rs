use crate::common::error::CompressError;
use axum::extract::multipart::Field;
use futures_util::StreamExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::error;

/// Streams a multipart field to `dest`, returning the number of bytes written.
///
/// The caller registers `dest` for cleanup before calling, so a partial file
/// left behind by a failed write is still removed.
pub async fn stream_to_file(mut field: Field<'_>, dest: &Path) -> Result<u64, CompressError> {
    let file = File::create(dest).await.map_err(CompressError::Storage)?;
    let mut writer = BufWriter::new(file);
    let mut written = 0u64;

    while let Some(chunk) = field.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                error!("Stream error: {}", e);
                return Err(CompressError::InputRetrieval(e.body_text()));
            }
        };

        writer
            .write_all(&chunk)
            .await
            .map_err(CompressError::Storage)?;
        written += chunk.len() as u64;
    }

    writer.flush().await.map_err(CompressError::Storage)?;
    Ok(written)
}

/// Longest stem kept from a client filename, in bytes. The extension is kept whole.
pub const MAX_STEM_LEN: usize = 100;

/// Reduces a client-declared filename to a safe single path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`. Long stems are cut to [`MAX_STEM_LEN`]. Returns `None` when nothing
/// usable is left.
pub fn sanitize_file_name(declared: &str) -> Option<String> {
    let base = declared
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return None;
    }
    Some(clamp_stem(cleaned))
}

// Only ASCII survives cleaning, so any byte index is a char boundary.
fn clamp_stem(name: &str) -> String {
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    if stem.len() <= MAX_STEM_LEN {
        return name.to_string();
    }
    format!("{}{ext}", &stem[..MAX_STEM_LEN])
}
