//! MIME detection for uploads
//!
//! Binary formats are recognised by their magic bytes. Text formats carry
//! none, so `.md`, `.txt`, `.csv` and friends are typed by extension.
//! Anything else goes out as octet-stream and the service decides.

/// Sent when neither the content nor the name identifies the format.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// MIME type for an upload named `file_name` with the given content.
pub fn guess_mime(content: Option<&[u8]>, file_name: Option<&str>) -> String {
    content
        .and_then(sniff)
        .or_else(|| file_name.and_then(from_extension))
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

fn sniff(content: &[u8]) -> Option<String> {
    if content.is_empty() {
        return None;
    }
    infer::get(content).map(|kind| kind.mime_type().to_string())
}

fn from_extension(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .first_raw()
        .map(str::to_string)
}
