//! Artwork URL size rewriting
//!
//! The catalog serves cover art at `.../{W}x{H}bb.jpg`. Asking for a larger
//! edge is a plain string rewrite of that token; URLs that do not carry it
//! are returned unchanged.

/// Rewrite the `{W}x{H}bb` token in the last path segment to `{size}x{size}bb`
pub fn upscale(url: &str, size: u32) -> String {
    let Some(slash) = url.rfind('/') else {
        return url.to_string();
    };
    let (head, file) = url.split_at(slash + 1);

    match size_token_len(file) {
        Some(len) => format!("{head}{size}x{size}bb{}", &file[len..]),
        None => url.to_string(),
    }
}

/// Length of a leading `{digits}x{digits}bb` token, if present
fn size_token_len(file: &str) -> Option<usize> {
    let bytes = file.as_bytes();
    let width = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if width == 0 || bytes.get(width) != Some(&b'x') {
        return None;
    }

    let rest = &bytes[width + 1..];
    let height = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if height == 0 || !rest[height..].starts_with(b"bb") {
        return None;
    }

    Some(width + 1 + height + 2)
}
