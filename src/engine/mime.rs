//! Extension to content-type lookup.

use crate::utils::config::MimeConsts;

/// Content type for a normalized extension (`.pdf`, or empty).
///
/// `.msg` is special-cased; everything else goes through the `mime_guess` table.
/// Text types always carry `; charset=utf-8`.
pub fn detect_mime(ext: &str) -> String {
    if ext == MimeConsts::OUTLOOK_EXT {
        return MimeConsts::OUTLOOK_MIME.to_string();
    }
    let bare = ext.strip_prefix('.').unwrap_or(ext);
    if bare.is_empty() {
        return MimeConsts::DEFAULT_MIME.to_string();
    }
    match mime_guess::from_ext(bare).first() {
        Some(m)
            if m.type_() == mime_guess::mime::TEXT
                && m.get_param(mime_guess::mime::CHARSET).is_none() =>
        {
            format!("{}{}", m.essence_str(), MimeConsts::TEXT_CHARSET_SUFFIX)
        }
        Some(m) => m.to_string(),
        None => MimeConsts::DEFAULT_MIME.to_string(),
    }
}
