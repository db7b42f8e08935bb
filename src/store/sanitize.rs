//! Upload file name sanitization
//!
//! Turns whatever name the client sent into a single safe path component:
//!
//! 1. Path separators (`/`, `\`) and whitespace split the name into segments
//! 2. Only ASCII alphanumerics, `.`, `_` and `-` survive in each segment
//! 3. Empty and dot-only segments (`.`, `..`) are dropped
//! 4. Remaining segments are joined with `_`, dot runs collapse to one dot
//! 5. Leading and trailing `.` / `_` are stripped
//!
//! `../../etc/passwd` becomes `etc_passwd`, `My Scan (1).jpg` becomes
//! `My_Scan_1.jpg`.

/// Name used when nothing survives sanitization
pub const FALLBACK_NAME: &str = "upload";

/// Sanitize an uploaded file name into a safe single path component
pub fn sanitize_filename(name: &str) -> String {
    let segments: Vec<String> = name
        .split(|c: char| c == '/' || c == '\\' || c.is_whitespace())
        .map(|segment| {
            segment
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
                .collect::<String>()
        })
        .filter(|segment| segment.chars().any(|c| c != '.'))
        .collect();

    let mut joined = String::with_capacity(name.len());
    for c in segments.join("_").chars() {
        if c == '.' && joined.ends_with('.') {
            continue;
        }
        joined.push(c);
    }

    let trimmed = joined.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
