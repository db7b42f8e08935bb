//! HTML status page

use std::fmt::Write;
use std::path::Path;

use crate::network::NetworkInfo;
use crate::store::UploadedFile;

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
        h1 { color: #4A90E2; }
        .status { background-color: #e8f4ff; padding: 15px; border-radius: 5px; }
        .files { margin-top: 20px; }
        .file-item { padding: 10px; border-bottom: 1px solid #eee; }
        .info { color: #666; font-size: 0.9em; }
        .no-files { color: #999; font-style: italic; }
        .url-box {
            background-color: #f5f5f5; padding: 10px; border-radius: 5px;
            font-family: monospace; margin: 10px 0;
        }
"#;

/// Render the status page for the given network info and recent uploads
pub fn render_status_page(network: &NetworkInfo, upload_dir: &Path, files: &[UploadedFile]) -> String {
    let mut html = String::with_capacity(2048 + files.len() * 256);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <title>Phone Scanner Server</title>\n");
    let _ = writeln!(html, "    <style>{}    </style>", STYLE);
    html.push_str("</head>\n<body>\n    <h1>Phone Scanner Server</h1>\n");

    html.push_str("    <div class=\"status\">\n        <h2>Server Status: Running</h2>\n");
    html.push_str("        <p>Use one of these URLs in your phone app:</p>\n");
    let _ = writeln!(
        html,
        "        <div class=\"url-box\">{}</div>",
        escape_html(&network.url)
    );
    let _ = writeln!(
        html,
        "        <p class=\"info\">\n            Server running on {}<br>\n            Upload directory: {}\n        </p>",
        escape_html(&network.hostname),
        escape_html(&upload_dir.display().to_string())
    );
    html.push_str("    </div>\n\n");

    html.push_str("    <div class=\"files\">\n");
    let _ = writeln!(html, "        <h2>Recent Uploads ({})</h2>", files.len());
    if files.is_empty() {
        html.push_str("        <p class=\"no-files\">No files have been uploaded yet.</p>\n");
    } else {
        for file in files {
            let _ = writeln!(
                html,
                "        <div class=\"file-item\">\n            <strong>{}</strong><br>\n            <span class=\"info\">\n                Size: {:.1} KB | \n                Uploaded: {}\n            </span>\n        </div>",
                escape_html(&file.name),
                file.size_kb(),
                file.modified_display()
            );
        }
    }
    html.push_str("    </div>\n</body>\n</html>\n");

    html
}

/// Escape text for HTML element content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
