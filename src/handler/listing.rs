//! Directory listing module
//!
//! Generates the HTML index served for directories without an index file.

use std::io;
use std::path::Path;

use crate::logger;

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Read the immediate children of `dir`, sorted case-insensitively
///
/// Names that are not valid UTF-8 cannot be linked to and are left out.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            logger::log_warning(&format!(
                "Skipping non UTF-8 name in listing of '{}'",
                dir.display()
            ));
            continue;
        };
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|t| t.is_symlink());
        // Follows symlinks, so a link to a directory is listed as one
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());

        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for `display_path` (the decoded request path)
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!(
        "Directory listing for {}",
        htmlescape::encode_minimal(display_path)
    );

    let mut html = String::from("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));

    for entry in entries {
        let mut href = urlencoding::encode(&entry.name).into_owned();
        let mut label = entry.name.clone();
        if entry.is_dir {
            href.push('/');
            label.push('/');
        }
        if entry.is_symlink {
            label.push('@');
        }
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            htmlescape::encode_minimal(&href),
            htmlescape::encode_minimal(&label)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
