//! Gallery metadata for the static viewer.
//!
//! Successful thumbnails are grouped into fixed-size pages and written as a
//! JavaScript array literal (`gallerydata.js`) next to a fixed viewer page
//! (`index.html`). All paths in the data file are relative to the gallery
//! root and use `/` separators so the viewer can load them as URLs.

use std::path::{Component, Path, PathBuf};

use crate::types::ProcessedThumbnail;

/// File name of the generated page data.
pub const DATA_FILE: &str = "gallerydata.js";

/// File name of the viewer page.
pub const INDEX_FILE: &str = "index.html";

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// One thumbnail/photo pair as seen by the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    /// Thumbnail path relative to the root
    pub thumb: String,
    /// Source photo path relative to the root
    pub image: String,
}

/// Writes `gallerydata.js` and `index.html` into a gallery root.
pub struct GalleryWriter {
    root: PathBuf,
    page_size: usize,
}

impl GalleryWriter {
    /// Create a writer for `root` with `page_size` entries per page.
    pub fn new(root: impl Into<PathBuf>, page_size: usize) -> Self {
        Self {
            root: root.into(),
            page_size: page_size.max(1),
        }
    }

    /// Build viewer entries from pipeline results, keeping their order.
    pub fn entries(&self, processed: &[ProcessedThumbnail]) -> Vec<GalleryEntry> {
        processed
            .iter()
            .map(|p| GalleryEntry {
                thumb: self.relative(&p.thumbnail_path),
                image: self.relative(&p.source_path),
            })
            .collect()
    }

    /// Render the paginated `data = [...]` literal.
    pub fn render_data(&self, entries: &[GalleryEntry]) -> String {
        let pages = paginate(entries, self.page_size);
        if pages.is_empty() {
            return "data = [];\n".to_string();
        }

        let rendered: Vec<String> = pages
            .iter()
            .map(|page| {
                let items: Vec<String> = page
                    .iter()
                    .map(|e| {
                        format!(
                            "    {{thumb: '{}', image: '{}'}}",
                            js_escape(&e.thumb),
                            js_escape(&e.image)
                        )
                    })
                    .collect();
                format!("  [\n{}\n  ]", items.join(",\n"))
            })
            .collect();

        format!("data = [\n{}\n];\n", rendered.join(",\n"))
    }

    /// Write both gallery files, replacing earlier versions.
    pub fn write(&self, entries: &[GalleryEntry]) -> std::io::Result<()> {
        std::fs::write(self.root.join(DATA_FILE), self.render_data(entries))?;
        std::fs::write(self.root.join(INDEX_FILE), INDEX_HTML)?;
        tracing::debug!(
            "Gallery written to {:?} ({} entries, {} pages)",
            self.root,
            entries.len(),
            entries.len().div_ceil(self.page_size)
        );
        Ok(())
    }

    /// Path relative to the root with `/` separators; paths outside the
    /// root are kept whole.
    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                Component::RootDir | Component::Prefix(_) => Some(String::new()),
                Component::CurDir => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Split entries into pages of at most `page_size`, in order.
pub fn paginate(entries: &[GalleryEntry], page_size: usize) -> Vec<&[GalleryEntry]> {
    entries.chunks(page_size.max(1)).collect()
}

/// Escape a value for a single-quoted JavaScript string.
fn js_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3c"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<GalleryEntry> {
        (0..n)
            .map(|i| GalleryEntry {
                thumb: format!("thumbs/{i}.jpg"),
                image: format!("img/{i}.jpg"),
            })
            .collect()
    }

    #[test]
    fn test_pagination_counts() {
        for n in 0..=17 {
            let all = entries(n);
            let pages = paginate(&all, 5);
            assert_eq!(pages.len(), n.div_ceil(5), "n = {n}");
            if let Some((last, full)) = pages.split_last() {
                assert!(full.iter().all(|p| p.len() == 5));
                let expected_last = if n % 5 == 0 { 5 } else { n % 5 };
                assert_eq!(last.len(), expected_last);
            }
        }
    }

    #[test]
    fn test_render_data_layout() {
        let writer = GalleryWriter::new("/photos", 2);
        let rendered = writer.render_data(&entries(3));
        assert_eq!(
            rendered,
            "data = [\n\
             \x20 [\n\
             \x20   {thumb: 'thumbs/0.jpg', image: 'img/0.jpg'},\n\
             \x20   {thumb: 'thumbs/1.jpg', image: 'img/1.jpg'}\n\
             \x20 ],\n\
             \x20 [\n\
             \x20   {thumb: 'thumbs/2.jpg', image: 'img/2.jpg'}\n\
             \x20 ]\n\
             ];\n"
        );
    }

    #[test]
    fn test_render_data_empty() {
        let writer = GalleryWriter::new("/photos", 5);
        assert_eq!(writer.render_data(&[]), "data = [];\n");
    }

    #[test]
    fn test_js_escape() {
        assert_eq!(js_escape("it's"), "it\\'s");
        assert_eq!(js_escape("a\\b"), "a\\\\b");
        assert_eq!(js_escape("</script>"), "\\x3c/script>");
    }

    #[test]
    fn test_entries_are_root_relative() {
        let writer = GalleryWriter::new("/photos", 5);
        let processed = vec![ProcessedThumbnail {
            source_path: PathBuf::from("/photos/2023/summer/beach.jpg"),
            thumbnail_path: PathBuf::from("/photos/thumbs/abc.jpg"),
            width: 10,
            height: 10,
            thumbnail_width: 10,
            thumbnail_height: 10,
            coarse_factor: 1,
            skipped: false,
        }];

        let entries = writer.entries(&processed);
        assert_eq!(
            entries,
            vec![GalleryEntry {
                thumb: "thumbs/abc.jpg".into(),
                image: "2023/summer/beach.jpg".into(),
            }]
        );
    }

    #[test]
    fn test_write_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = GalleryWriter::new(dir.path(), 5);
        writer.write(&entries(7)).unwrap();

        let data = std::fs::read_to_string(dir.path().join(DATA_FILE)).unwrap();
        assert!(data.starts_with("data = ["));
        assert_eq!(data.matches("{thumb:").count(), 7);
        let html = std::fs::read_to_string(dir.path().join(INDEX_FILE)).unwrap();
        assert!(html.contains("gallerydata.js"));
    }
}
