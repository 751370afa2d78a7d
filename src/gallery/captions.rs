//! Caption collection.
//!
//! Captions come from three places, later ones overriding earlier ones:
//! `captions.toml`, `captions.json`, then a sidecar file next to each image
//! (`photo.txt` or `photo.html` for `photo.jpg`). Every caption is trimmed;
//! HTML sidecars are reduced to plain text.

use std::collections::HashMap;
use std::path::Path;

pub const CAPTIONS_TOML: &str = "captions.toml";
pub const CAPTIONS_JSON: &str = "captions.json";

/// Sidecar extensions, in increasing priority.
pub const SIDECAR_EXTENSIONS: &[&str] = &["html", "txt"];

/// Collect captions for `images` from the files in `dir`.
///
/// Unreadable or malformed caption files are logged and skipped; entries
/// for files not in `images` are dropped.
pub fn read_captions(dir: &Path, images: &[String]) -> HashMap<String, String> {
    let mut captions = HashMap::with_capacity(images.len());

    if let Some(map) = read_map(dir, CAPTIONS_TOML, |text| {
        toml::from_str::<HashMap<String, String>>(text).map_err(|e| e.to_string())
    }) {
        transfer(images, map, &mut captions);
    }

    if let Some(map) = read_map(dir, CAPTIONS_JSON, |text| {
        serde_json::from_str::<HashMap<String, String>>(text).map_err(|e| e.to_string())
    }) {
        transfer(images, map, &mut captions);
    }

    for name in images {
        for ext in SIDECAR_EXTENSIONS {
            let sidecar = dir.join(name).with_extension(ext);
            if let Ok(text) = std::fs::read_to_string(&sidecar) {
                let text = if *ext == "html" {
                    html_to_text(&text)
                } else {
                    text
                };
                captions.insert(name.clone(), text.trim().to_owned());
            }
        }
    }

    captions
}

fn read_map(
    dir: &Path,
    file_name: &str,
    parse: impl FnOnce(&str) -> Result<HashMap<String, String>, String>,
) -> Option<HashMap<String, String>> {
    let path = dir.join(file_name);
    let text = std::fs::read_to_string(&path).ok()?;
    match parse(&text) {
        Ok(map) => Some(map),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring malformed captions file");
            None
        }
    }
}

fn transfer(
    images: &[String],
    mut source: HashMap<String, String>,
    dest: &mut HashMap<String, String>,
) {
    for name in images {
        if let Some(caption) = source.remove(name) {
            dest.insert(name.clone(), caption.trim().to_owned());
        }
    }
}

/// Tags that end a line of text.
const BREAKING_TAGS: &[&str] = &["br", "p", "div", "li", "tr", "h1", "h2", "h3"];

/// Plain text of an HTML fragment.
///
/// Tags are dropped, whitespace collapses as a browser would, line-breaking
/// tags start a new line and the common entities are decoded.
pub fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        push_collapsed(&mut text, &rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            rest = &rest[open..];
            break;
        };
        let tag = rest[open + 1..open + close].trim_start_matches('/');
        let name_len = tag
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(tag.len());
        let name = tag[..name_len].to_ascii_lowercase();
        if BREAKING_TAGS.contains(&name.as_str()) {
            let kept = text.trim_end_matches(' ').len();
            text.truncate(kept);
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
        }
        rest = &rest[open + close + 1..];
    }
    push_collapsed(&mut text, rest);

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_collapsed(out: &mut String, chunk: &str) {
    for ch in chunk.chars() {
        if ch.is_whitespace() {
            if !(out.is_empty() || out.ends_with(' ') || out.ends_with('\n')) {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
}
