//! JSON export of a gallery's data.
//!
//! The manifest carries the same fields a static front end needs to render
//! the gallery: the ordered file list, captions, title, default caption and
//! thumbnail size.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use super::Gallery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub files: Vec<String>,
    pub captions: BTreeMap<String, String>,
    pub title: Option<String>,
    pub default_caption: Option<String>,
    pub thumb_size: u32,
}

impl From<&Gallery> for Manifest {
    fn from(gallery: &Gallery) -> Self {
        Self {
            files: gallery.images().to_vec(),
            captions: gallery
                .captions()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            title: gallery.title().map(ToOwned::to_owned),
            default_caption: gallery.default_caption().map(ToOwned::to_owned),
            thumb_size: gallery.thumbnail_size(),
        }
    }
}

impl Manifest {
    /// Serialize to `writer`, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_to<W: Write>(&self, mut writer: W, pretty: bool) -> serde_json::Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut writer, self)?;
        } else {
            serde_json::to_writer(&mut writer, self)?;
        }
        writeln!(writer).map_err(serde_json::Error::io)
    }
}
