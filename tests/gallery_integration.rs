use std::path::Path;

use snekkja::config::GalleryConfig;
use snekkja::gallery::manifest::Manifest;
use snekkja::gallery::{Caption, Gallery, Navigator, Trigger, ViewportMetrics};

fn touch(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn photo_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in ["c.jpg", "a.png", "b.JPEG", "notes.md", "d.gif"] {
        touch(dir.path(), name, "");
    }
    std::fs::create_dir(dir.path().join("sub.png")).unwrap();
    dir
}

#[test]
fn test_load_lists_images_sorted() {
    let dir = photo_dir();
    let gallery = Gallery::load(dir.path(), &GalleryConfig::default()).unwrap();
    assert_eq!(gallery.images(), ["a.png", "b.JPEG", "c.jpg", "d.gif"]);
    assert_eq!(gallery.root(), dir.path());
}

#[test]
fn test_load_respects_configured_extensions() {
    let dir = photo_dir();
    let config = GalleryConfig {
        file_extensions: vec!["jpg".into(), "jpeg".into()],
        ..GalleryConfig::default()
    };
    let gallery = Gallery::load(dir.path(), &config).unwrap();
    assert_eq!(gallery.images(), ["b.JPEG", "c.jpg"]);
}

#[test]
fn test_load_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "readme.txt", "hi");
    assert!(Gallery::load(dir.path(), &GalleryConfig::default()).is_err());
}

#[test]
fn test_load_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(Gallery::load(&missing, &GalleryConfig::default()).is_err());
}

#[test]
fn test_captions_merge_with_sidecars_winning() {
    let dir = photo_dir();
    touch(
        dir.path(),
        "captions.toml",
        "\"a.png\" = \"toml a\"\n\"c.jpg\" = \"toml c\"\n\"gone.png\" = \"x\"\n",
    );
    touch(dir.path(), "captions.json", r#"{"c.jpg": "json c"}"#);
    touch(dir.path(), "d.txt", "  sidecar d \n");

    let gallery = Gallery::load(dir.path(), &GalleryConfig::default()).unwrap();
    assert_eq!(gallery.caption_for("a.png"), Caption::Text("toml a".into()));
    assert_eq!(gallery.caption_for("c.jpg"), Caption::Text("json c".into()));
    assert_eq!(gallery.caption_for("d.gif"), Caption::Text("sidecar d".into()));
    assert_eq!(gallery.caption_for("b.JPEG"), Caption::Hidden);
    assert!(!gallery.captions().contains_key("gone.png"));
}

#[test]
fn test_malformed_captions_file_is_skipped() {
    let dir = photo_dir();
    touch(dir.path(), "captions.json", "{not json");
    touch(dir.path(), "a.txt", "kept");
    let gallery = Gallery::load(dir.path(), &GalleryConfig::default()).unwrap();
    assert_eq!(gallery.caption_for("a.png"), Caption::Text("kept".into()));
}

#[test]
fn test_default_caption_fills_gaps() {
    let dir = photo_dir();
    touch(dir.path(), "a.txt", "");
    let config = GalleryConfig {
        default_caption: Some("Untitled".into()),
        gallery_title: Some("Trip".into()),
        ..GalleryConfig::default()
    };
    let gallery = Gallery::load(dir.path(), &config).unwrap();
    // empty captions count as absent
    assert_eq!(gallery.caption_for("a.png"), Caption::Text("Untitled".into()));
    assert_eq!(gallery.title(), Some("Trip"));
}

#[test]
fn test_manifest_json_shape() {
    let dir = photo_dir();
    touch(dir.path(), "a.txt", "first");
    let config = GalleryConfig {
        gallery_title: Some("Trip".into()),
        thumbnail_size: 64,
        ..GalleryConfig::default()
    };
    let gallery = Gallery::load(dir.path(), &config).unwrap();

    let mut out = Vec::new();
    Manifest::from(&gallery).write_to(&mut out, false).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["files"][0], "a.png");
    assert_eq!(json["files"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["captions"]["a.png"], "first");
    assert_eq!(json["title"], "Trip");
    assert!(json["default_caption"].is_null());
    assert_eq!(json["thumb_size"], 64);
}

#[test]
fn test_navigator_walks_loaded_gallery() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..12 {
        touch(dir.path(), &format!("p{i:02}.png"), "");
    }
    let gallery = Gallery::load(dir.path(), &GalleryConfig::default()).unwrap();
    // 540 px / 108 px = 5 thumbnails
    let mut nav = Navigator::new(ViewportMetrics::for_thumbnails(540, gallery.thumbnail_size()));

    let first = nav.start(&gallery);
    assert_eq!(first.focus_id, "p00.png");
    assert_eq!(first.visible_ids().collect::<Vec<_>>().len(), 5);

    let view = nav.dispatch(&gallery, Trigger::Next);
    assert_eq!(view.focus_index, 4);

    let view = nav.dispatch(&gallery, Trigger::NavigateTo(100));
    assert_eq!(view.focus_id, "p11.png");
    assert!(view.next.is_none());
    assert_eq!(
        view.visible_ids().collect::<Vec<_>>(),
        ["p07.png", "p08.png", "p09.png", "p10.png", "p11.png"]
    );

    let view = nav.dispatch(&gallery, Trigger::Resize(0));
    assert_eq!(view.thumbnails.len(), 1);
    assert_eq!(view.focus_index, 11);
}
