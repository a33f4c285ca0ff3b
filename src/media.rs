use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::diagnostics::{log_event, LogLevel};

pub const PAYLOAD_ELEMENT_ID: &str = "projectMediaData";
pub const DEFAULT_ITEM_TITLE: &str = "Recurso multimedia";
pub const UNAVAILABLE_TITLE: &str = "Recurso no disponible";

pub const IMAGE_PLACEHOLDER: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" width=\"600\" height=\"360\" viewBox=\"0 0 600 360\"%3E%3Cdefs%3E%3ClinearGradient id=\"a\" x1=\"0%25\" x2=\"100%25\" y1=\"0%25\" y2=\"100%25\"%3E%3Cstop offset=\"0%25\" stop-color=\"%2303f0ff\" stop-opacity=\"0.25\"/%3E%3Cstop offset=\"100%25\" stop-color=\"%2303f0ff\" stop-opacity=\"0.05\"/%3E%3C/linearGradient%3E%3C/defs%3E%3Crect width=\"600\" height=\"360\" fill=\"%23040a18\"/%3E%3Cpath d=\"M96 72h408c9.941 0 18 8.059 18 18v180c0 9.941-8.059 18-18 18H96c-9.941 0-18-8.059-18-18V90c0-9.941 8.059-18 18-18z\" fill=\"url(%23a)\" stroke=\"%2303f0ff\" stroke-opacity=\"0.18\" stroke-width=\"2\" stroke-dasharray=\"12 12\"/%3E%3Ctext x=\"50%25\" y=\"50%25\" dominant-baseline=\"middle\" text-anchor=\"middle\" font-family=\"Inter, sans-serif\" font-size=\"24\" letter-spacing=\"3\" fill=\"%2303f0ff\" fill-opacity=\"0.65\"%3EPENDIENTE DE CARGAR RECURSO%3C/text%3E%3C/svg%3E";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    #[default]
    #[serde(other)]
    Empty,
}

/// Missing or `null` text fields read as empty strings.
fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub description: String,
}

/// What the stage or a gallery card should actually show for an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presentation<'a> {
    Video { src: &'a str },
    Image { src: &'a str },
    Unavailable,
}

impl MediaItem {
    pub fn presentation(&self) -> Presentation<'_> {
        match (self.kind, self.src.as_deref()) {
            (MediaKind::Video, Some(src)) if !src.is_empty() => Presentation::Video { src },
            (MediaKind::Image, Some(src)) if !src.is_empty() => Presentation::Image { src },
            _ => Presentation::Unavailable,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            DEFAULT_ITEM_TITLE
        } else {
            &self.title
        }
    }

    pub fn tab_label(&self, index: usize) -> String {
        if self.title.is_empty() {
            format!("Recurso {}", index + 1)
        } else {
            self.title.clone()
        }
    }

    pub fn unavailable_message(&self) -> String {
        match self.src.as_deref().filter(|src| !src.is_empty()) {
            Some(src) => format!(
                "Carga el archivo {src} en la carpeta del proyecto para visualizarlo aquí."
            ),
            None => "Agrega el recurso multimedia correspondiente para activar esta vista."
                .to_string(),
        }
    }

    /// Cards fall back to the placeholder graphic for an image with no source.
    pub fn image_src(&self) -> &str {
        self.src
            .as_deref()
            .filter(|src| !src.is_empty())
            .unwrap_or(IMAGE_PLACEHOLDER)
    }
}

/// `video/<ext>` from the source extension, ignoring any query string.
pub fn video_mime(src: &str) -> Option<String> {
    let path = src.split('?').next().unwrap_or(src);
    let (_, extension) = path.rsplit_once('.')?;
    if extension.is_empty() || extension.contains('/') {
        return None;
    }
    Some(format!("video/{extension}"))
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Highlight {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub description: String,
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("project media payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project media payload must be a JSON object")]
    NotAnObject,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectMediaPayload {
    pub media: Vec<MediaItem>,
    pub highlights: Vec<Highlight>,
}

impl ProjectMediaPayload {
    /// Non-array `media`/`highlights` fields are treated as empty lists. A
    /// media entry that cannot be read is kept as an `Empty` item so the
    /// gallery still shows its fallback card; an unreadable highlight is
    /// dropped.
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        let value: serde_json::Value = serde_json::from_str(raw.trim())?;
        let serde_json::Value::Object(mut object) = value else {
            return Err(PayloadError::NotAnObject);
        };

        let media = take_list(&mut object, "media")
            .into_iter()
            .map(|entry| entry.unwrap_or_default())
            .collect();
        let highlights = take_list(&mut object, "highlights")
            .into_iter()
            .flatten()
            .collect();

        Ok(Self { media, highlights })
    }
}

fn take_list<T: for<'de> Deserialize<'de>>(
    object: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Vec<Option<T>> {
    let Some(serde_json::Value::Array(entries)) = object.remove(key) else {
        return Vec::new();
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                log_event(
                    LogLevel::Warn,
                    "project_media_entry_invalid",
                    serde_json::json!({
                        "list": key,
                        "index": index,
                        "error": error.to_string(),
                    }),
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_payload() {
        let payload = ProjectMediaPayload::parse(
            r#"
            {
              "media": [
                { "type": "video", "src": "media/demo.mp4?v=2", "poster": "media/demo.jpg", "title": "Demo" },
                { "type": "image", "src": "media/panel.png", "thumbnail": "media/panel-thumb.png" },
                { "type": "gif" }
              ],
              "highlights": [{ "title": "Panel", "description": "Indicadores" }]
            }
            "#,
        )
        .expect("payload parses");

        assert_eq!(payload.media.len(), 3);
        assert_eq!(payload.media[0].kind, MediaKind::Video);
        assert_eq!(payload.media[2].kind, MediaKind::Empty);
        assert_eq!(payload.media[1].tab_label(1), "Recurso 2");
        assert_eq!(payload.highlights[0].title, "Panel");
    }

    #[test]
    fn untyped_entry_becomes_empty_item() {
        let payload = ProjectMediaPayload::parse(
            r#"{ "media": [{ "src": "a.png", "title": "x" }, { "type": "image", "src": "b.png" }] }"#,
        )
        .expect("payload parses");

        assert_eq!(payload.media.len(), 2);
        assert_eq!(payload.media[0].kind, MediaKind::Empty);
        assert_eq!(payload.media[0].title, "x");
        assert_eq!(payload.media[0].presentation(), Presentation::Unavailable);
        assert_eq!(payload.media[1].kind, MediaKind::Image);
    }

    #[test]
    fn null_text_fields_read_as_empty() {
        let payload = ProjectMediaPayload::parse(
            r#"{
              "media": [{ "type": "image", "src": "a.png", "title": null, "description": null }],
              "highlights": [{ "title": null, "description": "Texto" }]
            }"#,
        )
        .expect("payload parses");

        assert_eq!(payload.media[0].title, "");
        assert_eq!(payload.media[0].display_title(), DEFAULT_ITEM_TITLE);
        assert_eq!(payload.media[0].presentation(), Presentation::Image { src: "a.png" });
        assert_eq!(payload.highlights[0].title, "");
    }

    #[test]
    fn unreadable_entries_do_not_reject_the_payload() {
        let payload = ProjectMediaPayload::parse(
            r#"{
              "media": [42, { "type": "video", "src": 7 }, { "type": "video", "src": "clip.mp4" }],
              "highlights": ["loose text", { "title": "Panel" }]
            }"#,
        )
        .expect("payload parses");

        assert_eq!(payload.media.len(), 3);
        assert_eq!(payload.media[0], MediaItem::default());
        assert_eq!(payload.media[1], MediaItem::default());
        assert_eq!(payload.media[2].presentation(), Presentation::Video { src: "clip.mp4" });
        assert_eq!(payload.highlights.len(), 1);
        assert_eq!(payload.highlights[0].title, "Panel");
    }

    #[test]
    fn non_array_fields_become_empty() {
        let payload = ProjectMediaPayload::parse(r#"{ "media": "none" }"#).expect("payload parses");
        assert!(payload.media.is_empty());
        assert!(payload.highlights.is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(matches!(
            ProjectMediaPayload::parse("{ media: ["),
            Err(PayloadError::Json(_))
        ));
        assert!(matches!(
            ProjectMediaPayload::parse("[]"),
            Err(PayloadError::NotAnObject)
        ));
    }

    #[test]
    fn presentation_requires_a_source() {
        let video = MediaItem {
            kind: MediaKind::Video,
            src: None,
            poster: None,
            thumbnail: None,
            title: String::new(),
            description: String::new(),
        };
        assert_eq!(video.presentation(), Presentation::Unavailable);
        assert_eq!(video.display_title(), DEFAULT_ITEM_TITLE);
        assert!(video.unavailable_message().starts_with("Agrega"));

        let image = MediaItem {
            kind: MediaKind::Image,
            src: Some("shots/a.png".to_string()),
            ..video
        };
        assert_eq!(image.presentation(), Presentation::Image { src: "shots/a.png" });
    }

    #[test]
    fn video_mime_ignores_query() {
        assert_eq!(video_mime("clips/intro.webm?t=3").as_deref(), Some("video/webm"));
        assert_eq!(video_mime("clips/intro"), None);
    }
}
