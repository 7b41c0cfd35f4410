use serde_json::json;

use crate::error::PlaybackError;
use crate::logging::{log_event, LogLevel};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "video" => Some(Self::Video),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// A card's media attributes as the markup declares them.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CardMedia {
    pub kind: Option<MediaKind>,
    pub video_source: Option<String>,
    pub image_source: Option<String>,
    pub thumbnail: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

impl CardMedia {
    /// Values are taken verbatim; an empty attribute counts as missing.
    pub fn from_attributes(
        kind: Option<String>,
        video_source: Option<String>,
        image_source: Option<String>,
        thumbnail: Option<String>,
    ) -> Self {
        Self {
            kind: kind.as_deref().and_then(MediaKind::parse),
            video_source: present(video_source),
            image_source: present(image_source),
            thumbnail: present(thumbnail),
        }
    }
}

/// The lazily created hover-preview `<video>`.
pub trait PreviewVideo {
    fn set_muted(&self, muted: bool);
    fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self);
    fn rewind(&self);
}

/// The card element itself.
pub trait CardSurface {
    type Preview: PreviewVideo;

    /// A preview video already present in the card's markup, if any.
    fn existing_preview(&self) -> Option<Self::Preview>;
    /// Builds and attaches a preview; `None` when the card has no media area.
    fn create_preview(&self, source: &str, thumbnail: Option<&str>) -> Option<Self::Preview>;
    fn set_previewing(&self, previewing: bool);
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MediaClick {
    OpenVideo(String),
    OpenImage(String),
    Ignore,
}

pub struct MediaCard<S: CardSurface> {
    media: CardMedia,
    surface: S,
    preview: Option<S::Preview>,
}

impl<S: CardSurface> MediaCard<S> {
    pub fn new(media: CardMedia, surface: S) -> Self {
        Self {
            media,
            surface,
            preview: None,
        }
    }

    fn ensure_preview(&mut self) -> Option<&S::Preview> {
        if self.preview.is_none() {
            self.preview = self.surface.existing_preview().or_else(|| {
                let source = self.media.video_source.as_deref()?;
                self.surface.create_preview(source, self.media.thumbnail.as_deref())
            });
        }
        self.preview.as_ref()
    }

    pub fn on_pointer_enter(&mut self) {
        if self.media.kind != Some(MediaKind::Video) {
            return;
        }
        let Some(preview) = self.ensure_preview() else {
            return;
        };

        preview.set_muted(true);
        let started = preview.play();
        self.surface.set_previewing(true);

        if let Err(error) = started {
            log_event(
                LogLevel::Debug,
                "card_preview_play_rejected",
                json!({ "reason": error.to_string() }),
            );
        }
    }

    pub fn on_pointer_leave(&mut self) {
        let Some(preview) = self.preview.as_ref() else {
            return;
        };

        preview.pause();
        preview.rewind();
        self.surface.set_previewing(false);
    }

    pub fn on_media_area_click(&self) -> MediaClick {
        let source = match self.media.kind {
            Some(MediaKind::Video) => self.media.video_source.clone().map(MediaClick::OpenVideo),
            Some(MediaKind::Image) => self.media.image_source.clone().map(MediaClick::OpenImage),
            None => None,
        };
        source.unwrap_or(MediaClick::Ignore)
    }
}

/// Carries out a media click: videos go to `open_video` (the shared modal),
/// images to `open_image` (a new top-level view).
pub fn route_click(
    click: MediaClick,
    open_video: impl FnOnce(&str),
    open_image: impl FnOnce(&str),
) {
    match click {
        MediaClick::OpenVideo(source) => open_video(&source),
        MediaClick::OpenImage(source) => open_image(&source),
        MediaClick::Ignore => {}
    }
}
