use serde_json::json;
use std::rc::Rc;

use crate::error::PlaybackError;
use crate::logging::{log_event, LogLevel};
use crate::scroll_lock::{ScrollLease, ScrollLock};

pub const ESCAPE_KEY: &str = "Escape";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModalPhase {
    Closed,
    Open,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dismissal {
    CloseControl,
    Backdrop,
    EscapeKey,
}

impl Dismissal {
    fn as_str(self) -> &'static str {
        match self {
            Self::CloseControl => "close_control",
            Self::Backdrop => "backdrop",
            Self::EscapeKey => "escape_key",
        }
    }
}

pub trait VideoSurface {
    fn assign_source(&self, source: &str);
    fn clear_source(&self);
    fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self);
    fn rewind(&self);
    fn set_visible(&self, visible: bool);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CaptionField {
    Title,
    Issuer,
    Date,
}

pub trait CertificateSurface {
    fn show_image(&self, source: &str, alt: &str);
    fn clear_image(&self);
    fn set_caption(&self, field: CaptionField, text: &str);
    fn set_visible(&self, visible: bool);
}

struct Lifecycle {
    phase: ModalPhase,
    lock: Rc<ScrollLock>,
    lease: ScrollLease,
}

impl Lifecycle {
    fn new(lock: Rc<ScrollLock>) -> Self {
        Self {
            phase: ModalPhase::Closed,
            lock,
            lease: ScrollLease::default(),
        }
    }

    fn enter_open(&mut self) {
        self.phase = ModalPhase::Open;
        self.lease.take(&self.lock);
    }

    fn enter_closed(&mut self) {
        self.phase = ModalPhase::Closed;
        self.lease.give_back(&self.lock);
    }

    fn is_open(&self) -> bool {
        self.phase == ModalPhase::Open
    }
}

pub struct VideoModal<S> {
    surface: Option<S>,
    lifecycle: Lifecycle,
}

impl<S: VideoSurface> VideoModal<S> {
    /// `surface` is `None` when the page has no video overlay; every call is
    /// then a no-op.
    pub fn new(surface: Option<S>, lock: Rc<ScrollLock>) -> Self {
        Self {
            surface,
            lifecycle: Lifecycle::new(lock),
        }
    }

    pub fn open(&mut self, source: &str) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        if source.is_empty() {
            return;
        }

        surface.assign_source(source);
        surface.set_visible(true);
        self.lifecycle.enter_open();

        if let Err(error) = surface.play() {
            log_event(
                LogLevel::Debug,
                "video_modal_play_rejected",
                json!({ "source": source, "reason": error.to_string() }),
            );
        }

        log_event(LogLevel::Debug, "video_modal_opened", json!({ "source": source }));
    }

    pub fn close(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };

        surface.pause();
        surface.rewind();
        surface.clear_source();
        surface.set_visible(false);
        self.lifecycle.enter_closed();
    }

    pub fn dismiss(&mut self, dismissal: Dismissal) {
        if dismissal == Dismissal::EscapeKey && !self.is_open() {
            return;
        }

        self.close();
        log_event(
            LogLevel::Debug,
            "video_modal_dismissed",
            json!({ "via": dismissal.as_str() }),
        );
    }

    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == ESCAPE_KEY && self.is_open() {
            self.dismiss(Dismissal::EscapeKey);
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }
}

pub struct CertificateModal<S> {
    surface: Option<S>,
    lifecycle: Lifecycle,
}

impl<S: CertificateSurface> CertificateModal<S> {
    pub fn new(surface: Option<S>, lock: Rc<ScrollLock>) -> Self {
        Self {
            surface,
            lifecycle: Lifecycle::new(lock),
        }
    }

    pub fn open(&mut self, image: &str, title: &str, issuer: &str, date: &str) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        if image.is_empty() {
            return;
        }

        surface.show_image(image, title);
        surface.set_caption(CaptionField::Title, title);
        surface.set_caption(CaptionField::Issuer, issuer);
        surface.set_caption(CaptionField::Date, date);
        surface.set_visible(true);
        self.lifecycle.enter_open();

        log_event(
            LogLevel::Debug,
            "certificate_modal_opened",
            json!({ "image": image, "title": title }),
        );
    }

    // Captions stay stale while hidden; the next open overwrites them.
    pub fn close(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };

        surface.clear_image();
        surface.set_visible(false);
        self.lifecycle.enter_closed();
    }

    pub fn dismiss(&mut self, dismissal: Dismissal) {
        if dismissal == Dismissal::EscapeKey && !self.is_open() {
            return;
        }

        self.close();
        log_event(
            LogLevel::Debug,
            "certificate_modal_dismissed",
            json!({ "via": dismissal.as_str() }),
        );
    }

    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == ESCAPE_KEY && self.is_open() {
            self.dismiss(Dismissal::EscapeKey);
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    pub struct FakeVideo {
        pub source: RefCell<String>,
        pub visible: Cell<bool>,
        pub paused: Cell<bool>,
        pub position: Cell<f64>,
        pub play_calls: Cell<u32>,
        pub reject_play: bool,
    }

    impl FakeVideo {
        pub fn src(&self) -> String {
            self.source.borrow().clone()
        }
    }

    impl VideoSurface for Rc<FakeVideo> {
        fn assign_source(&self, source: &str) {
            *self.source.borrow_mut() = source.to_string();
            self.position.set(0.0);
        }

        fn clear_source(&self) {
            self.source.borrow_mut().clear();
        }

        fn play(&self) -> Result<(), PlaybackError> {
            self.play_calls.set(self.play_calls.get() + 1);
            if self.reject_play {
                return Err(PlaybackError::Rejected("NotAllowedError".to_string()));
            }
            self.paused.set(false);
            self.position.set(self.position.get() + 3.5);
            Ok(())
        }

        fn pause(&self) {
            self.paused.set(true);
        }

        fn rewind(&self) {
            self.position.set(0.0);
        }

        fn set_visible(&self, visible: bool) {
            self.visible.set(visible);
        }
    }

    #[derive(Default)]
    pub struct FakeCertificate {
        pub image: RefCell<Option<String>>,
        pub alt: RefCell<String>,
        pub title: RefCell<String>,
        pub issuer: RefCell<String>,
        pub date: RefCell<String>,
        pub visible: Cell<bool>,
    }

    impl FakeCertificate {
        pub fn captions(&self) -> (String, String, String) {
            (
                self.title.borrow().clone(),
                self.issuer.borrow().clone(),
                self.date.borrow().clone(),
            )
        }
    }

    impl CertificateSurface for Rc<FakeCertificate> {
        fn show_image(&self, source: &str, alt: &str) {
            *self.image.borrow_mut() = Some(source.to_string());
            *self.alt.borrow_mut() = alt.to_string();
        }

        fn clear_image(&self) {
            *self.image.borrow_mut() = None;
        }

        fn set_caption(&self, field: CaptionField, text: &str) {
            let slot = match field {
                CaptionField::Title => &self.title,
                CaptionField::Issuer => &self.issuer,
                CaptionField::Date => &self.date,
            };
            *slot.borrow_mut() = text.to_string();
        }

        fn set_visible(&self, visible: bool) {
            self.visible.set(visible);
        }
    }
}
