use gloo::events::EventListener;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    window, Document, Element, Event, HtmlElement, HtmlImageElement, HtmlMediaElement,
    HtmlVideoElement, KeyboardEvent,
};

use crate::error::PlaybackError;
use crate::logging::{log_event, LogLevel};
use crate::media_card::{route_click, CardMedia, CardSurface, MediaCard, PreviewVideo};
use crate::modal::{
    CaptionField, CertificateModal, CertificateSurface, Dismissal, VideoModal, VideoSurface,
};
use crate::scroll_lock::{PageScroll, ScrollLock};

const ACTIVE_CLASS: &str = "active";
const PLAYING_CLASS: &str = "playing";
const PREVIEW_CLASS: &str = "project-video";

pub(crate) fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn query_one(root: &Document, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub(crate) fn set_class(element: &Element, class: &str, present: bool) {
    let classes = element.class_list();
    let _ = if present {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
}

/// Starts playback without waiting for it; a rejected promise is logged and
/// otherwise ignored.
fn start_playback(media: &HtmlMediaElement, event: &'static str) -> Result<(), PlaybackError> {
    let promise = media
        .play()
        .map_err(|error| PlaybackError::Rejected(format!("{error:?}")))?;

    spawn_local(async move {
        if let Err(error) = JsFuture::from(promise).await {
            log_event(LogLevel::Debug, event, json!({ "reason": format!("{error:?}") }));
        }
    });
    Ok(())
}

struct BodyScroll {
    body: HtmlElement,
}

impl PageScroll for BodyScroll {
    fn set_scroll_enabled(&self, enabled: bool) {
        let style = self.body.style();
        let _ = if enabled {
            style.remove_property("overflow").map(|_| ())
        } else {
            style.set_property("overflow", "hidden")
        };
    }
}

/// No `<body>` (detached document): the lock still counts, nothing scrolls.
struct NoPage;

impl PageScroll for NoPage {
    fn set_scroll_enabled(&self, _enabled: bool) {}
}

pub(crate) struct DomVideoModal {
    overlay: Element,
    video: HtmlVideoElement,
}

impl DomVideoModal {
    fn find(document: &Document) -> Option<Self> {
        let overlay = document.get_element_by_id("video-modal")?;
        let video = document
            .get_element_by_id("modal-video")?
            .dyn_into::<HtmlVideoElement>()
            .ok()?;
        Some(Self { overlay, video })
    }
}

impl VideoSurface for DomVideoModal {
    fn assign_source(&self, source: &str) {
        self.video.set_src(source);
    }

    fn clear_source(&self) {
        let _ = self.video.remove_attribute("src");
    }

    fn play(&self) -> Result<(), PlaybackError> {
        start_playback(&self.video, "video_modal_play_rejected")
    }

    fn pause(&self) {
        let _ = self.video.pause();
    }

    fn rewind(&self) {
        self.video.set_current_time(0.0);
    }

    fn set_visible(&self, visible: bool) {
        set_class(&self.overlay, ACTIVE_CLASS, visible);
    }
}

pub(crate) struct DomCertificateModal {
    overlay: Element,
    image: HtmlImageElement,
    title: Option<Element>,
    issuer: Option<Element>,
    date: Option<Element>,
}

impl DomCertificateModal {
    fn find(document: &Document) -> Option<Self> {
        let overlay = document.get_element_by_id("certificate-modal")?;
        let image = document
            .get_element_by_id("modal-certificate")?
            .dyn_into::<HtmlImageElement>()
            .ok()?;

        Some(Self {
            overlay,
            image,
            title: document.get_element_by_id("modal-certificate-title"),
            issuer: document.get_element_by_id("modal-certificate-issuer"),
            date: document.get_element_by_id("modal-certificate-date"),
        })
    }
}

impl CertificateSurface for DomCertificateModal {
    fn show_image(&self, source: &str, alt: &str) {
        self.image.set_src(source);
        self.image.set_alt(alt);
    }

    fn clear_image(&self) {
        let _ = self.image.remove_attribute("src");
    }

    fn set_caption(&self, field: CaptionField, text: &str) {
        let node = match field {
            CaptionField::Title => self.title.as_ref(),
            CaptionField::Issuer => self.issuer.as_ref(),
            CaptionField::Date => self.date.as_ref(),
        };
        if let Some(node) = node {
            node.set_text_content(Some(text));
        }
    }

    fn set_visible(&self, visible: bool) {
        set_class(&self.overlay, ACTIVE_CLASS, visible);
    }
}

pub(crate) struct DomPreview {
    video: HtmlVideoElement,
}

impl PreviewVideo for DomPreview {
    fn set_muted(&self, muted: bool) {
        self.video.set_muted(muted);
    }

    fn play(&self) -> Result<(), PlaybackError> {
        start_playback(&self.video, "card_preview_play_rejected")
    }

    fn pause(&self) {
        let _ = self.video.pause();
    }

    fn rewind(&self) {
        self.video.set_current_time(0.0);
    }
}

pub(crate) struct DomCard {
    document: Document,
    card: Element,
    container: Option<Element>,
}

impl CardSurface for DomCard {
    type Preview = DomPreview;

    fn existing_preview(&self) -> Option<DomPreview> {
        let video = self
            .card
            .query_selector(&format!(".{PREVIEW_CLASS}"))
            .ok()
            .flatten()?
            .dyn_into::<HtmlVideoElement>()
            .ok()?;
        Some(DomPreview { video })
    }

    fn create_preview(&self, source: &str, thumbnail: Option<&str>) -> Option<DomPreview> {
        let container = self.container.as_ref()?;
        let video = self
            .document
            .create_element("video")
            .ok()?
            .dyn_into::<HtmlVideoElement>()
            .ok()?;

        video.set_class_name(PREVIEW_CLASS);
        video.set_src(source);
        let _ = video.set_attribute("playsinline", "");
        video.set_muted(true);
        video.set_loop(true);
        video.set_preload("metadata");
        if let Some(thumbnail) = thumbnail {
            video.set_poster(thumbnail);
        }
        container.append_child(&video).ok()?;

        Some(DomPreview { video })
    }

    fn set_previewing(&self, previewing: bool) {
        set_class(&self.card, PLAYING_CLASS, previewing);
    }
}

impl DomCard {
    fn media_from_attributes(card: &Element) -> CardMedia {
        CardMedia::from_attributes(
            card.get_attribute("data-media-type"),
            card.get_attribute("data-video-src"),
            card.get_attribute("data-image-src"),
            card.get_attribute("data-thumbnail"),
        )
    }
}

/// Cloneable handle to the two shared overlays, for any handler on the page.
#[derive(Clone)]
pub struct Modals {
    video: Rc<RefCell<VideoModal<DomVideoModal>>>,
    certificate: Rc<RefCell<CertificateModal<DomCertificateModal>>>,
}

impl Modals {
    pub fn open_video_modal(&self, source: &str) {
        self.video.borrow_mut().open(source);
    }

    pub fn open_certificate_modal(&self, image: &str, title: &str, issuer: &str, date: &str) {
        self.certificate.borrow_mut().open(image, title, issuer, date);
    }
}

/// Keeps every listener registered by [`install`] alive; dropping it
/// unregisters them.
pub struct MediaControllers {
    _listeners: Vec<EventListener>,
}

fn dismiss_on_click<T: 'static>(
    listeners: &mut Vec<EventListener>,
    target: Option<Element>,
    modal: &Rc<RefCell<T>>,
    dismissal: Dismissal,
    dismiss: fn(&mut T, Dismissal),
) {
    let Some(target) = target else {
        return;
    };
    let modal = modal.clone();
    listeners.push(EventListener::new(&target, "click", move |_event: &Event| {
        dismiss(&mut modal.borrow_mut(), dismissal);
    }));
}

fn escape_listener<T: 'static>(
    document: &Document,
    modal: &Rc<RefCell<T>>,
    handle_key: fn(&mut T, &str) -> bool,
) -> EventListener {
    let modal = modal.clone();
    EventListener::new(document, "keydown", move |event: &Event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            handle_key(&mut modal.borrow_mut(), &event.key());
        }
    })
}

fn open_in_new_view(source: &str) {
    if let Some(win) = window() {
        let _ = win.open_with_url_and_target(source, "_blank");
    }
}

pub fn install(document: &Document) -> MediaControllers {
    let page: Box<dyn PageScroll> = match document.body() {
        Some(body) => Box::new(BodyScroll { body }),
        None => Box::new(NoPage),
    };
    let lock = Rc::new(ScrollLock::new(page));

    let video_surface = DomVideoModal::find(document);
    let certificate_surface = DomCertificateModal::find(document);
    log_event(
        LogLevel::Debug,
        "media_controllers_installing",
        json!({
            "video_overlay": video_surface.is_some(),
            "certificate_overlay": certificate_surface.is_some(),
        }),
    );

    let modals = Modals {
        video: Rc::new(RefCell::new(VideoModal::new(video_surface, lock.clone()))),
        certificate: Rc::new(RefCell::new(CertificateModal::new(
            certificate_surface,
            lock,
        ))),
    };

    let mut listeners = Vec::new();

    dismiss_on_click(
        &mut listeners,
        query_one(document, ".video-close"),
        &modals.video,
        Dismissal::CloseControl,
        VideoModal::dismiss,
    );
    dismiss_on_click(
        &mut listeners,
        query_one(document, ".video-backdrop"),
        &modals.video,
        Dismissal::Backdrop,
        VideoModal::dismiss,
    );
    listeners.push(escape_listener(document, &modals.video, VideoModal::handle_key));

    dismiss_on_click(
        &mut listeners,
        query_one(document, ".certificate-close"),
        &modals.certificate,
        Dismissal::CloseControl,
        CertificateModal::dismiss,
    );
    dismiss_on_click(
        &mut listeners,
        query_one(document, ".certificate-backdrop"),
        &modals.certificate,
        Dismissal::Backdrop,
        CertificateModal::dismiss,
    );
    listeners.push(escape_listener(
        document,
        &modals.certificate,
        CertificateModal::handle_key,
    ));

    let cards = query_all(document, ".project-card");
    let card_count = cards.len();
    for card in cards {
        install_card(document, card, &modals, &mut listeners);
    }

    for trigger in query_all(document, ".certificate-card") {
        let modals = modals.clone();
        let source = trigger.clone();
        listeners.push(EventListener::new(&trigger, "click", move |_event: &Event| {
            let attribute = |name: &str| source.get_attribute(name).unwrap_or_default();
            modals.open_certificate_modal(
                &attribute("data-certificate-image"),
                &attribute("data-certificate-title"),
                &attribute("data-certificate-issuer"),
                &attribute("data-certificate-date"),
            );
        }));
    }

    log_event(
        LogLevel::Debug,
        "media_controllers_installed",
        json!({ "cards": card_count, "listeners": listeners.len() }),
    );

    MediaControllers {
        _listeners: listeners,
    }
}

fn install_card(
    document: &Document,
    card: Element,
    modals: &Modals,
    listeners: &mut Vec<EventListener>,
) {
    let media = DomCard::media_from_attributes(&card);
    let container = card.query_selector(".project-media").ok().flatten();
    let controller = Rc::new(RefCell::new(MediaCard::new(
        media,
        DomCard {
            document: document.clone(),
            card: card.clone(),
            container: container.clone(),
        },
    )));

    {
        let controller = controller.clone();
        listeners.push(EventListener::new(&card, "mouseenter", move |_event: &Event| {
            controller.borrow_mut().on_pointer_enter();
        }));
    }

    {
        let controller = controller.clone();
        listeners.push(EventListener::new(&card, "mouseleave", move |_event: &Event| {
            controller.borrow_mut().on_pointer_leave();
        }));
    }

    let Some(container) = container else {
        return;
    };
    let modals = modals.clone();
    listeners.push(EventListener::new(&container, "click", move |_event: &Event| {
        let click = controller.borrow().on_media_area_click();
        route_click(click, |source| modals.open_video_modal(source), open_in_new_view);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        window()
            .and_then(|w| w.document())
            .expect("browser document")
    }

    fn mount(html: &str) -> Element {
        let document = document();
        let root = document.create_element("div").expect("create root");
        root.set_inner_html(html);
        document
            .body()
            .expect("body")
            .append_child(&root)
            .expect("append root");
        root
    }

    fn body_overflow(document: &Document) -> String {
        document
            .body()
            .and_then(|body| body.style().get_property_value("overflow").ok())
            .unwrap_or_default()
    }

    fn dispatch(target: &Element, kind: &str) {
        let event = Event::new(kind).expect("event");
        let _ = target.dispatch_event(&event);
    }

    fn press(document: &Document, key: &str) {
        let init = web_sys::KeyboardEventInit::new();
        init.set_key(key);
        let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init)
            .expect("keyboard event");
        let _ = document.dispatch_event(&event);
    }

    #[wasm_bindgen_test]
    fn video_modal_round_trip_against_real_elements() {
        let root = mount(
            r#"<div id="video-modal"><div class="video-backdrop"></div>
               <button class="video-close"></button><video id="modal-video"></video></div>
               <article class="project-card" data-media-type="video" data-video-src="a.mp4">
               <div class="project-media"></div></article>"#,
        );
        let document = document();
        let controllers = install(&document);
        let media = query_one(&document, ".project-media").expect("media area");

        dispatch(&media, "click");
        let overlay = document.get_element_by_id("video-modal").expect("overlay");
        assert!(overlay.class_list().contains("active"));
        assert_eq!(body_overflow(&document), "hidden");

        press(&document, "Escape");
        assert!(!overlay.class_list().contains("active"));
        let video = document.get_element_by_id("modal-video").expect("video");
        assert_eq!(video.get_attribute("src"), None);
        assert_eq!(body_overflow(&document), "");

        drop(controllers);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn media_area_click_loads_full_video_into_modal() {
        let root = mount(
            r#"<div id="video-modal"><div class="video-backdrop"></div>
               <button class="video-close"></button><video id="modal-video"></video></div>
               <article class="project-card" data-media-type="video"
                 data-video-src="media/full.mp4" data-thumbnail="media/thumb.jpg">
               <div class="project-media"></div></article>"#,
        );
        let document = document();
        let controllers = install(&document);
        let card = query_one(&document, ".project-card").expect("card");
        let media = query_one(&document, ".project-media").expect("media area");
        let video = document.get_element_by_id("modal-video").expect("video");

        dispatch(&card, "mouseenter");
        dispatch(&media, "click");
        assert_eq!(video.get_attribute("src").as_deref(), Some("media/full.mp4"));

        let backdrop = query_one(&document, ".video-backdrop").expect("backdrop");
        dispatch(&backdrop, "click");
        assert_eq!(video.get_attribute("src"), None);
        assert_eq!(body_overflow(&document), "");

        drop(controllers);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn certificate_card_click_fills_modal_captions() {
        let root = mount(
            r#"<div id="certificate-modal"><div class="certificate-backdrop"></div>
               <button class="certificate-close"></button><img id="modal-certificate" />
               <h3 id="modal-certificate-title"></h3><p id="modal-certificate-issuer"></p>
               <p id="modal-certificate-date"></p></div>
               <button class="certificate-card" data-certificate-image="certificates/aws.png"
                 data-certificate-title="AWS" data-certificate-issuer="Amazon"
                 data-certificate-date="2024"></button>"#,
        );
        let document = document();
        let controllers = install(&document);
        let trigger = query_one(&document, ".certificate-card").expect("certificate card");
        let text = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|node| node.text_content())
                .unwrap_or_default()
        };

        dispatch(&trigger, "click");
        let overlay = document.get_element_by_id("certificate-modal").expect("overlay");
        let image = document.get_element_by_id("modal-certificate").expect("image");
        assert!(overlay.class_list().contains("active"));
        assert_eq!(image.get_attribute("alt").as_deref(), Some("AWS"));
        assert_eq!(text("modal-certificate-title"), "AWS");
        assert_eq!(text("modal-certificate-issuer"), "Amazon");
        assert_eq!(text("modal-certificate-date"), "2024");
        assert_eq!(body_overflow(&document), "hidden");

        let close = query_one(&document, ".certificate-close").expect("close control");
        dispatch(&close, "click");
        assert!(!overlay.class_list().contains("active"));
        assert_eq!(image.get_attribute("src"), None);
        assert_eq!(body_overflow(&document), "");

        drop(controllers);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn hovering_a_video_card_appends_one_preview() {
        let root = mount(
            r#"<article class="project-card" data-media-type="video" data-video-src="demo.mp4">
               <div class="project-media"></div></article>"#,
        );
        let document = document();
        let controllers = install(&document);
        let card = query_one(&document, ".project-card").expect("card");

        dispatch(&card, "mouseenter");
        dispatch(&card, "mouseleave");
        dispatch(&card, "mouseenter");

        assert_eq!(query_all(&document, ".project-video").len(), 1);
        assert!(card.class_list().contains("playing"));

        drop(controllers);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn markup_preview_with_source_child_is_reused() {
        let root = mount(
            r#"<article class="project-card" data-media-type="video">
               <div class="project-media"><video class="project-video" muted loop>
               <source src="media/loop.mp4" type="video/mp4"></video></div></article>"#,
        );
        let document = document();
        let controllers = install(&document);
        let card = query_one(&document, ".project-card").expect("card");

        dispatch(&card, "mouseenter");
        assert_eq!(query_all(&document, ".project-video").len(), 1);
        assert!(card.class_list().contains("playing"));

        dispatch(&card, "mouseleave");
        assert!(!card.class_list().contains("playing"));

        drop(controllers);
        root.remove();
    }
}
