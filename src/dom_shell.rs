use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, ErrorEvent, Event, HtmlElement, KeyboardEvent, Node, ScrollBehavior,
    ScrollToOptions, Window,
};

use crate::config::PageConfig;
use crate::dom::{query_all, set_class};
use crate::logging::{log_event, LogLevel};
use crate::modal::ESCAPE_KEY;
use crate::shell::{
    active_section, anchor_scroll_top, anchor_target, HeaderScroll, NavMenu, SectionBounds,
};

const ACTIVE_CLASS: &str = "active";

struct NavElements {
    menu: Element,
    toggle: Element,
    state: Cell<NavMenu>,
}

impl NavElements {
    fn set(&self, next: NavMenu) {
        self.state.set(next);
        set_class(&self.menu, ACTIVE_CLASS, next.is_open());
        set_class(&self.toggle, ACTIVE_CLASS, next.is_open());
    }

    fn update(&self, step: impl FnOnce(NavMenu) -> NavMenu) {
        self.set(step(self.state.get()));
    }
}

/// Listeners and the pending resize timer for the navigation, header and
/// page-level handlers.
pub struct ShellControllers {
    _listeners: Vec<EventListener>,
    _resize_timer: Rc<RefCell<Option<Timeout>>>,
}

fn contains(element: &Element, target: Option<&Node>) -> bool {
    target.is_some() && element.contains(target)
}

fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
}

fn section_bounds(document: &Document) -> Vec<SectionBounds> {
    query_all(document, "section[id]")
        .into_iter()
        .filter_map(|section| section.dyn_into::<HtmlElement>().ok())
        .map(|section| SectionBounds {
            id: section.id(),
            top: f64::from(section.offset_top()),
            height: f64::from(section.offset_height()),
        })
        .collect()
}

fn highlight_nav_link(document: &Document, section_id: &str) {
    let wanted = format!("#{section_id}");
    for link in query_all(document, ".nav-link") {
        let matches = link.get_attribute("href").as_deref() == Some(wanted.as_str());
        set_class(&link, ACTIVE_CLASS, matches);
    }
}

fn install_navigation(
    window: &Window,
    document: &Document,
    config: &PageConfig,
    listeners: &mut Vec<EventListener>,
) -> Rc<RefCell<Option<Timeout>>> {
    let resize_timer = Rc::new(RefCell::new(None::<Timeout>));

    let (Some(menu), Some(toggle)) = (
        document.get_element_by_id("nav-menu"),
        document.get_element_by_id("nav-toggle"),
    ) else {
        return resize_timer;
    };
    let nav = Rc::new(NavElements {
        menu,
        toggle,
        state: Cell::new(NavMenu::default()),
    });

    {
        let nav = nav.clone();
        let toggle = nav.toggle.clone();
        listeners.push(EventListener::new(&toggle, "click", move |_event: &Event| {
            nav.update(NavMenu::toggled);
        }));
    }

    for link in query_all(document, ".nav-link") {
        let nav = nav.clone();
        listeners.push(EventListener::new(&link, "click", move |_event: &Event| {
            nav.update(NavMenu::closed);
        }));
    }

    {
        let nav = nav.clone();
        listeners.push(EventListener::new(document, "click", move |event: &Event| {
            let target = event.target().and_then(|target| target.dyn_into::<Node>().ok());
            let inside_menu = contains(&nav.menu, target.as_ref());
            let inside_toggle = contains(&nav.toggle, target.as_ref());
            nav.update(|menu| menu.after_document_click(inside_menu, inside_toggle));
        }));
    }

    {
        let nav = nav.clone();
        listeners.push(EventListener::new(document, "keydown", move |event: &Event| {
            let escape = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|event| event.key() == ESCAPE_KEY);
            if escape {
                nav.update(NavMenu::closed);
            }
        }));
    }

    {
        let timer = resize_timer.clone();
        let window_handle = window.clone();
        let config = config.clone();
        listeners.push(EventListener::new(window, "resize", move |_event: &Event| {
            let nav = nav.clone();
            let window = window_handle.clone();
            let config = config.clone();
            // Replacing the pending timeout drops it, which cancels it.
            *timer.borrow_mut() = Some(Timeout::new(config.resize_debounce_ms, move || {
                let width = viewport_width(&window);
                nav.update(|menu| menu.after_resize(width, &config));
            }));
        }));
    }

    resize_timer
}

fn install_scroll_effects(
    window: &Window,
    document: &Document,
    config: &PageConfig,
    listeners: &mut Vec<EventListener>,
) {
    let header = document.get_element_by_id("header");
    let tracker = RefCell::new(HeaderScroll::default());
    let window_handle = window.clone();
    let document = document.clone();
    let config = config.clone();

    listeners.push(EventListener::new(window, "scroll", move |_event: &Event| {
        let scroll_top = window_handle.scroll_y().unwrap_or(0.0);

        if let Some(header) = header.as_ref() {
            let appearance = tracker.borrow_mut().update(scroll_top, &config);
            set_class(header, "scrolled", appearance.scrolled);
            set_class(header, "hidden", appearance.hidden);
        }

        let sections = section_bounds(&document);
        if let Some(section_id) = active_section(&sections, scroll_top, &config) {
            highlight_nav_link(&document, section_id);
        }
    }));
}

fn install_anchor_scrolling(
    window: &Window,
    document: &Document,
    listeners: &mut Vec<EventListener>,
) {
    for anchor in query_all(document, "a[href^=\"#\"]") {
        let window = window.clone();
        let document = document.clone();
        let href = anchor.get_attribute("href").unwrap_or_default();

        listeners.push(EventListener::new(&anchor, "click", move |event: &Event| {
            event.prevent_default();

            let Some(target) = anchor_target(&href)
                .and_then(|id| document.get_element_by_id(id))
                .and_then(|target| target.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            let header_height = document
                .get_element_by_id("header")
                .and_then(|header| header.dyn_into::<HtmlElement>().ok())
                .map(|header| f64::from(header.offset_height()))
                .unwrap_or(0.0);

            let options = ScrollToOptions::new();
            options.set_top(anchor_scroll_top(f64::from(target.offset_top()), header_height));
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        }));
    }
}

fn mark_loaded(document: &Document) {
    if let Some(body) = document.body() {
        set_class(&body, "loaded", true);
    }
}

fn install_page_handlers(
    window: &Window,
    document: &Document,
    listeners: &mut Vec<EventListener>,
) {
    if document.ready_state() == "complete" {
        mark_loaded(document);
    } else {
        let document = document.clone();
        listeners.push(EventListener::once(window, "load", move |_event: &Event| {
            mark_loaded(&document);
        }));
    }

    listeners.push(EventListener::new(window, "error", |event: &Event| {
        let fields = match event.dyn_ref::<ErrorEvent>() {
            Some(error) => json!({
                "message": error.message(),
                "file": error.filename(),
                "line": error.lineno(),
                "column": error.colno(),
            }),
            None => json!({ "message": event.type_() }),
        };
        log_event(LogLevel::Error, "page_error", fields);
    }));
}

pub fn install(window: &Window, document: &Document, config: &PageConfig) -> ShellControllers {
    let mut listeners = Vec::new();

    let resize_timer = install_navigation(window, document, config, &mut listeners);
    install_scroll_effects(window, document, config, &mut listeners);
    install_anchor_scrolling(window, document, &mut listeners);
    install_page_handlers(window, document, &mut listeners);

    log_event(
        LogLevel::Debug,
        "shell_controllers_installed",
        json!({ "listeners": listeners.len() }),
    );

    ShellControllers {
        _listeners: listeners,
        _resize_timer: resize_timer,
    }
}
