//! Page chrome around the portfolio content: the collapsible navigation
//! menu, the header that reacts to scrolling, and the nav-link highlight for
//! the section currently in view.

use crate::config::PageConfig;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggled(self) -> Self {
        Self { open: !self.open }
    }

    pub fn closed(self) -> Self {
        Self { open: false }
    }

    /// A document click outside both the menu and its toggle collapses it.
    pub fn after_document_click(self, inside_menu: bool, inside_toggle: bool) -> Self {
        if inside_menu || inside_toggle {
            self
        } else {
            self.closed()
        }
    }

    /// Called once a resize has settled.
    pub fn after_resize(self, viewport_width: f64, config: &PageConfig) -> Self {
        if viewport_width > config.nav_collapse_width {
            self.closed()
        } else {
            self
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct HeaderAppearance {
    pub scrolled: bool,
    pub hidden: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HeaderScroll {
    last_scroll_top: f64,
}

impl HeaderScroll {
    pub fn update(&mut self, scroll_top: f64, config: &PageConfig) -> HeaderAppearance {
        let appearance = HeaderAppearance {
            scrolled: scroll_top > config.header_scrolled_offset,
            hidden: scroll_top > self.last_scroll_top && scroll_top > config.header_hide_offset,
        };
        self.last_scroll_top = scroll_top;
        appearance
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Picks the section under `scroll_y + focus offset`. Later sections win when
/// bounds overlap, matching document order.
pub fn active_section<'a>(
    sections: &'a [SectionBounds],
    scroll_y: f64,
    config: &PageConfig,
) -> Option<&'a str> {
    let focus_line = scroll_y + config.section_focus_offset;
    sections
        .iter()
        .filter(|section| focus_line >= section.top && focus_line < section.top + section.height)
        .last()
        .map(|section| section.id.as_str())
}

/// `#about` → `about`; anything that is not an in-page anchor yields `None`.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub fn anchor_scroll_top(target_offset_top: f64, header_height: f64) -> f64 {
    target_offset_top - header_height
}
