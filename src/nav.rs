use crate::core::Navigator;
use web_sys as web;

/// Navigates the current tab.
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&mut self, url: &str) {
        let Some(window) = web::window() else {
            log::error!("[nav] no window");
            return;
        };
        if let Err(e) = window.location().set_href(url) {
            log::error!("[nav] set_href failed: {:?}", e);
        }
    }
}
