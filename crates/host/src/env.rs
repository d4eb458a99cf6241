use std::cell::Cell;
use std::rc::Rc;

/// Identity of a widget root on the page. Used only as a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

/// Facts about the hosting page, sampled once at setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageEnvironment {
    /// The page itself was opened from a `file:` URL.
    pub file_origin: bool,
    pub device_pixel_ratio: f64,
}

impl PageEnvironment {
    pub fn new(page_url: &str, device_pixel_ratio: f64) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            file_origin: is_file_url(page_url),
            device_pixel_ratio,
        }
    }
}

impl Default for PageEnvironment {
    fn default() -> Self {
        Self {
            file_origin: false,
            device_pixel_ratio: 1.0,
        }
    }
}

pub fn is_file_url(url: &str) -> bool {
    url.starts_with("file:")
}

/// Live "prefers reduced motion" flag shared by every visualizer on a page.
///
/// Clones observe the same value; the host flips it from its media-query
/// change subscription.
#[derive(Debug, Clone, Default)]
pub struct MotionPreference(Rc<Cell<bool>>);

impl MotionPreference {
    pub fn new(reduced: bool) -> Self {
        Self(Rc::new(Cell::new(reduced)))
    }

    pub fn prefers_reduced(&self) -> bool {
        self.0.get()
    }

    pub fn set_reduced(&self, reduced: bool) {
        self.0.set(reduced);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_origin_detection() {
        assert!(PageEnvironment::new("file:///home/me/index.html", 1.0).file_origin);
        assert!(!PageEnvironment::new("https://example.org/", 1.0).file_origin);
    }

    #[test]
    fn test_invalid_pixel_ratio_falls_back_to_one() {
        assert_eq!(PageEnvironment::new("", 0.0).device_pixel_ratio, 1.0);
        assert_eq!(PageEnvironment::new("", f64::NAN).device_pixel_ratio, 1.0);
        assert_eq!(PageEnvironment::new("", 2.0).device_pixel_ratio, 2.0);
    }

    #[test]
    fn test_motion_preference_is_shared() {
        let pref = MotionPreference::new(false);
        let other = pref.clone();
        pref.set_reduced(true);
        assert!(other.prefers_reduced());
    }
}
