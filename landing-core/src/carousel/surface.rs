use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump without animation.
    Instant,
    Smooth,
}

/// Horizontal position of one slide inside the scrolling track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideExtent {
    pub left: f64,
    pub width: f64,
}

impl SlideExtent {
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// The scrollable container a carousel lives in.
pub trait ScrollSurface: Debug {
    fn scroll_left(&self) -> f64;
    fn client_width(&self) -> f64;
    fn scroll_width(&self) -> f64;
    fn slide_extent(&self, index: usize) -> Option<SlideExtent>;
    fn scroll_to(&mut self, left: f64, behavior: ScrollBehavior);

    fn max_scroll(&self) -> f64 {
        (self.scroll_width() - self.client_width()).max(0.0)
    }
}

/// Equal-width slides separated by a fixed gap.
///
/// Scrolling is applied immediately whatever the behavior; the last behavior
/// is kept so callers can tell animated scrolls from silent jumps.
#[derive(Debug, Clone)]
pub struct TrackLayout {
    slides: usize,
    slide_width: f64,
    gap: f64,
    client_width: f64,
    scroll_left: f64,
    last_behavior: Option<ScrollBehavior>,
}

impl TrackLayout {
    pub fn new(slides: usize, slide_width: f64, gap: f64, client_width: f64) -> Self {
        Self {
            slides,
            slide_width,
            gap,
            client_width,
            scroll_left: 0.0,
            last_behavior: None,
        }
    }

    pub fn last_behavior(&self) -> Option<ScrollBehavior> {
        self.last_behavior
    }

    pub fn resize(&mut self, client_width: f64) {
        self.client_width = client_width;
        self.scroll_left = self.scroll_left.min(self.max_scroll());
    }

    /// Move the track as a user drag would, without recording a behavior.
    pub fn drag_to(&mut self, left: f64) {
        self.scroll_left = left.clamp(0.0, self.max_scroll());
    }
}

impl ScrollSurface for TrackLayout {
    fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    fn client_width(&self) -> f64 {
        self.client_width
    }

    fn scroll_width(&self) -> f64 {
        if self.slides == 0 {
            return 0.0;
        }
        self.slides as f64 * (self.slide_width + self.gap) - self.gap
    }

    fn slide_extent(&self, index: usize) -> Option<SlideExtent> {
        (index < self.slides).then(|| SlideExtent {
            left: index as f64 * (self.slide_width + self.gap),
            width: self.slide_width,
        })
    }

    fn scroll_to(&mut self, left: f64, behavior: ScrollBehavior) {
        self.scroll_left = left.clamp(0.0, self.max_scroll());
        self.last_behavior = Some(behavior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents_and_scroll_range() {
        let track = TrackLayout::new(9, 300.0, 20.0, 600.0);
        assert_eq!(track.scroll_width(), 2860.0);
        assert_eq!(track.max_scroll(), 2260.0);
        assert_eq!(track.slide_extent(2).unwrap().center(), 790.0);
        assert_eq!(track.slide_extent(9), None);
    }

    #[test]
    fn scroll_is_clamped_to_range() {
        let mut track = TrackLayout::new(9, 300.0, 20.0, 600.0);
        track.scroll_to(-150.0, ScrollBehavior::Smooth);
        assert_eq!(track.scroll_left(), 0.0);
        track.scroll_to(5000.0, ScrollBehavior::Instant);
        assert_eq!(track.scroll_left(), 2260.0);
        assert_eq!(track.last_behavior(), Some(ScrollBehavior::Instant));

        track.resize(2000.0);
        assert_eq!(track.scroll_left(), 860.0);
    }
}
