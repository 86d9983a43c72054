use std::time::Duration;

use crate::{
    config::CarouselConfig,
    timer::{Interval, Timeouts},
};

use super::{
    ring::RingIndex,
    surface::{ScrollBehavior, ScrollSurface},
};

pub const AUTO_INTERVAL: Duration = Duration::from_millis(3500);
pub const SETTLE_DELAY: Duration = Duration::from_millis(360);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideState {
    #[default]
    Plain,
    /// Directly beside the centred slide.
    Near,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeButtons {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

#[derive(Debug, Clone)]
pub struct CarouselOptions {
    pub auto_interval: Duration,
    /// Assumed upper bound of a smooth scroll animation.
    pub settle_delay: Duration,
    pub reduced_motion: bool,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            auto_interval: AUTO_INTERVAL,
            settle_delay: SETTLE_DELAY,
            reduced_motion: false,
        }
    }
}

impl From<&CarouselConfig> for CarouselOptions {
    fn from(cfg: &CarouselConfig) -> Self {
        if cfg.interval_ms == 0 {
            tracing::warn!("carousel.interval_ms is 0, autoplay disabled");
        }
        Self {
            auto_interval: Duration::from_millis(cfg.interval_ms),
            settle_delay: Duration::from_millis(cfg.settle_ms),
            reduced_motion: cfg.reduced_motion,
        }
    }
}

/// Maps the scroll position of a padded slide ring to a centred index,
/// hides wrap-around jumps and drives autoplay.
///
/// Time is passed in by the caller; nothing fires until [`advance`] is
/// called with a `now` at or past a deadline.
///
/// [`advance`]: ScrollCoordinator::advance
#[derive(Debug)]
pub struct ScrollCoordinator<S> {
    ring: RingIndex,
    surface: S,
    options: CarouselOptions,
    current: usize,
    frame_pending: bool,
    corrections: Timeouts,
    autoplay: Interval,
    states: Vec<SlideState>,
    buttons: EdgeButtons,
}

impl<S: ScrollSurface> ScrollCoordinator<S> {
    pub fn new(ring: RingIndex, surface: S, options: CarouselOptions) -> Self {
        let autoplay = Interval::new(options.auto_interval);
        let mut coordinator = Self {
            ring,
            surface,
            options,
            current: ring.first_real(),
            frame_pending: false,
            corrections: Timeouts::new(),
            autoplay,
            states: vec![SlideState::Plain; ring.len()],
            buttons: EdgeButtons::default(),
        };
        coordinator.refresh();
        coordinator
    }

    /// Centre the first real slide without animation and start autoplay
    /// unless reduced motion is preferred.
    pub fn start(&mut self, now: Duration) {
        self.center_on(self.current, ScrollBehavior::Instant, now);
        self.refresh();
        if self.options.reduced_motion {
            tracing::debug!("Reduced motion preferred, carousel autoplay disabled");
        } else {
            self.autoplay.start(now);
        }
    }

    pub fn stop(&mut self) {
        self.autoplay.stop();
    }

    /// Scroll so slide `index` sits in the middle of the viewport, then
    /// schedule the wrap-around check for when the animation has settled.
    pub fn center_on(&mut self, index: usize, behavior: ScrollBehavior, now: Duration) {
        let target = index.min(self.ring.len() - 1);
        if let Some(left) = self.target_left(target) {
            self.surface.scroll_to(left, behavior);
        }
        self.current = target;
        self.corrections.schedule(now + self.options.settle_delay);
    }

    /// Step back from the slide nearest the centre.
    pub fn prev(&mut self, now: Duration) {
        let from = self.nearest_to_center();
        self.center_on(from.saturating_sub(1), ScrollBehavior::Smooth, now);
    }

    /// Step forward from the slide nearest the centre.
    pub fn next(&mut self, now: Duration) {
        let from = self.nearest_to_center();
        self.center_on(from + 1, ScrollBehavior::Smooth, now);
    }

    pub fn on_resize(&mut self, now: Duration) {
        let nearest = self.nearest_to_center();
        self.center_on(nearest, ScrollBehavior::Smooth, now);
    }

    /// A scroll event arrived. Returns `true` when a frame must be scheduled;
    /// further events before that frame runs are coalesced.
    pub fn on_scroll(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// The scheduled frame: adopt whatever slide is nearest the centre.
    pub fn on_frame(&mut self) {
        self.frame_pending = false;
        self.current = self.nearest_to_center();
        self.refresh();
    }

    /// Run every correction and autoplay tick due at or before `now`, in
    /// time order. Returns how many fired.
    pub fn advance(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        loop {
            let correction = self.corrections.next_deadline().filter(|at| *at <= now);
            let tick = self.autoplay.next_deadline().filter(|at| *at <= now);

            match (correction, tick) {
                (Some(c), Some(t)) if t < c => self.auto_advance(now),
                (Some(_), _) => {
                    self.corrections.fire(now);
                    self.settle();
                }
                (None, Some(_)) => self.auto_advance(now),
                (None, None) => break,
            }
            fired += 1;
        }
        fired
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.corrections.next_deadline(), self.autoplay.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn nearest_to_center(&self) -> usize {
        let viewport_center = self.surface.scroll_left() + self.surface.client_width() / 2.0;

        let mut closest = 0;
        let mut min_dist = f64::INFINITY;
        for idx in 0..self.ring.len() {
            let Some(extent) = self.surface.slide_extent(idx) else {
                continue;
            };
            let dist = (extent.center() - viewport_center).abs();
            if dist < min_dist {
                min_dist = dist;
                closest = idx;
            }
        }
        closest
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Real slide behind the current index.
    pub fn current_real(&self) -> usize {
        self.ring.origin(self.current)
    }

    pub fn state(&self, index: usize) -> SlideState {
        self.states.get(index).copied().unwrap_or_default()
    }

    pub fn states(&self) -> &[SlideState] {
        &self.states
    }

    pub fn buttons(&self) -> EdgeButtons {
        self.buttons
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_running()
    }

    pub fn ring(&self) -> RingIndex {
        self.ring
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn auto_advance(&mut self, now: Duration) {
        let Some(at) = self.autoplay.fire(now) else {
            return;
        };
        let next = (self.current + 1) % self.ring.len();
        self.center_on(next, ScrollBehavior::Smooth, at);
    }

    /// Settle check. Looks at the index current *now*, which may differ from
    /// the one that scheduled this check.
    fn settle(&mut self) {
        let target = if self.current > self.ring.last_real() {
            Some(self.ring.first_real())
        } else if self.current < self.ring.first_real() {
            Some(self.ring.last_real())
        } else {
            None
        };

        if let Some(target) = target {
            if let Some(left) = self.target_left(target) {
                self.surface.scroll_to(left, ScrollBehavior::Instant);
            }
            self.current = target;
        }
        self.refresh();
    }

    fn target_left(&self, index: usize) -> Option<f64> {
        let extent = self.surface.slide_extent(index)?;
        Some(extent.center() - self.surface.client_width() / 2.0)
    }

    fn refresh(&mut self) {
        let current = self.current;
        for (idx, state) in self.states.iter_mut().enumerate() {
            *state = if idx == current {
                SlideState::Center
            } else if idx.abs_diff(current) == 1 {
                SlideState::Near
            } else {
                SlideState::Plain
            };
        }

        let left = self.surface.scroll_left();
        self.buttons = EdgeButtons {
            prev_disabled: left <= 1.0,
            next_disabled: left >= self.surface.scroll_width() - self.surface.client_width() - 1.0,
        };
    }
}
