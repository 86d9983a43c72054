use anyhow::anyhow;
use std::time::Duration;

use landing_core::{
    carousel::{CarouselOptions, ScrollCoordinator, SlideRing, SlideState, TrackLayout},
    timer::{Clock, SystemClock},
};

const SLIDE_WIDTH: f64 = 300.0;
const GAP: f64 = 20.0;
const VIEWPORT: f64 = 600.0;
const FRAME: Duration = Duration::from_millis(16);

/// Drive the carousel in real time and print the row whenever the centred
/// slide changes.
pub async fn run(items: Vec<String>, seconds: u64, options: CarouselOptions) -> anyhow::Result<()> {
    let ring = SlideRing::new(items).ok_or_else(|| anyhow!("The carousel needs at least one item"))?;
    let track = TrackLayout::new(ring.index().len(), SLIDE_WIDTH, GAP, VIEWPORT);
    let mut coordinator = ScrollCoordinator::new(ring.index(), track, options);

    let clock = SystemClock::new();
    let until = Duration::from_secs(seconds);
    coordinator.start(clock.now());
    if !coordinator.is_autoplaying() {
        println!("Autoplay disabled (reduced motion).");
    }

    let mut shown = None;
    let mut frames = tokio::time::interval(FRAME);
    loop {
        frames.tick().await;
        let now = clock.now();
        if now >= until {
            break;
        }

        coordinator.advance(now);
        if shown != Some(coordinator.current()) {
            shown = Some(coordinator.current());
            println!("{}", describe(&ring, &coordinator));
        }
    }

    Ok(())
}

fn describe(ring: &SlideRing<String>, coordinator: &ScrollCoordinator<TrackLayout>) -> String {
    ring.slides()
        .iter()
        .enumerate()
        .filter_map(|(idx, slide)| {
            let label = if slide.is_clone {
                format!("{}*", slide.item)
            } else {
                slide.item.clone()
            };
            match coordinator.state(idx) {
                SlideState::Center => Some(format!("[ {label} ]")),
                SlideState::Near => Some(label),
                SlideState::Plain => None,
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_shows_centre_and_neighbours() {
        let ring = SlideRing::new(vec!["A".to_string(), "B".into(), "C".into()]).unwrap();
        let track = TrackLayout::new(ring.index().len(), SLIDE_WIDTH, GAP, VIEWPORT);
        let coordinator = ScrollCoordinator::new(ring.index(), track, CarouselOptions::default());

        assert_eq!(describe(&ring, &coordinator), "C*  [ A ]  B");
    }
}
