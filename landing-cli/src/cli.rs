use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Select, Text};
use landing_core::{
    Board, Config, FixedLocation, Position, SuggestionBox, board_from_config,
    carousel::CarouselOptions,
    timer::{Clock, SystemClock},
};

use crate::{carousel, output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "landing", version, about = "Weather board and carousel widgets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Weather cards for cities.
    Weather {
        #[command(subcommand)]
        action: WeatherAction,
    },

    /// Run the infinite carousel over the given items.
    Carousel {
        /// Slide labels, in order.
        #[arg(required = true)]
        items: Vec<String>,

        /// How long to run before exiting.
        #[arg(long, default_value_t = 20)]
        seconds: u64,

        /// Disable autoplay, as a reduced-motion preference would.
        #[arg(long)]
        reduced_motion: bool,
    },

    /// Interactively edit the configuration file.
    Configure,
}

#[derive(Debug, Subcommand)]
pub enum WeatherAction {
    /// Look up a city by name and show its card.
    Add {
        /// City name, e.g. "New York".
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Autocomplete a partial name and pick from the suggestions.
    Search {
        prefix: String,
    },

    /// Show the weather where you are.
    Here {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List recently viewed cities.
    Recent {
        /// Load the card for the N-th recent city (1-based).
        #[arg(long)]
        open: Option<usize>,
    },

    /// Load the showcase cities.
    Famous,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Weather { action } => {
                let mut board = board_from_config(&config)?;
                run_weather(&mut board, &config, action).await?;
                output::print_board(&board);
            }
            Command::Carousel {
                items,
                seconds,
                reduced_motion,
            } => {
                let mut options = CarouselOptions::from(&config.carousel);
                options.reduced_motion |= reduced_motion;
                carousel::run(items, seconds, options).await?;
            }
            Command::Configure => configure(config)?,
        }

        Ok(())
    }
}

async fn run_weather(
    board: &mut Board,
    config: &Config,
    action: WeatherAction,
) -> anyhow::Result<()> {
    match action {
        WeatherAction::Add { query } => {
            let query = query.join(" ");
            match board.add_by_name(&query).await {
                Ok(Some(_)) => {}
                Ok(None) => bail!("Nothing to search for"),
                Err(err) => {
                    tracing::debug!("Lookup for {query:?} failed: {err}");
                    bail!("{}", err.user_message());
                }
            }
        }
        WeatherAction::Search { prefix } => {
            let clock = SystemClock::new();
            let mut suggestions = SuggestionBox::new(config.weather.suggest_debounce());

            suggestions.input(&prefix, clock.now());
            if let Some(deadline) = suggestions.next_deadline() {
                tokio::time::sleep(deadline.saturating_sub(clock.now())).await;
            }
            let request = suggestions
                .poll(clock.now())
                .ok_or_else(|| anyhow!("Type at least one character"))?;

            let results = request
                .run(board.geocoder(), config.weather.suggest_limit)
                .await;
            suggestions.receive(request.seq, results);
            if !suggestions.is_visible() {
                bail!("No cities match {prefix:?}");
            }

            let options: Vec<String> = suggestions.items().iter().map(output::suggestion_row).collect();
            let picked = Select::new("Pick a city:", options)
                .raw_prompt()
                .context("Selection cancelled")?;

            let city = suggestions
                .pick(picked.index)
                .ok_or_else(|| anyhow!("Suggestion vanished"))?;
            board.add_city(city, true).await;
        }
        WeatherAction::Here { lat, lon } => {
            let position = match (lat, lon) {
                (Some(lat), Some(lon)) => Some(Position { lat, lon }),
                _ => match config.location.home() {
                    Some(home) => Some(home),
                    None => ask_position()?,
                },
            };
            board.add_current_location(&FixedLocation(position)).await;
        }
        WeatherAction::Recent { open } => {
            let recent = board.recent();
            output::print_recent(&recent);

            if let Some(n) = open {
                let city = n
                    .checked_sub(1)
                    .and_then(|i| recent.get(i))
                    .cloned()
                    .ok_or_else(|| anyhow!("No recent city #{n}"))?;
                board.add_city(city, true).await;
            }
        }
        WeatherAction::Famous => {
            board.preload_famous().await;
        }
    }

    Ok(())
}

/// Stand-in for a browser permission prompt. Declining yields `None`.
fn ask_position() -> anyhow::Result<Option<Position>> {
    let share = Confirm::new("Share your location?")
        .with_default(false)
        .prompt()?;
    if !share {
        return Ok(None);
    }

    let lat = CustomType::<f64>::new("Latitude:").prompt()?;
    let lon = CustomType::<f64>::new("Longitude:").prompt()?;
    Ok(Some(Position { lat, lon }))
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let language = Text::new("Geocoding language:")
        .with_default(&config.weather.language)
        .prompt()?;
    config.weather.language = language;

    let current_home = config
        .location
        .home()
        .map(|p| format!("{},{}", p.lat, p.lon))
        .unwrap_or_default();
    let home = Text::new("Home location as lat,lon (empty to clear):")
        .with_default(&current_home)
        .prompt()?;
    config.set_home(parse_position(&home)?);

    config.carousel.reduced_motion = Confirm::new("Prefer reduced motion?")
        .with_default(config.carousel.reduced_motion)
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn parse_position(input: &str) -> anyhow::Result<Option<Position>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected \"lat,lon\", got {input:?}"))?;
    let lat: f64 = lat.trim().parse().with_context(|| format!("Invalid latitude {lat:?}"))?;
    let lon: f64 = lon.trim().parse().with_context(|| format!("Invalid longitude {lon:?}"))?;
    Ok(Some(Position { lat, lon }))
}
