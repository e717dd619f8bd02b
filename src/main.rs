//! Macro Deck controller - entry point
//!
//! Loads the configuration and the profile set, connects to the pad, and
//! runs the main event loop.

use anyhow::Result;
use macro_deck::display::DisplaySurface;
use macro_deck::{Config, Controller, HidDeck, IconPresenter};
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting macro-deck controller");

    let config = Config::load()?;
    info!("Configuration loaded");

    let mut deck = HidDeck::open(&config.hid)?;

    let profiles = macro_deck::profiles::loader::load_profiles(&config.profiles.dir);
    if profiles.is_empty() {
        // Deliberate halt: with no input mapping there is nothing to
        // serve, and the fix (add or repair profile files) needs a
        // restart anyway. Report on the pad and stay put.
        error!("No profiles loaded from {:?}", config.profiles.dir);
        deck.show_message("NO PROFILES FOUND")?;
        loop {
            thread::sleep(Duration::from_secs(3600));
        }
    }
    info!("Loaded {} profile(s)", profiles.len());

    let presenter = IconPresenter::new(&config.display);
    let mut controller = Controller::new(deck, presenter, profiles, &config.input)?;
    controller.run()
}
