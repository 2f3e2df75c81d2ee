//! Preference inspection and editing

use super::Context;
use anyhow::{bail, Result};
use clap::Subcommand;
use sakura_runtime::{PreferenceStore, Preferences, ThemeRegistry};

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show the saved theme and mute state
    Show,

    /// Select a theme by name
    SetTheme {
        /// Theme name (see `sakura themes`)
        name: String,
    },

    /// Set whether the music starts muted
    SetMuted {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        muted: bool,
    },

    /// Flip the mute flag
    ToggleMute,
}

pub fn run(context: &Context, cmd: PrefsCommands) -> Result<()> {
    let mut store = context.open_store()?;
    match cmd {
        PrefsCommands::Show => {
            let prefs = Preferences::from_store(&store);
            match store.path() {
                Some(path) => println!("File:  {}", path.display()),
                None => println!("File:  (not persisted)"),
            }
            println!("Theme: {}", prefs.theme);
            println!("Muted: {}", prefs.muted);
            Ok(())
        }
        PrefsCommands::SetTheme { name } => {
            let site = context.load_site()?;
            let prefs = set_theme(&mut store, &site.themes, &name)?;
            store.save()?;
            println!("Theme set to '{}'", prefs.theme);
            Ok(())
        }
        PrefsCommands::SetMuted { muted } => {
            let prefs = update(&mut store, |prefs| prefs.muted = muted);
            store.save()?;
            println!("Muted: {}", prefs.muted);
            Ok(())
        }
        PrefsCommands::ToggleMute => {
            let prefs = update(&mut store, |prefs| {
                prefs.toggle_mute();
            });
            store.save()?;
            println!("Muted: {}", prefs.muted);
            Ok(())
        }
    }
}

/// Read the typed preferences, apply `change`, and write them back
fn update(store: &mut PreferenceStore, change: impl FnOnce(&mut Preferences)) -> Preferences {
    let mut prefs = Preferences::from_store(store);
    change(&mut prefs);
    prefs.write_to(store);
    prefs
}

fn set_theme(store: &mut PreferenceStore, themes: &ThemeRegistry, name: &str) -> Result<Preferences> {
    if !themes.contains(name) {
        bail!(
            "Unknown theme '{name}'. Available: {}",
            themes.names().join(", ")
        );
    }
    Ok(update(store, |prefs| prefs.theme = name.to_string()))
}
