//! Countdown command

use super::Context;
use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use sakura_runtime::Remaining;

pub fn run(context: &Context, now: Option<&str>) -> Result<()> {
    let site = context.load_site()?;
    let now = match now {
        Some(text) => parse_now(text)?,
        None => Utc::now(),
    };
    let remaining = site.countdown.remaining(now);

    println!("Target:    {}", site.countdown.target().to_rfc3339());
    println!("Now:       {}", now.to_rfc3339());
    println!("Remaining: {}", describe(&remaining));
    Ok(())
}

fn parse_now(text: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(text.trim())
        .with_context(|| format!("Invalid --now '{text}', expected RFC 3339"))?;
    Ok(parsed.with_timezone(&Utc))
}

fn describe(remaining: &Remaining) -> String {
    if remaining.is_zero() {
        "the day is here".to_string()
    } else {
        format!(
            "{remaining} ({} days, {} hours, {} minutes, {} seconds)",
            remaining.days, remaining.hours, remaining.minutes, remaining.seconds
        )
    }
}
