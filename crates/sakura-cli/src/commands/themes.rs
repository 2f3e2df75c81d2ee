//! Theme listing

use super::Context;
use anyhow::Result;
use sakura_runtime::{Preferences, ThemeRegistry};

pub fn run(context: &Context) -> Result<()> {
    let site = context.load_site()?;
    let active = Preferences::from_store(&context.open_store()?).theme;
    print!("{}", listing(&site.themes, &active));
    Ok(())
}

/// One block per theme, the active one starred, tokens indented below
fn listing(themes: &ThemeRegistry, active: &str) -> String {
    let mut out = String::new();
    for (name, tokens) in themes.iter() {
        let marker = if name == active { '*' } else { ' ' };
        out.push_str(&format!("{marker} {name}\n"));
        for (token, value) in tokens.iter() {
            out.push_str(&format!("    {token:<14} {value}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakura_runtime::StyleTokens;

    #[test]
    fn marks_active_theme() {
        let mut themes = ThemeRegistry::new();
        let mut dawn = StyleTokens::new();
        dawn.set("background", "#202040");
        themes.insert("dawn", dawn);

        let text = listing(&themes, "dawn");
        assert!(text.contains("* dawn\n"));
        assert!(text.contains("    background     #202040\n"));
        assert!(text.contains("  moon\n"));
    }
}
