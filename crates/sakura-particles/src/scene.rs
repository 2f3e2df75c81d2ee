//! Scene selection

use crate::config::SceneConfig;
use crate::lantern::LanternSystem;
use crate::notes::MusicBoxSystem;
use crate::sky::SkySystem;
use sakura_core::SakuraError;
use sakura_runtime::RuntimeSystem;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SceneKind {
    #[default]
    Sky,
    Lanterns,
    MusicBox,
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] = [SceneKind::Sky, SceneKind::Lanterns, SceneKind::MusicBox];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Sky => "sky",
            SceneKind::Lanterns => "lanterns",
            SceneKind::MusicBox => "music_box",
        }
    }

    /// Build a fresh, uninitialized system for this scene
    pub fn build(self, config: &SceneConfig, seed: u32) -> Box<dyn RuntimeSystem> {
        match self {
            SceneKind::Sky => Box::new(SkySystem::new(config.sky.clone(), config.moon, seed)),
            SceneKind::Lanterns => Box::new(LanternSystem::new(config.lanterns.clone(), seed)),
            SceneKind::MusicBox => Box::new(MusicBoxSystem::new(config.music_box.clone(), seed)),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = SakuraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| SakuraError::UnknownScene {
                value: s.to_string(),
                allowed: SceneKind::ALL.iter().map(|k| k.name().to_string()).collect(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakura_core::Viewport;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("sky".parse::<SceneKind>().unwrap(), SceneKind::Sky);
        assert_eq!("Lanterns".parse::<SceneKind>().unwrap(), SceneKind::Lanterns);
        assert_eq!("music-box".parse::<SceneKind>().unwrap(), SceneKind::MusicBox);
        for kind in SceneKind::ALL {
            assert_eq!(kind.to_string().parse::<SceneKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_scene_lists_choices() {
        let err = "garden".parse::<SceneKind>().unwrap_err();
        match err {
            SakuraError::UnknownScene { value, allowed } => {
                assert_eq!(value, "garden");
                assert_eq!(allowed, vec!["sky", "lanterns", "music_box"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn build_names_match() {
        let config = SceneConfig::default();
        for kind in SceneKind::ALL {
            let mut system = kind.build(&config, 1);
            assert_eq!(system.name(), kind.name());
            system.initialize(Viewport::default()).unwrap();
        }
    }
}
