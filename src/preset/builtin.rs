//! Built-in preset catalogue

use crate::constants::preset::GAME_USER_SETTINGS;
use crate::document::Entry;

/// Named collection of entries applied by upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub entries: Vec<Entry>,
}

/// Scalability levels, in the order the game numbers them
const SCALABILITY_LEVELS: [&str; 4] = ["Low", "Medium", "High", "Epic"];

const SCALABILITY_KEYS: [&str; 9] = [
    "sg.ViewDistance",
    "sg.AntiAliasing",
    "sg.ShadowQuality",
    "sg.PostProcessQuality",
    "sg.TextureQuality",
    "sg.EffectsQuality",
    "sg.FoliageQuality",
    "sg.GlobalIlluminationQuality",
    "sg.ReflectionQuality",
];

fn setting(key: &str, value: &str) -> Entry {
    Entry::new(GAME_USER_SETTINGS, key, value)
}

fn preset(name: &str, description: &str, entries: Vec<Entry>) -> Preset {
    Preset {
        name: name.to_string(),
        description: description.to_string(),
        entries,
    }
}

fn fullscreen(width: u16, height: u16) -> Vec<Entry> {
    vec![
        setting("ResolutionSizeX", &width.to_string()),
        setting("ResolutionSizeY", &height.to_string()),
        setting("bUseVSync", "False"),
        setting("FrameRateLimit", "240.000000"),
        // 0 = fullscreen, 1 = windowed fullscreen, 2 = windowed
        setting("FullscreenMode", "0"),
    ]
}

fn scalability(level: usize) -> Vec<Entry> {
    let value = level.to_string();
    SCALABILITY_KEYS
        .iter()
        .map(|key| setting(key, &value))
        .collect()
}

/// Every built-in preset, in menu order
pub fn all() -> Vec<Preset> {
    let mut presets = vec![
        preset(
            "Performance: 1080p Fullscreen",
            "1920x1080 fullscreen, no vsync, 240 fps cap",
            fullscreen(1920, 1080),
        ),
        preset(
            "Performance: 1600x900 Fullscreen",
            "1600x900 fullscreen, no vsync, 240 fps cap",
            fullscreen(1600, 900),
        ),
    ];

    for (level, label) in SCALABILITY_LEVELS.iter().enumerate() {
        presets.push(preset(
            &format!("Scalability: {label}"),
            &format!("All scalability groups at level {level}"),
            scalability(level),
        ));
    }

    presets.push(preset(
        "Input: RawMouseInput On",
        "Disable the hardware cursor",
        vec![setting("bUseHardwareCursor", "False")],
    ));
    presets.push(preset(
        "Networking: DisableReplayRecording",
        "Stop recording replays",
        vec![setting("bDisableReplayRecording", "True")],
    ));
    presets
}

/// Look up a built-in preset by name, ignoring case
pub fn find(name: &str) -> Option<Preset> {
    let name = name.trim();
    all().into_iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
