//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// INI text dialect constants
pub mod ini {
    /// Line prefixes that mark a comment line
    pub const COMMENT_PREFIXES: [char; 2] = [';', '#'];

    /// Opening bracket of a section header
    pub const SECTION_OPEN: char = '[';

    /// Closing bracket of a section header
    pub const SECTION_CLOSE: char = ']';

    /// Separator between key and value
    pub const KEY_VALUE_SEPARATOR: char = '=';

    /// Line terminator emitted by the serializer
    pub const LINE_BREAK: &str = "\n";
}

/// Persistence artifact constants
pub mod files {
    /// Infix placed between the original path and the backup timestamp
    pub const BACKUP_INFIX: &str = ".bak-";

    /// Backup timestamp format (local time, second granularity)
    pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

    /// Suffix of the sibling file written before the replace step
    pub const TEMP_SUFFIX: &str = ".tmp";
}

/// Preset constants
pub mod preset {
    /// Section shared by every built-in preset
    pub const GAME_USER_SETTINGS: &str = "/Script/FortniteGame.FortGameUserSettings";

    /// Default file name offered when exporting a preset
    pub const DEFAULT_EXPORT_NAME: &str = "preset.json";
}

/// Settings file location constants
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "ini-preset-editor";

    /// Settings file name
    pub const FILENAME: &str = "settings.json";

    /// Environment variable overriding the log level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
}
