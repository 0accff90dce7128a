mod settings;

pub use settings::{
    Config, ConfigError, TomlConfig, CONFIG_PATH, DEFAULT_ARCHIVE_ROOT, DEFAULT_MOUNT_ROOT,
    DEFAULT_OWNER,
};
