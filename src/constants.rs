pub const VERSION: u8 = 1;

pub const STREAM_LIST_KEY: &str = "streamList";

pub const DEFAULT_CONFIG_PATH: &str = "./config.json";
pub const DEFAULT_STORE_PATH: &str = "./storage.json";
pub const DEFAULT_PLAYER_BASE: &str = "https://www.youtube.com";

pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
