// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = ".";
pub const DEFAULT_VIDEO_RESOLUTION: &str = "540p";
pub const DEFAULT_SUBTITLE_LANGUAGE: &str = "all";
pub const DEFAULT_FORMATS: &str = "all";
pub const FALLBACK_SUBTITLE_LANGUAGE: &str = "en";
pub const PLAYLIST_EXTENSION: &str = "m3u";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 课程距最后一次活动超过该天数，即视为已完结
pub const COMPLETION_IDLE_DAYS: i64 = 30;

pub mod env {
    pub const USERNAME: &str = "COURSERA_USERNAME";
    pub const PASSWORD: &str = "COURSERA_PASSWORD";
}

pub mod api {
    pub mod templates {
        pub const COURSE_MATERIALS: &str = "COURSE_MATERIALS";
        pub const VIDEO_METADATA: &str = "VIDEO_METADATA";
        pub const LOGIN: &str = "LOGIN";
        pub const SITE_ROOT: &str = "SITE_ROOT";
    }
    pub mod element_types {
        pub const LECTURE: &str = "lecture";
    }
    pub mod mime {
        pub const MP4: &str = "video/mp4";
    }
}
