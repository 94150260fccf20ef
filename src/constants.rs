// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const FILENAME_TRUNCATE_LENGTH: usize = 65;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = "downloads";
pub const DEFAULT_SUBDOMAIN: &str = "www";
pub const DEFAULT_PAGE_SIZE: u32 = 200;
pub const TOKEN_ENV_VAR: &str = "ACCESS_TOKEN";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const SUBTITLE_USER_AGENT: &str = "okhttp/3.11.0";

pub const HELP_TOKEN_GUIDE: &str = r#"
1. 登录平台: 使用 Chrome / Edge / Firefox 浏览器登录课程网站。
2. 打开开发者工具:
   - 在 Windows / Linux 上: 按 F12 或 Ctrl+Shift+I
   - 在 macOS 上: 按 Cmd+Opt+I (⌘⌥I)
3. 切换到“应用” (Application) / “存储” (Storage) 标签页。
4. 在 Cookies 列表中找到名为 access_token 的条目并复制它的值。
5. 通过 --token 参数、ACCESS_TOKEN 环境变量或配置文件提供该值。"#;

pub mod api {
    pub mod templates {
        pub const COURSE_INFO: &str = "COURSE_INFO";
        pub const CURRICULUM: &str = "CURRICULUM";
        pub const QUIZ_ASSESSMENTS: &str = "QUIZ_ASSESSMENTS";
        pub const PRACTICE_DETAILS: &str = "PRACTICE_DETAILS";
    }
    pub mod classes {
        pub const CHAPTER: &str = "chapter";
        pub const LECTURE: &str = "lecture";
        pub const QUIZ: &str = "quiz";
        pub const PRACTICE: &str = "practice";
    }
    pub mod asset_types {
        pub const VIDEO: &str = "Video";
        pub const ARTICLE: &str = "Article";
        pub const EBOOK: &str = "E-Book";
        pub const FILE: &str = "File";
        pub const EXTERNAL_LINK: &str = "ExternalLink";
    }
    pub mod quiz_types {
        pub const SIMPLE_QUIZ: &str = "simple-quiz";
        pub const CODING_EXERCISE: &str = "coding-exercise";
    }
    pub mod mime {
        pub const MP4: &str = "video/mp4";
    }
}
