// src/cli.rs

use crate::constants;
use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// command 属性
#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["course", "token_help"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 要下载的课程: 课程链接、课程 slug 或数字 ID
    #[arg(short, long, value_name = "COURSE", help_heading = "Mode")]
    pub course: Option<String>,
    /// 显示如何获取 Access Token 的指南并退出
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub token_help: bool,

    // --- 下载选项 (Options) ---
    /// 提供访问令牌 (Access Token)，优先级最高
    #[arg(long, help_heading = "Options")]
    pub token: Option<String>,
    /// 将 --token 提供的令牌保存到本地配置文件
    #[arg(long, action = clap::ArgAction::SetTrue, requires = "token", help_heading = "Options")]
    pub save_token: bool,
    /// 只下载指定序号的单个课时
    #[arg(short, long, value_name = "N", help_heading = "Options")]
    pub lecture: Option<u32>,
    /// 从指定章节开始下载
    #[arg(short = 's', long, value_name = "N", conflicts_with = "lecture", help_heading = "Options")]
    pub chapter_start: Option<u32>,
    /// 下载到指定章节之前为止 (不包含该章节)
    #[arg(short = 'e', long, value_name = "N", conflicts_with = "lecture", help_heading = "Options")]
    pub chapter_end: Option<u32>,
    /// 跳过字幕下载
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub skip_sub: bool,
    /// 只下载指定语言的字幕 (例如 'en', 'zh_CN')
    #[arg(long, value_name = "LOCALE", help_heading = "Options")]
    pub lang: Option<String>,
    /// 覆盖配置文件中的站点子域名 (企业版课程使用)
    #[arg(long, value_name = "NAME", help_heading = "Options")]
    pub subdomain: Option<String>,
    /// 设置文件保存目录
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_SAVE_DIR), help_heading = "Options")]
    pub output: PathBuf,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
