// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod logger;
pub mod models;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    catalog::SelectionOptions,
    cli::Cli,
    client::{RobustClient, fetch_json},
    config::AppConfig,
    constants::api::templates,
    downloader::{CourseDownloader, SubtitleOptions, TaskProcessor},
    error::{AppError, AppResult},
    models::api::CourseInfo,
};
use colored::*;
use log::{debug, info};
use std::{fs, sync::Arc};

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    if args.token_help {
        ui::box_message(
            "获取 Access Token 指南",
            constants::HELP_TOKEN_GUIDE
                .lines()
                .collect::<Vec<_>>()
                .as_slice(),
            |s| s.cyan(),
        );
        println!(
            "\n{} 安全提醒: 请妥善保管你的 Token，不要分享给他人。",
            *symbols::INFO
        );
        return Ok(());
    }

    let course_input = args
        .course
        .as_deref()
        .ok_or_else(|| AppError::Config("缺少 --course 参数".to_string()))?;
    let course_ref = utils::parse_course_ref(course_input)
        .ok_or_else(|| AppError::Config(format!("无法识别的课程地址: {}", course_input)))?;

    // 选项错误在任何网络请求之前报告
    let options = SelectionOptions::from_cli(&args);
    options.validate()?;

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let (token, source) = config::token::resolve_token(args.token.as_deref());
    let token = token.ok_or(AppError::TokenMissing)?;
    info!("从 {} 加载 Access Token", source);
    println!("\n{} 已从 {} 加载 Access Token。", *symbols::INFO, source);
    if args.save_token {
        config::token::save_token(&token)?;
    }
    let auth_headers = config::token::create_auth_headers(&token)?;

    let http_client = Arc::new(RobustClient::new(config.clone())?);

    let course_url = config.render_url(templates::COURSE_INFO, &[("course", course_ref.as_str())])?;
    let course: CourseInfo = fetch_json(http_client.as_ref(), &course_url, &auth_headers).await?;
    ui::print_header(&format!("{} (id: {})", course.title, course.id));

    let course_root = args.output.join(utils::sanitize_filename(&course.title));
    fs::create_dir_all(&course_root)?;
    let absolute_root = dunce::canonicalize(&course_root)?;
    info!("文件将保存到目录: \"{}\"", absolute_root.display());
    ui::info(&format!("文件将保存到目录: \"{}\"", absolute_root.display()));

    let processor = TaskProcessor::new(
        http_client.clone(),
        auth_headers.clone(),
        config.clone(),
        SubtitleOptions {
            skip: args.skip_sub,
            lang: args.lang.clone(),
        },
    );
    let progress = ui::SpinnerProgress::new();
    let catalog_url = config.render_url(
        templates::CURRICULUM,
        &[("course_id", course.id.to_string().as_str())],
    )?;

    let downloader = CourseDownloader::new(http_client.as_ref(), &processor, &progress, auth_headers)
        .with_max_restarts(config.max_restarts);
    downloader
        .run(&catalog_url, &absolute_root, &options)
        .await?;

    downloader.manager().print_report();
    Ok(())
}
