// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use course_dl::{cli::Cli, logger, run_from_cli, symbols};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", *symbols::WARN);
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| clap::crate_name!().to_string());
    let after_help = format!(
        "示例:\n  # 下载整门课程\n  {bin} --course \"https://www.udemy.com/course/rust-basics/\"\n\n  # 只下载第 2、3 章\n  {bin} --course rust-basics -s 2 -e 4\n\n  # 只下载第 7 课时，跳过字幕\n  {bin} --course rust-basics -l 7 --skip-sub\n\n  # 获取 Token 帮助\n  {bin} --token-help",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };
    logger::init_logger(args.log_level);

    if let Err(e) = run_from_cli(args).await {
        log::error!("程序执行出错: {}", e);
        eprintln!("\n{} {}", *symbols::ERROR, format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
