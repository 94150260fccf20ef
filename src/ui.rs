// src/ui.rs

use crate::{constants, symbols};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::{sync::Mutex, time::Duration};

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn box_message(title: &str, content: &[&str], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

pub fn warn(message: &str) {
    println!("{} {}", *symbols::WARN, message.yellow());
}

pub fn print_chapter(name: &str) {
    println!("\n{}  {}", *symbols::CHAPTER, name);
}

/// 打印单个课时/练习的处理结果
pub fn print_item_result(tag: &ColoredString, name: &str, status_line: &str) {
    let name = crate::utils::truncate_text(name, constants::FILENAME_TRUNCATE_LENGTH);
    println!("  {}  {}  {}", tag, name, status_line);
}

pub fn new_bytes_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pbar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "  {prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta})",
    ) {
        pbar.set_style(style.progress_chars("#>-"));
    }
    pbar.set_prefix(prefix.to_string());
    pbar
}

/// 目录拉取过程中的进度反馈，只做展示，不参与流程控制
pub trait FetchProgress: Send + Sync {
    fn begin(&self, message: &str);
    fn finish(&self);
    fn fail(&self);
}

/// 终端旋转指示器
#[derive(Default)]
pub struct SpinnerProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl FetchProgress for SpinnerProgress {
    fn begin(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(spinner);
        }
    }

    fn finish(&self) {
        if let Some(spinner) = self.take() {
            let msg = spinner.message();
            spinner.finish_and_clear();
            println!("{} {}  {}", *symbols::OK, msg, "Done".green());
        }
    }

    fn fail(&self) {
        if let Some(spinner) = self.take() {
            spinner.abandon();
        }
    }
}

/// 不输出任何内容，供测试与静默场景使用
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn begin(&self, _message: &str) {}
    fn finish(&self) {}
    fn fail(&self) {}
}
