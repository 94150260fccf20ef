// src/symbols.rs

use std::sync::LazyLock;
use colored::{Colorize, ColoredString};

pub static OK: LazyLock<ColoredString> = LazyLock::new(|| "[OK]".green());
pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red());
pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());
pub static CHAPTER: LazyLock<ColoredString> = LazyLock::new(|| " Chapter ".black().on_green());
pub static LECTURE: LazyLock<ColoredString> = LazyLock::new(|| " Lecture ".black().on_magenta());
pub static EXERCISE: LazyLock<ColoredString> = LazyLock::new(|| " Exercise ".black().on_cyan());
