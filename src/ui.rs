// src/ui.rs

use crate::{constants, symbols};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn plain(msg: &str) {
    println!("{}", msg);
}

pub fn info(msg: &str) {
    println!("{} {}", *symbols::INFO, msg);
}

pub fn ok(msg: &str) {
    println!("{} {}", *symbols::OK, msg);
}

pub fn warn(msg: &str) {
    eprintln!("{} {}", *symbols::WARN, msg.yellow());
}

pub fn error(msg: &str) {
    eprintln!("{} {}", *symbols::ERROR, msg.red());
}

pub fn prompt_hidden(message: &str) -> io::Result<String> {
    print!("\n>>> {}: ", message);
    io::stdout().flush()?;
    rpassword::read_password()
}

/// 按字节显示进度；总大小未知时退化为旋转指示器
pub fn new_bytes_progress_bar(total: Option<u64>, prefix: &str) -> ProgressBar {
    let pbar = match total {
        Some(total) => {
            let pbar = ProgressBar::new(total);
            pbar.set_style(
                ProgressStyle::with_template(
                    "{prefix:.cyan} [{bar:40.green/white}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
            );
            pbar
        }
        None => {
            let pbar = ProgressBar::new_spinner();
            pbar.set_style(
                ProgressStyle::with_template("{prefix:.cyan} {spinner} {bytes} ({bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pbar
        }
    };
    pbar.set_prefix(prefix.to_string());
    pbar
}
