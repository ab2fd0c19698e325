// src/workflows.rs

use crate::{
    DownloadJobContext,
    constants::api::templates,
    downloader::CourseDownloader,
    error::{AppError, AppResult},
    extractor::{SyllabusParser, VideoLocator},
    models::{CourseReport, EventLog},
    symbols, ui, utils,
};
use anyhow::anyhow;
use colored::*;
use itertools::Itertools;
use log::{error, info};
use reqwest::StatusCode;
use std::fs;

/// 下载单个课程：登录、获取大纲、解析资源、写入本地目录
pub async fn download_class(
    context: &DownloadJobContext,
    class_name: &str,
) -> AppResult<CourseReport> {
    context.session.login(&context.credentials).await?;

    let url = utils::fill_template(
        context.config.template(templates::COURSE_MATERIALS)?,
        &[("class_name", class_name)],
    );
    let page = match &context.options.local_page {
        Some(cache) if cache.is_file() => {
            info!("使用本地缓存的课程大纲: {:?}", cache);
            fs::read_to_string(cache)?
        }
        cache => {
            let page = fetch_syllabus(context, class_name, &url).await?;
            if let Some(cache) = cache {
                fs::write(cache, &page)?;
                info!("课程大纲已缓存到 {:?}", cache);
            }
            page
        }
    };

    let mut events = EventLog::new();
    let locator = VideoLocator::new(context.session.as_ref(), &context.config);
    let parser = SyllabusParser::new(
        locator,
        &context.options.locator,
        context.options.reverse_modules,
    );
    let course = parser.parse(class_name, &url, &page, &mut events).await?;
    if course.modules.is_empty() {
        ui::warn(&format!("课程 '{}' 中没有找到可下载的讲座。", class_name));
    }

    CourseDownloader::new(&context.options, context.downloader.as_ref())
        .download(&course, events)
        .await
}

async fn fetch_syllabus(
    context: &DownloadJobContext,
    class_name: &str,
    url: &str,
) -> AppResult<String> {
    context.session.get_text(url).await.map_err(|e| match e {
        AppError::Network(ref err) if err.status() == Some(StatusCode::NOT_FOUND) => {
            AppError::ClassNotFound(class_name.to_string())
        }
        other => other,
    })
}

/// 依次处理所有课程。单个课程失败不影响其余课程。
pub async fn run_classes(
    context: &DownloadJobContext,
    class_names: &[String],
) -> Vec<(String, AppResult<CourseReport>)> {
    let mut results = Vec::with_capacity(class_names.len());
    for (i, class_name) in class_names.iter().enumerate() {
        ui::print_header(&format!(
            "课程 {}/{} - {}",
            i + 1,
            class_names.len(),
            class_name
        ));
        info!("开始下载课程: {}", class_name);
        let result = download_class(context, class_name).await;
        match &result {
            Ok(report) => print_course_report(report),
            Err(e) => {
                error!("课程 '{}' 下载失败: {}", class_name, e);
                ui::error(&format!("课程 '{}' 下载失败: {}", class_name, e));
            }
        }
        results.push((class_name.clone(), result));
    }
    results
}

fn print_course_report(report: &CourseReport) {
    let stats = &report.stats;
    ui::plain("");
    ui::ok(&format!(
        "课程 '{}' 处理完成: 新写入 {} 个文件，已存在 {} 个",
        report.course,
        stats.writes(),
        stats.skipped_existing
    ));
    if stats.sections_skipped > 0 || stats.lectures_skipped > 0 {
        ui::info(&format!(
            "过滤器跳过了 {} 个章节、{} 个讲座",
            stats.sections_skipped, stats.lectures_skipped
        ));
    }
    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        ui::print_sub_header(&format!("警告 ({}个)", warnings.len()));
        for warning in warnings {
            ui::warn(&warning.to_string());
        }
    }
}

/// 打印总结；有课程失败时返回错误
pub fn summarize(results: &[(String, AppResult<CourseReport>)]) -> AppResult<()> {
    let (succeeded, failed): (Vec<_>, Vec<_>) =
        results.iter().partition(|(_, result)| result.is_ok());
    let completed = succeeded
        .iter()
        .filter(|(_, r)| r.as_ref().is_ok_and(CourseReport::is_complete))
        .map(|(name, _)| name)
        .join(" ");

    ui::print_header("下载总结");
    println!(
        "{} | {} | 总计: {}",
        format!("成功: {}", succeeded.len()).green(),
        format!("失败: {}", failed.len()).red(),
        results.len()
    );
    if !completed.is_empty() {
        info!("看起来已完结的课程: {}", completed);
        println!("{} 看起来已完结的课程: {}", *symbols::INFO, completed.cyan());
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(AppError::Other(anyhow!(
            "{} 个课程下载失败: {}",
            failed.len(),
            failed.iter().map(|(name, _)| name).join(", ")
        )))
    }
}
