// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("认证失败: {0}")]
    AuthenticationFailed(String),
    #[error("未找到课程 '{0}' (课程名错误或未注册该课程)")]
    ClassNotFound(String),
    #[error("未提供登录凭据 (用户名/密码或 cookies 文件)")]
    CredentialsMissing,
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("临时文件持久化失败: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{url}' 的API响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("无效的过滤表达式 '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("无法解析视频 '{video_id}' 的资源: {reason}")]
    ResourceResolution { video_id: String, reason: String },
    #[error("下载 '{url}' 失败: {reason}")]
    Download { url: String, reason: String },
    #[error("配置中缺少 URL 模板 '{0}'")]
    MissingTemplate(String),
    #[error("用户中断")]
    UserInterrupt,
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    UserInputError(String),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
