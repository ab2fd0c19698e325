// src/client.rs

use crate::{
    config::{AppConfig, credentials::Credentials},
    constants::api::templates,
    error::*,
};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{
    IntoUrl, Response, StatusCode,
    cookie::{CookieStore, Jar},
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::{fs, path::Path, sync::Arc};
use url::Url;

/// 平台会话：登录并以文本形式获取页面。
/// 非 2xx 响应一律视为错误。
#[async_trait]
pub trait Session: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> AppResult<()>;
    async fn get_text(&self, url: &str) -> AppResult<String>;
}

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    jar: Arc<Jar>,
    config: Arc<AppConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let jar = Arc::new(Jar::default());
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                // 下载不设整体超时，只限制读取的空闲时间
                .read_timeout(config.timeout)
                .cookie_provider(jar.clone())
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self {
            client,
            jar,
            config,
        })
    }

    pub async fn get<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let res = self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await?;
        Ok(res.error_for_status()?)
    }

    /// 返回会话中适用于 `url` 的 Cookie 请求头，供外部下载工具使用
    pub fn cookie_header(&self, url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        self.jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    fn load_cookies_file(&self, path: &Path) -> AppResult<usize> {
        let content = fs::read_to_string(path)?;
        let cookies = parse_cookies_txt(&content);
        for cookie in &cookies {
            let host = cookie.domain.trim_start_matches('.');
            let Ok(url) = Url::parse(&format!("https://{}{}", host, cookie.path)) else {
                warn!("忽略无法识别的 cookie 域名: {}", cookie.domain);
                continue;
            };
            self.jar.add_cookie_str(
                &format!(
                    "{}={}; Domain={}; Path={}",
                    cookie.name, cookie.value, host, cookie.path
                ),
                &url,
            );
        }
        Ok(cookies.len())
    }

    async fn login_with_password(&self, username: &str, password: &str) -> AppResult<()> {
        let login_url = self.config.template(templates::LOGIN)?;
        debug!("向 {} 提交登录请求", login_url);
        let res = self
            .client
            .post(login_url)
            .timeout(self.config.timeout)
            .form(&[
                ("email", username),
                ("password", password),
                ("webrequest", "true"),
            ])
            .send()
            .await?;
        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::AuthenticationFailed(
                format!("用户 '{}' 的用户名或密码错误", username),
            )),
            _ => {
                res.error_for_status()?;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Session for RobustClient {
    async fn login(&self, credentials: &Credentials) -> AppResult<()> {
        match credentials {
            Credentials::CookiesFile(path) => {
                let count = self.load_cookies_file(path)?;
                if count == 0 {
                    return Err(AppError::AuthenticationFailed(format!(
                        "cookies 文件 '{}' 中没有可用的 cookie",
                        path.display()
                    )));
                }
                info!("从 cookies 文件载入了 {} 个 cookie", count);
                Ok(())
            }
            Credentials::Password { username, password } => {
                self.login_with_password(username, password).await?;
                info!("用户 '{}' 登录成功", username);
                Ok(())
            }
        }
    }

    async fn get_text(&self, url: &str) -> AppResult<String> {
        let res = self.get(url).await.inspect_err(|e| {
            log::error!("获取页面 {} 失败: {}", url, e);
        })?;
        let text = res.text().await?;
        debug!("已获取 {} ({} 字节)", url, text.len());
        Ok(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieEntry {
    pub domain: String,
    pub path: String,
    pub name: String,
    pub value: String,
}

/// 解析 Netscape 格式的 cookies.txt (浏览器扩展导出的格式)
pub fn parse_cookies_txt(content: &str) -> Vec<CookieEntry> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| line.strip_prefix("#HttpOnly_").unwrap_or(line))
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 7 {
                return None;
            }
            Some(CookieEntry {
                domain: fields[0].to_string(),
                path: fields[2].to_string(),
                name: fields[5].to_string(),
                value: fields[6].to_string(),
            })
        })
        .collect()
}
