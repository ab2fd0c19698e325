// src/config/credentials.rs

use crate::{
    cli::Cli,
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
    ui,
};
use log::debug;
use std::path::PathBuf;

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Password { username: String, password: String },
    CookiesFile(PathBuf),
}

// 避免密码被写进日志
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::CookiesFile(path) => f.debug_tuple("CookiesFile").field(path).finish(),
        }
    }
}

/// 凭据来源优先级: cookies 文件 > 命令行参数 > 环境变量 > 本地配置文件。
/// 找到用户名但没有密码时，在终端提示输入。
pub fn resolve_credentials(args: &Cli, external: &ExternalConfig) -> AppResult<Credentials> {
    resolve_with(args, external, |name| std::env::var(name).ok(), prompt_password)
}

fn prompt_password(username: &str) -> AppResult<String> {
    ui::prompt_hidden(&format!("请输入 {} 的密码 (输入不可见)", username))
        .map_err(|_| AppError::UserInterrupt)
}

fn resolve_with(
    args: &Cli,
    external: &ExternalConfig,
    env: impl Fn(&str) -> Option<String>,
    prompt: impl Fn(&str) -> AppResult<String>,
) -> AppResult<Credentials> {
    if let Some(path) = &args.cookies_file {
        if !path.is_file() {
            return Err(AppError::UserInputError(format!(
                "未找到 cookies 文件: {}",
                path.display()
            )));
        }
        debug!("使用 cookies 文件登录: {}", path.display());
        return Ok(Credentials::CookiesFile(path.clone()));
    }

    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (username, source) = if let Some(u) = non_empty(args.username.clone()) {
        (u, "命令行参数")
    } else if let Some(u) = non_empty(env(constants::env::USERNAME)) {
        (u, "环境变量")
    } else if let Some(u) = non_empty(external.username.clone()) {
        (u, "本地配置文件")
    } else {
        return Err(AppError::CredentialsMissing);
    };
    debug!("从{}获取到用户名", source);

    let password = match non_empty(args.password.clone())
        .or_else(|| non_empty(env(constants::env::PASSWORD)))
        .or_else(|| non_empty(external.password.clone()))
    {
        Some(p) => p,
        None => prompt(&username)?,
    };
    if password.is_empty() {
        return Err(AppError::CredentialsMissing);
    }
    Ok(Credentials::Password { username, password })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn no_prompt(_: &str) -> AppResult<String> {
        panic!("不应提示输入密码")
    }

    #[test]
    fn test_cli_credentials_take_priority() {
        let args = Cli::parse_from(["coursera-dl", "ml", "-u", "cli@x.org", "-p", "secret"]);
        let external = ExternalConfig {
            username: Some("file@x.org".into()),
            password: Some("file-secret".into()),
            ..Default::default()
        };
        let env = HashMap::from([(constants::env::USERNAME, "env@x.org".to_string())]);
        let creds = resolve_with(&args, &external, |k| env.get(k).cloned(), no_prompt).unwrap();
        assert_eq!(
            creds,
            Credentials::Password {
                username: "cli@x.org".into(),
                password: "secret".into()
            }
        );
    }

    #[test]
    fn test_falls_back_to_env_then_config() {
        let args = Cli::parse_from(["coursera-dl", "ml"]);
        let external = ExternalConfig {
            username: Some("file@x.org".into()),
            password: Some("file-secret".into()),
            ..Default::default()
        };
        let env = HashMap::from([(constants::env::PASSWORD, "env-secret".to_string())]);
        let creds = resolve_with(&args, &external, |k| env.get(k).cloned(), no_prompt).unwrap();
        assert_eq!(
            creds,
            Credentials::Password {
                username: "file@x.org".into(),
                password: "env-secret".into()
            }
        );
    }

    #[test]
    fn test_missing_password_prompts() {
        let args = Cli::parse_from(["coursera-dl", "ml", "-u", "cli@x.org"]);
        let creds = resolve_with(&args, &ExternalConfig::default(), |_| None, |user| {
            assert_eq!(user, "cli@x.org");
            Ok("typed".to_string())
        })
        .unwrap();
        assert!(matches!(creds, Credentials::Password { ref password, .. } if password == "typed"));
    }

    #[test]
    fn test_no_credentials_is_an_error() {
        let args = Cli::parse_from(["coursera-dl", "ml"]);
        let result = resolve_with(&args, &ExternalConfig::default(), |_| None, no_prompt);
        assert!(matches!(result, Err(AppError::CredentialsMissing)));
    }

    #[test]
    fn test_debug_output_hides_password() {
        let creds = Credentials::Password {
            username: "a@b.c".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
