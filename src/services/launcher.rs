use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tracing::info;

/// Applications the assistant knows how to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppId {
    Browser,
    TextEditor,
    Calculator,
    VideoSite,
}

// Checked in order; the first keyword found in the spoken name wins.
const APP_KEYWORDS: &[(&str, AppId)] = &[
    ("chrome", AppId::Browser),
    ("browser", AppId::Browser),
    ("notepad", AppId::TextEditor),
    ("text editor", AppId::TextEditor),
    ("editor", AppId::TextEditor),
    ("calculator", AppId::Calculator),
    ("calc", AppId::Calculator),
    ("youtube", AppId::VideoSite),
];

impl AppId {
    pub fn recognize(name: &str) -> Option<AppId> {
        APP_KEYWORDS
            .iter()
            .find(|(keyword, _)| name.contains(keyword))
            .map(|(_, app)| *app)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LaunchError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait AppLauncher: Send + Sync {
    async fn launch(&self, app: AppId) -> Result<(), LaunchError>;
    /// Opens `url` in the default browser.
    async fn open_url(&self, url: &str) -> Result<(), LaunchError>;
}

/// Launches through the host OS. Children are detached; we never wait on GUI apps.
pub struct SystemLauncher {
    video_site_url: String,
}

impl SystemLauncher {
    pub fn new(video_site_url: impl Into<String>) -> Self {
        Self {
            video_site_url: video_site_url.into(),
        }
    }

    fn spawn(program: &str, args: &[&str]) -> Result<(), LaunchError> {
        info!("Launching: {} {:?}", program, args);
        tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| ())
            .map_err(|source| LaunchError::Spawn {
                program: program.to_string(),
                source,
            })
    }

    /// `None` for apps that are web pages rather than programs.
    fn app_command(app: AppId) -> Option<(&'static str, Vec<&'static str>)> {
        let command = if cfg!(target_os = "windows") {
            match app {
                AppId::Browser => ("cmd", vec!["/C", "start", "chrome"]),
                AppId::TextEditor => ("cmd", vec!["/C", "start", "notepad"]),
                AppId::Calculator => ("cmd", vec!["/C", "start", "calc"]),
                AppId::VideoSite => return None,
            }
        } else if cfg!(target_os = "macos") {
            match app {
                AppId::Browser => ("open", vec!["-a", "Google Chrome"]),
                AppId::TextEditor => ("open", vec!["-a", "TextEdit"]),
                AppId::Calculator => ("open", vec!["-a", "Calculator"]),
                AppId::VideoSite => return None,
            }
        } else {
            match app {
                AppId::Browser => ("x-www-browser", vec![]),
                AppId::TextEditor => ("gedit", vec![]),
                AppId::Calculator => ("gnome-calculator", vec![]),
                AppId::VideoSite => return None,
            }
        };
        Some(command)
    }
}

#[async_trait]
impl AppLauncher for SystemLauncher {
    async fn launch(&self, app: AppId) -> Result<(), LaunchError> {
        match Self::app_command(app) {
            Some((program, args)) => Self::spawn(program, &args),
            None => self.open_url(&self.video_site_url).await,
        }
    }

    async fn open_url(&self, url: &str) -> Result<(), LaunchError> {
        if cfg!(target_os = "windows") {
            Self::spawn("cmd", &["/C", "start", "", url])
        } else if cfg!(target_os = "macos") {
            Self::spawn("open", &[url])
        } else {
            Self::spawn("xdg-open", &[url])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_known_apps() {
        assert_eq!(AppId::recognize("open chrome"), Some(AppId::Browser));
        assert_eq!(AppId::recognize("open the text editor"), Some(AppId::TextEditor));
        assert_eq!(AppId::recognize("open calculator"), Some(AppId::Calculator));
        assert_eq!(AppId::recognize("open youtube"), Some(AppId::VideoSite));
    }

    #[test]
    fn unknown_app_is_none() {
        assert_eq!(AppId::recognize("open fridge"), None);
    }
}
