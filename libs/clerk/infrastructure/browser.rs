//! Opening checkout links in the local browser

use super::client::store::redact_query;
use super::platform::{OsFamily, SystemCommand};
use async_trait::async_trait;
use std::io;
use tracing::{info, warn};

/// Something that can show a URL to the person at the keyboard
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn open(&self, url: &str) -> io::Result<()>;
}

/// Build the OS-specific command that opens `url` in the default browser
pub fn open_command(os: OsFamily, url: &str) -> SystemCommand {
    match os {
        OsFamily::Linux => SystemCommand::new("xdg-open").arg(url),
        OsFamily::Windows => SystemCommand::new("rundll32")
            .arg("url.dll,FileProtocolHandler")
            .arg(url),
        OsFamily::MacOs => SystemCommand::new("open").arg(url),
    }
}

/// Launches the host's default browser
#[derive(Debug, Clone, Default)]
pub struct SystemBrowser;

#[async_trait]
impl BrowserLauncher for SystemBrowser {
    async fn open(&self, url: &str) -> io::Result<()> {
        let os = OsFamily::current().ok_or_else(|| {
            io::Error::new(io::ErrorKind::Unsupported, "unsupported platform")
        })?;

        let command = open_command(os, url);
        info!("Opening browser at {}", redact_query(url));
        command.run().await
    }
}

/// Open a link, logging instead of failing
pub async fn open_or_warn(launcher: &dyn BrowserLauncher, url: &str) {
    if let Err(e) = launcher.open(url).await {
        warn!("Failed to open browser for {}: {}", redact_query(url), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_commands() {
        let url = "https://store.example/checkout";

        let linux = open_command(OsFamily::Linux, url);
        assert_eq!(linux.program, "xdg-open");
        assert_eq!(linux.args, vec![url.to_string()]);

        let windows = open_command(OsFamily::Windows, url);
        assert_eq!(windows.program, "rundll32");
        assert_eq!(windows.args[0], "url.dll,FileProtocolHandler");
        assert_eq!(windows.args[1], url);

        assert_eq!(open_command(OsFamily::MacOs, url).program, "open");
    }
}
