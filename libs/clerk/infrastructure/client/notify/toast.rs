//! Local desktop notifications
//!
//! No network involved: the host's own notification tool is invoked.

use super::message::{APP_NAME, TOAST_TITLE};
use super::{AlertSender, ChannelMessage, NotifyError, Result};
use crate::domain::Alert;
use crate::infrastructure::platform::{OsFamily, SystemCommand};
use async_trait::async_trait;

/// Build the OS-specific command that shows `body` as a notification
pub fn toast_command(os: OsFamily, body: &str) -> SystemCommand {
    match os {
        OsFamily::Linux => SystemCommand::new("notify-send")
            .arg(APP_NAME)
            .arg(body)
            .arg("-u")
            .arg("critical"),
        OsFamily::MacOs => SystemCommand::new("osascript").arg("-e").arg(format!(
            "display notification \"{}\" with title \"{}\" subtitle \"{}\"",
            APP_NAME,
            TOAST_TITLE,
            applescript_escape(body)
        )),
        OsFamily::Windows => SystemCommand::new("powershell")
            .arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-Command")
            .arg(windows_toast_script(body)),
    }
}

fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn windows_toast_script(body: &str) -> String {
    let xml = format!(
        "<toast duration=\"long\"><visual><binding template=\"ToastGeneric\"><text>{}</text><text>{}</text></binding></visual></toast>",
        xml_escape(TOAST_TITLE),
        xml_escape(body)
    );
    // single quotes delimit the PowerShell string, so they are doubled
    let xml = xml.replace('\'', "''");

    format!(
        "[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null; \
         [Windows.Data.Xml.Dom.XmlDocument, Windows.Data.Xml.Dom.XmlDocument, ContentType = WindowsRuntime] | Out-Null; \
         $xml = New-Object Windows.Data.Xml.Dom.XmlDocument; \
         $xml.LoadXml('{}'); \
         $toast = New-Object Windows.UI.Notifications.ToastNotification $xml; \
         [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('{}').Show($toast)",
        xml, APP_NAME
    )
}

#[derive(Debug, Clone, Default)]
pub struct ToastSender;

impl ToastSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSender for ToastSender {
    fn channel(&self) -> &'static str {
        "desktop"
    }

    async fn send(&self, alert: &Alert) -> Result<()> {
        let os = OsFamily::current()
            .ok_or_else(|| NotifyError::delivery(self.channel(), "unsupported platform"))?;

        let message = ChannelMessage::desktop_toast(alert);
        toast_command(os, message.text())
            .run()
            .await
            .map_err(|e| NotifyError::delivery(self.channel(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "RTX 3080 Is ready for checkout";

    #[test]
    fn test_linux_command() {
        let cmd = toast_command(OsFamily::Linux, BODY);
        assert_eq!(cmd.program, "notify-send");
        assert_eq!(cmd.args, vec![APP_NAME, BODY, "-u", "critical"]);
    }

    #[test]
    fn test_macos_command() {
        let cmd = toast_command(OsFamily::MacOs, BODY);
        assert_eq!(cmd.program, "osascript");
        assert_eq!(cmd.args[0], "-e");
        assert_eq!(
            cmd.args[1],
            "display notification \"NVIDIA Clerk\" with title \"NVIDIA Clerk Inventory Alert\" subtitle \"RTX 3080 Is ready for checkout\""
        );
    }

    #[test]
    fn test_macos_escapes_quotes() {
        let cmd = toast_command(OsFamily::MacOs, "say \"hi\"");
        assert!(cmd.args[1].contains("subtitle \"say \\\"hi\\\"\""));
    }

    #[test]
    fn test_windows_command_escapes_body() {
        let cmd = toast_command(OsFamily::Windows, "Tom's <GPU>");
        assert_eq!(cmd.program, "powershell");
        let script = cmd.args.last().unwrap();
        assert!(script.contains("Tom&apos;s &lt;GPU&gt;"));
        assert!(script.contains("CreateToastNotifier('NVIDIA Clerk')"));
    }
}
