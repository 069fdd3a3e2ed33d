//! Platform clipboard access for paste and copy

use async_trait::async_trait;
use log::{debug, error, trace};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::Error;

/// Clipboard capability. Fails independently of generation.
#[async_trait]
pub trait Clipboard: Send + Sync
{   async fn read_text(&self) -> Result<String, Error>;
    async fn write_text(&self, text: &str) -> Result<(), Error>;
}

/// External program pair used to reach the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardTool
{   pub read: Vec<String>
  , pub write: Vec<String>
}

impl ClipboardTool
{   fn of(read: &[&str], write: &[&str]) -> Self
    {   ClipboardTool
        {   read: read.iter().map(|s| s.to_string()).collect()
          , write: write.iter().map(|s| s.to_string()).collect()
        }
    }

    /// Pick the tool for the running platform
    pub fn detect() -> Self
    {   if cfg!(target_os = "macos")
        {   ClipboardTool::of(&["pbpaste"], &["pbcopy"])
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some()
        {   ClipboardTool::of(
              &["wl-paste", "--no-newline"],
              &["wl-copy"]
            )
        } else
        {   ClipboardTool::of(
              &["xclip", "-selection", "clipboard", "-o"],
              &["xclip", "-selection", "clipboard", "-i"]
            )
        }
    }
}

/// Clipboard backed by the platform's command-line tools
pub struct SystemClipboard
{   tool: ClipboardTool
}

impl SystemClipboard
{   pub fn new(tool: ClipboardTool) -> Self
    {   debug!("Using clipboard tool: {:?}", tool.read.first());
        SystemClipboard { tool }
    }

    pub fn detect() -> Self
    {   SystemClipboard::new(ClipboardTool::detect())
    }
}

fn command_for(argv: &[String]) -> Result<Command, Error>
{   let (program, args) = argv.split_first()
      .ok_or_else(|| Error::ClipboardError("empty command".to_string()))?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    Ok(cmd)
}

#[async_trait]
impl Clipboard for SystemClipboard
{   async fn read_text(&self) -> Result<String, Error>
    {   trace!("Reading clipboard via {:?}", self.tool.read);
        let output = command_for(&self.tool.read)?
          .stdin(Stdio::null())
          .output()
          .await
          .map_err(|e| {
            error!("Failed to run clipboard reader: {}", e);
            Error::ClipboardError(e.to_string())
          })?;

        if !output.status.success()
        {   let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Clipboard reader failed: {}", stderr.trim());
            return Err(Error::ClipboardError(stderr.trim().to_string()));
        }

        String::from_utf8(output.stdout)
          .map_err(|e| Error::ClipboardError(e.to_string()))
    }

    async fn write_text(&self, text: &str) -> Result<(), Error>
    {   trace!("Writing {} chars to clipboard", text.len());
        let mut child = command_for(&self.tool.write)?
          .stdin(Stdio::piped())
          .stdout(Stdio::null())
          .stderr(Stdio::null())
          .spawn()
          .map_err(|e| {
            error!("Failed to run clipboard writer: {}", e);
            Error::ClipboardError(e.to_string())
          })?;

        if let Some(mut stdin) = child.stdin.take()
        {   stdin.write_all(text.as_bytes())
              .await
              .map_err(|e| Error::ClipboardError(e.to_string()))?;
        }

        let status = child.wait()
          .await
          .map_err(|e| Error::ClipboardError(e.to_string()))?;
        if status.success()
        {   Ok(())
        } else
        {   error!("Clipboard writer exited with {}", status);
            Err(Error::ClipboardError(format!("writer exited with {}", status)))
        }
    }
}
