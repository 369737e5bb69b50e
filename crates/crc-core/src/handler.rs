//! Stdio plugin handler.
//!
//! Drives a [`CrcPlugin`] from protocol requests read line by line.

use crate::plugin::{CrcPlugin, Plugin};
use crate::protocol::{Request, Response, Step};
use crate::{Result, ResultItem};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

pub struct Handler {
    plugin: CrcPlugin,
}

impl Handler {
    /// Wrap an initialized plugin
    #[must_use]
    pub fn new(plugin: CrcPlugin) -> Self {
        Self { plugin }
    }

    #[must_use]
    pub fn plugin(&self) -> &CrcPlugin {
        &self.plugin
    }

    /// Serve requests until the reader reaches EOF.
    ///
    /// Malformed requests, including lines that are not UTF-8, get an error
    /// response; the loop keeps going.
    ///
    /// # Errors
    ///
    /// Returns an error if reading a line or writing a response fails.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    debug!("Received: {}", line.trim());
                    self.parse_and_handle(line.trim_end())
                }
                Err(e) => {
                    warn!("Request is not valid UTF-8: {e}");
                    Response::Error {
                        message: format!("Invalid request: {e}"),
                        details: Some(String::from_utf8_lossy(&buf).trim_end().to_string()),
                    }
                }
            };

            let json = serde_json::to_string(&response)? + "\n";
            writer.write_all(json.as_bytes()).await?;
            writer.flush().await?;
        }

        info!("Input closed, handler stopping");
        Ok(())
    }

    fn parse_and_handle(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                warn!("Invalid request: {e} - Raw: {line}");
                Response::Error {
                    message: format!("Invalid request: {e}"),
                    details: Some(line.to_string()),
                }
            }
        }
    }

    /// Answer a single request
    #[must_use]
    pub fn handle(&self, request: &Request) -> Response {
        match request.step {
            Step::Initial => {
                self.plugin.store().load();
                Response::results(&self.plugin.query(""))
            }
            Step::Search => {
                let query = request.query.as_deref().unwrap_or_default();
                Response::results(&self.plugin.query(query))
            }
            Step::Action => {
                let Some(selected) = &request.selected else {
                    return Response::error("Action request without a selected item");
                };
                match self.plugin.store().require(&selected.id) {
                    Ok(profile) => {
                        let result = ResultItem::for_profile(&profile, &self.plugin.icon_path());
                        let close = self.plugin.select(&result);
                        Response::Execute { close }
                    }
                    Err(e) => Response::error(e.to_string()),
                }
            }
            Step::Unsupported => Response::error("Unsupported step"),
        }
    }
}
