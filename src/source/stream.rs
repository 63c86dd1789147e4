//! Stream-based data source.
//!
//! Receives audit query results from an async byte stream, e.g. a TCP
//! connection to a relay that forwards audit responses.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{parse_snapshot_slice, AuditSnapshot, DataSource};

/// A data source fed by a background task reading newline-delimited JSON.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use inlong_audit::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"[]\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<AuditSnapshot>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

fn set_error(slot: &Mutex<Option<String>>, error: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = error;
    }
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Each line is parsed as one complete query result. Lines that fail to
    /// parse are skipped and reported through [`DataSource::error`].
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let desc = description.to_string();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = Vec::new();

            loop {
                line.clear();
                match reader.read_until(b'\n', &mut line).await {
                    Ok(0) => {
                        info!(source = %desc, "audit stream closed");
                        set_error(&error_handle, Some("Connection closed".to_string()));
                        break;
                    }
                    Ok(_) if line.trim_ascii().is_empty() => continue,
                    Ok(_) => match parse_snapshot_slice(line.trim_ascii()) {
                        Ok(snapshot) => {
                            debug!(source = %desc, series = snapshot.len(), "received audit result");
                            set_error(&error_handle, None);
                            if tx.send(snapshot).await.is_err() {
                                // Receiver dropped
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(source = %desc, error = %e, "skipping malformed line");
                            set_error(&error_handle, Some(e));
                        }
                    },
                    Err(e) => {
                        set_error(&error_handle, Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<AuditSnapshot> {
        match self.receiver.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                let mut guard = self.last_error.lock().ok()?;
                if guard.is_none() {
                    *guard = Some("Stream disconnected".to_string());
                }
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().ok()?.clone()
    }
}
