//! Artifact download.
//!
//! One blocking GET through libcurl (via the `curl` crate) with redirects
//! followed. The body is streamed straight into the destination file, which
//! is only opened once a successful response starts delivering bytes.
//! Every redirect target passes the same scheme policy as the first URL
//! before libcurl follows it.

mod headers;

pub use headers::{parse_status_line, ResponseHead};

use crate::config::{FetchConfig, ARTIFACT_NAME};
use crate::error::{Error, Result};
use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str;
use url::Url;

/// Outcome of a completed download.
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// URL built from the descriptor.
    pub url: String,
    /// URL the body was finally served from, after redirects.
    pub effective_url: String,
    pub status: u32,
    /// `Content-Length` advertised by the final response, if any.
    pub content_length: Option<u64>,
    pub bytes_written: u64,
    pub destination: PathBuf,
}

/// `{base_url}/{version}/plugin.jar`, with both parts used verbatim.
pub fn artifact_url(base_url: &str, version: &str) -> String {
    format!("{}/{}/{}", base_url, version, ARTIFACT_NAME)
}

/// Validate `url` and enforce the scheme policy before any connection is made.
pub fn check_url(url: &str, cfg: &FetchConfig) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|source| Error::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "https" => Ok(parsed),
        "http" if cfg.allow_insecure_http => Ok(parsed),
        _ => Err(Error::InsecureScheme {
            url: url.to_string(),
        }),
    }
}

/// Resolve a `Location` value against the URL that returned it and apply the
/// scheme policy to the result.
pub fn next_hop(current: &Url, location: &str, cfg: &FetchConfig) -> Result<Url> {
    let refused = || Error::InsecureRedirect {
        from: current.to_string(),
        to: location.to_string(),
    };
    let target = current.join(location).map_err(|_| refused())?;
    check_url(target.as_str(), cfg).map_err(|_| refused())
}

/// Destination file, created (and truncated) on first use.
struct Sink<'a> {
    path: &'a Path,
    capacity: usize,
    writer: Option<BufWriter<File>>,
    written: u64,
}

impl<'a> Sink<'a> {
    fn new(path: &'a Path, capacity: usize) -> Self {
        Self {
            path,
            capacity,
            writer: None,
            written: 0,
        }
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        let writer = match self.writer.take() {
            Some(w) => w,
            None => BufWriter::with_capacity(self.capacity, File::create(self.path)?),
        };
        Ok(self.writer.insert(writer))
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer()?.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Flush and close. An empty body still leaves an empty destination file.
    fn finish(mut self) -> io::Result<u64> {
        self.writer()?.flush()?;
        Ok(self.written)
    }
}

fn log_response(head: &ResponseHead, destination: &Path, url: &str) {
    tracing::info!("HTTP response {}", head.status.unwrap_or(0));
    match head.content_length {
        Some(len) => tracing::info!(
            "downloading {} of {} bytes from {}",
            destination.display(),
            len,
            url
        ),
        None => tracing::info!(
            "downloading {} of unknown size from {}",
            destination.display(),
            url
        ),
    }
}

/// Download `url` into `destination`, replacing whatever is there.
///
/// On a transfer failure the destination may be left holding a partial body.
/// When the server answers with an HTTP error the destination is not touched.
pub fn fetch_artifact(url: &str, destination: &Path, cfg: &FetchConfig) -> Result<FetchReport> {
    let first_hop = check_url(url, cfg)?;
    tracing::info!("{}", url);

    let curl_err = |source: curl::Error| Error::Transfer {
        url: url.to_string(),
        source,
    };

    let head = RefCell::new(ResponseHead::default());
    let current = RefCell::new(first_hop);
    let redirect_error: RefCell<Option<Error>> = RefCell::new(None);
    let sink = RefCell::new(Sink::new(destination, cfg.buffer_size));
    let sink_error: RefCell<Option<io::Error>> = RefCell::new(None);
    let body_started = Cell::new(false);

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.max_redirections(cfg.max_redirections).map_err(curl_err)?;
    easy.buffer_size(cfg.buffer_size).map_err(curl_err)?;
    easy.useragent(&cfg.user_agent()).map_err(curl_err)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                let Ok(line) = str::from_utf8(data) else {
                    return true;
                };
                let mut head = head.borrow_mut();
                head.observe(line);
                // A blank line ends the headers; libcurl follows the redirect next.
                if !line.trim().is_empty() {
                    return true;
                }
                let Some(location) = head.redirect_target() else {
                    return true;
                };
                let hop = next_hop(&current.borrow(), location, cfg);
                match hop {
                    Ok(next) => {
                        tracing::debug!("following redirect to {}", next);
                        *current.borrow_mut() = next;
                        true
                    }
                    Err(e) => {
                        *redirect_error.borrow_mut() = Some(e);
                        false
                    }
                }
            })
            .map_err(curl_err)?;
        transfer
            .write_function(|data| {
                let head = head.borrow();
                if !body_started.replace(true) {
                    log_response(&head, destination, current.borrow().as_str());
                }
                if head.is_error() {
                    // Abort; the status is reported after perform().
                    return Ok(0);
                }
                match sink.borrow_mut().write(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        *sink_error.borrow_mut() = Some(e);
                        Ok(0)
                    }
                }
            })
            .map_err(curl_err)?;
        transfer.perform()
    };

    let head = head.into_inner();
    if let Some(err) = redirect_error.into_inner() {
        return Err(err);
    }
    if let Some(source) = sink_error.into_inner() {
        return Err(Error::Destination {
            path: destination.to_path_buf(),
            source,
        });
    }
    if let Err(source) = performed {
        return Err(match head.status {
            Some(code) if head.is_error() => Error::Http {
                url: url.to_string(),
                code,
            },
            _ => curl_err(source),
        });
    }

    let status = easy.response_code().map_err(curl_err)?;
    if !body_started.get() {
        log_response(&head, destination, current.borrow().as_str());
    }
    if status >= 400 {
        return Err(Error::Http {
            url: url.to_string(),
            code: status,
        });
    }

    let bytes_written = sink.into_inner().finish().map_err(|source| Error::Destination {
        path: destination.to_path_buf(),
        source,
    })?;

    let effective_url = easy
        .effective_url()
        .ok()
        .flatten()
        .unwrap_or(url)
        .to_string();
    if effective_url != url {
        tracing::debug!("followed redirects to {}", effective_url);
    }
    if let Some(expected) = head.content_length {
        if expected != bytes_written {
            tracing::warn!(
                "received {} bytes but server advertised {}",
                bytes_written,
                expected
            );
        }
    }

    Ok(FetchReport {
        url: url.to_string(),
        effective_url,
        status,
        content_length: head.content_length,
        bytes_written,
        destination: destination.to_path_buf(),
    })
}
