/*!
 * Where raw radar files come from.
 *
 * The engine only needs "give me the text of the radar file", so any place that can do that
 * implements [RadarSource].
 */

use crate::error::RadarMapError;
use std::{
    cell::{Cell, RefCell},
    fmt::Debug,
    path::PathBuf,
    time::Duration,
};

/// The national open data radar file.
pub const DEFAULT_RADARS_URL: &str =
    "https://www.data.gouv.fr/fr/datasets/r/402aa4fe-86a9-4dcd-af88-23753e290a58";

/// Something that can produce the raw text of a radar file.
pub trait RadarSource: Debug {
    /// A human readable description of the source, for logging.
    fn name(&self) -> String;

    /// Retrieve the raw text. Any failure is a [RadarMapError::Transport].
    fn fetch(&self) -> Result<String, RadarMapError>;
}

/// A radar file on the local disk.
#[derive(Debug, Clone)]
pub struct FileSource(pub PathBuf);

impl RadarSource for FileSource {
    fn name(&self) -> String {
        self.0.display().to_string()
    }

    fn fetch(&self) -> Result<String, RadarMapError> {
        std::fs::read_to_string(&self.0)
            .map_err(|err| RadarMapError::Transport(format!("{}: {}", self.name(), err)))
    }
}

/// A radar file served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new<S: Into<String>>(url: S) -> Result<Self, RadarMapError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("radarmap/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| RadarMapError::Transport(err.to_string()))?;

        Ok(HttpSource {
            url: url.into(),
            client,
        })
    }
}

impl RadarSource for HttpSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String, RadarMapError> {
        log::debug!("Fetching radars: {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|err| RadarMapError::Transport(format!("HTTP error: {}", err)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RadarMapError::Transport(format!(
                "{} returned {}",
                self.url, status
            )));
        }

        resp.text()
            .map_err(|err| RadarMapError::Transport(format!("reading body: {}", err)))
    }
}

/**
 * Open a source from a command line style argument.
 *
 * Anything starting with `http://` or `https://` is fetched over the network, everything else is
 * treated as a path.
 */
pub fn open_source(location: &str) -> Result<Box<dyn RadarSource>, RadarMapError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource(PathBuf::from(location))))
    }
}

impl<S: RadarSource + ?Sized> RadarSource for Box<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn fetch(&self) -> Result<String, RadarMapError> {
        (**self).fetch()
    }
}

/**
 * Radar text held in memory.
 *
 * Counts how many times it was fetched, and can be told to fail, which makes it handy for
 * checking caching behavior.
 */
#[derive(Debug, Default)]
pub struct MemorySource {
    text: RefCell<String>,
    failing: Cell<bool>,
    fetches: Cell<usize>,
}

impl MemorySource {
    pub fn new<S: Into<String>>(text: S) -> Self {
        MemorySource {
            text: RefCell::new(text.into()),
            ..Default::default()
        }
    }

    pub fn set_text<S: Into<String>>(&self, text: S) {
        *self.text.borrow_mut() = text.into();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// How many times `fetch` has been called.
    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl RadarSource for MemorySource {
    fn name(&self) -> String {
        "memory".to_owned()
    }

    fn fetch(&self) -> Result<String, RadarMapError> {
        self.fetches.set(self.fetches.get() + 1);

        if self.failing.get() {
            Err(RadarMapError::Transport("source unavailable".to_owned()))
        } else {
            Ok(self.text.borrow().clone())
        }
    }
}

impl<S: RadarSource + ?Sized> RadarSource for &S {
    fn name(&self) -> String {
        (**self).name()
    }

    fn fetch(&self) -> Result<String, RadarMapError> {
        (**self).fetch()
    }
}
