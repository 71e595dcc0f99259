//! Deferred asset loader
//!
//! Requests are never resolved synchronously: each one waits a number of
//! [`AssetLoader::pump`] calls before its template is looked up. The
//! loader does not know about scenes; every request carries the
//! [`Generation`] it was issued under and the lifecycle manager decides
//! whether a completion is still wanted.

use super::library::AssetSource;
use super::template::ModelTemplate;
use super::AssetError;
use crate::scene::{Generation, StageContext};
use std::collections::HashMap;

/// Success callback: receives the stage of the scene that issued the request
pub type OnLoad = Box<dyn FnOnce(&mut StageContext<'_>, ModelTemplate)>;

/// Failure callback
pub type OnError = Box<dyn FnOnce(&AssetError)>;

/// How long a request stays in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latency {
    /// Resolve on the n-th pump after the request (at least one)
    Frames(u32),
    /// Never resolve
    Never,
}

/// Loader counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Requests issued
    pub requested: u64,
    /// Requests resolved successfully
    pub resolved: u64,
    /// Requests that resolved to an error
    pub failed: u64,
    /// Completions dropped because their scene was gone
    pub discarded: u64,
}

struct Pending {
    path: String,
    generation: Generation,
    remaining: Latency,
    on_load: OnLoad,
    on_error: OnError,
}

/// A resolved request waiting to be delivered or discarded
pub struct Completion {
    path: String,
    generation: Generation,
    result: Result<ModelTemplate, AssetError>,
    on_load: OnLoad,
    on_error: OnError,
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("path", &self.path)
            .field("generation", &self.generation)
            .field("ok", &self.result.is_ok())
            .finish()
    }
}

impl Completion {
    /// Requested path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Generation the request was issued under
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether the request resolved to a template
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Run the matching callback against the live scene stage
    pub fn deliver(self, stage: &mut StageContext<'_>) -> Result<(), AssetError> {
        match self.result {
            Ok(template) => {
                (self.on_load)(stage, template);
                Ok(())
            }
            Err(e) => {
                (self.on_error)(&e);
                Err(e)
            }
        }
    }
}

/// Queue of in-flight asset requests
pub struct AssetLoader {
    source: Box<dyn AssetSource>,
    latency: Latency,
    overrides: HashMap<String, Latency>,
    queue: Vec<Pending>,
    stats: LoaderStats,
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("latency", &self.latency)
            .field("pending", &self.queue.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl AssetLoader {
    /// Loader over `source` resolving after `latency_frames` pumps
    pub fn new(source: Box<dyn AssetSource>, latency_frames: u32) -> Self {
        Self {
            source,
            latency: Latency::Frames(latency_frames),
            overrides: HashMap::new(),
            queue: Vec::new(),
            stats: LoaderStats::default(),
        }
    }

    /// Override the latency of one path (slow or hung downloads)
    pub fn set_latency(&mut self, path: impl Into<String>, latency: Latency) {
        self.overrides.insert(path.into(), latency);
    }

    /// Error callback that logs the failure
    pub fn log_error(path: &str) -> OnError {
        let path = path.to_string();
        Box::new(move |e: &AssetError| log::error!("Failed to load '{}': {}", path, e))
    }

    /// Queue a request
    pub fn request(&mut self, path: &str, generation: Generation, on_load: OnLoad, on_error: OnError) {
        let latency = self.overrides.get(path).copied().unwrap_or(self.latency);
        let remaining = match latency {
            Latency::Frames(frames) => Latency::Frames(frames.max(1)),
            Latency::Never => Latency::Never,
        };
        log::debug!("Requesting '{}' (generation {})", path, generation);
        self.stats.requested += 1;
        self.queue.push(Pending {
            path: path.to_string(),
            generation,
            remaining,
            on_load,
            on_error,
        });
    }

    /// Advance every request by one frame and return those that resolved
    pub fn pump(&mut self) -> Vec<Completion> {
        let mut ready = Vec::new();
        let mut waiting = Vec::with_capacity(self.queue.len());
        for mut pending in self.queue.drain(..) {
            if let Latency::Frames(frames) = &mut pending.remaining {
                *frames -= 1;
                if *frames == 0 {
                    ready.push(pending);
                    continue;
                }
            }
            waiting.push(pending);
        }
        self.queue = waiting;
        ready.into_iter().map(|pending| self.resolve(pending)).collect()
    }

    /// Resolve every request that can ever resolve
    pub fn flush(&mut self) -> Vec<Completion> {
        let (never, ready): (Vec<_>, Vec<_>) = self
            .queue
            .drain(..)
            .partition(|pending| pending.remaining == Latency::Never);
        self.queue = never;
        ready.into_iter().map(|pending| self.resolve(pending)).collect()
    }

    fn resolve(&mut self, pending: Pending) -> Completion {
        let result = self.source.resolve(&pending.path);
        match &result {
            Ok(_) => self.stats.resolved += 1,
            Err(_) => self.stats.failed += 1,
        }
        Completion {
            path: pending.path,
            generation: pending.generation,
            result,
            on_load: pending.on_load,
            on_error: pending.on_error,
        }
    }

    /// Drop every pending request issued under a generation other than `current`
    ///
    /// The requests are not cancelled at the source; their callbacks are
    /// simply never run. Dropped requests count as discarded.
    pub fn drop_stale(&mut self, current: Generation) -> usize {
        let before = self.queue.len();
        self.queue.retain(|pending| pending.generation == current);
        let dropped = before - self.queue.len();
        self.stats.discarded += dropped as u64;
        dropped
    }

    /// Count a completion dropped by the caller
    pub fn record_discard(&mut self) {
        self.stats.discarded += 1;
    }

    /// Requests still in flight
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Counters
    pub fn stats(&self) -> LoaderStats {
        self.stats
    }
}
