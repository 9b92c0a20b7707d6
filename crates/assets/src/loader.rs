use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use folio_common::{EventChannel, Subscription};

use crate::fetch::AssetFetcher;
use crate::model::decode_model;
use crate::source::{Source, SourceKind};
use crate::table::{LoadedAsset, LoadedAssetTable};
use crate::texture::{decode_cube_texture, decode_texture};
use crate::{AssetError, LoadError};

/// Lifecycle broadcast of a load cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    Started { total: usize },
    Progress { name: String, loaded: usize, total: usize },
    Finished { success: bool },
}

impl LoadEvent {
    /// Loaded fraction for a progress event.
    pub fn ratio(&self) -> Option<f32> {
        match self {
            LoadEvent::Progress { loaded, total, .. } if *total > 0 => {
                Some(*loaded as f32 / *total as f32)
            }
            _ => None,
        }
    }
}

type Completion = (String, Result<LoadedAsset, LoadError>);

#[derive(Debug)]
enum Phase {
    Idle,
    Loading {
        rx: Receiver<Completion>,
        loaded: usize,
        total: usize,
    },
    Finished {
        success: bool,
    },
}

/// Resolves a manifest into a [`LoadedAssetTable`] on a worker thread.
///
/// Completions are applied on the owning thread by [`ResourceLoader::poll`],
/// which is also where progress and finish events are broadcast.
pub struct ResourceLoader {
    fetcher: Arc<dyn AssetFetcher>,
    assets: LoadedAssetTable,
    phase: Phase,
    last_error: Option<String>,
    events: EventChannel<LoadEvent>,
}

impl ResourceLoader {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            fetcher,
            assets: LoadedAssetTable::new(),
            phase: Phase::Idle,
            last_error: None,
            events: EventChannel::new(),
        }
    }

    pub fn on_event(&mut self) -> Subscription<LoadEvent> {
        self.events.subscribe()
    }

    /// Start the one load cycle this loader supports.
    pub fn load_resources(&mut self, sources: Vec<Source>) -> Result<(), AssetError> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(AssetError::LoadCycleStarted);
        }

        let total = sources.len();
        tracing::info!(total, "loading resources");
        self.events.emit(LoadEvent::Started { total });

        if total == 0 {
            self.finish(true);
            return Ok(());
        }

        let (tx, rx) = mpsc::channel();
        let fetcher = Arc::clone(&self.fetcher);
        std::thread::Builder::new()
            .name("folio-loader".into())
            .spawn(move || {
                for source in sources {
                    let result = resolve(&source, fetcher.as_ref());
                    let failed = result.is_err();
                    if tx.send((source.name, result)).is_err() || failed {
                        break;
                    }
                }
            })
            .map_err(AssetError::Worker)?;

        self.phase = Phase::Loading {
            rx,
            loaded: 0,
            total,
        };
        Ok(())
    }

    /// Apply every completion the worker has produced so far. Returns true
    /// once the cycle has finished, successfully or not.
    pub fn poll(&mut self) -> bool {
        loop {
            let Phase::Loading { rx, .. } = &self.phase else {
                return self.is_finished();
            };
            match rx.try_recv() {
                Ok(completion) => self.apply(completion),
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => self.worker_lost(),
            }
        }
    }

    /// Block until the cycle finishes.
    pub fn wait(&mut self) -> bool {
        loop {
            let Phase::Loading { rx, .. } = &self.phase else {
                return self.resources_ready();
            };
            match rx.recv() {
                Ok(completion) => self.apply(completion),
                Err(_) => self.worker_lost(),
            }
        }
    }

    /// Start a cycle and drive it to completion on this thread.
    pub fn load_blocking(&mut self, sources: Vec<Source>) -> Result<bool, AssetError> {
        self.load_resources(sources)?;
        Ok(self.wait())
    }

    /// True only after every source resolved.
    pub fn resources_ready(&self) -> bool {
        matches!(self.phase, Phase::Finished { success: true })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    /// Loaded and total source counts of the running or finished cycle.
    pub fn progress(&self) -> (usize, usize) {
        match &self.phase {
            Phase::Loading { loaded, total, .. } => (*loaded, *total),
            _ => (self.assets.len(), self.assets.len()),
        }
    }

    /// Message of the failure that ended the cycle, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Everything resolved so far. Entries from a failed cycle stay in place.
    pub fn assets(&self) -> &LoadedAssetTable {
        &self.assets
    }

    fn apply(&mut self, (name, result): Completion) {
        match result {
            Ok(asset) => {
                self.assets.insert(name.clone(), asset);
                let Phase::Loading { loaded, total, .. } = &mut self.phase else {
                    return;
                };
                *loaded += 1;
                let (loaded, total) = (*loaded, *total);
                tracing::debug!(source = %name, loaded, total, "source loaded");
                self.events.emit(LoadEvent::Progress {
                    name,
                    loaded,
                    total,
                });
                if loaded == total {
                    self.finish(true);
                }
            }
            Err(err) => {
                tracing::error!(source = %name, error = %err, "source failed to load");
                self.last_error = Some(format!("{name}: {err}"));
                self.finish(false);
            }
        }
    }

    fn worker_lost(&mut self) {
        tracing::error!("loader worker exited before finishing");
        self.last_error
            .get_or_insert_with(|| "loader worker exited before finishing".into());
        self.finish(false);
    }

    fn finish(&mut self, success: bool) {
        self.phase = Phase::Finished { success };
        if success {
            tracing::info!(assets = self.assets.len(), "resources ready");
        }
        self.events.emit(LoadEvent::Finished { success });
    }
}

/// Fetch and decode one source by kind.
pub fn resolve(source: &Source, fetcher: &dyn AssetFetcher) -> Result<LoadedAsset, LoadError> {
    match source.kind {
        SourceKind::Model => {
            let path = source.single_path()?;
            let bytes = fetcher.fetch(path)?;
            Ok(LoadedAsset::Model(decode_model(&source.name, path, &bytes, fetcher)?))
        }
        SourceKind::Texture => {
            let bytes = fetcher.fetch(source.single_path()?)?;
            Ok(LoadedAsset::Texture(decode_texture(&source.name, &bytes)?))
        }
        SourceKind::ModelTexture => {
            let bytes = fetcher.fetch(source.single_path()?)?;
            Ok(LoadedAsset::Texture(
                decode_texture(&source.name, &bytes)?.into_model_texture(),
            ))
        }
        SourceKind::CubeTexture => {
            let faces = source
                .all_paths()
                .into_iter()
                .map(|p| fetcher.fetch(p))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LoadedAsset::CubeTexture(decode_cube_texture(&source.name, &faces)?))
        }
    }
}
