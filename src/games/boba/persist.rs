//! Persistence reconciler: debounced writes to the local or remote backend.
//!
//! The backend is chosen at call time from the signed-in user id. The
//! snapshot is always the one passed to `poll`/`save`, i.e. the state at
//! send time, never a copy taken when the debounce was armed.

use super::config::{LOCAL_SAVE_KEY, PERSIST_DEBOUNCE_MS};
use super::error::PersistError;
use super::save::{self, Decoded, LocalStore, RemoteStore};
use super::state::ProgressSnapshot;

/// Trailing-edge debounce. Each `request` pushes the deadline back.
#[derive(Clone, Debug)]
pub struct Debounce {
    window_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            deadline: None,
        }
    }

    pub fn request(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.window_ms);
    }

    /// True exactly once per armed deadline, when it has passed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Local,
    RemoteCreated,
    RemoteUpdated,
    /// Remote copy already matches; nothing was written.
    Unchanged,
}

impl SaveOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SaveOutcome::Local => "local",
            SaveOutcome::RemoteCreated => "cloud, new",
            SaveOutcome::RemoteUpdated => "cloud",
            SaveOutcome::Unchanged => "unchanged",
        }
    }
}

pub struct Reconciler {
    local: Box<dyn LocalStore>,
    remote: Option<Box<dyn RemoteStore>>,
    debounce: Debounce,
    /// Encoded progress last written to the remote store successfully.
    last_synced: Option<String>,
    pub last_saved_at: Option<f64>,
}

impl Reconciler {
    pub fn new(local: Box<dyn LocalStore>, remote: Option<Box<dyn RemoteStore>>) -> Self {
        Self {
            local,
            remote,
            debounce: Debounce::new(PERSIST_DEBOUNCE_MS),
            last_synced: None,
            last_saved_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Ask for a write; supersedes any pending one.
    pub fn request_save(&mut self, now_ms: f64) {
        self.debounce.request(now_ms);
    }

    /// Write if the debounce window has elapsed.
    pub fn poll(
        &mut self,
        user_id: Option<&str>,
        snapshot: &ProgressSnapshot,
        now_ms: f64,
    ) -> Option<Result<SaveOutcome, PersistError>> {
        if !self.debounce.poll(now_ms) {
            return None;
        }
        Some(self.write(user_id, snapshot, now_ms))
    }

    /// Write now, dropping any pending debounced write.
    pub fn save(
        &mut self,
        user_id: Option<&str>,
        snapshot: &ProgressSnapshot,
        now_ms: f64,
    ) -> Result<SaveOutcome, PersistError> {
        self.debounce.cancel();
        self.write(user_id, snapshot, now_ms)
    }

    fn write(
        &mut self,
        user_id: Option<&str>,
        snapshot: &ProgressSnapshot,
        now_ms: f64,
    ) -> Result<SaveOutcome, PersistError> {
        let json = save::encode(snapshot)?;
        let outcome = match user_id {
            None => {
                self.local.set(LOCAL_SAVE_KEY, &json)?;
                log::debug!("[SAVE] wrote {} bytes to local storage", json.len());
                SaveOutcome::Local
            }
            Some(user) => {
                if self.last_synced.as_deref() == Some(json.as_str()) {
                    return Ok(SaveOutcome::Unchanged);
                }
                let remote = self.remote.as_mut().ok_or(PersistError::NoRemote)?;
                let ts = save::timestamp(now_ms);
                let outcome = match remote.find_by_user(user)? {
                    Some(doc) => {
                        remote.update(&doc.id, &json, &ts)?;
                        SaveOutcome::RemoteUpdated
                    }
                    None => {
                        remote.create(user, &json, &ts)?;
                        SaveOutcome::RemoteCreated
                    }
                };
                log::info!("[SYNC] progress synced for {} at {}", user, ts);
                self.last_synced = Some(json);
                outcome
            }
        };
        self.last_saved_at = Some(now_ms);
        Ok(outcome)
    }

    /// Read the stored snapshot for the active backend. `Ok(None)` means
    /// nothing usable was stored and the caller starts fresh.
    pub fn load(&mut self, user_id: Option<&str>) -> Result<Option<ProgressSnapshot>, PersistError> {
        match user_id {
            None => {
                let Some(json) = self.local.get(LOCAL_SAVE_KEY)? else {
                    return Ok(None);
                };
                match save::decode(&json) {
                    Decoded::Snapshot { snapshot, version } => {
                        log_version("local", version);
                        Ok(Some(snapshot))
                    }
                    Decoded::Discard(reason) => {
                        log::warn!("[LOAD] discarding local save: {}", reason);
                        // 壊れたデータを削除
                        self.local.remove(LOCAL_SAVE_KEY)?;
                        Ok(None)
                    }
                }
            }
            Some(user) => {
                let remote = self.remote.as_mut().ok_or(PersistError::NoRemote)?;
                let Some(doc) = remote.find_by_user(user)? else {
                    log::info!("[LOAD] no cloud save for {}", user);
                    return Ok(None);
                };
                match save::decode(&doc.data) {
                    Decoded::Snapshot { snapshot, version } => {
                        log_version("cloud", version);
                        // Loaded state counts as synced.
                        self.last_synced = save::encode(&snapshot).ok();
                        Ok(Some(snapshot))
                    }
                    Decoded::Discard(reason) => {
                        log::warn!("[LOAD] ignoring cloud save {}: {}", doc.id, reason);
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Drop any pending write and forget the sync marker. Used when the
    /// signed-in identity changes.
    pub fn forget(&mut self) {
        self.debounce.cancel();
        self.last_synced = None;
    }

    /// Erase the local save and forget everything pending.
    pub fn reset(&mut self) -> Result<(), PersistError> {
        self.forget();
        self.last_saved_at = None;
        self.local.remove(LOCAL_SAVE_KEY)
    }

    pub fn cancel(&mut self) {
        self.debounce.cancel();
    }
}

fn log_version(source: &str, version: Option<u32>) {
    match version {
        Some(v) if v < save::SAVE_VERSION => log::info!(
            "[LOAD] migrating {} save (saved={}, current={})",
            source,
            v,
            save::SAVE_VERSION
        ),
        None => log::info!("[LOAD] {} save has no version envelope", source),
        _ => log::info!("[LOAD] {} save loaded", source),
    }
}
