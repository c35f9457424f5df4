//! Form drafts
//!
//! Unsaved form values are written to one JSON file per form and path, and
//! offered back only while younger than the configured window (one hour by
//! default). Older drafts are deleted when read.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::context::CrmContext;
use crate::error::Result;
use crate::notify::{Notice, Notifier};
use crate::tasks::{debounce, Debounced};

/// How long the "Draft saved" notice stays up.
const SAVED_NOTICE_DURATION: Duration = Duration::from_secs(2);

/// A saved snapshot of a form's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDraft {
    pub data: BTreeMap<String, String>,
    pub saved_at: DateTime<Utc>,
}

impl FormDraft {
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        // A timestamp in the future counts as brand new
        (now - self.saved_at).to_std().unwrap_or_default()
    }
}

/// `form_{form_id}_{path}`
pub fn draft_key(form_id: &str, path: &str) -> String {
    format!("form_{}_{}", form_id, path)
}

/// Directory-backed draft storage.
#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
    max_age: Duration,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            dir: dir.into(),
            max_age,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.draft_dir, Duration::from_secs(config.draft_max_age_secs))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// File backing `key`. Characters unsafe in file names become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }

    pub fn save(&self, key: &str, data: BTreeMap<String, String>) -> Result<FormDraft> {
        self.save_at(key, data, Utc::now())
    }

    pub fn save_at(
        &self,
        key: &str,
        data: BTreeMap<String, String>,
        saved_at: DateTime<Utc>,
    ) -> Result<FormDraft> {
        let draft = FormDraft { data, saved_at };
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), serde_json::to_string_pretty(&draft)?)?;
        debug!(key, fields = draft.data.len(), "draft saved");
        Ok(draft)
    }

    /// The draft for `key` if one exists and is still fresh.
    ///
    /// Stale or unreadable drafts are deleted and reported as absent.
    pub fn load(&self, key: &str) -> Result<Option<FormDraft>> {
        self.load_at(key, Utc::now())
    }

    pub fn load_at(&self, key: &str, now: DateTime<Utc>) -> Result<Option<FormDraft>> {
        let path = self.path_for(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let draft: FormDraft = match serde_json::from_str(&contents) {
            Ok(draft) => draft,
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable draft");
                self.remove(key)?;
                return Ok(None);
            }
        };

        if draft.age_at(now) < self.max_age {
            Ok(Some(draft))
        } else {
            debug!(key, "discarding stale draft");
            self.remove(key)?;
            Ok(None)
        }
    }

    /// Deletes the draft for `key`. Returns whether one existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Debounced auto-save of one form.
#[derive(Clone)]
pub struct AutoSaver {
    key: String,
    store: Arc<DraftStore>,
    notifier: Arc<dyn Notifier>,
    save: Debounced<BTreeMap<String, String>>,
}

impl AutoSaver {
    pub fn new(
        store: Arc<DraftStore>,
        key: impl Into<String>,
        delay: Duration,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let key = key.into();
        let save = {
            let store = Arc::clone(&store);
            let notifier = Arc::clone(&notifier);
            let key = key.clone();
            debounce(
                move |data: BTreeMap<String, String>| match store.save(&key, data) {
                    Ok(_) => notifier.notify(Notice::info("Draft saved").dismiss_after(SAVED_NOTICE_DURATION)),
                    Err(e) => warn!(key = %key, error = %e, "failed to save draft"),
                },
                delay,
            )
        };

        Self {
            key,
            store,
            notifier,
            save,
        }
    }

    /// Auto-saver for form `form_id` on page `path`, using the context's
    /// draft directory, freshness window and autosave delay.
    pub fn from_context(ctx: &CrmContext, form_id: &str, path: &str) -> Self {
        let config = ctx.config();
        Self::new(
            Arc::new(DraftStore::from_config(config)),
            draft_key(form_id, path),
            config.autosave_delay(),
            Arc::clone(ctx.notifier()),
        )
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Called on every input or change event with the form's current values.
    pub fn on_change(&self, data: BTreeMap<String, String>) {
        self.save.call(data);
    }

    /// Values of a fresh draft, announcing "Draft restored" when there is one.
    pub fn restore(&self) -> Result<Option<BTreeMap<String, String>>> {
        let Some(draft) = self.store.load(&self.key)? else {
            return Ok(None);
        };
        self.notifier.notify(Notice::info("Draft restored"));
        Ok(Some(draft.data))
    }

    /// Drops the pending save and the stored draft, as after a submit.
    pub fn discard(&self) -> Result<bool> {
        self.save.cancel();
        self.store.remove(&self.key)
    }
}
