//! JSON-file-based transaction store.
//!
//! Keeps all records in one JSON file under a configurable directory
//! (default: `$XDG_DATA_HOME/spendwise/`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "async")]
use core::future::{self, Future};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Snapshot;
use super::memory::{Ledger, LedgerMeta, lock_error};
use crate::error::{Result, SpendwiseError};
use crate::models::{Transaction, TransactionId};

/// Application name used for the XDG data directory.
const APP_NAME: &str = "spendwise";

/// File holding the ID and revision counters.
const META_FILE: &str = "meta.json";
/// File holding every transaction record.
const TRANSACTIONS_FILE: &str = "transactions.json";
/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// File-backed store that persists transactions as JSON.
///
/// Records live in `transactions.json`; `meta.json` tracks the next
/// identifier to hand out and the store revision.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `storage.lock` (using [`std::fs::File::lock`] /
/// [`std::fs::File::lock_shared`]).
///
/// Reads acquire a shared lock, writes an exclusive one. Every write
/// re-reads the files under the exclusive lock, so two processes
/// sharing a directory never lose each other's records.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock          (cross-process lock sentinel)
///   meta.json
///   transactions.json
/// ```
#[derive(Debug)]
pub struct FileStore {
    /// Root directory containing all JSON files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileStore {
    /// Creates a new file store rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist. Also
    /// opens (or creates) the `storage.lock` sentinel file used for
    /// cross-process advisory locking.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        tracing::debug!(dir = %dir.display(), "opened file store");
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/spendwise/` (typically
    /// `~/.local/share/spendwise/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                SpendwiseError::Storage("could not determine platform data directory".into())
            })
    }

    /// Directory this store reads and writes.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the full path for a given file name.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Acquires an in-process mutex guard and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // Only surface the unlock error when the operation succeeded;
        // otherwise the original error is more useful.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write) file
    /// lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads and deserializes a JSON file, or returns `T::default()` if
    /// the file does not exist.
    fn read_json<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        match fs::read_to_string(self.path(name)) {
            Ok(contents) => serde_json::from_str(&contents).map_err(SpendwiseError::from),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(T::default()),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Atomically writes a serialized JSON file (write-to-tmp then rename).
    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path(name);
        let tmp_path = self.path(&format!("{name}.tmp"));
        let json = serde_json::to_string_pretty(value).map_err(SpendwiseError::from)?;
        fs::write(&tmp_path, json).map_err(storage_io_error)?;
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }

    /// Loads the ledger from disk. Caller must hold a file lock.
    fn load(&self) -> Result<Ledger> {
        let meta: LedgerMeta = self.read_json(META_FILE)?;
        let transactions: Vec<Transaction> = self.read_json(TRANSACTIONS_FILE)?;
        Ok(Ledger::from_parts(meta, transactions))
    }

    /// Writes the ledger back. Caller must hold the exclusive lock.
    fn save(&self, ledger: &Ledger) -> Result<()> {
        let records: Vec<&Transaction> = ledger.records().collect();
        self.write_json(TRANSACTIONS_FILE, &records)?;
        self.write_json(META_FILE, &ledger.meta())
    }

    /// Runs a read against a freshly loaded ledger.
    fn read<R>(&self, op: impl FnOnce(&Ledger) -> R) -> Result<R> {
        self.with_shared_lock(|| self.load().map(|ledger| op(&ledger)))
    }

    /// Loads, mutates and saves the ledger under the exclusive lock.
    fn write<R>(&self, op: impl FnOnce(&mut Ledger) -> Result<R>) -> Result<R> {
        self.with_exclusive_lock(|| {
            let mut ledger = self.load()?;
            let result = op(&mut ledger)?;
            self.save(&ledger)?;
            tracing::trace!(revision = ledger.meta().revision, "file store saved");
            Ok(result)
        })
    }
}

// ── Free-standing helpers ───────────────────────────────────────────────

/// Wraps an I/O error into a [`SpendwiseError::Storage`].
fn storage_io_error(err: io::Error) -> SpendwiseError {
    SpendwiseError::Storage(Box::new(err))
}

// ── BlockingStore implementation ────────────────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingStore for FileStore {
    #[inline]
    fn snapshot(&self) -> Result<Snapshot> {
        self.read(Ledger::snapshot)
    }

    #[inline]
    fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        self.read(|ledger| ledger.get(id))
    }

    #[inline]
    fn insert(&self, transaction: Transaction) -> Result<TransactionId> {
        self.write(|ledger| ledger.insert(transaction))
    }

    #[inline]
    fn insert_all(&self, transactions: Vec<Transaction>) -> Result<Vec<TransactionId>> {
        self.write(|ledger| ledger.insert_all(transactions))
    }

    #[inline]
    fn update(&self, transaction: Transaction) -> Result<()> {
        self.write(|ledger| ledger.update(transaction))
    }

    #[inline]
    fn delete(&self, id: TransactionId) -> Result<()> {
        self.write(|ledger| {
            ledger.delete(id);
            Ok(())
        })
    }

    #[inline]
    fn delete_all(&self) -> Result<()> {
        self.write(|ledger| {
            ledger.delete_all();
            Ok(())
        })
    }
}

// ── Store (async) implementation ────────────────────────────────────────

#[cfg(feature = "async")]
impl super::Store for FileStore {
    #[inline]
    fn snapshot(&self) -> impl Future<Output = Result<Snapshot>> + Send {
        future::ready(self.read(Ledger::snapshot))
    }

    #[inline]
    fn transaction(
        &self,
        id: TransactionId,
    ) -> impl Future<Output = Result<Option<Transaction>>> + Send {
        future::ready(self.read(|ledger| ledger.get(id)))
    }

    #[inline]
    fn insert(
        &self,
        transaction: Transaction,
    ) -> impl Future<Output = Result<TransactionId>> + Send {
        future::ready(self.write(|ledger| ledger.insert(transaction)))
    }

    #[inline]
    fn insert_all(
        &self,
        transactions: Vec<Transaction>,
    ) -> impl Future<Output = Result<Vec<TransactionId>>> + Send {
        future::ready(self.write(|ledger| ledger.insert_all(transactions)))
    }

    #[inline]
    fn update(&self, transaction: Transaction) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.write(|ledger| ledger.update(transaction)))
    }

    #[inline]
    fn delete(&self, id: TransactionId) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.write(|ledger| {
            ledger.delete(id);
            Ok(())
        }))
    }

    #[inline]
    fn delete_all(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.write(|ledger| {
            ledger.delete_all();
            Ok(())
        }))
    }
}
