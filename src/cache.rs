//! Persisted availability decision
use crate::{
    availability::{AvailabilityOutcome, FrequencyClass},
    Error,
};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Availability state key: 0 never checked, 1 not available, 2 available
pub const ENABLED_KEY: &str = "is_enabled";

/// Frequency class key: 0 none, 1 single, 2 dual
pub const FREQUENCY_KEY: &str = "frequency";

/// Integer key/value persistence backing the [DecisionCache]
pub trait KeyValueStore {
    /// Reads an entry, None when it was never written
    fn get_int(&self, key: &str) -> Result<Option<i64>, Error>;
    /// Writes all entries at once: either all of them are persisted or none
    fn put_ints(&mut self, entries: &[(&str, i64)]) -> Result<(), Error>;
}

/// In process [KeyValueStore]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryStore {
    entries: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
    /// Number of entries stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, Error> {
        Ok(self.entries.get(key).copied())
    }
    fn put_ints(&mut self, entries: &[(&str, i64)]) -> Result<(), Error> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), *value);
        }
        Ok(())
    }
}

/// [KeyValueStore] persisted as a JSON document.
/// Updates are written to a temporary file, then renamed over the document.
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[derive(Debug, Clone, PartialEq)]
pub struct FileStore {
    path: PathBuf,
}

#[cfg(feature = "serde")]
impl FileStore {
    /// Builds a [FileStore] at given location. The document is created
    /// on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temporary document location: `<document>.tmp`
    pub fn tmp_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(".tmp");
        PathBuf::from(path)
    }

    fn load(&self) -> Result<BTreeMap<String, i64>, Error> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let fd = File::open(&self.path)?;
        let entries = serde_json::from_reader(BufReader::new(fd))?;
        Ok(entries)
    }
}

#[cfg(feature = "serde")]
impl KeyValueStore for FileStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, Error> {
        Ok(self.load()?.get(key).copied())
    }
    fn put_ints(&mut self, entries: &[(&str, i64)]) -> Result<(), Error> {
        let mut content = self.load()?;
        for (key, value) in entries {
            content.insert(key.to_string(), *value);
        }

        let tmp = self.tmp_path();
        let written = write_document(&tmp, &content)
            .and_then(|_| std::fs::rename(&tmp, &self.path).map_err(Error::from));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        debug!("{}: {:?}", self.path.display(), content);
        Ok(())
    }
}

#[cfg(feature = "serde")]
fn write_document(path: &Path, content: &BTreeMap<String, i64>) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, content)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// [DecisionCache] persists the [AvailabilityOutcome] so it is
/// determined at most once per device.
///
/// States are Unknown, NotAvailable, Available(Single) and Available(Dual).
/// Only Unknown may transition, and never back to itself: writing
/// [AvailabilityOutcome::Unknown] is rejected. Overwriting a determined
/// outcome is the caller's business, the session never does so.
#[derive(Debug, Clone)]
pub struct DecisionCache<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> DecisionCache<K> {
    /// Builds a cache on top of given store
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Returns the persisted outcome, [AvailabilityOutcome::Unknown]
    /// if nothing was ever written
    pub fn read(&self) -> Result<AvailabilityOutcome, Error> {
        let enabled = self.store.get_int(ENABLED_KEY)?.unwrap_or(0);
        let frequency = self.store.get_int(FREQUENCY_KEY)?.unwrap_or(0);
        decode(enabled, frequency)
    }

    /// Persists a determined outcome
    pub fn write(&mut self, outcome: AvailabilityOutcome) -> Result<(), Error> {
        let (enabled, frequency) = encode(outcome)?;
        self.store
            .put_ints(&[(ENABLED_KEY, enabled), (FREQUENCY_KEY, frequency)])?;
        info!("persisted decision: {}", outcome);
        Ok(())
    }

    /// Underlying store
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Releases the underlying store
    pub fn into_inner(self) -> K {
        self.store
    }
}

/*
 * (is_enabled, frequency) integer coding
 */
fn encode(outcome: AvailabilityOutcome) -> Result<(i64, i64), Error> {
    match outcome {
        AvailabilityOutcome::Unknown => Err(Error::UndeterminedOutcome),
        AvailabilityOutcome::NotAvailable => Ok((1, 0)),
        AvailabilityOutcome::Available(FrequencyClass::Single) => Ok((2, 1)),
        AvailabilityOutcome::Available(FrequencyClass::Dual) => Ok((2, 2)),
    }
}

fn decode(enabled: i64, frequency: i64) -> Result<AvailabilityOutcome, Error> {
    match enabled {
        0 => Ok(AvailabilityOutcome::Unknown),
        1 => Ok(AvailabilityOutcome::NotAvailable),
        2 => match frequency {
            1 => Ok(AvailabilityOutcome::Available(FrequencyClass::Single)),
            2 => Ok(AvailabilityOutcome::Available(FrequencyClass::Dual)),
            value => Err(Error::CorruptedEntry {
                key: FREQUENCY_KEY.to_string(),
                value,
            }),
        },
        value => Err(Error::CorruptedEntry {
            key: ENABLED_KEY.to_string(),
            value,
        }),
    }
}
