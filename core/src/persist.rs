use crate::config::{LemmatizerKind, INDEX_FORMAT_VERSION};
use crate::error::{Error, Result};
use crate::index::{Posting, StoredDoc, TermInfo, TermKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, create_dir_all, File};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub type Dictionary = HashMap<TermKey, TermInfo>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
    pub lemmatizer: LemmatizerKind,
    pub avg_field_lengths: [f32; 3],
    /// Build timestamp in nanoseconds; identifies one committed generation.
    #[serde(default)]
    pub generation: u64,
}

impl MetaFile {
    pub fn new(num_docs: u32, lemmatizer: LemmatizerKind, avg_field_lengths: [f32; 3]) -> Self {
        let now = time::OffsetDateTime::now_utc();
        Self {
            num_docs,
            created_at: now.format(&time::format_description::well_known::Rfc3339).unwrap_or_default(),
            version: INDEX_FORMAT_VERSION,
            lemmatizer,
            avg_field_lengths,
            generation: u64::try_from(now.unix_timestamp_nanos()).unwrap_or_default(),
        }
    }
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn dictionary(&self) -> PathBuf { self.root.join("dictionary.bin") }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    pub(crate) fn postings(&self) -> PathBuf { self.root.join("postings.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    fn meta_tmp(&self) -> PathBuf { self.root.join("meta.json.tmp") }

    /// The meta file is written last, so its presence marks a committed index.
    pub fn is_committed(&self) -> bool { self.meta().is_file() }
}

/// Wipe `root` and recreate it empty.
pub fn reset_dir(paths: &IndexPaths) -> Result<()> {
    if paths.root.exists() {
        fs::remove_dir_all(&paths.root)?;
    }
    create_dir_all(&paths.root)?;
    Ok(())
}

/// Write every postings list into `postings.bin` back to back and return the
/// dictionary locating each of them.
pub fn save_postings(paths: &IndexPaths, postings: &BTreeMap<TermKey, Vec<Posting>>) -> Result<Dictionary> {
    let mut f = BufWriter::new(File::create(paths.postings())?);
    let mut dictionary = Dictionary::with_capacity(postings.len());
    let mut offset = 0u64;
    for (key, plist) in postings {
        let bytes = bincode::serialize(plist)?;
        f.write_all(&bytes)?;
        dictionary.insert(key.clone(), TermInfo { doc_freq: plist.len() as u32, offset, len: bytes.len() as u32 });
        offset += bytes.len() as u64;
    }
    f.flush()?;
    f.get_ref().sync_all()?;
    Ok(dictionary)
}

pub fn load_postings(file: &mut File, info: &TermInfo) -> Result<Vec<Posting>> {
    file.seek(SeekFrom::Start(info.offset))?;
    let mut buf = vec![0u8; info.len as usize];
    file.read_exact(&mut buf)?;
    let postings = bincode::deserialize(&buf)?;
    Ok(postings)
}

fn save_bin<T: Serialize + ?Sized>(path: PathBuf, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    f.sync_all()?;
    Ok(())
}

fn load_bin<T: for<'de> Deserialize<'de>>(path: PathBuf) -> Result<T> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(bincode::deserialize(&buf)?)
}

pub fn save_dictionary(paths: &IndexPaths, dict: &Dictionary) -> Result<()> { save_bin(paths.dictionary(), dict) }

pub fn load_dictionary(paths: &IndexPaths) -> Result<Dictionary> { load_bin(paths.dictionary()) }

pub fn save_docs(paths: &IndexPaths, docs: &[StoredDoc]) -> Result<()> { save_bin(paths.docs(), docs) }

pub fn load_docs(paths: &IndexPaths) -> Result<Vec<StoredDoc>> { load_bin(paths.docs()) }

/// Commit point: the meta file appears atomically via rename.
pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    let tmp = paths.meta_tmp();
    let mut f = File::create(&tmp)?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    f.sync_all()?;
    fs::rename(tmp, paths.meta())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    if !paths.is_committed() {
        return Err(Error::NotFound(paths.root.clone()));
    }
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    if meta.version != INDEX_FORMAT_VERSION {
        return Err(Error::Corrupt(format!("unsupported index version {}", meta.version)));
    }
    Ok(meta)
}

const OPEN_ATTEMPTS: usize = 3;

/// Everything a reader needs from one committed generation.
pub struct IndexSnapshot {
    pub meta: MetaFile,
    pub dictionary: Dictionary,
    pub docs: Vec<StoredDoc>,
    pub postings: File,
}

/// Fails when `meta` is no longer the committed generation at `paths`.
pub fn confirm_generation(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    let current = load_meta(paths)?;
    if current.generation != meta.generation {
        return Err(Error::Corrupt("index changed while opening".to_string()));
    }
    Ok(())
}

fn load_body(paths: &IndexPaths, meta: &MetaFile) -> Result<(Dictionary, Vec<StoredDoc>, File)> {
    let dictionary = load_dictionary(paths)?;
    let docs = load_docs(paths)?;
    if docs.len() != meta.num_docs as usize {
        return Err(Error::Corrupt(format!("meta lists {} docs, found {}", meta.num_docs, docs.len())));
    }
    let postings = File::open(paths.postings())?;
    Ok((dictionary, docs, postings))
}

/// Load meta, dictionary and stored docs and open the postings file, then
/// re-read the meta file. A rebuild that lands in between makes the loaded
/// parts disagree, so the whole load is retried.
pub fn open_snapshot(paths: &IndexPaths) -> Result<IndexSnapshot> {
    for attempt in 1..=OPEN_ATTEMPTS {
        let meta = load_meta(paths)?;
        let body = load_body(paths, &meta);
        match confirm_generation(paths, &meta) {
            Ok(()) => {
                let (dictionary, docs, postings) = body?;
                return Ok(IndexSnapshot { meta, dictionary, docs, postings });
            }
            Err(Error::Corrupt(_)) | Err(Error::NotFound(_)) => {
                tracing::warn!(attempt, root = %paths.root.display(), "index changed while opening, retrying");
            }
            Err(e) => return Err(e),
        }
    }
    Err(Error::Corrupt("index changed while opening".to_string()))
}
