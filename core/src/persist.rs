use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::index::{DocId, DocMeta, Posting, SearchIndex, TermId};
use crate::IndexError;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
    fn dictionary(&self) -> PathBuf {
        self.root.join("dictionary.bin")
    }
    fn docs(&self) -> PathBuf {
        self.root.join("docs.bin")
    }
    fn postings(&self) -> PathBuf {
        self.root.join("postings.bin")
    }
}

/// True when `dir` already holds a persisted index.
pub fn index_exists<P: AsRef<Path>>(dir: P) -> bool {
    IndexPaths::new(dir).meta().is_file()
}

/// Persist a whole index. The files are written into a staging directory
/// next to the destination and renamed into place, so a crashed save never
/// leaves a half-written index where a reader would look for one.
pub fn save_index<P: AsRef<Path>>(
    dest: P,
    index: &SearchIndex,
    force: bool,
    created_at: String,
) -> Result<(), IndexError> {
    let dest = dest.as_ref();
    if index_exists(dest) {
        if !force {
            return Err(IndexError::DestinationExists(dest.display().to_string()));
        }
        fs::remove_dir_all(dest)?;
    }

    let staging = dest.with_extension(format!("staging.{}", std::process::id()));
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;
    let paths = IndexPaths::new(&staging);

    write_bincode(paths.dictionary(), &(&index.dictionary, &index.df))?;
    write_bincode(paths.docs(), &index.docs)?;
    write_bincode(paths.postings(), &index.postings)?;
    let meta = MetaFile {
        num_docs: index.num_docs,
        created_at,
        version: FORMAT_VERSION,
    };
    let mut f = BufWriter::new(File::create(paths.meta())?);
    f.write_all(serde_json::to_string_pretty(&meta)?.as_bytes())?;
    f.flush()?;
    drop(f);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(&staging, dest)?;
    tracing::info!(dest = %dest.display(), num_docs = index.num_docs, "index persisted");
    Ok(())
}

/// Reload a persisted index. The result compares equal to the index that
/// was saved: same dictionary, df, postings, docs, num_docs.
pub fn load_index<P: AsRef<Path>>(dir: P) -> Result<SearchIndex, IndexError> {
    let paths = IndexPaths::new(dir);

    let meta: MetaFile = serde_json::from_reader(BufReader::new(File::open(paths.meta())?))?;
    if meta.version != FORMAT_VERSION {
        return Err(IndexError::VersionMismatch {
            found: meta.version,
            expected: FORMAT_VERSION,
        });
    }

    let (dictionary, df): (HashMap<String, TermId>, Vec<u32>) =
        read_bincode(paths.dictionary())?;
    let docs: HashMap<DocId, DocMeta> = read_bincode(paths.docs())?;
    let postings: HashMap<TermId, Vec<Posting>> = read_bincode(paths.postings())?;

    Ok(SearchIndex {
        dictionary,
        df,
        postings,
        docs,
        num_docs: meta.num_docs,
    })
}

fn write_bincode<T: Serialize>(path: PathBuf, value: &T) -> Result<(), IndexError> {
    let mut f = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut f, value)?;
    f.flush()?;
    Ok(())
}

fn read_bincode<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<T, IndexError> {
    let f = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(f)?)
}
