//! Shared configuration types for CLI commands

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    adapters::{JsonFileRepository, MsgPackRepository},
    difficulty::Difficulty,
    ports::ValueTableRepository,
    q_learning::ValueTable,
};

/// Encoding of the table files in the store directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StoreFormat {
    #[default]
    Json,
    Msgpack,
}

impl StoreFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Msgpack => "msgpack",
        }
    }
}

/// Which table a command works on
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Bot difficulty; each difficulty keeps its own table
    #[arg(long, short = 'd', value_enum, default_value_t = Difficulty::Hard)]
    pub difficulty: Difficulty,

    /// Directory holding the table files
    #[arg(long, default_value = ".")]
    pub store: PathBuf,

    /// Table file encoding
    #[arg(long, value_enum, default_value_t = StoreFormat::Json)]
    pub format: StoreFormat,
}

impl StoreArgs {
    /// `<store>/qtable-<difficulty>.<ext>`
    pub fn table_path(&self) -> PathBuf {
        table_path(&self.store, self.difficulty, self.format)
    }

    pub fn repository(&self) -> Store {
        Store::open(self.table_path(), self.format)
    }
}

/// File name of a difficulty's table inside a store directory
pub fn table_path(store: &Path, difficulty: Difficulty, format: StoreFormat) -> PathBuf {
    store.join(format!("qtable-{difficulty}.{}", format.extension()))
}

/// File repository in either encoding
#[derive(Debug, Clone)]
pub enum Store {
    Json(JsonFileRepository),
    MsgPack(MsgPackRepository),
}

impl Store {
    pub fn open(path: PathBuf, format: StoreFormat) -> Self {
        match format {
            StoreFormat::Json => Store::Json(JsonFileRepository::new(path)),
            StoreFormat::Msgpack => Store::MsgPack(MsgPackRepository::new(path)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Store::Json(repo) => repo.path(),
            Store::MsgPack(repo) => repo.path(),
        }
    }
}

impl ValueTableRepository for Store {
    fn load(&self) -> Result<ValueTable> {
        match self {
            Store::Json(repo) => repo.load(),
            Store::MsgPack(repo) => repo.load(),
        }
    }

    fn save(&self, table: &ValueTable) -> Result<()> {
        match self {
            Store::Json(repo) => repo.save(table),
            Store::MsgPack(repo) => repo.save(table),
        }
    }

    fn clear(&self) -> Result<()> {
        match self {
            Store::Json(repo) => repo.clear(),
            Store::MsgPack(repo) => repo.clear(),
        }
    }
}
