// src/types.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which listing an item came from. Fixes the API path segment and the
/// output filename prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Experiments,
    Datasets,
}

impl Category {
    /// Processing order for a run.
    pub const ALL: [Category; 2] = [Category::Experiments, Category::Datasets];

    /// Path segment under `{base}/{project_id}/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Experiments => "experiments",
            Category::Datasets => "datasets",
        }
    }

    /// Singular prefix used in `{prefix}_{id}.csv`.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Category::Experiments => "experiment",
            Category::Datasets => "dataset",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item identifier as sent by the API: either a JSON integer or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    Text(String),
}

impl ItemId {
    /// Checks that the id can name a file directly inside the output dir.
    pub fn check_file_safe(&self) -> std::result::Result<(), &'static str> {
        match self {
            ItemId::Text(s) => check_path_component(s),
            ItemId::Int(_) | ItemId::UInt(_) => Ok(()),
        }
    }
}

/// `s` must be usable as one path component: not empty, not `.`/`..`,
/// no separators or NUL.
pub fn check_path_component(s: &str) -> std::result::Result<(), &'static str> {
    if s.is_empty() {
        return Err("empty");
    }
    if s == "." || s == ".." {
        return Err("relative path component");
    }
    if s.contains(['/', '\\', '\0']) {
        return Err("contains a path separator or NUL");
    }
    Ok(())
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{n}"),
            ItemId::UInt(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// A single cell value. JSON `null` is carried as `None` around it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One flat row of an item's payload, keys in the order the API sent them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub IndexMap<String, Option<Scalar>>);

impl Record {
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field).and_then(Option::as_ref)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// One experiment or dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub data: Vec<Record>,
}

impl Item {
    /// `{prefix}_{id}.csv`
    pub fn file_name(&self, category: Category) -> String {
        format!("{}_{}.csv", category.file_prefix(), self.id)
    }
}
