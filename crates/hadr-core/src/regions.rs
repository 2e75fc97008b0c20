//! Opaque handles for named geometric regions.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparable handle for a geometric region, valid for the table that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(u32);

impl RegionId {
    /// Creates a handle from its raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

/// Interns region names into [`RegionId`] handles.
///
/// Names are compared once, when configuration or geometry is loaded. Per-step
/// code only ever compares handles.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    names: Vec<String>,
    index: HashMap<String, RegionId>,
}

impl RegionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `name`, issuing a new one on first sight.
    pub fn intern(&mut self, name: &str) -> RegionId {
        if let Some(id) = self.index.get(name) {
            return *id;
        }
        let id = RegionId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        id
    }

    /// Returns the handle for `name` without interning it.
    pub fn lookup(&self, name: &str) -> Option<RegionId> {
        self.index.get(name).copied()
    }

    /// Returns the name behind a handle.
    pub fn name(&self, id: RegionId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Number of interned regions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
