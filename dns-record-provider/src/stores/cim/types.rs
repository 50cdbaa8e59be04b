//! CIM output types

use serde::Deserialize;

use crate::types::{RecordKind, StoredRecord};

/// One record row as emitted by `Select-Object ContainerName, OwnerName, RecordData`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CimRecordRow {
    pub container_name: Option<String>,
    pub owner_name: Option<String>,
    pub record_data: Option<String>,
}

impl CimRecordRow {
    pub fn into_record(self, kind: RecordKind) -> StoredRecord {
        StoredRecord {
            kind,
            zone: self.container_name.unwrap_or_default(),
            owner: self.owner_name.unwrap_or_default(),
            data: self.record_data.unwrap_or_default(),
        }
    }
}

/// `ConvertTo-Json` unwraps single-element arrays on some PowerShell
/// versions, so accept both shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CimRows {
    Many(Vec<CimRecordRow>),
    One(CimRecordRow),
}

impl CimRows {
    pub fn into_vec(self) -> Vec<CimRecordRow> {
        match self {
            Self::Many(rows) => rows,
            Self::One(row) => vec![row],
        }
    }
}
