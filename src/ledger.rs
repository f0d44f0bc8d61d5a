use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use serde::{Deserialize, Serialize};

pub const LEDGER_FILE_NAME: &str = "coords.jsonl";

/// One labeled image. `num` is redundant with `coords` but persisted for
/// quick inspection of the ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub file_id: String,
    pub num: usize,
    pub coords: Vec<(u32, u32)>,
}

impl AnnotationRecord {
    pub fn new(file_id: String, coords: Vec<(u32, u32)>) -> Self {
        AnnotationRecord {
            file_id,
            num: coords.len(),
            coords,
        }
    }
}

/// One line of the backing file. `coords` stays a JSON string column, like
/// the spreadsheet this replaces.
#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    #[serde(rename = "fileID")]
    file_id: String,
    num: usize,
    coords: String,
}

impl LedgerRow {
    fn from_record(record: &AnnotationRecord) -> Result<Self> {
        Ok(LedgerRow {
            file_id: record.file_id.clone(),
            num: record.num,
            coords: serde_json::to_string(&record.coords)?,
        })
    }

    fn into_record(self) -> Result<AnnotationRecord> {
        let coords: Vec<(u32, u32)> = serde_json::from_str(&self.coords)
            .with_context(|| format!("Failed to decode coords for {:?}", self.file_id))?;
        Ok(AnnotationRecord {
            file_id: self.file_id,
            num: self.num,
            coords,
        })
    }
}

/// The annotation state for one image directory, backed by
/// `<img_dir>/coords.jsonl`. The whole file is rewritten after every append
/// so a crash loses at most the image being captured.
#[derive(Debug)]
pub struct SessionLedger {
    path: PathBuf,
    records: Vec<AnnotationRecord>,
}

impl SessionLedger {
    pub fn path_for(img_dir: &Path) -> PathBuf {
        img_dir.join(LEDGER_FILE_NAME)
    }

    /// Loads from where you left off; an absent file is an empty ledger.
    pub fn load(path: PathBuf) -> Result<Self> {
        if !path.is_file() {
            debug!("no ledger at {}, starting fresh", path.display());
            return Ok(SessionLedger {
                path,
                records: Vec::new(),
            });
        }

        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read ledger {}", path.display()))?;

        let mut records = Vec::new();
        for (index, line) in s.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str::<LedgerRow>(line)
                .map_err(anyhow::Error::from)
                .and_then(LedgerRow::into_record)
                .with_context(|| {
                    format!("Corrupt ledger row {} in {}", index + 1, path.display())
                })?;
            records.push(record);
        }

        info!(
            "loaded {} labeled images from {}",
            records.len(),
            path.display()
        );
        Ok(SessionLedger { path, records })
    }

    /// Appends one record and rewrites the backing file. A fileID that is
    /// already present indicates a runner bug, not a recoverable condition.
    pub fn append_and_save(&mut self, record: AnnotationRecord) -> Result<()> {
        ensure!(
            !self.contains(&record.file_id),
            "{} is already in the ledger",
            record.file_id
        );
        self.records.push(record);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let mut out = String::new();
        for record in &self.records {
            let row = LedgerRow::from_record(record)?;
            out.push_str(&serde_json::to_string(&row)?);
            out.push('\n');
        }
        std::fs::write(&self.path, out)
            .with_context(|| format!("Failed to write ledger {}", self.path.display()))?;
        Ok(())
    }

    pub fn contains(&self, file_id: &str) -> bool {
        self.records.iter().any(|r| r.file_id == file_id)
    }

    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(file_id: &str, coords: &[(u32, u32)]) -> AnnotationRecord {
        AnnotationRecord::new(file_id.to_string(), coords.to_vec())
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let ledger = SessionLedger::load(SessionLedger::path_for(dir.path())).unwrap();
        assert!(ledger.is_empty());
        // loading must not create the file
        assert!(!SessionLedger::path_for(dir.path()).exists());
    }

    #[test]
    fn round_trip_preserves_records_and_order() {
        let dir = tempdir().unwrap();
        let path = SessionLedger::path_for(dir.path());

        let mut ledger = SessionLedger::load(path.clone()).unwrap();
        ledger
            .append_and_save(record("a.jpg", &[(10, 20), (30, 40)]))
            .unwrap();
        ledger.append_and_save(record("b.png", &[])).unwrap();

        let reloaded = SessionLedger::load(path).unwrap();
        assert_eq!(reloaded.records(), ledger.records());
        assert_eq!(reloaded.records()[0].coords, vec![(10, 20), (30, 40)]);
        assert_eq!(reloaded.records()[1].num, 0);
        assert!(reloaded.records()[1].coords.is_empty());
    }

    #[test]
    fn num_matches_point_count() {
        let r = record("a.jpg", &[(1, 2), (3, 4), (5, 6)]);
        assert_eq!(r.num, r.coords.len());
        assert_eq!(record("b.jpg", &[]).num, 0);
    }

    #[test]
    fn duplicate_file_id_is_rejected() {
        let dir = tempdir().unwrap();
        let mut ledger = SessionLedger::load(SessionLedger::path_for(dir.path())).unwrap();

        ledger.append_and_save(record("a.jpg", &[(1, 1)])).unwrap();
        assert!(ledger.append_and_save(record("a.jpg", &[])).is_err());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn corrupt_coords_fail_with_row_number() {
        let dir = tempdir().unwrap();
        let path = SessionLedger::path_for(dir.path());
        std::fs::write(
            &path,
            concat!(
                "{\"fileID\":\"a.jpg\",\"num\":1,\"coords\":\"[[1,2]]\"}\n",
                "{\"fileID\":\"b.jpg\",\"num\":1,\"coords\":\"not json\"}\n",
            ),
        )
        .unwrap();

        let err = SessionLedger::load(path).unwrap_err();
        assert!(format!("{:#}", err).contains("row 2"));
    }

    #[test]
    fn rows_keep_coords_as_json_string_column() {
        let dir = tempdir().unwrap();
        let path = SessionLedger::path_for(dir.path());

        let mut ledger = SessionLedger::load(path.clone()).unwrap();
        ledger.append_and_save(record("a.jpg", &[(10, 20)])).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let row: serde_json::Value = serde_json::from_str(raw.lines().next().unwrap()).unwrap();
        assert_eq!(row["fileID"], "a.jpg");
        assert_eq!(row["num"], 1);
        assert_eq!(row["coords"], "[[10,20]]");
    }
}
