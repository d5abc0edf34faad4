use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::constants::{SAMPLE_DATA_FILE, SAMPLE_LABELS_FILE};
use crate::error::{CoreError, CoreResult};
use crate::logic::traffic::{TrafficRecord, TrafficSet};

/// Files written by [`save_sample`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePaths {
    pub data: PathBuf,
    pub labels: PathBuf,
}

impl SamplePaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            data: dir.join(SAMPLE_DATA_FILE),
            labels: dir.join(SAMPLE_LABELS_FILE),
        }
    }
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> CoreResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write records and the parallel label array, creating `dir` if needed
pub fn save_sample(dir: &Path, traffic: &TrafficSet) -> CoreResult<SamplePaths> {
    fs::create_dir_all(dir)?;
    let paths = SamplePaths::in_dir(dir);

    write_json(&paths.data, traffic)?;
    write_json(&paths.labels, &traffic.labels())?;

    log::info!(
        "Saved {} records ({} anomalies) to {}",
        traffic.len(),
        traffic.anomaly_count(),
        dir.display()
    );
    Ok(paths)
}

/// Read a sample back; labels, when present, override the records' own
pub fn load_sample(dir: &Path) -> CoreResult<TrafficSet> {
    let paths = SamplePaths::in_dir(dir);

    let records: Vec<TrafficRecord> =
        serde_json::from_reader(BufReader::new(File::open(&paths.data)?))?;

    if !paths.labels.exists() {
        return Ok(records.into());
    }

    let labels: Vec<u8> = serde_json::from_reader(BufReader::new(File::open(&paths.labels)?))?;
    if labels.len() != records.len() {
        return Err(CoreError::InvalidInput(format!(
            "label count {} does not match record count {}",
            labels.len(),
            records.len()
        )));
    }

    Ok(records
        .into_iter()
        .zip(labels)
        .map(|(record, label)| record.with_label(label != 0))
        .collect())
}
