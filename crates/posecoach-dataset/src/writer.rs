//! CSV sample sink.

use parking_lot::Mutex;
use posecoach_core::{Error, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::sample::Sample;

/// Destination for dataset samples.
///
/// Failures are reported to the caller, which decides whether to log and
/// carry on; a failed write must never end a session.
pub trait SampleSink: Send + Sync {
    fn write(&self, sample: &Sample) -> Result<()>;
}

fn dataset_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Dataset(format!("{context}: {e}"))
}

/// Appends samples to `<out_dir>/<exercise>.csv`.
pub struct CsvSampleWriter {
    out_dir: PathBuf,
    // serialises appends from concurrent sessions
    lock: Mutex<()>,
}

impl CsvSampleWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn path_for(&self, exercise: &str) -> PathBuf {
        self.out_dir.join(format!("{exercise}.csv"))
    }
}

impl SampleSink for CsvSampleWriter {
    fn write(&self, sample: &Sample) -> Result<()> {
        if sample.exercise.is_empty()
            || sample.exercise.contains(['/', '\\'])
            || sample.exercise.starts_with('.')
        {
            return Err(Error::InvalidInput(format!(
                "invalid exercise name for dataset file: {:?}",
                sample.exercise
            )));
        }

        let _guard = self.lock.lock();

        fs::create_dir_all(&self.out_dir)
            .map_err(|e| dataset_error("creating dataset directory", e))?;

        let path = self.path_for(&sample.exercise);
        let new_file = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| dataset_error("opening dataset file", e))?;

        let mut writer = csv::WriterBuilder::new().from_writer(file);
        if new_file {
            writer
                .write_record(Sample::header(sample.landmarks.len()))
                .map_err(|e| dataset_error("writing header", e))?;
        }
        writer
            .write_record(sample.to_record())
            .map_err(|e| dataset_error("writing sample", e))?;
        writer
            .flush()
            .map_err(|e| dataset_error("flushing dataset file", e))?;

        tracing::debug!(path = %path.display(), label = %sample.label, "dataset sample written");
        Ok(())
    }
}

/// Load every sample from the `*.csv` files in `dir`.
pub fn load_samples(dir: impl AsRef<Path>) -> Result<Vec<Sample>> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| dataset_error("reading dataset directory", e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();

    let mut samples = Vec::new();
    for path in paths {
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| dataset_error("opening dataset file", e))?;
        for record in reader.records() {
            let record = record.map_err(|e| dataset_error("reading sample", e))?;
            samples.push(Sample::from_record(&record)?);
        }
    }
    Ok(samples)
}
