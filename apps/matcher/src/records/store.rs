//! Record store: append-only persistence for companies and workers.
//!
//! `RecordStore` is the seam the front ends talk to. Validation happens in
//! the provided `append_*` methods so every backend rejects blank records the
//! same way; backends only implement raw insert and ordered reads.
//!
//! Backends:
//! - `CsvRecordStore`: `companies.csv` / `workers.csv` under a data directory
//! - `MemoryRecordStore`: in-process, used by tests and throwaway runs

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::models::records::{Company, CompanyForm, Worker, WorkerForm};
use crate::records::validation::{validate_company, validate_worker, ValidationReport};

pub const COMPANY_FILE: &str = "companies.csv";
pub const WORKER_FILE: &str = "workers.csv";

const COMPANY_HEADER: [&str; 4] = ["Name", "Job_type", "Description", "Location"];
const WORKER_HEADER: [&str; 4] = ["Name", "Age", "Resume", "Location"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Invalid age '{value}' in {} row {row}", path.display())]
    InvalidAge {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("Storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Outcome of submitting a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    /// Stored at zero-based position `row`.
    Stored { row: usize, record: T },
    Rejected(ValidationReport),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends an already validated company; returns its row position.
    async fn insert_company(&self, company: Company) -> Result<usize, StoreError>;

    /// Appends an already validated worker; returns its row position.
    async fn insert_worker(&self, worker: Worker) -> Result<usize, StoreError>;

    /// All companies in insertion order.
    async fn companies(&self) -> Result<Vec<Company>, StoreError>;

    /// All workers in insertion order.
    async fn workers(&self) -> Result<Vec<Worker>, StoreError>;

    async fn append_company(&self, form: &CompanyForm) -> Result<Submission<Company>, StoreError> {
        match validate_company(form) {
            Ok(company) => {
                let row = self.insert_company(company.clone()).await?;
                info!(row, name = %company.name, job_type = %company.job_type, "company stored");
                Ok(Submission::Stored {
                    row,
                    record: company,
                })
            }
            Err(report) => {
                info!(blank = ?report.blank_fields, "company rejected");
                Ok(Submission::Rejected(report))
            }
        }
    }

    async fn append_worker(&self, form: &WorkerForm) -> Result<Submission<Worker>, StoreError> {
        match validate_worker(form) {
            Ok(worker) => {
                let row = self.insert_worker(worker.clone()).await?;
                info!(row, name = %worker.name, "worker stored");
                Ok(Submission::Stored {
                    row,
                    record: worker,
                })
            }
            Err(report) => {
                info!(blank = ?report.blank_fields, problems = ?report.problems, "worker rejected");
                Ok(Submission::Rejected(report))
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CSV backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct CompanyRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Job_type")]
    job_type: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Location")]
    location: String,
}

impl From<Company> for CompanyRow {
    fn from(c: Company) -> Self {
        Self {
            name: c.name,
            job_type: c.job_type,
            description: c.description,
            location: c.location,
        }
    }
}

impl From<CompanyRow> for Company {
    fn from(r: CompanyRow) -> Self {
        Self {
            name: r.name,
            job_type: r.job_type,
            description: r.description,
            location: r.location,
        }
    }
}

// Age stays textual on disk; rows written by older tools are not guaranteed
// to hold a number.
#[derive(Debug, Serialize, Deserialize)]
struct WorkerRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Age")]
    age: String,
    #[serde(rename = "Resume")]
    resume: String,
    #[serde(rename = "Location")]
    location: String,
}

impl From<Worker> for WorkerRow {
    fn from(w: Worker) -> Self {
        Self {
            name: w.name,
            age: w.age.to_string(),
            resume: w.resume,
            location: w.location,
        }
    }
}

/// CSV files under one data directory. Appends and reads in this process are
/// serialised by `lock`; nothing coordinates with other processes.
pub struct CsvRecordStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl CsvRecordStore {
    /// Opens (and creates if needed) the data directory. The CSV files
    /// themselves are created on first append.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        info!(dir = %dir.display(), "CSV record store opened");
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn company_path(&self) -> PathBuf {
        self.dir.join(COMPANY_FILE)
    }

    fn worker_path(&self) -> PathBuf {
        self.dir.join(WORKER_FILE)
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn insert_company(&self, company: Company) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let path = self.company_path();
        let row = CompanyRow::from(company);
        tokio::task::spawn_blocking(move || append_row(&path, &COMPANY_HEADER, &row)).await?
    }

    async fn insert_worker(&self, worker: Worker) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let path = self.worker_path();
        let row = WorkerRow::from(worker);
        tokio::task::spawn_blocking(move || append_row(&path, &WORKER_HEADER, &row)).await?
    }

    async fn companies(&self) -> Result<Vec<Company>, StoreError> {
        let _guard = self.lock.lock().await;
        let path = self.company_path();
        let rows: Vec<CompanyRow> =
            tokio::task::spawn_blocking(move || read_rows(&path)).await??;
        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn workers(&self) -> Result<Vec<Worker>, StoreError> {
        let _guard = self.lock.lock().await;
        let path = self.worker_path();
        let read_path = path.clone();
        let rows: Vec<WorkerRow> =
            tokio::task::spawn_blocking(move || read_rows(&read_path)).await??;

        rows.into_iter()
            .enumerate()
            .map(|(row, r)| {
                let age = r.age.trim().parse::<u32>().map_err(|_| StoreError::InvalidAge {
                    path: path.clone(),
                    row,
                    value: r.age.clone(),
                })?;
                Ok(Worker {
                    name: r.name,
                    age,
                    resume: r.resume,
                    location: r.location,
                })
            })
            .collect()
    }
}

/// Reads every data row of `path`. A missing file is an empty store.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "no CSV file yet");
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Appends one row, writing the header first when the file is new or empty.
/// Returns the zero-based position of the appended row.
fn append_row<T: Serialize>(path: &Path, header: &[&str], row: &T) -> Result<usize, StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let existing = if path.exists() {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?
            .records()
            .count()
    } else {
        0
    };
    let needs_header = path.metadata().map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        writer.write_record(header)?;
    }
    writer.serialize(row)?;
    writer.flush().map_err(io_err)?;

    Ok(existing)
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryRecordStore {
    companies: RwLock<Vec<Company>>,
    workers: RwLock<Vec<Worker>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_company(&self, company: Company) -> Result<usize, StoreError> {
        let mut companies = self.companies.write().await;
        companies.push(company);
        Ok(companies.len() - 1)
    }

    async fn insert_worker(&self, worker: Worker) -> Result<usize, StoreError> {
        let mut workers = self.workers.write().await;
        workers.push(worker);
        Ok(workers.len() - 1)
    }

    async fn companies(&self) -> Result<Vec<Company>, StoreError> {
        Ok(self.companies.read().await.clone())
    }

    async fn workers(&self) -> Result<Vec<Worker>, StoreError> {
        Ok(self.workers.read().await.clone())
    }
}
