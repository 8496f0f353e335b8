//! Interactive prompt loop: add companies, add workers (and see their best
//! matches), or print the match graph. Reads from any async line source so
//! the session can be scripted in tests.

use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{info, warn};

use crate::matching::engine::MatchingEngine;
use crate::matching::render::render_dot;
use crate::models::records::{Company, CompanyForm, Worker, WorkerForm};
use crate::records::store::{RecordStore, StoreError, Submission};

const MENU: &str = concat!(
    "Enter 1 for company\n",
    "Enter 2 for worker\n",
    "Enter 3 to see graph\n",
    "Enter q to quit\n",
    ">>> ",
);

pub struct Interactive<'a, R, W> {
    store: &'a dyn RecordStore,
    engine: MatchingEngine,
    /// Where option 3 writes the DOT rendering. `None` skips the file.
    dot_path: Option<PathBuf>,
    lines: Lines<R>,
    out: W,
}

impl<'a, R, W> Interactive<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        store: &'a dyn RecordStore,
        engine: MatchingEngine,
        dot_path: Option<PathBuf>,
        input: R,
        out: W,
    ) -> Self {
        Self {
            store,
            engine,
            dot_path,
            lines: input.lines(),
            out,
        }
    }

    /// Runs until `q` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let Some(choice) = self.prompt(MENU).await? else {
                break;
            };
            match choice.trim() {
                "1" => {
                    if !self.add_company().await? {
                        break;
                    }
                }
                "2" => {
                    if !self.add_worker().await? {
                        break;
                    }
                }
                "3" => self.show_graph().await?,
                "q" | "Q" => break,
                _ => self.say("Invalid option.\n").await?,
            }
        }
        self.say("Bye.\n").await?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    /// Prints `label` and reads one line. `None` means input is exhausted.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.say(label).await?;
        Ok(self.lines.next_line().await?)
    }

    /// Storage failures are shown to the user and the session goes on.
    async fn report_store_error(&mut self, what: &str, err: &StoreError) -> Result<()> {
        warn!(error = %err, "{what}");
        self.say(&format!("{what}: {err}\n\n")).await
    }

    /// Reads the listed fields in order; `None` if input ends part-way.
    async fn prompt_fields(&mut self, labels: &[&str]) -> Result<Option<Vec<String>>> {
        let mut values = Vec::with_capacity(labels.len());
        for label in labels {
            match self.prompt(label).await? {
                Some(value) => values.push(value),
                None => return Ok(None),
            }
        }
        Ok(Some(values))
    }

    async fn add_company(&mut self) -> Result<bool> {
        let Some(fields) = self
            .prompt_fields(&["Company name: ", "Job title: ", "Job description: ", "Location: "])
            .await?
        else {
            return Ok(false);
        };
        let [name, job_type, description, location]: [String; 4] = fields
            .try_into()
            .map_err(|_| anyhow::anyhow!("expected four company fields"))?;

        let form = CompanyForm {
            name,
            job_type,
            description,
            location,
        };
        match self.store.append_company(&form).await {
            Ok(Submission::Stored { .. }) => self.say("Company saved.\n\n").await?,
            Ok(Submission::Rejected(report)) => {
                self.say(&format!("Not saved: {}\n\n", report.message())).await?
            }
            Err(err) => self.report_store_error("Company not saved", &err).await?,
        }
        Ok(true)
    }

    async fn add_worker(&mut self) -> Result<bool> {
        let Some(fields) = self
            .prompt_fields(&[
                "Your name: ",
                "Your age: ",
                "Your resume/skills: ",
                "Your location: ",
            ])
            .await?
        else {
            return Ok(false);
        };
        let [name, age, resume, location]: [String; 4] = fields
            .try_into()
            .map_err(|_| anyhow::anyhow!("expected four worker fields"))?;

        let form = WorkerForm {
            name,
            age,
            resume,
            location,
        };
        let worker = match self.store.append_worker(&form).await {
            Ok(Submission::Stored { record, .. }) => {
                self.say("Worker saved.\n").await?;
                record
            }
            Ok(Submission::Rejected(report)) => {
                self.say(&format!("Not saved: {}\n\n", report.message())).await?;
                return Ok(true);
            }
            Err(err) => {
                self.report_store_error("Worker not saved", &err).await?;
                return Ok(true);
            }
        };

        let companies = match self.store.companies().await {
            Ok(companies) => companies,
            Err(err) => {
                self.report_store_error("Could not load job postings", &err).await?;
                return Ok(true);
            }
        };
        if companies.is_empty() {
            self.say("No job postings stored yet.\n\n").await?;
            return Ok(true);
        }

        let matches = self.engine.rank(&worker.resume, &companies);
        let mut text = format!("\nTop {} Job Matches:\n", matches.len());
        for (rank, m) in matches.iter().enumerate() {
            text.push_str(&format!(
                "{}. {} at {} ({}% match)\n",
                rank + 1,
                m.job_type,
                m.name,
                m.percent()
            ));
        }
        text.push('\n');
        self.say(&text).await?;
        Ok(true)
    }

    async fn show_graph(&mut self) -> Result<()> {
        let (workers, companies) = match load_all(self.store).await {
            Ok(records) => records,
            Err(err) => return self.report_store_error("Error in graph", &err).await,
        };
        let graph = self.engine.graph(&workers, &companies);

        if graph.is_empty() {
            return self
                .say("Nothing to draw yet: add at least one company and one worker.\n\n")
                .await;
        }

        let mut text = format!(
            "\nResume-Job Matching Graph ({} workers, {} jobs, {} edges)\n",
            graph.worker_nodes.len(),
            graph.job_nodes.len(),
            graph.edges.len()
        );
        for edge in &graph.edges {
            text.push_str(&format!("  {} -- {} ({:.2})\n", edge.worker, edge.job, edge.score));
        }

        if let Some(path) = self.dot_path.clone() {
            match tokio::fs::write(&path, render_dot(&graph)).await {
                Ok(()) => {
                    info!(path = %path.display(), "graph written");
                    text.push_str(&format!("Graphviz file written to {}\n", path.display()));
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "graph file not written");
                    text.push_str(&format!(
                        "Could not write graph file {}: {err}\n",
                        path.display()
                    ));
                }
            }
        }
        text.push('\n');
        self.say(&text).await
    }
}

async fn load_all(store: &dyn RecordStore) -> Result<(Vec<Worker>, Vec<Company>), StoreError> {
    Ok((store.workers().await?, store.companies().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::store::{CsvRecordStore, MemoryRecordStore};

    async fn run_script(
        store: &dyn RecordStore,
        script: &str,
        dot_path: Option<PathBuf>,
    ) -> String {
        let mut session = Interactive::new(
            store,
            MatchingEngine::default(),
            dot_path,
            script.as_bytes(),
            Vec::new(),
        );
        session.run().await.unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_company_then_worker_prints_matches() {
        let store = MemoryRecordStore::new();
        let script = "1\nAcme\nData Analyst\nLooking for Python and SQL skills\nOslo\n\
                      1\nBistro\nChef\nCulinary expert needed\nRome\n\
                      2\nAna\n30\nPython data analysis SQL\nOslo\nq\n";
        let output = run_script(&store, script, None).await;

        assert_eq!(output.matches("Company saved.").count(), 2);
        assert!(output.contains("Worker saved."));
        assert!(output.contains("Top 2 Job Matches:"));
        assert!(output.contains("1. Data Analyst at Acme ("));
        assert!(output.contains("2. Chef at Bistro (0% match)"));
        assert_eq!(store.workers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_field_is_reported_not_saved() {
        let store = MemoryRecordStore::new();
        let output = run_script(&store, "1\nAcme\n\nRust\nOslo\nq\n", None).await;

        assert!(output.contains("Not saved: All fields are required (empty: job_type)"));
        assert!(!output.contains("Company saved."));
        assert!(store.companies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_worker_without_companies() {
        let store = MemoryRecordStore::new();
        let output = run_script(&store, "2\nAna\n30\nrust\nOslo\n", None).await;
        assert!(output.contains("No job postings stored yet."));
        assert!(output.ends_with("Bye.\n"));
    }

    #[tokio::test]
    async fn test_invalid_option_and_empty_graph() {
        let store = MemoryRecordStore::new();
        let output = run_script(&store, "7\n3\nq\n", None).await;
        assert!(output.contains("Invalid option."));
        assert!(output.contains("Nothing to draw yet"));
    }

    #[tokio::test]
    async fn test_graph_prints_edges_and_writes_dot() {
        let dir = tempfile::tempdir().unwrap();
        let dot_path = dir.path().join("match_graph.dot");
        let store = MemoryRecordStore::new();
        let script = "1\nAcme\nEngineer\nrust tokio services\nOslo\n\
                      2\nAna\n30\nrust services\nOslo\n3\n";
        let output = run_script(&store, script, Some(dot_path.clone())).await;

        assert!(output.contains("(1 workers, 1 jobs, 1 edges)"));
        assert!(output.contains("Ana -- Acme - Engineer ("));
        let dot = std::fs::read_to_string(dot_path).unwrap();
        assert!(dot.contains("Acme - Engineer"));
    }

    #[tokio::test]
    async fn test_unwritable_dot_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let dot_path = dir.path().join("missing").join("match_graph.dot");
        let store = MemoryRecordStore::new();
        let script = "1\nAcme\nEngineer\nrust tokio services\nOslo\n\
                      2\nAna\n30\nrust services\nOslo\n3\nq\n";
        let output = run_script(&store, script, Some(dot_path)).await;

        assert!(output.contains("Ana -- Acme - Engineer ("));
        assert!(output.contains("Could not write graph file"));
        assert!(output.ends_with("Bye.\n"));
    }

    #[tokio::test]
    async fn test_input_ending_mid_record_stops_cleanly() {
        let store = MemoryRecordStore::new();
        let output = run_script(&store, "1\nAcme\nEngineer\n", None).await;
        assert!(output.ends_with("Bye.\n"));
        assert!(store.companies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_stored_age_reported_and_session_continues() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("workers.csv"),
            "Name,Age,Resume,Location\nAna,twenty,rust,Oslo\n",
        )
        .unwrap();
        let store = CsvRecordStore::open(dir.path()).unwrap();
        let script = "3\n1\nBeta\nEngineer\nrust services\nOslo\nq\n";
        let output = run_script(&store, script, None).await;

        assert!(output.contains("Error in graph: Invalid age 'twenty'"));
        assert!(output.contains("Company saved."));
        assert!(output.ends_with("Bye.\n"));
        assert_eq!(store.companies().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_short_company_row_reported_after_worker_saved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("companies.csv"),
            "Name,Job_type,Description,Location\nAcme,Engineer,rust\n",
        )
        .unwrap();
        let store = CsvRecordStore::open(dir.path()).unwrap();
        let script = "2\nAna\n30\nrust services\nOslo\n7\nq\n";
        let output = run_script(&store, script, None).await;

        assert!(output.contains("Worker saved."));
        assert!(output.contains("Could not load job postings: "));
        assert!(!output.contains("CSV error: CSV error"));
        assert!(output.contains("Invalid option."));
        assert!(output.ends_with("Bye.\n"));
        assert_eq!(store.workers().await.unwrap().len(), 1);
    }
}
