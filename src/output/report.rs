use crate::crawler::Frontier;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Final account of a mirror run.
///
/// Generated once from a snapshot of the frontier's terminal state and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct MirrorReport {
    pub target_url: String,
    pub generated_at: DateTime<Local>,
    /// Sorted list of successfully saved URLs
    pub saved: Vec<String>,
    /// Sorted list of terminally failed URLs
    pub failed: Vec<String>,
}

impl MirrorReport {
    /// Snapshots the frontier's saved/failed sets, sorted for stable output
    pub fn from_frontier(target_url: &str, frontier: &Frontier) -> Self {
        let (saved, failed) = frontier.snapshot();
        Self {
            target_url: target_url.to_string(),
            generated_at: Local::now(),
            saved,
            failed,
        }
    }

    /// Renders the human-readable report body
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("Website Mirror Report\n");
        out.push_str(&"=".repeat(50));
        out.push('\n');
        out.push_str(&format!("Target site: {}\n", self.target_url));
        out.push_str(&format!(
            "Generated:   {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("Saved:  {} files\n", self.saved.len()));
        out.push_str(&format!("Failed: {} files\n", self.failed.len()));

        out.push_str("\nSaved URLs:\n");
        out.push_str(&"-".repeat(30));
        out.push('\n');
        for url in &self.saved {
            out.push_str(url);
            out.push('\n');
        }

        if !self.failed.is_empty() {
            out.push_str("\nFailed URLs:\n");
            out.push_str(&"-".repeat(30));
            out.push('\n');
            for url in &self.failed {
                out.push_str(url);
                out.push('\n');
            }
        }

        out
    }

    /// Writes `clone_report.txt` at the output root and returns its path
    pub fn write(&self, output_dir: &Path) -> std::io::Result<PathBuf> {
        let path = output_dir.join("clone_report.txt");
        std::fs::write(&path, self.render())?;
        Ok(path)
    }
}
