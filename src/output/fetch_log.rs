use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Append-only log of every fetch attempt, one line each, kept at the
/// output root alongside the mirrored tree.
#[derive(Debug)]
pub struct FetchLog {
    writer: Mutex<BufWriter<File>>,
}

impl FetchLog {
    pub const FILE_NAME: &'static str = "mirror.log";

    /// Creates (or truncates) the log file under the output root
    pub fn create(output_dir: &Path) -> std::io::Result<Self> {
        let file = File::create(output_dir.join(Self::FILE_NAME))?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn record_saved(&self, url: &str, local_path: &Path) {
        self.write_line(&format!("SAVED  {} -> {}", url, local_path.display()));
    }

    pub fn record_failed(&self, url: &str, error: &str) {
        self.write_line(&format!("FAILED {}: {}", url, error));
    }

    fn write_line(&self, line: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut writer = self.writer.lock().unwrap();
        // A lost log line must never fail the crawl
        let _ = writeln!(writer, "{} {}", stamp, line);
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_one_line_per_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let log = FetchLog::create(dir.path()).unwrap();

        log.record_saved("https://example.com/", Path::new("/out/index.html"));
        log.record_failed("https://example.com/x.css", "HTTP 500");

        let contents = std::fs::read_to_string(dir.path().join(FetchLog::FILE_NAME)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("SAVED  https://example.com/ -> /out/index.html"));
        assert!(lines[1].contains("FAILED https://example.com/x.css: HTTP 500"));
    }
}
