//! Receipt output. The default printer drops an HTML file per sale into a
//! directory the till's print spooler (or a browser) picks up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Destination for rendered receipts.
pub trait ReceiptPrinter: Send + Sync {
    /// Hands `html` to the printer and returns where it ended up.
    fn print(&self, order_id: &str, html: &str) -> io::Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct FileReceiptPrinter {
    dir: PathBuf,
}

impl FileReceiptPrinter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileReceiptPrinter { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReceiptPrinter for FileReceiptPrinter {
    fn print(&self, order_id: &str, html: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        // Ids are uuids, but never let one escape the directory
        let file_name: String = order_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        let path = self.dir.join(format!("comprovante-{}.html", file_name));

        fs::write(&path, html)?;
        debug!(path = %path.display(), "Receipt written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_receipt_file() {
        let dir = tempfile::tempdir().unwrap();
        let printer = FileReceiptPrinter::new(dir.path().join("receipts"));

        let path = printer.print("3f2a-9b", "<html>ok</html>").unwrap();

        assert_eq!(path, dir.path().join("receipts").join("comprovante-3f2a-9b.html"));
        assert_eq!(fs::read_to_string(path).unwrap(), "<html>ok</html>");
    }

    #[test]
    fn test_sanitizes_order_id() {
        let dir = tempfile::tempdir().unwrap();
        let printer = FileReceiptPrinter::new(dir.path());

        let path = printer.print("../../etc/passwd", "x").unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
    }
}
