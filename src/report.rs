//! Human-readable timing output and the append-only CSV result log.
//!
//! All durations are reported in whole microseconds.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::io::FileReport;

/// Write the per-stage timing table for one run.
///
/// # Errors
/// Returns `Error::Io` if `out` cannot be written.
pub fn print_timings<W: Write>(out: &mut W, report: &FileReport) -> Result<()> {
    let rows = [
        ("Reading the file", report.reading),
        ("Counting the characters", report.stages.counting),
        ("Building the Huffman tree", report.stages.tree),
        ("Deriving the codes", report.stages.codes),
        ("Encoding the bit stream", report.stages.encoding),
        ("Packing the bytes", report.stages.packing),
        ("Writing the compressed file", report.writing),
    ];
    for (label, d) in rows {
        writeln!(out, "{label:<40}{:>15} usec", d.as_micros())?;
    }
    writeln!(out)?;
    writeln!(out, "{:<40}{:>15} usec", "Total time", report.total.as_micros())?;
    writeln!(
        out,
        "{:<40}{:>15} usec",
        "Total time (no IO)",
        report.total_no_io().as_micros()
    )?;
    writeln!(
        out,
        "{:<40}{:>15}",
        "Compression ratio",
        format!("{} -> {} bytes", report.input_len, report.output_len)
    )?;
    Ok(())
}

/// Format the two CSV result rows for a run with `workers` workers.
pub fn csv_rows(workers: usize, report: &FileReport) -> String {
    format!(
        "Completion time,{workers},{}\nCompletion time (no IO),{workers},{}\n",
        report.total.as_micros(),
        report.total_no_io().as_micros()
    )
}

/// Append the run's result rows to the CSV file at `path`, creating it if
/// needed.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be opened or written.
pub fn append_csv(path: &Path, workers: usize, report: &FileReport) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(csv_rows(workers, report).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::StageTimings;
    use std::time::Duration;

    fn sample() -> FileReport {
        FileReport {
            input_len: 100,
            output_len: 60,
            reading: Duration::from_micros(7),
            writing: Duration::from_micros(3),
            stages: StageTimings {
                counting: Duration::from_micros(10),
                tree: Duration::from_micros(12),
                codes: Duration::from_micros(8),
                encoding: Duration::from_micros(30),
                packing: Duration::from_micros(40),
            },
            total: Duration::from_micros(115),
        }
    }

    #[test]
    fn test_csv_rows() {
        assert_eq!(
            csv_rows(4, &sample()),
            "Completion time,4,115\nCompletion time (no IO),4,100\n"
        );
    }

    #[test]
    fn test_append_csv_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        append_csv(&path, 2, &sample()).unwrap();
        append_csv(&path, 8, &sample()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(text.lines().nth(2), Some("Completion time,8,115"));
    }

    #[test]
    fn test_print_timings_has_totals() {
        let mut out = Vec::new();
        print_timings(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total time (no IO)"));
        assert!(text.contains("100 usec"));
        assert!(text.contains("115 usec"));
    }

    #[test]
    fn test_tree_and_codes_reported_separately() {
        let mut out = Vec::new();
        print_timings(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = |label: &str| {
            text.lines()
                .find(|l| l.starts_with(label))
                .map(str::to_owned)
                .unwrap()
        };
        assert!(row("Building the Huffman tree").contains("12 usec"));
        assert!(row("Deriving the codes").contains("8 usec"));
    }
}
