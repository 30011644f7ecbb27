//! # Report — Finding Log and Bilingual Report Files
//!
//! The presentation layer: everything here consumes [`scan::Finding`]
//! records and owns its own formatting and file I/O. The scan core never
//! writes files.
//!
//! Two sinks:
//!
//! - [`FindingLog`] — append-only CSV log (`timestamp,q,n,digits`), one line
//!   per finding, used by the `solve` subcommand.
//! - [`CertificateWriter`] — per-finding bilingual certificate file pairs
//!   plus a final bilingual scan report, used by the `titanic` subcommand.
//!   File names follow `<stem>-results-<name>-<lang>.txt`.

use anyhow::{Context, Result};
use chrono::Utc;
use rug::Integer;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

use crate::certificate::{Certificate, Lang};
use crate::scan::Finding;
use crate::{qn, FindingSink};

/// Append-only CSV log of findings.
pub struct FindingLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FindingLog {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open findings log {}", path.display()))?;
        Ok(FindingLog {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FindingSink for FindingLog {
    fn record(&self, finding: &Finding) -> Result<()> {
        let mut file = self.file.lock().unwrap();
        writeln!(
            file,
            "{},{},{},{}",
            Utc::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            finding.q,
            finding.n,
            finding.digit_count
        )?;
        Ok(())
    }
}

/// Per-language summary lines accumulated across one scan.
#[derive(Default)]
struct SummaryLines {
    en: Vec<String>,
    zh: Vec<String>,
    found: u64,
}

/// Writes bilingual certificate pairs per finding and a final scan report.
///
/// The candidate value is recomputed from (q, n) at presentation time; the
/// scan core hands over only the finding record.
pub struct CertificateWriter {
    out_dir: PathBuf,
    stem: String,
    family_base: Integer,
    summary: Mutex<SummaryLines>,
}

impl CertificateWriter {
    /// `stem` prefixes every file name; `family_base` is the base the
    /// offset display is relative to (20^100 for the titanic family).
    pub fn new(out_dir: &Path, stem: &str, family_base: Integer) -> Result<Self> {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("cannot create output dir {}", out_dir.display()))?;
        Ok(CertificateWriter {
            out_dir: out_dir.to_path_buf(),
            stem: stem.to_string(),
            family_base,
            summary: Mutex::new(SummaryLines::default()),
        })
    }

    /// Offset of q above the family base, when it fits.
    fn offset_of(&self, q: &Integer) -> Option<u64> {
        let diff = Integer::from(q - &self.family_base);
        if diff < 0u32 {
            return None;
        }
        diff.to_u64()
    }

    fn write_dual(&self, name: &str, en: &str, zh: &str) -> Result<()> {
        for (lang, content) in [(Lang::En, en), (Lang::ZhCn, zh)] {
            let file_name = format!("{}-results-{}-{}.txt", self.stem, name, lang.file_suffix());
            let path = self.out_dir.join(&file_name);
            std::fs::write(&path, content)
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
        info!(name, "certificate files written");
        Ok(())
    }

    /// Write the final bilingual scan report. Call once, after the scan.
    pub fn write_summary(&self, elapsed: Duration) -> Result<()> {
        let summary = self.summary.lock().unwrap();
        let en = format!(
            "\nSCAN COMPLETE\nTime: {:.2}s\nTotal Probable Primes Found: {}\n\
             ================================\n{}\n",
            elapsed.as_secs_f64(),
            summary.found,
            summary.en.join("\n"),
        );
        let zh = format!(
            "\n扫描完成\n耗时: {:.2}秒\n发现可能素数总数: {}\n\
             ================================\n{}\n",
            elapsed.as_secs_f64(),
            summary.found,
            summary.zh.join("\n"),
        );
        drop(summary);
        self.write_dual("Scan_Report", &en, &zh)
    }
}

impl FindingSink for CertificateWriter {
    fn record(&self, finding: &Finding) -> Result<()> {
        let value = qn::value(&finding.q, finding.n);
        let offset = self.offset_of(&finding.q);
        let cert = Certificate::new(&finding.q, offset, finding.n, &value);

        let name = match offset {
            Some(offset) => format!("Cert_Offset{}_n{}", offset, finding.n),
            None => format!("Cert_q{}_n{}", finding.q, finding.n),
        };
        let en = format!("{}\n\nFULL VALUE:\n{}", cert.render(Lang::En), cert.value());
        let zh = format!("{}\n\n完整数值:\n{}", cert.render(Lang::ZhCn), cert.value());
        self.write_dual(&name, &en, &zh)?;

        let mut summary = self.summary.lock().unwrap();
        summary.found += 1;
        match offset {
            Some(offset) => {
                summary.en.push(format!(
                    "Offset {}, n={}: {} digits (See {})",
                    offset, finding.n, finding.digit_count, name
                ));
                summary.zh.push(format!(
                    "偏移量 {}, n={}: {} 位 (查看 {})",
                    offset, finding.n, finding.digit_count, name
                ));
            }
            None => {
                summary.en.push(format!(
                    "q={}, n={}: {} digits (See {})",
                    finding.q, finding.n, finding.digit_count, name
                ));
                summary.zh.push(format!(
                    "q={}, n={}: {} 位 (查看 {})",
                    finding.q, finding.n, finding.digit_count, name
                ));
            }
        }
        Ok(())
    }
}
