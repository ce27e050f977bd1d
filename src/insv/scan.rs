//! Header-only enumeration of frames, for one or many files.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::InsvError;

use super::{FrameCount, FrameType, InsvMetadata, Layout};

/// Frame counts per type for a single file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary {
    pub path: Option<PathBuf>,
    pub counts: BTreeMap<FrameType, FrameCount>,
    /// Bytes not covered by any frame.
    pub residual_bytes: u64,
    pub layout: Layout,
}

impl ScanSummary {
    pub fn new(path: &Path) -> Result<Self, InsvError> {
        InsvMetadata::scan(path)
    }

    pub fn total_frames(&self) -> usize {
        self.counts.values().map(|c| c.frames).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.counts.values().map(|c| c.bytes).sum()
    }

    pub fn count(&self, frame_type: &FrameType) -> Option<&FrameCount> {
        self.counts.get(frame_type)
    }
}

impl From<&InsvMetadata> for ScanSummary {
    fn from(insv: &InsvMetadata) -> Self {
        Self {
            path: insv.source.to_owned(),
            counts: insv.frame_counts(),
            residual_bytes: insv.residual_bytes(),
            layout: insv.layout,
        }
    }
}

impl Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(p) => writeln!(f, "{}:", p.display())?,
            None => writeln!(f, "<input>:")?,
        }

        let (known, unknown): (Vec<_>, Vec<_>) = self.counts.iter()
            .partition(|(ft, _)| ft.is_known());

        for (ft, count) in known.iter() {
            writeln!(
                f,
                "  {:>3}: {:<20} {:>6} frames {:>10} bytes",
                ft.code().unwrap_or_default(),
                ft.to_string(),
                count.frames,
                count.bytes
            )?;
        }
        if !unknown.is_empty() {
            writeln!(f, "  Unknown:")?;
            for (ft, count) in unknown.iter() {
                writeln!(
                    f,
                    "  {:>3}: {:<20} {:>6} frames {:>10} bytes",
                    ft.code().unwrap_or_default(),
                    "???",
                    count.frames,
                    count.bytes
                )?;
            }
        }
        if self.residual_bytes > 0 {
            writeln!(f, "  Residual: {} bytes", self.residual_bytes)?;
        }
        write!(
            f,
            "  Total: {} frames, {} bytes ({} known types, {} unknown, {} layout)",
            self.total_frames(),
            self.total_bytes(),
            known.len(),
            unknown.len(),
            self.layout
        )
    }
}

/// Scan files in parallel. Results are returned in input order.
pub fn scan_files(paths: &[PathBuf], progress: bool) -> Vec<(PathBuf, Result<ScanSummary, InsvError>)> {
    let progress = progress.then(|| ProgressBar::new(paths.len() as u64));

    let results = paths.par_iter()
        .map(|path| (path.to_owned(), ScanSummary::new(path)))
        .inspect(|_| if let Some(p) = &progress {
            p.inc(1)
        })
        .collect();

    if let Some(p) = progress {
        p.finish_and_clear();
    }

    results
}
