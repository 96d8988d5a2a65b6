//! Cross-section histogram export for a saved snapshot.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::rayci::{AnalysisMethod, CaptureId, DeviceApi, ExportView, RpcError};

/// Appended to the snapshot path to name the histogram image.
pub const HISTOGRAM_SUFFIX: &str = "-histogram.png";

/// Histogram export options from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistogramOptions {
    /// Switch the analysis to a Gaussian fit before exporting
    pub gaussian: bool,
}

/// `<save_path>-histogram.png`, appended to the full path including any
/// extension.
pub fn histogram_path(save_path: &Path) -> PathBuf {
    let mut raw: OsString = save_path.as_os_str().to_owned();
    raw.push(HISTOGRAM_SUFFIX);
    PathBuf::from(raw)
}

/// Export the cross-section view of `capture` next to its snapshot.
pub async fn export_histogram<D: DeviceApi>(
    api: &D,
    capture: CaptureId,
    save_path: &Path,
    options: HistogramOptions,
    view: &ExportView,
) -> Result<PathBuf, RpcError> {
    let path = histogram_path(save_path);

    api.adjust_cross_section(capture, 0).await?;
    if options.gaussian {
        api.set_analysis_method(capture, AnalysisMethod::GaussianFit)
            .await?;
    }
    api.export_cross_section(capture, &path, view).await?;

    println!(
        "The histogram has been successfully saved to: {}",
        path.display()
    );
    log::info!(
        "Histogram of snapshot {} exported at {}x{}",
        capture,
        view.width,
        view.height
    );
    Ok(path)
}
