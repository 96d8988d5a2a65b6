//! The capture run: select a session, configure it, save a snapshot and
//! optionally export its histogram.

use std::path::PathBuf;

use crate::capture::{self, CapturePlan, NamingRequest, PlanError};
use crate::config::Config;
use crate::configure::{self, DeviceSettings};
use crate::histogram::{self, HistogramOptions};
use crate::rayci::{DeviceApi, RpcError};
use crate::session::{self, SessionChoice, SessionError};

/// A fully validated capture request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptureRequest {
    pub settings: DeviceSettings,
    pub naming: NamingRequest,
    /// `None` when no histogram was requested
    pub histogram: Option<HistogramOptions>,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub session: SessionChoice,
    pub saved_path: PathBuf,
    pub histogram_path: Option<PathBuf>,
}

/// Errors that end a capture run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("RayCi request failed: {0}")]
    Device(#[from] RpcError),
}

/// Run one capture against the device.
///
/// The save path is resolved before the first device call, so a request that
/// names no file never touches the camera. Single documents are closed only
/// when everything succeeded.
pub async fn run<D: DeviceApi>(
    api: &D,
    request: &CaptureRequest,
    config: &Config,
) -> Result<RunOutcome, PipelineError> {
    let plan = CapturePlan::resolve(&request.naming, &config.capture.default_directory)?;
    log::debug!("Capture plan: {}", plan.save_path.display());

    let choice = session::select_session(api).await?;
    let doc = choice.session().doc;

    configure::apply_settings(api, doc, &request.settings).await?;

    let saved = capture::capture_and_save(api, doc, &plan).await?;

    let histogram_path = match request.histogram {
        Some(options) => Some(
            histogram::export_histogram(
                api,
                saved.capture,
                &saved.path,
                options,
                &config.histogram.export_view(),
            )
            .await?,
        ),
        None => None,
    };

    api.close_all_captures().await?;

    Ok(RunOutcome {
        session: choice,
        saved_path: saved.path,
        histogram_path,
    })
}
