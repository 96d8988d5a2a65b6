//! RayCi remote device interface.
//!
//! [`DeviceApi`] is the seam between the capture logic and the beam profiler.
//! [`RayCiClient`] implements it over XML-RPC; tests implement it in memory.

#![allow(async_fn_in_trait)]

mod client;
mod types;
pub mod xmlrpc;

use std::path::Path;

pub use client::{RayCiClient, DEFAULT_SERVER_URL};
pub use types::{
    AnalysisMethod, CameraControl, CameraInfo, CaptureId, DocId, ExportView, LiveModeEntry,
};

use crate::normalize::RotationMode;

/// Errors from talking to the RayCi server.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid XML in response: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Malformed XML-RPC response: {0}")]
    MalformedResponse(String),

    #[error("RayCi fault {code}: {message}")]
    Fault { code: i64, message: String },

    #[error("Unexpected result from {method}: {reason}")]
    UnexpectedResult { method: String, reason: String },
}

/// Operations the capture pipeline needs from the beam profiler.
///
/// Every method maps to exactly one remote call.
pub trait DeviceApi {
    /// Open live mode documents, including disconnected ones.
    async fn live_modes(&self) -> Result<Vec<LiveModeEntry>, RpcError>;

    /// Camera currently attached to a live mode document.
    async fn current_camera(&self, doc: DocId) -> Result<CameraInfo, RpcError>;

    /// Number of cameras known to the server.
    async fn camera_count(&self) -> Result<i64, RpcError>;

    /// Camera list entry at `index`.
    async fn camera_item(&self, index: i64) -> Result<CameraInfo, RpcError>;

    /// Open a new live mode document for `camera`.
    async fn open_live_mode(&self, camera: &CameraInfo) -> Result<DocId, RpcError>;

    async fn set_automatic(
        &self,
        doc: DocId,
        control: CameraControl,
        automatic: bool,
    ) -> Result<(), RpcError>;

    async fn set_control_value(
        &self,
        doc: DocId,
        control: CameraControl,
        value: f64,
    ) -> Result<(), RpcError>;

    async fn set_pixel_clock_reduce(&self, doc: DocId, reduce: bool) -> Result<(), RpcError>;

    async fn set_horizontal_flip(&self, doc: DocId, flip: bool) -> Result<(), RpcError>;

    async fn set_vertical_flip(&self, doc: DocId, flip: bool) -> Result<(), RpcError>;

    async fn set_rotation(&self, doc: DocId, rotation: RotationMode) -> Result<(), RpcError>;

    /// Take a snapshot of the live mode into a new single document.
    async fn new_snapshot(&self, doc: DocId) -> Result<CaptureId, RpcError>;

    async fn save_as(
        &self,
        capture: CaptureId,
        path: &Path,
        overwrite: bool,
    ) -> Result<(), RpcError>;

    async fn adjust_cross_section(&self, capture: CaptureId, level: i64) -> Result<(), RpcError>;

    async fn set_analysis_method(
        &self,
        capture: CaptureId,
        method: AnalysisMethod,
    ) -> Result<(), RpcError>;

    async fn export_cross_section(
        &self,
        capture: CaptureId,
        path: &Path,
        view: &ExportView,
    ) -> Result<(), RpcError>;

    /// Close every single document, discarding unsaved changes.
    async fn close_all_captures(&self) -> Result<(), RpcError>;
}
