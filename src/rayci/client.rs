//! RayCiClient - XML-RPC client for the RayCi remote interface.

use std::path::Path;
use std::time::Duration;

use super::types::{
    AnalysisMethod, CameraControl, CameraInfo, CaptureId, DocId, ExportView, LiveModeEntry,
};
use super::xmlrpc::{self, Value};
use super::{DeviceApi, RpcError};
use crate::normalize::RotationMode;

/// Default address of the RayCi remote interface.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/";

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the RayCi XML-RPC server.
pub struct RayCiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl RayCiClient {
    /// Create a client for a server at `base_url`.
    ///
    /// Requests have no overall timeout: the device decides how long a
    /// snapshot takes.
    pub fn with_base_url(base_url: String) -> Result<Self, RpcError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: String, timeout: Option<Duration>) -> Result<Self, RpcError> {
        let mut builder = reqwest::Client::builder().connect_timeout(DEFAULT_CONNECT_TIMEOUT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            http_client: builder.build()?,
        })
    }

    /// Get the server URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke `method` with `params` and return its result value.
    ///
    /// # Errors
    ///
    /// Returns `RpcError::HttpError` if the request cannot be sent,
    /// `RpcError::HttpStatus` for a non-success status,
    /// `RpcError::Fault` if the server reports a fault, or
    /// `RpcError::MalformedResponse`/`RpcError::XmlError` if the body is not a
    /// valid XML-RPC response.
    pub async fn call(&self, method: &str, params: &[Value]) -> Result<Value, RpcError> {
        log::debug!("XML-RPC call {} ({} params)", method, params.len());

        let response = self
            .http_client
            .post(&self.base_url)
            .header("Content-Type", "text/xml")
            .body(xmlrpc::encode_call(method, params))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RpcError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let result = xmlrpc::decode_response(&body);
        if let Err(RpcError::Fault { code, message }) = &result {
            log::warn!("{} failed with fault {}: {}", method, code, message);
        }
        result
    }

    async fn call_int(&self, method: &str, params: &[Value]) -> Result<i64, RpcError> {
        let value = self.call(method, params).await?;
        value.as_i64().ok_or_else(|| RpcError::UnexpectedResult {
            method: method.to_string(),
            reason: format!("expected int, got {}", value.type_name()),
        })
    }

    async fn call_void(&self, method: &str, params: &[Value]) -> Result<(), RpcError> {
        self.call(method, params).await.map(|_| ())
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

impl DeviceApi for RayCiClient {
    async fn live_modes(&self) -> Result<Vec<LiveModeEntry>, RpcError> {
        const METHOD: &str = "RayCi.LiveMode.list";
        let value = self.call(METHOD, &[]).await?;
        let items = value.as_array().ok_or_else(|| RpcError::UnexpectedResult {
            method: METHOD.to_string(),
            reason: format!("expected array, got {}", value.type_name()),
        })?;
        items
            .iter()
            .map(|item| LiveModeEntry::from_value(item, METHOD))
            .collect()
    }

    async fn current_camera(&self, doc: DocId) -> Result<CameraInfo, RpcError> {
        const METHOD: &str = "RayCi.LiveMode.Camera.getIdCurrentCam";
        let value = self.call(METHOD, &[Value::from(doc.0)]).await?;
        CameraInfo::from_value(&value, METHOD)
    }

    async fn camera_count(&self) -> Result<i64, RpcError> {
        self.call_int("RayCi.LiveMode.Camera.getIdCamListSize", &[])
            .await
    }

    async fn camera_item(&self, index: i64) -> Result<CameraInfo, RpcError> {
        const METHOD: &str = "RayCi.LiveMode.Camera.getIdCamListItem";
        let value = self
            .call(METHOD, &[Value::from(-1), Value::from(index)])
            .await?;
        CameraInfo::from_value(&value, METHOD)
    }

    async fn open_live_mode(&self, camera: &CameraInfo) -> Result<DocId, RpcError> {
        self.call_int(
            "RayCi.LiveMode.open",
            &[Value::from(camera.id_high), Value::from(camera.id_low)],
        )
        .await
        .map(DocId)
    }

    async fn set_automatic(
        &self,
        doc: DocId,
        control: CameraControl,
        automatic: bool,
    ) -> Result<(), RpcError> {
        let method = format!("RayCi.LiveMode.Camera.{}.setAutomatic", control.namespace());
        self.call_void(&method, &[Value::from(doc.0), Value::from(automatic)])
            .await
    }

    async fn set_control_value(
        &self,
        doc: DocId,
        control: CameraControl,
        value: f64,
    ) -> Result<(), RpcError> {
        let method = format!(
            "RayCi.LiveMode.Camera.{}.{}",
            control.namespace(),
            control.setter()
        );
        self.call_void(&method, &[Value::from(doc.0), Value::from(value)])
            .await
    }

    async fn set_pixel_clock_reduce(&self, doc: DocId, reduce: bool) -> Result<(), RpcError> {
        self.call_void(
            "RayCi.LiveMode.Camera.PixelClock.setReduce",
            &[Value::from(doc.0), Value::from(reduce)],
        )
        .await
    }

    async fn set_horizontal_flip(&self, doc: DocId, flip: bool) -> Result<(), RpcError> {
        self.call_void(
            "RayCi.LiveMode.Processing.Transform.setHorizontalFlip",
            &[Value::from(doc.0), Value::from(flip)],
        )
        .await
    }

    async fn set_vertical_flip(&self, doc: DocId, flip: bool) -> Result<(), RpcError> {
        self.call_void(
            "RayCi.LiveMode.Processing.Transform.setVerticalFlip",
            &[Value::from(doc.0), Value::from(flip)],
        )
        .await
    }

    async fn set_rotation(&self, doc: DocId, rotation: RotationMode) -> Result<(), RpcError> {
        self.call_void(
            "RayCi.LiveMode.Processing.Transform.Rotate.setMethod",
            &[Value::from(doc.0), Value::from(rotation.code())],
        )
        .await
    }

    async fn new_snapshot(&self, doc: DocId) -> Result<CaptureId, RpcError> {
        self.call_int(
            "RayCi.LiveMode.Measurement.newSnapshot",
            &[Value::from(doc.0)],
        )
        .await
        .map(CaptureId)
    }

    async fn save_as(
        &self,
        capture: CaptureId,
        path: &Path,
        overwrite: bool,
    ) -> Result<(), RpcError> {
        self.call_void(
            "RayCi.Single.saveAs",
            &[
                Value::from(capture.0),
                path_value(path),
                Value::from(overwrite),
            ],
        )
        .await
    }

    async fn adjust_cross_section(&self, capture: CaptureId, level: i64) -> Result<(), RpcError> {
        self.call_void(
            "RayCi.Single.CrossSection.Adjustment.adjust",
            &[Value::from(capture.0), Value::from(level)],
        )
        .await
    }

    async fn set_analysis_method(
        &self,
        capture: CaptureId,
        method: AnalysisMethod,
    ) -> Result<(), RpcError> {
        self.call_void(
            "RayCi.Single.Analysis.Settings.setMethod",
            &[Value::from(capture.0), Value::from(method.code())],
        )
        .await
    }

    async fn export_cross_section(
        &self,
        capture: CaptureId,
        path: &Path,
        view: &ExportView,
    ) -> Result<(), RpcError> {
        self.call_void(
            "RayCi.Single.CrossSection.View.exportView",
            &[
                Value::from(capture.0),
                Value::from(0),
                path_value(path),
                Value::from(view.width as i64),
                Value::from(view.height as i64),
                Value::from(view.palette.as_str()),
            ],
        )
        .await
    }

    async fn close_all_captures(&self) -> Result<(), RpcError> {
        self.call_void("RayCi.Single.closeAll", &[Value::from(true)])
            .await
    }
}
