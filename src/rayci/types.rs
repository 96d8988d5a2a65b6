//! Typed views of the values RayCi returns.

use std::fmt;

use super::xmlrpc::Value;
use super::RpcError;

/// Id of a RayCi document (a live mode window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocId(pub i64);

/// Id of a single (snapshot) document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureId(pub i64);

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CaptureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entry of `RayCi.LiveMode.list`.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveModeEntry {
    pub doc: DocId,
    /// Window name; `"not connected"` when no camera is attached
    pub name: String,
}

/// A camera as described by the camera list.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraInfo {
    pub name: String,
    pub id_high: i64,
    pub id_low: i64,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.id_high, self.id_low)
    }
}

/// Camera controls that have an automatic mode and a manual magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraControl {
    ExposureTime,
    Gain,
    FrameRate,
}

impl CameraControl {
    /// Path segment under `RayCi.LiveMode.Camera`.
    pub fn namespace(self) -> &'static str {
        match self {
            CameraControl::ExposureTime => "ExposureTime",
            CameraControl::Gain => "Gain",
            CameraControl::FrameRate => "FrameRate",
        }
    }

    /// Name of the magnitude setter.
    pub fn setter(self) -> &'static str {
        match self {
            CameraControl::ExposureTime => "setExposureTime",
            CameraControl::Gain => "setGain",
            CameraControl::FrameRate => "setFrameRate",
        }
    }
}

impl fmt::Display for CameraControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraControl::ExposureTime => write!(f, "exposure time"),
            CameraControl::Gain => write!(f, "gain"),
            CameraControl::FrameRate => write!(f, "frame rate"),
        }
    }
}

/// Beam analysis methods of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMethod {
    GaussianFit,
}

impl AnalysisMethod {
    pub fn code(self) -> i64 {
        match self {
            AnalysisMethod::GaussianFit => 3,
        }
    }
}

/// Parameters of a cross-section view export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportView {
    pub width: u32,
    pub height: u32,
    pub palette: String,
}

fn struct_str(value: &Value, key: &str, method: &str) -> Result<String, RpcError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing_member(value, key, method))
}

fn struct_int(value: &Value, key: &str, method: &str) -> Result<i64, RpcError> {
    value
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| missing_member(value, key, method))
}

fn missing_member(value: &Value, key: &str, method: &str) -> RpcError {
    RpcError::UnexpectedResult {
        method: method.to_string(),
        reason: format!("{} has no usable member '{}'", value.type_name(), key),
    }
}

impl LiveModeEntry {
    pub(crate) fn from_value(value: &Value, method: &str) -> Result<Self, RpcError> {
        Ok(Self {
            doc: DocId(struct_int(value, "nIdDoc", method)?),
            name: struct_str(value, "sName", method)?,
        })
    }
}

impl CameraInfo {
    /// Parse a camera struct. Ids are absent for the current-camera query.
    pub(crate) fn from_value(value: &Value, method: &str) -> Result<Self, RpcError> {
        Ok(Self {
            name: struct_str(value, "sName", method)?,
            id_high: value.get("nIdCamHigh").and_then(Value::as_i64).unwrap_or_default(),
            id_low: value.get("nIdCamLow").and_then(Value::as_i64).unwrap_or_default(),
        })
    }
}
