//! In-memory RayCi stand-in that records every call.
//!
//! Saving and exporting create empty files so tests can check what ended up
//! on disk.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use rayci_snap::normalize::RotationMode;
use rayci_snap::rayci::{
    AnalysisMethod, CameraControl, CameraInfo, CaptureId, DeviceApi, DocId, ExportView,
    LiveModeEntry, RpcError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LiveModes,
    CurrentCamera(DocId),
    CameraCount,
    CameraItem(i64),
    OpenLiveMode(String),
    SetAutomatic(DocId, CameraControl, bool),
    SetControlValue(DocId, CameraControl, f64),
    PixelClockReduce(DocId, bool),
    HorizontalFlip(DocId, bool),
    VerticalFlip(DocId, bool),
    Rotation(DocId, RotationMode),
    NewSnapshot(DocId),
    SaveAs(CaptureId, PathBuf, bool),
    AdjustCrossSection(CaptureId, i64),
    SetAnalysisMethod(CaptureId, AnalysisMethod),
    ExportCrossSection(CaptureId, PathBuf, ExportView),
    CloseAllCaptures,
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::LiveModes => "live_modes",
            Call::CurrentCamera(..) => "current_camera",
            Call::CameraCount => "camera_count",
            Call::CameraItem(..) => "camera_item",
            Call::OpenLiveMode(..) => "open_live_mode",
            Call::SetAutomatic(..) => "set_automatic",
            Call::SetControlValue(..) => "set_control_value",
            Call::PixelClockReduce(..) => "set_pixel_clock_reduce",
            Call::HorizontalFlip(..) => "set_horizontal_flip",
            Call::VerticalFlip(..) => "set_vertical_flip",
            Call::Rotation(..) => "set_rotation",
            Call::NewSnapshot(..) => "new_snapshot",
            Call::SaveAs(..) => "save_as",
            Call::AdjustCrossSection(..) => "adjust_cross_section",
            Call::SetAnalysisMethod(..) => "set_analysis_method",
            Call::ExportCrossSection(..) => "export_cross_section",
            Call::CloseAllCaptures => "close_all_captures",
        }
    }
}

pub fn camera(name: &str, id_high: i64, id_low: i64) -> CameraInfo {
    CameraInfo {
        name: name.to_string(),
        id_high,
        id_low,
    }
}

pub struct RecordingDevice {
    /// Open live modes and the camera each one reports
    pub live_modes: Vec<(LiveModeEntry, CameraInfo)>,
    /// The server's camera list
    pub cameras: Vec<CameraInfo>,
    /// Document id handed out by `open_live_mode`
    pub opened_doc: DocId,
    pub snapshot: CaptureId,
    /// Name of the call that should fail with a fault
    pub fail_on: Option<&'static str>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            live_modes: Vec::new(),
            cameras: Vec::new(),
            opened_doc: DocId(100),
            snapshot: CaptureId(500),
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A device with one live mode already streaming from a camera.
    pub fn with_live_camera(doc: i64, name: &str) -> Self {
        let mut device = Self::new();
        device.live_modes.push((
            LiveModeEntry {
                doc: DocId(doc),
                name: format!("{} Live", name),
            },
            camera(name, 1, doc),
        ));
        device
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls.borrow().iter().map(Call::name).collect()
    }

    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c == call)
    }

    fn record(&self, call: Call) -> Result<(), RpcError> {
        let name = call.name();
        self.calls.borrow_mut().push(call);
        if self.fail_on == Some(name) {
            return Err(RpcError::Fault {
                code: 1,
                message: format!("{} failed", name),
            });
        }
        Ok(())
    }

    fn touch(path: &Path) {
        std::fs::write(path, b"").expect("fake device failed to write file");
    }
}

impl DeviceApi for RecordingDevice {
    async fn live_modes(&self) -> Result<Vec<LiveModeEntry>, RpcError> {
        self.record(Call::LiveModes)?;
        Ok(self.live_modes.iter().map(|(e, _)| e.clone()).collect())
    }

    async fn current_camera(&self, doc: DocId) -> Result<CameraInfo, RpcError> {
        self.record(Call::CurrentCamera(doc))?;
        self.live_modes
            .iter()
            .find(|(e, _)| e.doc == doc)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| RpcError::Fault {
                code: 2,
                message: "unknown document".to_string(),
            })
    }

    async fn camera_count(&self) -> Result<i64, RpcError> {
        self.record(Call::CameraCount)?;
        Ok(self.cameras.len() as i64)
    }

    async fn camera_item(&self, index: i64) -> Result<CameraInfo, RpcError> {
        self.record(Call::CameraItem(index))?;
        self.cameras
            .get(index as usize)
            .cloned()
            .ok_or_else(|| RpcError::Fault {
                code: 3,
                message: "index out of range".to_string(),
            })
    }

    async fn open_live_mode(&self, camera: &CameraInfo) -> Result<DocId, RpcError> {
        self.record(Call::OpenLiveMode(camera.name.clone()))?;
        Ok(self.opened_doc)
    }

    async fn set_automatic(
        &self,
        doc: DocId,
        control: CameraControl,
        automatic: bool,
    ) -> Result<(), RpcError> {
        self.record(Call::SetAutomatic(doc, control, automatic))
    }

    async fn set_control_value(
        &self,
        doc: DocId,
        control: CameraControl,
        value: f64,
    ) -> Result<(), RpcError> {
        self.record(Call::SetControlValue(doc, control, value))
    }

    async fn set_pixel_clock_reduce(&self, doc: DocId, reduce: bool) -> Result<(), RpcError> {
        self.record(Call::PixelClockReduce(doc, reduce))
    }

    async fn set_horizontal_flip(&self, doc: DocId, flip: bool) -> Result<(), RpcError> {
        self.record(Call::HorizontalFlip(doc, flip))
    }

    async fn set_vertical_flip(&self, doc: DocId, flip: bool) -> Result<(), RpcError> {
        self.record(Call::VerticalFlip(doc, flip))
    }

    async fn set_rotation(&self, doc: DocId, rotation: RotationMode) -> Result<(), RpcError> {
        self.record(Call::Rotation(doc, rotation))
    }

    async fn new_snapshot(&self, doc: DocId) -> Result<CaptureId, RpcError> {
        self.record(Call::NewSnapshot(doc))?;
        Ok(self.snapshot)
    }

    async fn save_as(
        &self,
        capture: CaptureId,
        path: &Path,
        overwrite: bool,
    ) -> Result<(), RpcError> {
        self.record(Call::SaveAs(capture, path.to_path_buf(), overwrite))?;
        Self::touch(path);
        Ok(())
    }

    async fn adjust_cross_section(&self, capture: CaptureId, level: i64) -> Result<(), RpcError> {
        self.record(Call::AdjustCrossSection(capture, level))
    }

    async fn set_analysis_method(
        &self,
        capture: CaptureId,
        method: AnalysisMethod,
    ) -> Result<(), RpcError> {
        self.record(Call::SetAnalysisMethod(capture, method))
    }

    async fn export_cross_section(
        &self,
        capture: CaptureId,
        path: &Path,
        view: &ExportView,
    ) -> Result<(), RpcError> {
        self.record(Call::ExportCrossSection(
            capture,
            path.to_path_buf(),
            view.clone(),
        ))?;
        Self::touch(path);
        Ok(())
    }

    async fn close_all_captures(&self) -> Result<(), RpcError> {
        self.record(Call::CloseAllCaptures)
    }
}
