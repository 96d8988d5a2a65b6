//! Choosing the live mode document the snapshot is taken from.

use crate::rayci::{CameraInfo, DeviceApi, DocId, RpcError};

/// Live mode name RayCi reports for a window without a camera.
pub const NOT_CONNECTED: &str = "not connected";

/// Pseudo-camera RayCi offers for video playback.
pub const VIDEO_STREAM: &str = "Video Stream";

/// A live mode document bound to a physical camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSession {
    pub doc: DocId,
    pub camera_name: String,
    /// Name shown to the user: the live mode's name when reused, the
    /// camera's name when opened.
    pub display_name: String,
}

/// How the session was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionChoice {
    /// An already open live mode was reused.
    Reused(CameraSession),
    /// No usable live mode existed, so one was opened.
    Opened(CameraSession),
}

impl SessionChoice {
    pub fn session(&self) -> &CameraSession {
        match self {
            SessionChoice::Reused(s) | SessionChoice::Opened(s) => s,
        }
    }

    pub fn was_opened(&self) -> bool {
        matches!(self, SessionChoice::Opened(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No camera found. Connect a camera and make sure RayCi detects it.")]
    NoCameraFound,

    #[error(transparent)]
    Device(#[from] RpcError),
}

/// Pick the live mode to capture from.
///
/// Reuses the first open live mode that is connected to a real camera. When
/// there is none, opens a live mode for the first entry of the camera list.
pub async fn select_session<D: DeviceApi>(api: &D) -> Result<SessionChoice, SessionError> {
    for entry in api.live_modes().await? {
        if entry.name == NOT_CONNECTED {
            continue;
        }
        let camera = api.current_camera(entry.doc).await?;
        if camera.name == VIDEO_STREAM {
            log::debug!("Skipping live mode {} (video stream)", entry.doc);
            continue;
        }

        println!("Using camera {}", entry.name);
        log::info!("Reusing live mode {} ({})", entry.doc, camera.name);
        return Ok(SessionChoice::Reused(CameraSession {
            doc: entry.doc,
            camera_name: camera.name,
            display_name: entry.name,
        }));
    }

    if api.camera_count().await? <= 0 {
        return Err(SessionError::NoCameraFound);
    }

    let camera = api.camera_item(0).await?;
    let doc = api.open_live_mode(&camera).await?;
    println!("Opened new live mode.");
    println!("Using camera {}", camera.name);
    log::info!("Opened live mode {} for {}", doc, camera);

    Ok(SessionChoice::Opened(CameraSession {
        doc,
        display_name: camera.name.clone(),
        camera_name: camera.name,
    }))
}

/// List every camera the server knows about.
pub async fn list_cameras<D: DeviceApi>(api: &D) -> Result<Vec<CameraInfo>, RpcError> {
    let count = api.camera_count().await?;
    let mut cameras = Vec::with_capacity(count.max(0) as usize);
    for index in 0..count {
        cameras.push(api.camera_item(index).await?);
    }
    Ok(cameras)
}
