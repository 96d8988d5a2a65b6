//! Applying normalized settings to a live mode.

use crate::normalize::{RotationMode, Setting};
use crate::rayci::{CameraControl, DeviceApi, DocId, RpcError};

/// Everything the configurator sends to the camera.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceSettings {
    pub exposure: Setting<f64>,
    pub gain: Setting<f64>,
    pub frame_rate: Setting<f64>,
    pub reduce_pixel_clock: bool,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub rotation: RotationMode,
}

/// Send every setting to the live mode, one call each.
///
/// Stops at the first failing call; earlier settings stay applied.
pub async fn apply_settings<D: DeviceApi>(
    api: &D,
    doc: DocId,
    settings: &DeviceSettings,
) -> Result<(), RpcError> {
    apply_control(api, doc, CameraControl::ExposureTime, settings.exposure).await?;
    apply_control(api, doc, CameraControl::Gain, settings.gain).await?;
    apply_control(api, doc, CameraControl::FrameRate, settings.frame_rate).await?;

    api.set_pixel_clock_reduce(doc, settings.reduce_pixel_clock)
        .await?;
    api.set_horizontal_flip(doc, settings.flip_horizontal).await?;
    api.set_vertical_flip(doc, settings.flip_vertical).await?;
    api.set_rotation(doc, settings.rotation).await?;

    log::info!(
        "Configured live mode {}: exposure={} gain={} fps={} rotation={}",
        doc,
        settings.exposure,
        settings.gain,
        settings.frame_rate,
        settings.rotation
    );
    Ok(())
}

/// Automatic mode must be switched off before a magnitude is accepted.
async fn apply_control<D: DeviceApi>(
    api: &D,
    doc: DocId,
    control: CameraControl,
    setting: Setting<f64>,
) -> Result<(), RpcError> {
    match setting {
        Setting::Auto => api.set_automatic(doc, control, true).await,
        Setting::Manual(value) => {
            api.set_automatic(doc, control, false).await?;
            log::debug!("Setting {} to {}", control, value);
            api.set_control_value(doc, control, value).await
        }
    }
}
