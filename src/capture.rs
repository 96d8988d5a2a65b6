//! Deciding where a snapshot is saved, then taking and saving it.

use std::path::{Component, Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

use crate::rayci::{CaptureId, DeviceApi, DocId, RpcError};

/// Length of the alphanumeric tail appended to generated names.
const RANDOM_SUFFIX_LEN: usize = 8;

/// The naming inputs taken from the command line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamingRequest {
    pub random: bool,
    pub directory: Option<PathBuf>,
    pub snapshot: Option<String>,
}

/// Where the snapshot will be written.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturePlan {
    pub save_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("No picture taken. Specify the file name (-s/--snapshot) or use random names (-r/--random true).")]
    NothingToSave,

    #[error("No picture taken. A directory alone is not enough; set the file name with -s/--snapshot or use -r/--random true.")]
    DirectoryWithoutName { directory: PathBuf },

    #[error("No picture taken. The file name '{name}' must be a plain name inside the target directory.")]
    InvalidSnapshotName { name: String },
}

/// A snapshot that has been written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedCapture {
    pub capture: CaptureId,
    pub path: PathBuf,
}

impl CapturePlan {
    /// Resolve the save path from the naming flags.
    ///
    /// A snapshot name always wins over `random`. The directory only picks
    /// the parent, falling back to `default_directory`.
    pub fn resolve(request: &NamingRequest, default_directory: &Path) -> Result<Self, PlanError> {
        Self::resolve_with(request, default_directory, generate_random_name)
    }

    fn resolve_with(
        request: &NamingRequest,
        default_directory: &Path,
        random_name: impl FnOnce() -> String,
    ) -> Result<Self, PlanError> {
        let file_name = match (&request.snapshot, request.random) {
            (Some(name), _) => {
                if !stays_inside(Path::new(name)) {
                    return Err(PlanError::InvalidSnapshotName { name: name.clone() });
                }
                name.clone()
            }
            (None, true) => random_name(),
            (None, false) => {
                return Err(match &request.directory {
                    Some(directory) => PlanError::DirectoryWithoutName {
                        directory: directory.clone(),
                    },
                    None => PlanError::NothingToSave,
                });
            }
        };

        let directory = request.directory.as_deref().unwrap_or(default_directory);
        Ok(Self {
            save_path: directory.join(file_name),
        })
    }
}

/// True when joining `name` onto a directory cannot leave that directory.
fn stays_inside(name: &Path) -> bool {
    let mut has_name = false;
    for component in name.components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => return false,
        }
    }
    has_name
}

/// Build a file name that will not collide with other invocations.
///
/// A v4 UUID followed by a short alphanumeric tail, e.g.
/// `3f2c...9a1e_Xk3pQ0aZ`.
pub fn generate_random_name() -> String {
    let unique = Uuid::new_v4().simple().to_string();
    let tail: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}_{}", unique, tail)
}

/// Take a snapshot of `doc` and save it at the planned path, overwriting any
/// existing file.
pub async fn capture_and_save<D: DeviceApi>(
    api: &D,
    doc: DocId,
    plan: &CapturePlan,
) -> Result<SavedCapture, RpcError> {
    let capture = api.new_snapshot(doc).await?;
    api.save_as(capture, &plan.save_path, true).await?;

    println!(
        "The picture has been successfully saved to: {}",
        plan.save_path.display()
    );
    log::info!("Snapshot {} saved to {}", capture, plan.save_path.display());

    Ok(SavedCapture {
        capture,
        path: plan.save_path.clone(),
    })
}
