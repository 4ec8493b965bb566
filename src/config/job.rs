//! JSON job files: a whole editing session written down so it can be replayed.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::background::{BackgroundRemover, prepare_portrait},
    assets::overlay::{OVERLAY_DEFAULT_ANCHOR, OVERLAY_DEFAULT_SCALE, OverlayCatalog},
    compose::cell::{CellRequest, OverlaySource, PORTRAIT_DEFAULT_SCALE},
    compose::queue::Session,
    foundation::core::{Anchor, Rgb8, Transform2D, Vec2},
    foundation::error::{EzidError, EzidResult},
    render::layer::Layer,
    spec::catalog::{PhotoSpec, find_spec},
};

/// Environment variable consulted for the tiling worker count when no flag is given.
pub const THREADS_ENV: &str = "EZID_THREADS";

/// Worker count from [`THREADS_ENV`]; unset, unparsable or zero values are ignored.
pub fn threads_from_env() -> Option<usize> {
    std::env::var(THREADS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}

fn default_portrait_transform() -> Transform2D {
    Transform2D {
        translate: Vec2::ZERO,
        scale: PORTRAIT_DEFAULT_SCALE,
    }
}

fn default_overlay_anchor() -> Anchor {
    OVERLAY_DEFAULT_ANCHOR
}

fn default_overlay_scale() -> f64 {
    OVERLAY_DEFAULT_SCALE
}

/// Clothing overlay selection for one photo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayChoice {
    /// Catalog id such as `m1` or `f3`.
    pub id: String,
    #[serde(default = "default_overlay_anchor")]
    pub anchor: Anchor,
    #[serde(default)]
    pub translate: Vec2,
    /// User scale; multiplied by the asset's base scale when drawn.
    #[serde(default = "default_overlay_scale")]
    pub scale: f64,
}

impl OverlayChoice {
    pub fn transform(&self) -> Transform2D {
        Transform2D {
            translate: self.translate,
            scale: self.scale,
        }
    }
}

/// One committed photo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhotoEntry {
    /// Portrait file, relative to the job file unless absolute.
    pub portrait: PathBuf,
    #[serde(default)]
    pub remove_background: bool,
    /// Portrait placement; a missing `scale` inside an explicit transform means 1.0.
    #[serde(default = "default_portrait_transform")]
    pub transform: Transform2D,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayChoice>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// Print spec id (`TWO_INCH`, `ONE_INCH`, `MIXED`).
    pub spec: String,
    #[serde(default)]
    pub background: Rgb8,
    /// Directory holding `clothes/`; relative to the job file, defaults to its directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_root: Option<PathBuf>,
    #[serde(default)]
    pub photos: Vec<PhotoEntry>,
}

impl Job {
    pub fn from_reader<R: std::io::Read>(r: R) -> EzidResult<Self> {
        serde_json::from_reader(r).map_err(|e| EzidError::serde(format!("parse job JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> EzidResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open job file '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> EzidResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EzidError::serde(e.to_string()))
    }

    pub fn photo_spec(&self) -> EzidResult<PhotoSpec> {
        find_spec(&self.spec)
    }

    /// Checks everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> EzidResult<()> {
        self.photo_spec()?;
        let overlays = OverlayCatalog::builtin();
        for (i, photo) in self.photos.iter().enumerate() {
            photo
                .transform
                .validate()
                .map_err(|e| EzidError::validation(format!("photos[{i}].transform: {e}")))?;
            if let Some(choice) = &photo.overlay {
                if overlays.find(&choice.id).is_none() {
                    return Err(EzidError::validation(format!(
                        "photos[{i}].overlay: unknown overlay '{}'",
                        choice.id
                    )));
                }
                choice.transform().validate().map_err(|e| {
                    EzidError::validation(format!("photos[{i}].overlay: {e}"))
                })?;
            }
        }
        Ok(())
    }
}

/// Where a job's relative paths point and which optional services are available.
pub struct JobEnv<'a> {
    pub base_dir: PathBuf,
    pub remover: Option<&'a dyn BackgroundRemover>,
    pub overlays: OverlayCatalog,
}

impl<'a> JobEnv<'a> {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            remover: None,
            overlays: OverlayCatalog::builtin(),
        }
    }

    /// Environment rooted at the directory containing `job_path`.
    pub fn for_job_file(job_path: &Path) -> Self {
        let base = job_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(base)
    }

    pub fn with_remover(mut self, remover: &'a dyn BackgroundRemover) -> Self {
        self.remover = Some(remover);
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// A cell request built from a job entry, plus any recovered problems worth reporting.
#[derive(Clone, Debug)]
pub struct PreparedEntry {
    pub request: CellRequest,
    pub notices: Vec<String>,
}

/// A session with every job photo committed.
#[derive(Clone, Debug)]
pub struct LoadedJob {
    pub session: Session,
    pub notices: Vec<String>,
}

impl Job {
    /// Decode the portrait and load the overlay for `photos[index]`.
    pub fn prepare_entry(&self, index: usize, env: &JobEnv<'_>) -> EzidResult<PreparedEntry> {
        let photo = self.photos.get(index).ok_or_else(|| {
            EzidError::validation(format!(
                "photo index {index} out of range (job has {})",
                self.photos.len()
            ))
        })?;

        let portrait_path = env.resolve(&photo.portrait);
        let bytes = std::fs::read(&portrait_path)
            .with_context(|| format!("read portrait '{}'", portrait_path.display()))?;
        let remover = if photo.remove_background {
            if env.remover.is_none() {
                tracing::warn!(index, "background removal requested but no remover configured");
            }
            env.remover
        } else {
            None
        };
        let prepared = prepare_portrait(&bytes, remover).map_err(|e| {
            EzidError::decode(format!(
                "photos[{index}] '{}': {e}",
                portrait_path.display()
            ))
        })?;

        let mut notices = Vec::new();
        if let Some(notice) = prepared.notice {
            notices.push(format!("photos[{index}]: {notice}"));
        }

        let portrait = Layer::new(prepared.image, Anchor::CENTER, photo.transform)?;
        let overlay = match &photo.overlay {
            None => OverlaySource::None,
            Some(choice) => {
                let root = env.resolve(self.assets_root.as_deref().unwrap_or(Path::new("")));
                let src = env
                    .overlays
                    .load(&choice.id, &root, choice.anchor, choice.transform());
                if let OverlaySource::Failed { id, reason } = &src {
                    notices.push(format!("photos[{index}]: overlay '{id}' skipped: {reason}"));
                }
                src
            }
        };

        Ok(PreparedEntry {
            request: CellRequest::new(self.background, portrait).with_overlay(overlay),
            notices,
        })
    }

    /// Build a session for the job's spec and commit every photo in order.
    #[tracing::instrument(skip_all, fields(spec = %self.spec, photos = self.photos.len()))]
    pub fn load_session(&self, env: &JobEnv<'_>) -> EzidResult<LoadedJob> {
        self.validate()?;
        let mut session = Session::new(self.photo_spec()?)?;
        let mut notices = Vec::new();
        for index in 0..self.photos.len() {
            let entry = self.prepare_entry(index, env)?;
            session.commit(&entry.request)?;
            notices.extend(entry.notices);
        }
        Ok(LoadedJob { session, notices })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/job.rs"]
mod tests;
