//! Built-in clothing overlays.

use std::path::{Path, PathBuf};

use crate::{
    assets::decode::load_image,
    compose::cell::OverlaySource,
    foundation::core::{Anchor, Transform2D},
    render::layer::Layer,
};

/// Multiplier applied to the user scale of the built-in suit graphics.
pub const OVERLAY_BASE_SCALE: f64 = 2.2;

/// Where a freshly selected overlay sits: horizontally centred, slightly below the middle.
pub const OVERLAY_DEFAULT_ANCHOR: Anchor = Anchor::new(50.0, 55.0);

/// User scale a freshly selected overlay starts at.
pub const OVERLAY_DEFAULT_SCALE: f64 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    fn id_prefix(self) -> char {
        match self {
            Self::Male => 'm',
            Self::Female => 'f',
        }
    }
}

/// One selectable overlay graphic.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OverlayAsset {
    pub id: String,
    pub gender: Gender,
    /// Path relative to the assets root.
    pub path: PathBuf,
    /// Scale the user scale is multiplied by before drawing.
    pub base_scale: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OverlayCatalog {
    assets: Vec<OverlayAsset>,
}

impl OverlayCatalog {
    /// Five male and five female suits under `clothes/`.
    pub fn builtin() -> Self {
        let mut assets = Vec::with_capacity(10);
        for gender in [Gender::Male, Gender::Female] {
            let p = gender.id_prefix();
            for i in 1..=5 {
                assets.push(OverlayAsset {
                    id: format!("{p}{i}"),
                    gender,
                    path: PathBuf::from(format!("clothes/suit-{p}{i}.png")),
                    base_scale: OVERLAY_BASE_SCALE,
                });
            }
        }
        Self { assets }
    }

    pub fn assets(&self) -> &[OverlayAsset] {
        &self.assets
    }

    pub fn for_gender(&self, gender: Gender) -> impl Iterator<Item = &OverlayAsset> {
        self.assets.iter().filter(move |a| a.gender == gender)
    }

    pub fn find(&self, id: &str) -> Option<&OverlayAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Load overlay `id` from under `root`, placed at `anchor` with the given user transform.
    ///
    /// Never fails: a missing id, unreadable file or bad transform yields
    /// [`OverlaySource::Failed`] so the cell can still be composed.
    pub fn load(&self, id: &str, root: &Path, anchor: Anchor, user: Transform2D) -> OverlaySource {
        let failed = |reason: String| {
            tracing::debug!(overlay = id, %reason, "overlay load failed");
            OverlaySource::Failed {
                id: id.to_string(),
                reason,
            }
        };

        let Some(asset) = self.find(id) else {
            return failed(format!("unknown overlay '{id}'"));
        };
        let image = match load_image(&root.join(&asset.path)) {
            Ok(image) => image,
            Err(e) => return failed(format!("{e:#}")),
        };
        let transform = Transform2D {
            scale: user.scale * asset.base_scale,
            ..user
        };
        match Layer::new(image, anchor, transform) {
            Ok(layer) => OverlaySource::Loaded(layer),
            Err(e) => failed(e.to_string()),
        }
    }
}

impl Default for OverlayCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/overlay.rs"]
mod tests;
