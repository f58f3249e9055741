use std::collections::HashSet;

use bevy::asset::AssetLoadFailedEvent;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use constants::render_settings::{ICON_ATLAS_TILES, MARKUP_DATA_PATH, MAX_MARKERS};

use crate::markup::field::MarkerField;
use crate::markup::overlay::MarkupOverlay;
use crate::markup::selection::MarkupTool;

/// One annotated point of interest. Immutable once loaded; `id` is the
/// external key, the position within the loaded sequence is the internal
/// join key used by the geometry arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupItem {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Category index selecting a sprite tile from the icon atlas.
    pub icon: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl MarkupItem {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// The markup data file: a root-level JSON array of items.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct MarkupDocument(pub Vec<MarkupItem>);

#[derive(Debug, Error)]
pub enum MarkupDataError {
    #[error("markup document holds {count} items, exceeding the field capacity of {max}")]
    TooManyItems { count: usize, max: usize },
    #[error("item {id} uses icon index {icon}, but the atlas has {tiles} tiles")]
    IconOutOfRange { id: u64, icon: u32, tiles: u32 },
    #[error("duplicate markup id {0}")]
    DuplicateId(u64),
}

/// Reject documents the renderer cannot represent. An invalid document is
/// treated exactly like a failed load: logged, then ignored.
pub fn validate_items(items: &[MarkupItem]) -> Result<(), MarkupDataError> {
    if items.len() > MAX_MARKERS {
        return Err(MarkupDataError::TooManyItems {
            count: items.len(),
            max: MAX_MARKERS,
        });
    }
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id) {
            return Err(MarkupDataError::DuplicateId(item.id));
        }
        if item.icon >= ICON_ATLAS_TILES {
            return Err(MarkupDataError::IconOutOfRange {
                id: item.id,
                icon: item.icon,
                tiles: ICON_ATLAS_TILES,
            });
        }
    }
    Ok(())
}

/// Ordered markup items; source of truth for index↔item correspondence.
#[derive(Resource, Default)]
pub struct MarkupStore {
    pub items: Vec<MarkupItem>,
}

impl MarkupStore {
    pub fn item(&self, index: usize) -> Option<&MarkupItem> {
        self.items.get(index)
    }

    pub fn find(&self, id: u64) -> Option<&MarkupItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Tracks the in-flight markup document load.
#[derive(Resource, Default)]
pub struct MarkupLoader {
    pub handle: Option<Handle<MarkupDocument>>,
    pub loaded: bool,
}

/// Kick the markup document load on activation and poll until it
/// resolves. Completion replaces the store and field contents in one
/// pass, so input callbacks never observe a half-built field; failure is
/// logged and leaves both empty.
pub fn load_markup_system(
    mut loader: ResMut<MarkupLoader>,
    overlay: Res<MarkupOverlay>,
    asset_server: Res<AssetServer>,
    documents: Res<Assets<MarkupDocument>>,
    mut failures: EventReader<AssetLoadFailedEvent<MarkupDocument>>,
    mut store: ResMut<MarkupStore>,
    mut field: ResMut<MarkerField>,
    mut tool: ResMut<MarkupTool>,
) {
    if !overlay.active {
        return;
    }

    if loader.handle.is_none() {
        info!("loading markup data from {}", MARKUP_DATA_PATH);
        loader.handle = Some(asset_server.load(MARKUP_DATA_PATH));
        return;
    }

    if loader.loaded {
        return;
    }

    for failure in failures.read() {
        warn!(
            "markup data load failed ({}); continuing with an empty marker set",
            failure.error
        );
        loader.loaded = true;
        return;
    }

    let Some(handle) = loader.handle.as_ref() else {
        return;
    };
    let Some(document) = documents.get(handle) else {
        return;
    };

    match validate_items(&document.0) {
        Ok(()) => {
            store.items = document.0.clone();
            *field = MarkerField::build(&store.items);
            // Any hover/selection indexed the previous field.
            tool.reset();
            info!("loaded {} markup items", store.len());
        }
        Err(err) => {
            warn!("markup data rejected ({err}); continuing with an empty marker set");
        }
    }
    loader.loaded = true;
}
