//! Interactive 3D markup overlay.
//!
//! Renders loaded markup items as a picked point field on a dedicated
//! overlay render layer, with hover highlighting, sticky click selection,
//! and an info card that stays anchored to the selected marker while the
//! camera moves.
//!
//! ## Data and control flow
//!
//! ```text
//! MarkupToolCommand::Activate
//!   └─> handle_tool_commands()
//!       ├─> spawn anchor mesh (hidden, once)
//!       └─> load_markup_system() polls the JSON asset
//!           └─> MarkupStore + MarkerField replaced atomically
//!               └─> spawn_marker_field() builds the sprite mesh/material
//!
//! pointer move / click
//!   └─> MarkupTool state machine (hover, sticky selection)
//!       └─> ToolEffects: redraw, card show/hide, host-selection clear
//!
//! camera change
//!   └─> update_anchor_system() repositions the anchor line and
//!       reprojects the card screen position
//! ```
//!
//! The state machine and the picking/projection math are plain types over
//! [`crate::engine::camera::CameraSnapshot`]; the systems here are thin
//! adapters wiring them to the host input, assets, and UI.

pub mod anchor;
pub mod card;
pub mod field;
pub mod overlay;
pub mod picking;
pub mod selection;
pub mod store;

use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

pub use anchor::CardAnchor;
pub use card::CardEvent;
pub use field::MarkerField;
pub use overlay::{MarkupOverlay, MarkupToolCommand};
pub use selection::{HostSelection, MarkupTool};
pub use store::{MarkupDocument, MarkupItem, MarkupLoader, MarkupStore};

pub struct MarkupOverlayPlugin;

impl Plugin for MarkupOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<MarkupDocument>::new(&["json"]))
            .add_plugins(MaterialPlugin::<crate::engine::shaders::MarkerSpriteMaterial>::default())
            .add_event::<MarkupToolCommand>()
            .add_event::<CardEvent>()
            .init_resource::<MarkupStore>()
            .init_resource::<MarkupLoader>()
            .init_resource::<MarkerField>()
            .init_resource::<MarkupTool>()
            .init_resource::<MarkupOverlay>()
            .init_resource::<CardAnchor>()
            .init_resource::<HostSelection>()
            .add_systems(Startup, card::spawn_card_ui)
            .add_systems(
                Update,
                (
                    overlay::handle_tool_commands,
                    store::load_markup_system,
                    overlay::spawn_marker_field,
                    selection::markup_pointer_move,
                    selection::markup_click,
                    overlay::sync_marker_material,
                    anchor::update_anchor_system,
                    card::update_card_content,
                    card::update_card_position,
                )
                    .chain(),
            );
    }
}
