use bevy::prelude::*;

use constants::category::category_name;

use crate::markup::anchor::CardAnchor;
use crate::markup::store::{MarkupItem, MarkupStore};

/// Card presenter boundary: the tool requests show/hide by item id, the
/// presenter owns the UI node and its placement.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    Show { item_id: u64 },
    Hide,
}

#[derive(Component)]
pub struct InfoCardNode;

#[derive(Component)]
pub struct InfoCardText;

/// Text content for one item. Optional fields are simply skipped, so a
/// sparse document never breaks rendering.
pub fn format_card(item: &MarkupItem) -> String {
    let mut lines = vec![format!("{}  #{}", category_name(item.icon), item.id)];
    if let Some(title) = &item.title {
        lines.push(title.clone());
    }
    if let Some(description) = &item.description {
        lines.push(description.clone());
    }
    if let Some(priority) = &item.priority {
        lines.push(format!("Priority: {priority}"));
    }
    if let Some(assignee) = &item.assignee {
        lines.push(format!("Assignee: {assignee}"));
    }
    if let Some(date) = &item.date {
        lines.push(format!("Date: {date}"));
    }
    lines.join("\n")
}

pub fn spawn_card_ui(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                max_width: Val::Px(320.0),
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.92)),
            Visibility::Hidden,
            InfoCardNode,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.15, 0.17, 0.2)),
                InfoCardText,
            ));
        });
}

pub fn update_card_content(
    mut events: EventReader<CardEvent>,
    store: Res<MarkupStore>,
    mut nodes: Query<&mut Visibility, With<InfoCardNode>>,
    mut texts: Query<&mut Text, With<InfoCardText>>,
) {
    for event in events.read() {
        let Ok(mut visibility) = nodes.single_mut() else {
            return;
        };
        match event {
            CardEvent::Show { item_id } => {
                let Some(item) = store.find(*item_id) else {
                    warn!("card requested for unknown markup id {item_id}");
                    continue;
                };
                if let Ok(mut text) = texts.single_mut() {
                    text.0 = format_card(item);
                }
                *visibility = Visibility::Visible;
            }
            CardEvent::Hide => {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

pub fn update_card_position(
    card_anchor: Res<CardAnchor>,
    mut nodes: Query<&mut Node, With<InfoCardNode>>,
) {
    if !card_anchor.is_changed() {
        return;
    }
    let Some(position) = card_anchor.position else {
        return;
    };
    let Ok(mut node) = nodes.single_mut() else {
        return;
    };
    node.left = Val::Px(position.x);
    node.top = Val::Px(position.y);
}
