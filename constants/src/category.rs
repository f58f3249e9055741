/// Marker category metadata keyed by the item's `icon` index.
pub struct CategoryInfo {
    pub id: u32,
    pub name: &'static str,
    /// RGBA tint used when generating the icon atlas tile.
    pub tint: [u8; 4],
}

pub const CATEGORY_MAP: &[CategoryInfo] = &[
    CategoryInfo {
        id: 0,
        name: "Issue",
        tint: [239, 68, 68, 255],
    },
    CategoryInfo {
        id: 1,
        name: "Warning",
        tint: [245, 158, 11, 255],
    },
    CategoryInfo {
        id: 2,
        name: "RFI",
        tint: [59, 130, 246, 255],
    },
    CategoryInfo {
        id: 3,
        name: "Quality",
        tint: [34, 197, 94, 255],
    },
];

pub fn category_name(icon: u32) -> &'static str {
    CATEGORY_MAP
        .iter()
        .find(|c| c.id == icon)
        .map(|c| c.name)
        .unwrap_or("Unknown")
}

pub fn category_tint(icon: u32) -> [u8; 4] {
    CATEGORY_MAP
        .iter()
        .find(|c| c.id == icon)
        .map(|c| c.tint)
        .unwrap_or([156, 163, 175, 255])
}
