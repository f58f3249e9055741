pub mod category;
pub mod render_settings;
