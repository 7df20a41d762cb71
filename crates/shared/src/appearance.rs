use serde::{Deserialize, Serialize};

/// Styling applied to the generated browser-source overlays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlAppearance {
    pub bg_color: String,
    pub text_color: String,
    pub font_family: String,
    pub mission_font_px: u32,
    pub timer_font_px: u32,
    pub gn_bg_color: String,
    pub gn_border_color: String,
    pub gn_go_color: String,
    pub gn_nogo_color: String,
    pub gn_font_px: u32,
}

impl Default for HtmlAppearance {
    fn default() -> Self {
        Self {
            bg_color: "#000000".into(),
            text_color: "#FFFFFF".into(),
            font_family: "Consolas".into(),
            mission_font_px: 24,
            timer_font_px: 80,
            gn_bg_color: "#111111".into(),
            gn_border_color: "#FFFFFF".into(),
            gn_go_color: "#00FF00".into(),
            gn_nogo_color: "#FF0000".into(),
            gn_font_px: 20,
        }
    }
}
