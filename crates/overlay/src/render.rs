use std::fmt::Write as _;

use shared::{
    appearance::HtmlAppearance,
    domain::{StatusField, StatusToken, StatusTriple},
};

use crate::{COUNTDOWN_REFRESH_MS, GONOGO_REFRESH_MS};

/// Board order as shown on stream.
const BOARD_ORDER: [StatusField; 3] = [StatusField::Range, StatusField::Vehicle, StatusField::Weather];

pub fn render_countdown(
    mission: &str,
    timer_text: &str,
    appearance: &HtmlAppearance,
    hide_mission: bool,
) -> String {
    let mission_div = if hide_mission {
        String::new()
    } else {
        format!("<div id=\"mission\">{}</div>", escape(mission))
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<style>
body {{
    margin: 0;
    background-color: {bg};
    display: flex;
    flex-direction: column;
    justify-content: center;
    align-items: center;
    color: {text};
    font-family: {font};
}}
#mission {{ font-size: {mission_px}px; margin-bottom: 0; }}
#timer {{ font-size: {timer_px}px; margin-bottom: 40px; }}
</style>
<script>
setTimeout(() => location.reload(), {refresh});
</script>
</head>
<body>
{mission_div}
<div id="timer">{timer}</div>
</body>
</html>"#,
        bg = css(&appearance.bg_color),
        text = css(&appearance.text_color),
        font = css(&appearance.font_family),
        mission_px = appearance.mission_font_px,
        timer_px = appearance.timer_font_px,
        refresh = COUNTDOWN_REFRESH_MS,
        timer = escape(timer_text),
    )
}

pub fn render_gonogo(statuses: &StatusTriple, appearance: &HtmlAppearance) -> String {
    let mut boxes = String::new();
    for field in BOARD_ORDER {
        let token = statuses.get(field);
        let class = if token == StatusToken::Go { "go" } else { "nogo" };
        let _ = writeln!(
            boxes,
            "    <div class=\"status-box {class}\">{}: {token}</div>",
            field.label()
        );
    }

    board_page(
        appearance,
        &format!("<div id=\"gonogo\">\n{boxes}</div>"),
    )
}

/// Board shown once polling has degraded: the sheet itself, embedded.
pub fn render_gonogo_fallback(embed_url: &str, appearance: &HtmlAppearance) -> String {
    board_page(
        appearance,
        &format!(
            "<iframe id=\"sheet\" src=\"{}\" title=\"Go/No-Go sheet\"></iframe>",
            escape(embed_url)
        ),
    )
}

fn board_page(appearance: &HtmlAppearance, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<style>
body {{
    margin: 0;
    background-color: {bg};
    color: {text};
    font-family: {font};
    display: flex;
    justify-content: center;
    align-items: center;
    height: 100vh;
}}
#gonogo {{
    display: flex;
    gap: 40px;
}}
.status-box {{
    border: 2px solid {border};
    padding: 20px 40px;
    font-size: {gn_px}px;
    text-align: center;
    background-color: {gn_bg};
}}
.go {{ color: {go}; }}
.nogo {{ color: {nogo}; }}
#sheet {{ width: 100%; height: 100%; border: 0; background-color: {gn_bg}; }}
</style>
<script>
setTimeout(() => location.reload(), {refresh});
</script>
</head>
<body>
{body}
</body>
</html>"#,
        bg = css(&appearance.bg_color),
        text = css(&appearance.text_color),
        font = css(&appearance.font_family),
        border = css(&appearance.gn_border_color),
        gn_px = appearance.gn_font_px,
        gn_bg = css(&appearance.gn_bg_color),
        go = css(&appearance.gn_go_color),
        nogo = css(&appearance.gn_nogo_color),
        refresh = GONOGO_REFRESH_MS,
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Style values are operator-supplied; drop anything that could close the
/// declaration or the style block.
fn css(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
