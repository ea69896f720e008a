use crate::schemas::generate::GenerateRequest;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

const GRADIENT_START: &str = "#1a1a2e";
const GRADIENT_END: &str = "#16213e";

pub const TITLE: &str = "Emby 最新推荐";
pub const WATERMARK: &str = "EMBY";

/// Escape text for use inside an SVG element or attribute.
///
/// Characters XML 1.0 cannot carry at all are dropped.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c < '\u{20}' || c == '\u{fffe}' || c == '\u{ffff}' => {}
            c => out.push(c),
        }
    }
    out
}

struct TextLine<'a> {
    x: u32,
    y: u32,
    size: u32,
    bold: bool,
    opacity: Option<f32>,
    text: &'a str,
}

impl TextLine<'_> {
    fn write(&self, svg: &mut String, font_family: &str) {
        let weight = if self.bold { "bold" } else { "normal" };
        let opacity = self
            .opacity
            .map(|o| format!(r#" fill-opacity="{o}""#))
            .unwrap_or_default();
        svg.push_str(&format!(
            r##"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" fill="#ffffff"{} xml:space="preserve">{}</text>"##,
            self.x,
            self.y,
            escape_xml(font_family),
            self.size,
            weight,
            opacity,
            escape_xml(self.text),
        ));
        svg.push('\n');
    }
}

/// Build the SVG document for a cover.
///
/// `generated_at` is drawn verbatim as the generation timestamp.
pub fn generate_svg(params: &GenerateRequest, generated_at: &str, font_family: &str) -> String {
    let time_range = format!("时间范围: {}", params.time_range());
    let rule = format!("生成规则: {}", params.rule());
    let font = format!("使用字体: {}", params.font());
    let timestamp = format!("生成时间: {generated_at}");

    let lines = [
        TextLine { x: 50, y: 100, size: 40, bold: true, opacity: None, text: TITLE },
        TextLine { x: 50, y: 150, size: 20, bold: false, opacity: None, text: &time_range },
        TextLine { x: 50, y: 180, size: 20, bold: false, opacity: None, text: &rule },
        TextLine { x: 50, y: 210, size: 20, bold: false, opacity: None, text: &font },
        TextLine { x: 50, y: 240, size: 20, bold: false, opacity: None, text: &timestamp },
        TextLine { x: 200, y: 400, size: 60, bold: true, opacity: Some(0.1), text: WATERMARK },
    ];

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<defs>
<linearGradient id="background" gradientUnits="userSpaceOnUse" x1="0" y1="0" x2="{w}" y2="{h}">
<stop offset="0" stop-color="{GRADIENT_START}"/>
<stop offset="1" stop-color="{GRADIENT_END}"/>
</linearGradient>
</defs>
<rect x="0" y="0" width="{w}" height="{h}" fill="url(#background)"/>
"#,
        w = WIDTH,
        h = HEIGHT,
    );
    for line in &lines {
        line.write(&mut svg, font_family);
    }
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DEFAULT_FONT_FAMILY;

    fn request(time_range: &str, rule: &str, font: &str) -> GenerateRequest {
        GenerateRequest {
            emby_url: Some("http://x".to_string()),
            api_key: Some("k".to_string()),
            time_range: Some(time_range.to_string()),
            rule: Some(rule.to_string()),
            font: Some(font.to_string()),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"a<b & "c">'d'"#), "a&lt;b &amp; &quot;c&quot;&gt;&apos;d&apos;");
    }

    #[test]
    fn drops_control_characters() {
        assert_eq!(escape_xml("a\u{1}b\u{1f}c\td"), "abc\td");
    }

    #[test]
    fn draws_every_label() {
        let svg = generate_svg(&request("7d", "rating>8", "Arial"), "1/2/2026 3:04:05 PM", DEFAULT_FONT_FAMILY);
        assert!(svg.contains(TITLE));
        assert!(svg.contains("时间范围: 7d"));
        assert!(svg.contains("生成规则: rating&gt;8"));
        assert!(svg.contains("使用字体: Arial"));
        assert!(svg.contains("生成时间: 1/2/2026 3:04:05 PM"));
        assert!(svg.contains(WATERMARK));
    }

    #[test]
    fn font_param_does_not_change_family() {
        let svg = generate_svg(&request("7d", "r", "Comic Sans MS"), "now", DEFAULT_FONT_FAMILY);
        assert!(!svg.contains(r#"font-family="Comic Sans MS""#));
        assert_eq!(svg.matches(r#"font-family="Arial, sans-serif""#).count(), 6);
    }

    #[test]
    fn absent_optionals_leave_labels() {
        let params = GenerateRequest {
            emby_url: Some("http://x".to_string()),
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let svg = generate_svg(&params, "now", DEFAULT_FONT_FAMILY);
        assert!(svg.contains(r#"xml:space="preserve">时间范围: </text>"#));
        assert!(svg.contains(r#"xml:space="preserve">使用字体: </text>"#));
    }

    #[test]
    fn gradient_spans_canvas() {
        let svg = generate_svg(&request("", "", ""), "now", DEFAULT_FONT_FAMILY);
        assert!(svg.contains(r#"x2="800" y2="600""#));
        assert!(svg.contains(r##"stop-color="#1a1a2e""##));
        assert!(svg.contains(r##"stop-color="#16213e""##));
        assert!(svg.contains(r#"fill-opacity="0.1""#));
    }

    #[test]
    fn api_key_never_reaches_document() {
        let mut params = request("7d", "r", "f");
        params.api_key = Some("super-secret".to_string());
        let svg = generate_svg(&params, "now", DEFAULT_FONT_FAMILY);
        assert!(!svg.contains("super-secret"));
    }
}
