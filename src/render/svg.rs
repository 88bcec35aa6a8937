use std::fmt::Write as _;

use crate::{
    foundation::core::Canvas,
    render::scene::{Attrs, ElementId, ElementKind, Scene},
};

/// Serialize the attached scene tree as a standalone SVG document.
pub fn to_svg(scene: &Scene, canvas: Canvas) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = canvas.width,
        h = canvas.height,
    );
    for child in scene.children(scene.root()) {
        write_element(&mut out, scene, *child);
    }
    out.push_str("</svg>\n");
    out
}

fn write_element(out: &mut String, scene: &Scene, id: ElementId) {
    let Some(el) = scene.get(id) else {
        return;
    };
    let a = &el.attrs;
    let opacity = num(scene.effective_opacity(id).unwrap_or(1.0));
    let data_id = escape(&el.data_id);
    match el.kind {
        ElementKind::Root => {}
        ElementKind::Layer => {
            let _ = write!(out, r#"<g id="{data_id}">"#);
            write_children(out, scene, id);
            out.push_str("</g>");
        }
        ElementKind::Group => {
            let _ = write!(
                out,
                r#"<g data-remote-group="true" transform="translate({} {})" opacity="{opacity}">"#,
                num(a.translate.x),
                num(a.translate.y),
            );
            write_children(out, scene, id);
            out.push_str("</g>");
        }
        ElementKind::Star => {
            let _ = write!(
                out,
                r#"<circle data-id="{data_id}" cx="{}" cy="{}" r="{}" fill="{}" opacity="{opacity}"{}{}/>"#,
                num(a.cx),
                num(a.cy),
                num(a.r),
                a.fill.as_deref().unwrap_or("none"),
                optional("filter", a.glow.as_deref()),
                class(a),
            );
        }
        ElementKind::Ripple => {
            let _ = write!(
                out,
                r#"<circle data-id="{data_id}" cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}" opacity="{opacity}"{}{}/>"#,
                num(a.cx),
                num(a.cy),
                num(a.r),
                a.stroke.as_deref().unwrap_or("none"),
                num(a.stroke_width),
                a.animation_delay
                    .map(|d| format!(r#" style="animation-delay: {}s""#, num(d)))
                    .unwrap_or_default(),
                class(a),
            );
        }
        ElementKind::Line => {
            let Some(path) = a.path else {
                return;
            };
            let dash = a
                .dash_array
                .map(|len| {
                    format!(
                        r#" stroke-dasharray="{}" stroke-dashoffset="{}""#,
                        num(len),
                        num(a.dash_offset)
                    )
                })
                .unwrap_or_default();
            let _ = write!(
                out,
                r#"<path data-id="{data_id}" d="{}" stroke="{}" stroke-width="{}" fill="none" stroke-linecap="round" stroke-linejoin="round" opacity="{opacity}"{dash}{}/>"#,
                path.to_svg(),
                a.stroke.as_deref().unwrap_or("none"),
                num(a.stroke_width),
                class(a),
            );
        }
        ElementKind::Message => {
            let _ = write!(
                out,
                r#"<text data-star-id="{data_id}" x="{}" y="{}" opacity="{opacity}"{}>{}</text>"#,
                num(a.x),
                num(a.y + a.height * 0.75),
                class(a),
                escape(&a.text),
            );
        }
        ElementKind::Label => {
            let _ = write!(
                out,
                r#"<g data-id="{data_id}" opacity="{opacity}"{}><rect x="{}" y="{}" width="{}" height="{}" rx="8"/>"#,
                class(a),
                num(a.x),
                num(a.y),
                num(a.width),
                num(a.height),
            );
            if let Some(card) = &a.card {
                let _ = write!(
                    out,
                    r#"<text x="{x}" y="{}" class="inline-card__title">{}</text><text x="{x}" y="{}" class="inline-card__body">{}</text>"#,
                    num(a.y + 24.0),
                    escape(&card.title),
                    num(a.y + 48.0),
                    escape(&card.body),
                    x = num(a.x + 12.0),
                );
            }
            out.push_str("</g>");
        }
    }
}

fn write_children(out: &mut String, scene: &Scene, id: ElementId) {
    for child in scene.children(id) {
        write_element(out, scene, *child);
    }
}

fn class(a: &Attrs) -> String {
    optional("class", a.class.as_deref())
}

fn optional(name: &str, value: Option<&str>) -> String {
    value
        .map(|v| format!(r#" {name}="{}""#, escape(v)))
        .unwrap_or_default()
}

fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        rounded.to_string()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
