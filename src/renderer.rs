use std::fmt::Write;

use qrcodegen::{QrCode, QrCodeEcc};

use crate::config::{LOGO_FRACTION, QUIET_ZONE};
use crate::error::{Error, Result};
use crate::types::{DotStyle, ErrorLevel, EyeStyle, GradientType, Style};

const FINDER: i32 = 7;
const GRADIENT_ID: &str = "qr-gradient";

/// Produces an image for an encoded payload.
pub trait Renderer {
    /// Renders `payload` as an SVG document `size` pixels wide and high.
    fn render_svg(&self, payload: &str, style: &Style, size: u32) -> Result<String>;
}

/// Renders with the `qrcodegen` matrix and composes the styled SVG itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct QrCodegenRenderer;

impl Renderer for QrCodegenRenderer {
    fn render_svg(&self, payload: &str, style: &Style, size: u32) -> Result<String> {
        let qr = QrCode::encode_text(payload, ecc(style.level))
            .map_err(|_| Error::DataTooLong { len: payload.len() })?;
        Ok(compose_svg(&qr, style, size))
    }
}

fn ecc(level: ErrorLevel) -> QrCodeEcc {
    match level {
        ErrorLevel::Low => QrCodeEcc::Low,
        ErrorLevel::Medium => QrCodeEcc::Medium,
        ErrorLevel::Quartile => QrCodeEcc::Quartile,
        ErrorLevel::High => QrCodeEcc::High,
    }
}

/// Share of codewords each level can restore.
fn recovery(level: ErrorLevel) -> f64 {
    match level {
        ErrorLevel::Low => 0.07,
        ErrorLevel::Medium => 0.15,
        ErrorLevel::Quartile => 0.25,
        ErrorLevel::High => 0.30,
    }
}

/// Square area, in symbol coordinates, kept free for the logo.
///
/// Sized so the hidden modules stay within what the error correction level
/// can restore, and never wider than the gap between the finder patterns.
/// Function patterns inside the area stay visible on top of the logo.
#[derive(Clone, Copy, Debug)]
struct Clearing {
    start: i32,
    side: i32,
}

impl Clearing {
    fn for_symbol(size: i32, level: ErrorLevel) -> Option<Self> {
        let budget = (LOGO_FRACTION * recovery(level) * f64::from(size * size)).floor();
        let mut side = (budget.sqrt().floor() as i32).max(1).min(size - 2 * FINDER);
        // Symbols have an odd width; an odd side keeps the box centred.
        if side % 2 == 0 {
            side -= 1;
        }
        if side <= 0 {
            return None;
        }
        Some(Self {
            start: (size - side) / 2,
            side,
        })
    }

    fn contains(self, x: i32, y: i32) -> bool {
        let end = self.start + self.side;
        x >= self.start && x < end && y >= self.start && y < end
    }

    fn hides(self, x: i32, y: i32, size: i32) -> bool {
        self.contains(x, y) && !is_function_module(x, y, size)
    }
}

/// Finder, separator, format, timing, version and alignment modules.
fn is_function_module(x: i32, y: i32, size: i32) -> bool {
    let near = |v: i32| v <= FINDER + 1;
    let far = |v: i32| v >= size - FINDER - 1;
    if (near(x) && near(y)) || (far(x) && near(y)) || (near(x) && far(y)) {
        return true;
    }
    if x == 6 || y == 6 {
        return true;
    }

    let version = (size - 17) / 4;
    if version >= 7 {
        let block = |a: i32, b: i32| a < 6 && b >= size - 11 && b < size - 8;
        if block(x, y) || block(y, x) {
            return true;
        }
    }

    let centers = alignment_centers(version, size);
    let last = centers.len().saturating_sub(1);
    centers.iter().enumerate().any(|(i, &cy)| {
        centers.iter().enumerate().any(|(j, &cx)| {
            let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            !corner && (x - cx).abs() <= 2 && (y - cy).abs() <= 2
        })
    })
}

/// Row and column coordinates of the alignment pattern centres.
fn alignment_centers(version: i32, size: i32) -> Vec<i32> {
    if version < 2 {
        return Vec::new();
    }
    let count = version / 7 + 2;
    let step = if version == 32 {
        26
    } else {
        (version * 4 + count * 2 + 1) / (count * 2 - 2) * 2
    };

    let mut centers: Vec<i32> = (0..count - 1).map(|i| size - 7 - i * step).collect();
    centers.push(6);
    centers.reverse();
    centers
}

/// Whether the module at (`x`, `y`) is drawn dark.
fn is_dark(qr: &QrCode, clearing: Option<Clearing>, x: i32, y: i32) -> bool {
    qr.get_module(x, y) && !clearing.map_or(false, |clearing| clearing.hides(x, y, qr.size()))
}

fn in_finder(x: i32, y: i32, size: i32) -> bool {
    let near = |v: i32| v < FINDER;
    let far = |v: i32| v >= size - FINDER;
    (near(x) && near(y)) || (far(x) && near(y)) || (near(x) && far(y))
}

// Writing into a String cannot fail, hence the ignored fmt::Results below.
fn compose_svg(qr: &QrCode, style: &Style, size: u32) -> String {
    let n = qr.size();
    let border = if style.margin { QUIET_ZONE } else { 0 };
    let dim = n + border * 2;
    let clearing = style
        .logo()
        .and_then(|_| Clearing::for_symbol(n, style.level));

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 0 {dim} {dim}" width="{size}" height="{size}">"#,
        dim = dim,
        size = size,
    );

    let fill = match style.gradient_type {
        GradientType::None => escape_attr(&style.fg_color),
        GradientType::Linear | GradientType::Radial => {
            write_gradient(&mut svg, style, dim);
            format!("url(#{})", GRADIENT_ID)
        }
    };

    let _ = write!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        escape_attr(&style.bg_color)
    );

    // Under the modules, so function patterns in the clearing stay readable.
    if let (Some(logo), Some(clearing)) = (style.logo(), clearing) {
        let _ = write!(
            svg,
            r#"<image href="{}" x="{x}" y="{x}" width="{side}" height="{side}" preserveAspectRatio="xMidYMid meet"/>"#,
            escape_attr(logo),
            x = clearing.start + border,
            side = clearing.side,
        );
    }

    let modules = (0..n)
        .flat_map(|y| (0..n).map(move |x| (x, y)))
        .filter(|&(x, y)| is_dark(qr, clearing, x, y) && !in_finder(x, y, n))
        .map(|(x, y)| (x + border, y + border));
    write_modules(&mut svg, modules, style.dots_pattern, &fill);

    let eye_color = escape_attr(style.eye_color());
    for &(x, y) in &[(0, 0), (n - FINDER, 0), (0, n - FINDER)] {
        write_eye(&mut svg, x + border, y + border, style.eye_style, &eye_color);
    }

    svg.push_str("</svg>");
    svg
}

fn write_gradient(svg: &mut String, style: &Style, dim: i32) {
    let center = f64::from(dim) / 2.0;
    let stops = format!(
        r#"<stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/>"#,
        escape_attr(&style.gradient_color1),
        escape_attr(&style.gradient_color2),
    );

    svg.push_str("<defs>");
    let _ = match style.gradient_type {
        GradientType::Radial => write!(
            svg,
            r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{c}" cy="{c}" r="{c}">{stops}</radialGradient>"#,
            id = GRADIENT_ID,
            c = center,
            stops = stops,
        ),
        _ => write!(
            svg,
            r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="0" y1="0" x2="{dim}" y2="0" gradientTransform="rotate({rotation} {c} {c})">{stops}</linearGradient>"#,
            id = GRADIENT_ID,
            dim = dim,
            rotation = style.gradient_rotation,
            c = center,
            stops = stops,
        ),
    };
    svg.push_str("</defs>");
}

fn write_modules(
    svg: &mut String,
    modules: impl Iterator<Item = (i32, i32)>,
    shape: DotStyle,
    fill: &str,
) {
    match shape {
        DotStyle::Square => {
            let _ = write!(svg, r#"<path fill="{}" shape-rendering="crispEdges" d=""#, fill);
            for (x, y) in modules {
                let _ = write!(svg, "M{},{}h1v1h-1z", x, y);
            }
            svg.push_str(r#""/>"#);
        }
        DotStyle::Dots => {
            let _ = write!(svg, r#"<g fill="{}">"#, fill);
            for (x, y) in modules {
                let _ = write!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="0.5"/>"#,
                    f64::from(x) + 0.5,
                    f64::from(y) + 0.5
                );
            }
            svg.push_str("</g>");
        }
        DotStyle::Rounded | DotStyle::ExtraRounded => {
            let radius = if shape == DotStyle::Rounded { 0.25 } else { 0.4 };
            let _ = write!(svg, r#"<g fill="{}">"#, fill);
            for (x, y) in modules {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="1" height="1" rx="{}"/>"#,
                    x, y, radius
                );
            }
            svg.push_str("</g>");
        }
    }
}

fn write_eye(svg: &mut String, x: i32, y: i32, shape: EyeStyle, color: &str) {
    let cx = f64::from(x) + 3.5;
    let cy = f64::from(y) + 3.5;

    let _ = match shape {
        EyeStyle::Square => write!(
            svg,
            r#"<path fill="{}" fill-rule="evenodd" d="M{x},{y}h7v7h-7zM{ix},{iy}h5v5h-5z"/>"#,
            color,
            x = x,
            y = y,
            ix = x + 1,
            iy = y + 1,
        ),
        EyeStyle::Dot => write!(
            svg,
            r#"<circle cx="{}" cy="{}" r="3" fill="none" stroke="{}" stroke-width="1"/>"#,
            cx, cy, color
        ),
        EyeStyle::ExtraRounded => write!(
            svg,
            r#"<rect x="{}" y="{}" width="6" height="6" rx="2" fill="none" stroke="{}" stroke-width="1"/>"#,
            f64::from(x) + 0.5,
            f64::from(y) + 0.5,
            color
        ),
    };

    let _ = match shape {
        EyeStyle::Square => write!(
            svg,
            r#"<rect x="{}" y="{}" width="3" height="3" fill="{}"/>"#,
            x + 2,
            y + 2,
            color
        ),
        EyeStyle::Dot | EyeStyle::ExtraRounded => write!(
            svg,
            r#"<circle cx="{}" cy="{}" r="1.5" fill="{}"/>"#,
            cx, cy, color
        ),
    };
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
