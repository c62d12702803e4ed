//! Utility rule generation
//!
//! Maps class candidates to CSS declarations. The table covers the core
//! utility groups (display, position, flex, spacing, sizing, typography,
//! colors, borders, effects) plus arbitrary `-[value]` forms and the
//! `hover:`/`focus:` variants. Candidates with no mapping are silently
//! skipped; generation iterates candidates in sorted order so output is
//! deterministic for a given candidate set.

use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Minimal reset emitted in place of the `@tailwind base` marker.
pub const PREFLIGHT_BASE: &str = "\
*, ::before, ::after { box-sizing: border-box; border-width: 0; border-style: solid; border-color: #e5e7eb; }
html { line-height: 1.5; -webkit-text-size-adjust: 100%; font-family: ui-sans-serif, system-ui, sans-serif; }
body { margin: 0; line-height: inherit; }
";

/// Generate utility rules for every mappable candidate, in sorted order.
pub fn generate(candidates: &BTreeSet<String>) -> String {
    let mut out = String::new();
    for class in candidates {
        let Some((base, pseudo)) = split_variant(class) else {
            continue;
        };
        let Some(decls) = declarations(base) else {
            continue;
        };
        let _ = write!(out, ".{}{} {{", escape_class(class), pseudo);
        for (property, value) in &decls {
            let _ = write!(out, " {property}: {value};");
        }
        out.push_str(" }\n");
    }
    out
}

/// Split a `hover:`/`focus:` variant prefix off a candidate. Returns the
/// bare utility and the pseudo-class suffix for the selector. Candidates
/// with an unsupported variant prefix yield `None`.
fn split_variant(class: &str) -> Option<(&str, &'static str)> {
    match class.split_once(':') {
        None => Some((class, "")),
        Some(("hover", rest)) => Some((rest, ":hover")),
        Some(("focus", rest)) => Some((rest, ":focus")),
        Some(_) => None,
    }
}

/// Escape a class name for use in a selector. Everything outside the CSS
/// identifier character set gets a backslash.
fn escape_class(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len());
    for c in class.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }
    escaped
}

type Declarations = Vec<(&'static str, String)>;

fn decl(property: &'static str, value: impl Into<String>) -> (&'static str, String) {
    (property, value.into())
}

/// Declarations for one bare utility, or `None` when the class is not a
/// utility we generate.
fn declarations(base: &str) -> Option<Declarations> {
    if let Some(decls) = static_utility(base) {
        return Some(decls);
    }
    if let Some(decls) = arbitrary_utility(base) {
        return Some(decls);
    }
    if let Some(decls) = color_utility(base) {
        return Some(decls);
    }
    spacing_utility(base)
}

fn static_utility(base: &str) -> Option<Declarations> {
    let decls = match base {
        // display
        "block" => vec![decl("display", "block")],
        "inline-block" => vec![decl("display", "inline-block")],
        "inline" => vec![decl("display", "inline")],
        "flex" => vec![decl("display", "flex")],
        "inline-flex" => vec![decl("display", "inline-flex")],
        "grid" => vec![decl("display", "grid")],
        "hidden" => vec![decl("display", "none")],

        // position
        "static" => vec![decl("position", "static")],
        "relative" => vec![decl("position", "relative")],
        "absolute" => vec![decl("position", "absolute")],
        "fixed" => vec![decl("position", "fixed")],
        "sticky" => vec![decl("position", "sticky")],

        // flexbox
        "flex-row" => vec![decl("flex-direction", "row")],
        "flex-col" => vec![decl("flex-direction", "column")],
        "flex-wrap" => vec![decl("flex-wrap", "wrap")],
        "flex-1" => vec![decl("flex", "1 1 0%")],
        "items-start" => vec![decl("align-items", "flex-start")],
        "items-center" => vec![decl("align-items", "center")],
        "items-end" => vec![decl("align-items", "flex-end")],
        "items-stretch" => vec![decl("align-items", "stretch")],
        "justify-start" => vec![decl("justify-content", "flex-start")],
        "justify-center" => vec![decl("justify-content", "center")],
        "justify-end" => vec![decl("justify-content", "flex-end")],
        "justify-between" => vec![decl("justify-content", "space-between")],
        "justify-around" => vec![decl("justify-content", "space-around")],

        // typography
        "font-normal" => vec![decl("font-weight", "400")],
        "font-medium" => vec![decl("font-weight", "500")],
        "font-semibold" => vec![decl("font-weight", "600")],
        "font-bold" => vec![decl("font-weight", "700")],
        "italic" => vec![decl("font-style", "italic")],
        "not-italic" => vec![decl("font-style", "normal")],
        "underline" => vec![decl("text-decoration-line", "underline")],
        "line-through" => vec![decl("text-decoration-line", "line-through")],
        "no-underline" => vec![decl("text-decoration-line", "none")],
        "uppercase" => vec![decl("text-transform", "uppercase")],
        "lowercase" => vec![decl("text-transform", "lowercase")],
        "capitalize" => vec![decl("text-transform", "capitalize")],
        "text-left" => vec![decl("text-align", "left")],
        "text-center" => vec![decl("text-align", "center")],
        "text-right" => vec![decl("text-align", "right")],
        "text-xs" => vec![decl("font-size", "0.75rem"), decl("line-height", "1rem")],
        "text-sm" => vec![decl("font-size", "0.875rem"), decl("line-height", "1.25rem")],
        "text-base" => vec![decl("font-size", "1rem"), decl("line-height", "1.5rem")],
        "text-lg" => vec![decl("font-size", "1.125rem"), decl("line-height", "1.75rem")],
        "text-xl" => vec![decl("font-size", "1.25rem"), decl("line-height", "1.75rem")],
        "text-2xl" => vec![decl("font-size", "1.5rem"), decl("line-height", "2rem")],
        "text-3xl" => vec![decl("font-size", "1.875rem"), decl("line-height", "2.25rem")],
        "text-4xl" => vec![decl("font-size", "2.25rem"), decl("line-height", "2.5rem")],
        "truncate" => vec![
            decl("overflow", "hidden"),
            decl("text-overflow", "ellipsis"),
            decl("white-space", "nowrap"),
        ],

        // borders and effects
        "rounded" => vec![decl("border-radius", "0.25rem")],
        "rounded-sm" => vec![decl("border-radius", "0.125rem")],
        "rounded-md" => vec![decl("border-radius", "0.375rem")],
        "rounded-lg" => vec![decl("border-radius", "0.5rem")],
        "rounded-xl" => vec![decl("border-radius", "0.75rem")],
        "rounded-full" => vec![decl("border-radius", "9999px")],
        "border" => vec![decl("border-width", "1px")],
        "shadow-sm" => vec![decl("box-shadow", "0 1px 2px 0 rgba(0, 0, 0, 0.05)")],
        "shadow" => vec![decl(
            "box-shadow",
            "0 1px 3px 0 rgba(0, 0, 0, 0.1), 0 1px 2px -1px rgba(0, 0, 0, 0.1)",
        )],
        "shadow-md" => vec![decl(
            "box-shadow",
            "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -2px rgba(0, 0, 0, 0.1)",
        )],
        "shadow-lg" => vec![decl(
            "box-shadow",
            "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -4px rgba(0, 0, 0, 0.1)",
        )],

        // sizing keywords
        "w-full" => vec![decl("width", "100%")],
        "w-auto" => vec![decl("width", "auto")],
        "w-screen" => vec![decl("width", "100vw")],
        "h-full" => vec![decl("height", "100%")],
        "h-auto" => vec![decl("height", "auto")],
        "h-screen" => vec![decl("height", "100vh")],
        "min-h-screen" => vec![decl("min-height", "100vh")],
        "max-w-full" => vec![decl("max-width", "100%")],
        "mx-auto" => vec![decl("margin-left", "auto"), decl("margin-right", "auto")],

        // misc
        "cursor-pointer" => vec![decl("cursor", "pointer")],
        "overflow-hidden" => vec![decl("overflow", "hidden")],
        "overflow-auto" => vec![decl("overflow", "auto")],
        "transition" => vec![
            decl(
                "transition-property",
                "color, background-color, border-color, opacity, box-shadow, transform",
            ),
            decl("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
            decl("transition-duration", "150ms"),
        ],

        _ => return None,
    };
    Some(decls)
}

/// `prefix-[value]` form; underscores in the value stand for spaces.
fn arbitrary_utility(base: &str) -> Option<Declarations> {
    let inner = base.strip_suffix(']')?;
    let (prefix, value) = inner.split_once("-[")?;
    let value = value.replace('_', " ");
    let property = match prefix {
        "p" => "padding",
        "m" => "margin",
        "w" => "width",
        "h" => "height",
        "gap" => "gap",
        "bg" => "background-color",
        "text" => "color",
        "top" => "top",
        "right" => "right",
        "bottom" => "bottom",
        "left" => "left",
        _ => return None,
    };
    Some(vec![decl(property, value)])
}

fn color_utility(base: &str) -> Option<Declarations> {
    let (prefix, rest) = base.split_once('-')?;
    let property = match prefix {
        "bg" => "background-color",
        "text" => "color",
        "border" => "border-color",
        _ => return None,
    };
    let value = color_value(rest)?;
    Some(vec![decl(property, value)])
}

fn color_value(name: &str) -> Option<String> {
    match name {
        "white" => return Some("#fff".into()),
        "black" => return Some("#000".into()),
        "transparent" => return Some("transparent".into()),
        "current" => return Some("currentColor".into()),
        _ => {}
    }
    let (hue, shade) = name.rsplit_once('-')?;
    let shades = palette(hue)?;
    let index = match shade {
        "50" => 0,
        "100" => 1,
        "200" => 2,
        "300" => 3,
        "400" => 4,
        "500" => 5,
        "600" => 6,
        "700" => 7,
        "800" => 8,
        "900" => 9,
        _ => return None,
    };
    Some(shades[index].to_string())
}

/// Default palette, shades 50 through 900.
fn palette(hue: &str) -> Option<[&'static str; 10]> {
    let shades = match hue {
        "gray" => [
            "#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563",
            "#374151", "#1f2937", "#111827",
        ],
        "red" => [
            "#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626",
            "#b91c1c", "#991b1b", "#7f1d1d",
        ],
        "orange" => [
            "#fff7ed", "#ffedd5", "#fed7aa", "#fdba74", "#fb923c", "#f97316", "#ea580c",
            "#c2410c", "#9a3412", "#7c2d12",
        ],
        "yellow" => [
            "#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04",
            "#a16207", "#854d0e", "#713f12",
        ],
        "green" => [
            "#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a",
            "#15803d", "#166534", "#14532d",
        ],
        "teal" => [
            "#f0fdfa", "#ccfbf1", "#99f6e4", "#5eead4", "#2dd4bf", "#14b8a6", "#0d9488",
            "#0f766e", "#115e59", "#134e4a",
        ],
        "blue" => [
            "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb",
            "#1d4ed8", "#1e40af", "#1e3a8a",
        ],
        "indigo" => [
            "#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5",
            "#4338ca", "#3730a3", "#312e81",
        ],
        "purple" => [
            "#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea",
            "#7e22ce", "#6b21a8", "#581c87",
        ],
        "pink" => [
            "#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777",
            "#be185d", "#9d174d", "#831843",
        ],
        _ => return None,
    };
    Some(shades)
}

fn spacing_utility(base: &str) -> Option<Declarations> {
    let (prefix, value) = base.split_once('-')?;
    let properties: &[&'static str] = match prefix {
        "p" => &["padding"],
        "px" => &["padding-left", "padding-right"],
        "py" => &["padding-top", "padding-bottom"],
        "pt" => &["padding-top"],
        "pr" => &["padding-right"],
        "pb" => &["padding-bottom"],
        "pl" => &["padding-left"],
        "m" => &["margin"],
        "mx" => &["margin-left", "margin-right"],
        "my" => &["margin-top", "margin-bottom"],
        "mt" => &["margin-top"],
        "mr" => &["margin-right"],
        "mb" => &["margin-bottom"],
        "ml" => &["margin-left"],
        "gap" => &["gap"],
        "w" => &["width"],
        "h" => &["height"],
        "opacity" => {
            let n: u32 = value.parse().ok().filter(|n| *n <= 100)?;
            return Some(vec![decl("opacity", format!("{}", n as f32 / 100.0))]);
        }
        _ => return None,
    };
    let css_value = spacing_value(value)?;
    Some(
        properties
            .iter()
            .map(|p| decl(*p, css_value.clone()))
            .collect(),
    )
}

/// The default spacing scale: one unit is 0.25rem.
fn spacing_value(value: &str) -> Option<String> {
    match value {
        "0" => return Some("0px".into()),
        "px" => return Some("1px".into()),
        "auto" => return Some("auto".into()),
        "full" => return Some("100%".into()),
        _ => {}
    }
    let n: f32 = value.parse().ok()?;
    if !(0.0..=96.0).contains(&n) {
        return None;
    }
    Some(format!("{}rem", n * 0.25))
}
