#![forbid(unsafe_code)]

//! Animation stylesheet injected once at startup.
//!
//! The rules are plain data; [`Stylesheet::animations`] renders them into one
//! immutable CSS string that the controller hands to the host exactly once.

use core::fmt::Write as _;

/// Keyframe names the controller writes into inline `animation` values.
pub mod keyframes {
    pub const SLIDE_IN_UP: &str = "slideInUp";
    pub const SLIDE_IN_FROM_LEFT: &str = "slideInFromLeft";
    pub const FADE_IN_UP: &str = "fadeInUp";
    pub const RIPPLE: &str = "ripple";
    pub const SPIN: &str = "spin";
}

type Declarations = &'static [(&'static str, &'static str)];

struct Rule {
    selectors: &'static [&'static str],
    declarations: Declarations,
}

struct Keyframes {
    name: &'static str,
    from: Option<Declarations>,
    to: Declarations,
}

const EASE_STANDARD: &str = "all 0.3s cubic-bezier(0.4, 0, 0.2, 1)";

const KEYFRAMES: &[Keyframes] = &[
    Keyframes {
        name: keyframes::SLIDE_IN_UP,
        from: Some(&[("opacity", "0"), ("transform", "translateY(30px)")]),
        to: &[("opacity", "1"), ("transform", "translateY(0)")],
    },
    Keyframes {
        name: keyframes::SLIDE_IN_FROM_LEFT,
        from: Some(&[("opacity", "0"), ("transform", "translateX(-30px)")]),
        to: &[("opacity", "1"), ("transform", "translateX(0)")],
    },
    Keyframes {
        name: keyframes::FADE_IN_UP,
        from: Some(&[("opacity", "0"), ("transform", "translateY(20px) scale(0.95)")]),
        to: &[("opacity", "1"), ("transform", "translateY(0) scale(1)")],
    },
    Keyframes {
        name: keyframes::RIPPLE,
        from: None,
        to: &[("transform", "scale(4)"), ("opacity", "0")],
    },
    Keyframes {
        name: keyframes::SPIN,
        from: None,
        to: &[("transform", "rotate(360deg)")],
    },
];

const RULES: &[Rule] = &[
    Rule {
        selectors: &[".animate-in"],
        declarations: &[("animation", "slideInUp 0.6s ease forwards")],
    },
    Rule {
        selectors: &[".skill-tag", ".cert-tag"],
        declarations: &[("transition", EASE_STANDARD)],
    },
    Rule {
        selectors: &[
            ".experience-item",
            ".education-item",
            ".project-item",
            ".position-item",
            ".achievement-item",
        ],
        declarations: &[("transition", EASE_STANDARD)],
    },
    Rule {
        selectors: &[".position-icon", ".achievement-icon"],
        declarations: &[("transition", "transform 0.3s cubic-bezier(0.4, 0, 0.2, 1)")],
    },
    Rule {
        selectors: &[".logo-upload"],
        declarations: &[("transition", EASE_STANDARD)],
    },
    Rule {
        selectors: &[".profile-pic"],
        declarations: &[("transition", EASE_STANDARD)],
    },
    Rule {
        selectors: &[".contact-item"],
        declarations: &[("overflow", "hidden")],
    },
    Rule {
        selectors: &[".loading"],
        declarations: &[("opacity", "0.7"), ("pointer-events", "none")],
    },
    Rule {
        selectors: &[".loading::after"],
        declarations: &[
            ("content", "''"),
            ("position", "absolute"),
            ("top", "50%"),
            ("left", "50%"),
            ("width", "20px"),
            ("height", "20px"),
            ("margin", "-10px 0 0 -10px"),
            ("border", "2px solid transparent"),
            ("border-top-color", "var(--color-primary)"),
            ("border-radius", "50%"),
            ("animation", "spin 1s linear infinite"),
        ],
    },
];

/// Rendered animation/transition rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    css: String,
}

impl Stylesheet {
    /// Build the stylesheet used by the reveal, hover and ripple effects.
    #[must_use]
    pub fn animations() -> Self {
        let mut css = String::new();
        for rule in RULES {
            write_block(&mut css, &rule.selectors.join(",\n"), rule.declarations, "");
        }
        for frames in KEYFRAMES {
            let _ = writeln!(css, "@keyframes {} {{", frames.name);
            if let Some(from) = frames.from {
                write_block(&mut css, "from", from, "    ");
            }
            write_block(&mut css, "to", frames.to, "    ");
            css.push_str("}\n\n");
        }
        Self { css }
    }

    #[must_use]
    pub fn as_css(&self) -> &str {
        &self.css
    }

    /// Whether a `@keyframes` block named `name` is present.
    #[must_use]
    pub fn defines_keyframes(&self, name: &str) -> bool {
        KEYFRAMES.iter().any(|frames| frames.name == name)
    }
}

fn write_block(out: &mut String, selector: &str, declarations: Declarations, indent: &str) {
    let _ = writeln!(out, "{indent}{selector} {{");
    for (property, value) in declarations {
        let _ = writeln!(out, "{indent}    {property}: {value};");
    }
    let _ = writeln!(out, "{indent}}}");
    if indent.is_empty() {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyframes_block_is_rendered() {
        let sheet = Stylesheet::animations();
        for name in [
            keyframes::SLIDE_IN_UP,
            keyframes::SLIDE_IN_FROM_LEFT,
            keyframes::FADE_IN_UP,
            keyframes::RIPPLE,
            keyframes::SPIN,
        ] {
            assert!(sheet.defines_keyframes(name));
            assert!(
                sheet.as_css().contains(&format!("@keyframes {name} {{")),
                "missing {name}"
            );
        }
    }

    #[test]
    fn animate_in_uses_slide_in_up() {
        let sheet = Stylesheet::animations();
        assert!(
            sheet
                .as_css()
                .contains(".animate-in {\n    animation: slideInUp 0.6s ease forwards;\n}")
        );
    }

    #[test]
    fn grouped_selectors_share_one_block() {
        let css = Stylesheet::animations();
        assert!(css.as_css().contains(".skill-tag,\n.cert-tag {"));
        assert!(css.as_css().contains("border-top-color: var(--color-primary);"));
    }

    #[test]
    fn ripple_keyframes_have_no_from_block() {
        let css = Stylesheet::animations();
        let start = css.as_css().find("@keyframes ripple").expect("ripple block");
        let block = &css.as_css()[start..];
        let end = block.find("}\n\n").expect("block end");
        assert!(!block[..end].contains("from {"));
    }
}
