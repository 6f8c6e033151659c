//! Reader for the **dual-stage shader source** format.
//!
//! A source file holds exactly two blocks, each opened by a marker line:
//!
//! ```text
//! #type vertex
//! ...vertex body...
//! #type fragment
//! ...fragment body...
//! ```
//!
//! Blocks may appear in either order. The marker line ends at the next line
//! break (`\r\n` or `\n`) and is not part of the body.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`stage`] | `ShaderStage` |
//! | [`error`] | `ParseError`, `ParseErrorKind` |
//! | [`parser`] | `parse_str`, `DualStageSource` |
//! | [`listing`] | `numbered_listing` for compile diagnostics |
//!
//! ```rust
//! use jade_shader_format::{parse_str, ShaderStage};
//!
//! let src = "#type vertex\r\nvs body\r\n#type fragment\r\nfs body\r\n";
//! let parsed = parse_str(src).unwrap();
//! assert_eq!(parsed.vertex, "vs body\r\n");
//! assert_eq!(parsed.order, [ShaderStage::Vertex, ShaderStage::Fragment]);
//! ```

pub mod error;
pub mod listing;
pub mod parser;
pub mod stage;

pub use error::{ParseError, ParseErrorKind};
pub use listing::numbered_listing;
pub use parser::{parse_str, DualStageSource, STAGE_MARKER};
pub use stage::ShaderStage;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn err(src: &str) -> ParseError { parse_str(src).unwrap_err() }

    const VS: &str = "@vertex\nfn vs_main() -> @builtin(position) vec4<f32> {\n    return vec4<f32>(0.0);\n}\n";
    const FS: &str = "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec4<f32>(1.0);\n}\n";

    #[test]
    fn vertex_then_fragment_crlf() {
        let src = "#type vertex\r\nA\r\nB\r\n#type fragment\r\nC\r\n";
        let p = parse_str(src).unwrap();
        assert_eq!(p.vertex, "A\r\nB\r\n");
        assert_eq!(p.fragment, "C\r\n");
        assert_eq!(p.order, [ShaderStage::Vertex, ShaderStage::Fragment]);
    }

    #[test]
    fn fragment_then_vertex_keeps_order() {
        let src = format!("#type fragment\n{FS}#type vertex\n{VS}");
        let p = parse_str(&src).unwrap();
        assert_eq!(p.vertex, VS);
        assert_eq!(p.fragment, FS);
        assert_eq!(p.order, [ShaderStage::Fragment, ShaderStage::Vertex]);
    }

    #[test]
    fn bodies_are_verbatim_in_both_orders() {
        for (first, second) in [(ShaderStage::Vertex, ShaderStage::Fragment),
                                (ShaderStage::Fragment, ShaderStage::Vertex)] {
            let body = |s: ShaderStage| if s == ShaderStage::Vertex { VS } else { FS };
            let src = format!("#type {first}\r\n{}#type {second}\r\n{}", body(first), body(second));
            let p = parse_str(&src).unwrap();
            assert_eq!(p.body(first), body(first));
            assert_eq!(p.body(second), body(second));
        }
    }

    #[test]
    fn last_body_without_trailing_newline() {
        let p = parse_str("#type vertex\nv\n#type fragment\nf").unwrap();
        assert_eq!(p.fragment, "f");
    }

    #[test]
    fn multiple_spaces_and_tabs_after_marker() {
        let p = parse_str("#type   vertex\nv\n#type\tfragment  \nf\n").unwrap();
        assert_eq!(p.vertex, "v\n");
        assert_eq!(p.fragment, "f\n");
    }

    #[test]
    fn preamble_is_ignored() {
        let p = parse_str("// header\n\n#type vertex\nv\n#type fragment\nf\n").unwrap();
        assert_eq!(p.vertex, "v\n");
    }

    #[test]
    fn typedef_like_text_is_body() {
        let p = parse_str("#type vertex\n#typedef x\n#type fragment\nf\n").unwrap();
        assert_eq!(p.vertex, "#typedef x\n");
    }

    #[test]
    fn empty_bodies_are_allowed() {
        let p = parse_str("#type vertex\n#type fragment\n").unwrap();
        assert_eq!(p.vertex, "");
        assert_eq!(p.fragment, "");
    }

    #[test]
    fn err_unknown_stage() {
        let e = err("#type vertex\nv\n#type geometry\ng\n");
        assert_eq!(e.kind, ParseErrorKind::UnknownStage("geometry".into()));
        assert_eq!(e.line, 3);
    }

    #[test]
    fn err_stage_names_are_case_sensitive() {
        let e = err("#type Vertex\nv\n#type fragment\nf\n");
        assert_eq!(e.kind, ParseErrorKind::UnknownStage("Vertex".into()));
    }

    #[test]
    fn err_missing_fragment() {
        let e = err("#type vertex\nv\n");
        assert_eq!(e.kind, ParseErrorKind::MissingStage(ShaderStage::Fragment));
    }

    #[test]
    fn err_missing_vertex() {
        let e = err("#type fragment\nf\n");
        assert_eq!(e.kind, ParseErrorKind::MissingStage(ShaderStage::Vertex));
    }

    #[test]
    fn err_empty_source() {
        let e = err("");
        assert_eq!(e.kind, ParseErrorKind::MissingStage(ShaderStage::Vertex));
        assert_eq!(e.line, 1);
    }

    #[test]
    fn err_duplicate_stage() {
        let e = err("#type vertex\na\n#type vertex\nb\n#type fragment\nf\n");
        assert_eq!(e.kind, ParseErrorKind::DuplicateStage(ShaderStage::Vertex));
        assert_eq!(e.line, 3);
    }

    #[test]
    fn err_marker_without_name() {
        let e = err("#type\r\nv\r\n");
        assert_eq!(e.kind, ParseErrorKind::MissingStageName);
        assert_eq!(e.line, 1);
    }

    #[test]
    fn error_display_mentions_line() {
        let msg = err("#type pixel\n").to_string();
        assert!(msg.contains("line 1"), "got: {msg}");
        assert!(msg.contains("pixel"), "got: {msg}");
    }

    #[test]
    fn listing_numbers_and_appends_log() {
        let out = numbered_listing("a\nb", "error: bad");
        assert_eq!(out, "1: a\n2: b\n\nerror: bad");
    }

    #[test]
    fn listing_right_aligns() {
        let src = (1..=10).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let out = numbered_listing(&src, "");
        assert!(out.starts_with(" 1: l1"), "got: {out}");
        assert!(out.ends_with("10: l10"), "got: {out}");
    }
}
