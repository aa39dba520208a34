//! The table of call shapes the extractor recognizes.
//!
//! A shape is one call site combined with one literal spelling, either
//! passed directly or wrapped in a block-literal macro such as
//! `indoc! { ... }`. Adding a literal spelling or call site extends the
//! table without touching the extraction loop.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::extract::literal::LiteralKind;

/// A call site that takes a code literal, described by the regex
/// fragments that surround the literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub name: String,
    pub open: String,
    pub close: String,
}

impl CallSite {
    pub fn new(name: &str, open: &str, close: &str) -> Self {
        Self {
            name: name.into(),
            open: open.into(),
            close: close.into(),
        }
    }

    /// `run(<literal>)` and `let mod_src = <literal>;`.
    pub fn defaults() -> Vec<CallSite> {
        vec![
            CallSite::new("run", r"run\s*\(", r"\s*\)"),
            CallSite::new("mod_src", r"let\s+mod_src\s*=", r"\s*;"),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct CallShape {
    pub call_site: String,
    pub literal: LiteralKind,
    pub block: bool,
    pub regex: Regex,
}

impl CallShape {
    fn compile(site: &CallSite, literal: LiteralKind, block_macro: Option<&str>) -> Result<Self> {
        let source = match block_macro {
            None => format!(r"(?:{})\s*{}(?:{})", site.open, literal.pattern(), site.close),
            Some(name) => format!(
                r"(?:{})\s*{}!\s*\{{\s*{}\s*\}}(?:{})",
                site.open,
                regex::escape(name),
                literal.pattern(),
                site.close
            ),
        };
        let regex = Regex::new(&source).map_err(|e| {
            Error::Config(format!("call site '{}' has an invalid pattern: {e}", site.name))
        })?;
        Ok(Self {
            call_site: site.name.clone(),
            literal,
            block: block_macro.is_some(),
            regex,
        })
    }
}

/// The compiled shape table, in scan order.
#[derive(Debug, Clone)]
pub struct ShapeTable {
    shapes: Vec<CallShape>,
}

impl ShapeTable {
    /// For each call site: the plain shapes for every literal kind, then
    /// the block-macro shapes.
    pub fn build(call_sites: &[CallSite], block_macro: &str) -> Result<Self> {
        let mut shapes = Vec::with_capacity(call_sites.len() * LiteralKind::ALL.len() * 2);
        for site in call_sites {
            for wrapper in [None, Some(block_macro)] {
                for literal in LiteralKind::ALL {
                    shapes.push(CallShape::compile(site, literal, wrapper)?);
                }
            }
        }
        Ok(Self { shapes })
    }

    pub fn shapes(&self) -> &[CallShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Default for ShapeTable {
    fn default() -> Self {
        Self::build(&CallSite::defaults(), "indoc").expect("default call shapes compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_capture<'a>(shape: &CallShape, text: &'a str) -> Option<&'a str> {
        shape
            .regex
            .captures(text)
            .and_then(|c| c.name("body"))
            .map(|m| m.as_str())
    }

    #[test]
    fn default_table_orders_plain_before_block_per_call_site() {
        let table = ShapeTable::default();
        assert_eq!(table.len(), 12);
        let order: Vec<_> = table
            .shapes()
            .iter()
            .map(|s| (s.call_site.as_str(), s.block, s.literal.as_str()))
            .collect();
        assert_eq!(order[0], ("run", false, "quoted"));
        assert_eq!(order[2], ("run", false, "raw_hash"));
        assert_eq!(order[3], ("run", true, "quoted"));
        assert_eq!(order[6], ("mod_src", false, "quoted"));
        assert_eq!(order[11], ("mod_src", true, "raw_hash"));
    }

    #[test]
    fn raw_hash_closes_at_first_hash_quote() {
        let table = ShapeTable::default();
        let shape = &table.shapes()[2];
        assert_eq!(
            first_capture(shape, r##"run(r#"let s = "x"; s"#)"##),
            Some(r#"let s = "x"; s"#)
        );
        assert_eq!(first_capture(shape, r##"run(r#"a"""#)"##), Some(r#"a"""#));
        assert_eq!(first_capture(shape, r##"run(r#"a"# + b"#)"##), None);
    }

    #[test]
    fn block_shape_requires_macro_wrapper() {
        let table = ShapeTable::default();
        let block = &table.shapes()[3];
        assert_eq!(first_capture(block, "run(\"x\")"), None);
        assert_eq!(
            first_capture(block, "run(indoc! { \"\n  x\n\" })"),
            Some("\n  x\n")
        );
    }

    #[test]
    fn mod_src_shape_matches_let_binding() {
        let table = ShapeTable::default();
        let shape = &table.shapes()[6];
        assert_eq!(
            first_capture(shape, "let  mod_src = \"fn f() {}\" ;"),
            Some("fn f() {}")
        );
    }

    #[test]
    fn groups_in_call_site_fragments_stay_local() {
        let sites = [CallSite::new("either", r"(run|eval)\s*\(", r"\s*\)|\s*;")];
        let table = ShapeTable::build(&sites, "indoc").unwrap();
        let quoted = &table.shapes()[0];
        assert_eq!(
            first_capture(quoted, "eval(\"let x = 1\")"),
            Some("let x = 1")
        );
        // an alternation in `close` must not stand alone as a full match
        assert!(!quoted.regex.is_match("x;"));
    }

    #[test]
    fn invalid_call_site_pattern_is_a_config_error() {
        let err = ShapeTable::build(&[CallSite::new("broken", r"run(", r"\)")], "indoc")
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("broken"));
    }
}
