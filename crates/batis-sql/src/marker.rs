//! `#{expr}` and `${expr}` markers inside statement text.

use batis_core::Result;

use regex::Regex;
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#$]\{.*?\}").expect("valid marker regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sigil {
    /// `#{}`: bound as a driver parameter
    Param,
    /// `${}`: spliced into the SQL text
    Literal,
}

impl Sigil {
    pub(crate) fn as_char(self) -> char {
        match self {
            Sigil::Param => '#',
            Sigil::Literal => '$',
        }
    }
}

/// Rewrite every marker in `text`, left to right. `f` receives the sigil and
/// the trimmed inner expression and returns the replacement text.
pub(crate) fn replace(
    text: &str,
    mut f: impl FnMut(Sigil, &str) -> Result<String>,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in MARKER.find_iter(text) {
        out.push_str(&text[last..m.start()]);

        let marker = m.as_str();
        let sigil = if marker.starts_with('#') {
            Sigil::Param
        } else {
            Sigil::Literal
        };
        out.push_str(&f(sigil, marker[2..marker.len() - 1].trim())?);

        last = m.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_match() {
        let mut seen = vec![];
        let out = replace("a = #{ a } and b in ${b}}", |sigil, expr| {
            seen.push((sigil, expr.to_string()));
            Ok("?".to_string())
        })
        .unwrap();

        assert_eq!(out, "a = ? and b in ?}");
        assert_eq!(
            seen,
            [
                (Sigil::Param, "a".to_string()),
                (Sigil::Literal, "b".to_string())
            ]
        );
    }
}
