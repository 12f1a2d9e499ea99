/// Escape `&`, `<`, `>`, `'` and `"` inside quoted attribute values, so
/// authors can write `test="a < b"` without entities.
///
/// Entities already present are unescaped first, which makes the pass
/// idempotent. Text content, comments, CDATA sections and processing
/// instructions are copied unchanged.
pub fn preprocess(src: &str) -> String {
    const VERBATIM: [(&str, &str); 3] = [("<!--", "-->"), ("<![CDATA[", "]]>"), ("<?", "?>")];

    let mut out = String::with_capacity(src.len() + src.len() / 8);
    let mut rest = src;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some((open, close)) = VERBATIM.iter().find(|(open, _)| rest.starts_with(open)) {
            let end = rest[open.len()..]
                .find(close)
                .map_or(rest.len(), |i| open.len() + i + close.len());
            out.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }

        let mut quote = None;
        let mut value = String::new();
        let mut end = rest.len();

        for (i, c) in rest.char_indices() {
            match quote {
                Some(q) if c == q => {
                    out.push_str(&escape_attr(&value));
                    value.clear();
                    out.push(c);
                    quote = None;
                }
                Some(_) => value.push(c),
                None => {
                    out.push(c);
                    match c {
                        '"' | '\'' if i > 0 => quote = Some(c),
                        '>' => {
                            end = i + 1;
                            break;
                        }
                        _ => {}
                    }
                }
            }
        }

        // Unterminated value: leave it for the parser to reject.
        out.push_str(&value);
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

fn escape_attr(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}
