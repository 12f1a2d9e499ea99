use super::MapperFile;
use crate::stmt::{
    Choose, Elif, Else, Foreach, If, Include, Node, Otherwise, SqlFragment, Statement,
    StatementKind, Trim, When, Where,
};

use batis_core::{Error, Result, TemplateError};
use indexmap::IndexMap;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

pub(super) fn parse(src: &str) -> Result<MapperFile> {
    let mut reader = Reader::from_str(src);
    reader.config_mut().trim_text(false);

    let mut builder = Builder { reader };
    builder.document()
}

struct Builder<'a> {
    reader: Reader<&'a [u8]>,
}

type Attrs = IndexMap<String, String>;

impl<'a> Builder<'a> {
    fn next(&mut self) -> Result<Event<'a>> {
        self.reader.read_event().map_err(|err| {
            Error::invalid_mapper(format!(
                "{err} (at byte {})",
                self.reader.buffer_position()
            ))
        })
    }

    fn document(&mut self) -> Result<MapperFile> {
        loop {
            match self.next()? {
                Event::Start(root) => {
                    let mut mapper = MapperFile {
                        attrs: attrs(&root)?,
                        ..MapperFile::default()
                    };
                    self.top_level(&mut mapper)?;
                    return Ok(mapper);
                }
                Event::Empty(root) => {
                    return Ok(MapperFile {
                        attrs: attrs(&root)?,
                        ..MapperFile::default()
                    })
                }
                Event::Text(text) if is_blank(&text) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(Error::invalid_mapper("text outside of the root element"))
                }
                Event::End(_) => return Err(Error::invalid_mapper("unexpected end tag")),
                Event::Eof => return Err(Error::invalid_mapper("no root element")),
                _ => {}
            }
        }
    }

    fn top_level(&mut self, mapper: &mut MapperFile) -> Result<()> {
        loop {
            let (start, empty) = match self.next()? {
                Event::Start(start) => (start, false),
                Event::Empty(start) => (start, true),
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(Error::invalid_mapper("unexpected end of document")),
                _ => continue,
            };

            let name = element_name(&start)?;
            let attrs = attrs(&start)?;

            if name == "sql" {
                let text = if empty { String::new() } else { self.text(&name)? };
                mapper.fragments.push(SqlFragment::new(required_id(&name, &attrs)?, text));
                continue;
            }

            let Some(kind) = StatementKind::from_element(&name) else {
                return Err(Error::template(TemplateError::ElementNotSupported(name)));
            };

            let children = if empty { vec![] } else { self.children(&name)? };
            let id = required_id(&name, &attrs)?;
            log::trace!("parsed {kind} statement `{id}`");

            mapper.statements.push(Statement {
                id,
                kind,
                attrs,
                children,
            });
        }
    }

    /// Read the children of the element named `parent` up to its end tag.
    fn children(&mut self, parent: &str) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();

        loop {
            match self.next()? {
                Event::Start(start) => nodes.push(self.element(&start, false)?),
                Event::Empty(start) => nodes.push(self.element(&start, true)?),
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|err| Error::invalid_mapper(err.to_string()))?;
                    if !text.is_empty() {
                        nodes.push(Node::Text(text.into_owned()));
                    }
                }
                Event::CData(data) => nodes.push(Node::Text(cdata(&data)?)),
                Event::End(_) => return Ok(nodes),
                Event::Eof => {
                    return Err(Error::invalid_mapper(format!(
                        "unexpected end of document inside `<{parent}>`"
                    )))
                }
                _ => {}
            }
        }
    }

    /// Read only character data up to the end tag of `parent`.
    fn text(&mut self, parent: &str) -> Result<String> {
        let mut out = String::new();

        loop {
            match self.next()? {
                Event::Text(text) => out.push_str(
                    &text
                        .unescape()
                        .map_err(|err| Error::invalid_mapper(err.to_string()))?,
                ),
                Event::CData(data) => out.push_str(&cdata(&data)?),
                Event::Start(start) | Event::Empty(start) => {
                    return Err(Error::template(TemplateError::ElementNotSupported(
                        element_name(&start)?,
                    )))
                }
                Event::End(_) => return Ok(out),
                Event::Eof => {
                    return Err(Error::invalid_mapper(format!(
                        "unexpected end of document inside `<{parent}>`"
                    )))
                }
                _ => {}
            }
        }
    }

    fn element(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<Node> {
        let name = element_name(start)?;
        let mut attrs = attrs(start)?;
        let mut attr = |key: &str| attrs.shift_remove(key);

        let node = match name.as_str() {
            "if" => If {
                test: attr("test").unwrap_or_default(),
                children: self.children_of(&name, empty)?,
            }
            .into(),
            "elif" => Elif {
                test: attr("test").unwrap_or_default(),
                children: self.children_of(&name, empty)?,
            }
            .into(),
            "else" => Else {
                children: self.children_of(&name, empty)?,
            }
            .into(),
            "choose" => Choose {
                children: self.children_of(&name, empty)?,
            }
            .into(),
            "when" => When {
                test: attr("test").unwrap_or_default(),
                children: self.children_of(&name, empty)?,
            }
            .into(),
            "otherwise" => Otherwise {
                children: self.children_of(&name, empty)?,
            }
            .into(),
            "where" => Where {
                children: self.children_of(&name, empty)?,
            }
            .into(),
            "trim" => Trim {
                prefix: attr("prefix").unwrap_or_default(),
                prefix_overrides: Trim::parse_overrides(
                    &attr("prefixoverrides").unwrap_or_default(),
                ),
                children: self.children_of(&name, empty)?,
            }
            .into(),
            "foreach" => Foreach {
                collection: attr("collection"),
                item: attr("item"),
                index: attr("index"),
                separator: attr("separator").unwrap_or_default(),
                children: self.children_of(&name, empty)?,
            }
            .into(),
            "include" => {
                let include = Include {
                    refid: attr("refid").unwrap_or_default(),
                    alias: attr("alias").unwrap_or_default(),
                    value: attr("value").unwrap_or_default(),
                };
                self.children_of(&name, empty)?;
                include.into()
            }
            "sql" => {
                let id = required_id(&name, &attrs)?;
                let text = if empty { String::new() } else { self.text(&name)? };
                SqlFragment::new(id, text).into()
            }
            _ => {
                return Err(Error::template(TemplateError::ElementNotSupported(
                    name.clone(),
                )))
            }
        };

        Ok(node)
    }

    fn children_of(&mut self, name: &str, empty: bool) -> Result<Vec<Node>> {
        if empty {
            Ok(vec![])
        } else {
            self.children(name)
        }
    }
}

/// Lowercased element name, including any namespace prefix.
fn element_name(start: &BytesStart<'_>) -> Result<String> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_lowercase)
        .map_err(|_| Error::invalid_mapper("element name is not UTF-8"))
}

/// Attributes with lowercased keys and trimmed values.
fn attrs(start: &BytesStart<'_>) -> Result<Attrs> {
    let mut attrs = Attrs::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|err| Error::invalid_mapper(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| Error::invalid_mapper("attribute name is not UTF-8"))?
            .to_lowercase();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::invalid_mapper(err.to_string()))?;
        attrs.insert(key, value.trim().to_string());
    }

    Ok(attrs)
}

fn required_id(element: &str, attrs: &Attrs) -> Result<String> {
    match attrs.get("id") {
        Some(id) if !id.is_empty() => Ok(id.clone()),
        _ => Err(Error::invalid_mapper(format!(
            "`<{element}>` requires an `id` attribute"
        ))),
    }
}

fn cdata(data: &[u8]) -> Result<String> {
    std::str::from_utf8(data)
        .map(str::to_string)
        .map_err(|_| Error::invalid_mapper("CDATA section is not UTF-8"))
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}
