use std::collections::BTreeMap;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use snafu::prelude::*;

use crate::common::{EncodeSnafu, Fault, ResponseSnafu, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    DateTime(String),
    Base64(String),
    Struct(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Nil,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn member(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.get(name),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

pub(super) fn encode_call(method: &str, params: &[Value]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_call(&mut writer, method, params)
        .boxed_local()
        .context(EncodeSnafu {
            message: format!("Failed to encode {method} call"),
        })?;
    String::from_utf8(writer.into_inner())
        .boxed_local()
        .context(EncodeSnafu {
            message: format!("Failed to encode {method} call"),
        })
}

fn write_call(
    writer: &mut Writer<Vec<u8>>,
    method: &str,
    params: &[Value],
) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    start(writer, "methodCall")?;
    element(writer, "methodName", method)?;
    start(writer, "params")?;
    for param in params {
        start(writer, "param")?;
        write_value(writer, param)?;
        end(writer, "param")?;
    }
    end(writer, "params")?;
    end(writer, "methodCall")
}

fn write_value(writer: &mut Writer<Vec<u8>>, value: &Value) -> quick_xml::Result<()> {
    start(writer, "value")?;
    match value {
        Value::Int(i) => element(writer, "int", &i.to_string())?,
        Value::Bool(b) => element(writer, "boolean", if *b { "1" } else { "0" })?,
        Value::String(s) => element(writer, "string", s)?,
        Value::Double(d) => element(writer, "double", &d.to_string())?,
        Value::DateTime(s) => element(writer, "dateTime.iso8601", s)?,
        Value::Base64(s) => element(writer, "base64", s)?,
        Value::Struct(members) => {
            start(writer, "struct")?;
            for (name, member) in members {
                start(writer, "member")?;
                element(writer, "name", name)?;
                write_value(writer, member)?;
                end(writer, "member")?;
            }
            end(writer, "struct")?;
        }
        Value::Array(items) => {
            start(writer, "array")?;
            start(writer, "data")?;
            for item in items {
                write_value(writer, item)?;
            }
            end(writer, "data")?;
            end(writer, "array")?;
        }
        Value::Nil => {
            writer.write_event(Event::Empty(BytesStart::new("nil")))?;
        }
    }
    end(writer, "value")
}

fn start(writer: &mut Writer<Vec<u8>>, name: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> quick_xml::Result<()> {
    start(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, name)
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    fn child(&self, name: &str) -> Result<&Element> {
        self.find(name).context(ResponseSnafu {
            message: format!("Missing <{name}> in <{}>", self.name),
        })
    }
}

fn malformed(err: impl std::fmt::Display) -> crate::common::Error {
    ResponseSnafu {
        message: format!("Malformed XML-RPC response: {err}"),
    }
    .build()
}

fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    // The bottom of the stack collects the document element.
    let mut stack = vec![Element::default()];

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => stack.push(Element::named(e.name().as_ref())),
            Event::Empty(e) => {
                let element = Element::named(e.name().as_ref());
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(malformed("unbalanced closing tag"));
                }
                if let (Some(element), Some(parent)) = (stack.pop(), stack.last_mut()) {
                    parent.children.push(element);
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(malformed)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(malformed("unexpected end of document"));
    }
    stack
        .pop()
        .and_then(|root| root.children.into_iter().next())
        .ok_or_else(|| malformed("empty document"))
}

fn parse_scalar<T: std::str::FromStr>(kind: &str, text: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| malformed(format!("invalid {kind} {text:?}")))
}

fn decode_value(element: &Element) -> Result<Value> {
    // A value without a type element is a string.
    let Some(typed) = element.children.first() else {
        return Ok(Value::String(element.text.clone()));
    };
    let text = typed.text.as_str();

    Ok(match typed.name.as_str() {
        "int" | "i4" | "i8" => Value::Int(parse_scalar(&typed.name, text)?),
        "boolean" => match text.trim() {
            "1" => Value::Bool(true),
            "0" => Value::Bool(false),
            other => return Err(malformed(format!("invalid boolean {other:?}"))),
        },
        "string" => Value::String(text.to_string()),
        "double" => Value::Double(parse_scalar("double", text)?),
        "dateTime.iso8601" => Value::DateTime(text.trim().to_string()),
        "base64" => Value::Base64(text.trim().to_string()),
        "nil" => Value::Nil,
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed.children.iter().filter(|c| c.name == "member") {
                let name = member.child("name")?.text.clone();
                members.insert(name, decode_value(member.child("value")?)?);
            }
            Value::Struct(members)
        }
        // `<array/>` carries no data element.
        "array" => Value::Array(match typed.find("data") {
            Some(data) => data
                .children
                .iter()
                .filter(|c| c.name == "value")
                .map(decode_value)
                .collect::<Result<_>>()?,
            None => Vec::new(),
        }),
        other => return Err(malformed(format!("unknown value type <{other}>"))),
    })
}

fn decode_fault(value: Value) -> Result<Fault> {
    let code = match value.member("faultCode") {
        Some(Value::Int(code)) => *code,
        _ => return Err(malformed("fault without faultCode")),
    };
    let message = value
        .member("faultString")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(Fault { code, message })
}

/// Decodes a `methodResponse`. The outer result fails on a malformed
/// document, the inner one carries a fault reported by the server.
pub(super) fn decode_response(xml: &str) -> Result<std::result::Result<Value, Fault>> {
    let document = parse_document(xml)?;
    if document.name != "methodResponse" {
        return Err(malformed(format!("unexpected <{}>", document.name)));
    }

    if let Some(fault) = document.find("fault") {
        let value = decode_value(fault.child("value")?)?;
        return Ok(Err(decode_fault(value)?));
    }

    let value = document.child("params")?.child("param")?.child("value")?;
    Ok(Ok(decode_value(value)?))
}
