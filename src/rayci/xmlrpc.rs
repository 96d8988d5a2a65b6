//! Minimal XML-RPC codec for the RayCi remote interface.
//!
//! Covers the value types RayCi actually exchanges: int, boolean, double,
//! string, array, struct and nil. Responses are parsed into a small element
//! tree first and then interpreted.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::RpcError;

/// A single XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Struct(BTreeMap<String, Value>),
    Nil,
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Look up a member of a struct value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.get(key),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "boolean",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
            Value::Nil => "nil",
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// Serialize a method call into an XML-RPC request body.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut body = String::from("<?xml version=\"1.0\"?>\n<methodCall>");
    let _ = write!(body, "<methodName>{}</methodName><params>", escape(method));
    for param in params {
        body.push_str("<param>");
        encode_value(&mut body, param);
        body.push_str("</param>");
    }
    body.push_str("</params></methodCall>\n");
    body
}

fn encode_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(v) => {
            let _ = write!(out, "<int>{}</int>", v);
        }
        Value::Bool(v) => {
            let _ = write!(out, "<boolean>{}</boolean>", if *v { 1 } else { 0 });
        }
        Value::Double(v) => {
            let _ = write!(out, "<double>{}</double>", v);
        }
        Value::String(v) => {
            let _ = write!(out, "<string>{}</string>", escape(v.as_str()));
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                let _ = write!(out, "<member><name>{}</name>", escape(name.as_str()));
                encode_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

/// Parse a `methodResponse` body.
///
/// A `<fault>` response becomes [`RpcError::Fault`].
pub fn decode_response(body: &str) -> Result<Value, RpcError> {
    let root = parse_tree(body)?;
    if root.name != "methodResponse" {
        return Err(malformed(format!(
            "expected <methodResponse>, found <{}>",
            root.name
        )));
    }

    if let Some(fault) = root.child("fault") {
        let value = decode_value(fault.required_child("value")?)?;
        let code = value
            .get("faultCode")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        let message = value
            .get("faultString")
            .and_then(Value::as_str)
            .unwrap_or("unknown fault")
            .to_string();
        return Err(RpcError::Fault { code, message });
    }

    let params = root.required_child("params")?;
    match params.child("param") {
        Some(param) => decode_value(param.required_child("value")?),
        // A void method may answer with an empty <params/>.
        None => Ok(Value::Nil),
    }
}

fn decode_value(element: &Element) -> Result<Value, RpcError> {
    let Some(typed) = element.children.first() else {
        return Ok(Value::String(element.text.clone()));
    };

    let text = typed.text.trim();
    match typed.name.as_str() {
        "int" | "i4" | "i8" => text
            .parse()
            .map(Value::Int)
            .map_err(|_| malformed(format!("invalid integer '{}'", text))),
        "boolean" => match text {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            _ => Err(malformed(format!("invalid boolean '{}'", text))),
        },
        "double" => text
            .parse()
            .map(Value::Double)
            .map_err(|_| malformed(format!("invalid double '{}'", text))),
        "string" => Ok(Value::String(typed.text.clone())),
        "nil" => Ok(Value::Nil),
        "array" => {
            let data = typed.required_child("data")?;
            data.children
                .iter()
                .filter(|c| c.name == "value")
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed.children.iter().filter(|c| c.name == "member") {
                let name = member.required_child("name")?.text.clone();
                let value = decode_value(member.required_child("value")?)?;
                members.insert(name, value);
            }
            Ok(Value::Struct(members))
        }
        // dateTime.iso8601 and base64 are passed through as text
        "dateTime.iso8601" | "base64" => Ok(Value::String(text.to_string())),
        other => Err(malformed(format!("unsupported value type <{}>", other))),
    }
}

fn malformed(message: String) -> RpcError {
    RpcError::MalformedResponse(message)
}

/// An element of the parsed response document.
#[derive(Debug)]
struct Element {
    name: String,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
            text: String::new(),
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn required_child(&self, name: &str) -> Result<&Element, RpcError> {
        self.child(name)
            .ok_or_else(|| malformed(format!("<{}> is missing <{}>", self.name, name)))
    }
}

fn parse_tree(body: &str) -> Result<Element, RpcError> {
    let mut reader = Reader::from_str(body);
    let mut stack = vec![Element::new(String::new())];

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(Element::new(name));
            }
            Event::Empty(empty) => {
                let name = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Element::new(name));
                }
            }
            Event::End(_) => {
                let finished = stack
                    .pop()
                    .ok_or_else(|| malformed("unbalanced closing tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(finished),
                    None => return Err(malformed("unbalanced closing tag".to_string())),
                }
            }
            Event::Text(text) => {
                let unescaped = text.unescape()?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                let raw = data.into_inner();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(malformed("unexpected end of document".to_string()));
    }
    stack
        .pop()
        .and_then(|document| document.children.into_iter().next())
        .ok_or_else(|| malformed("empty response body".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(value: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?>\n<methodResponse><params><param><value>{}</value></param></params></methodResponse>",
            value
        )
    }

    #[test]
    fn test_encode_call_with_mixed_params() {
        let body = encode_call(
            "RayCi.Single.saveAs",
            &[Value::from(7), Value::from("C:\\out\\a&b.png"), Value::from(true)],
        );
        assert!(body.starts_with("<?xml version=\"1.0\"?>"));
        assert!(body.contains("<methodName>RayCi.Single.saveAs</methodName>"));
        assert!(body.contains("<param><value><int>7</int></value></param>"));
        assert!(body.contains("<string>C:\\out\\a&amp;b.png</string>"));
        assert!(body.contains("<boolean>1</boolean>"));
    }

    #[test]
    fn test_encode_call_without_params() {
        let body = encode_call("RayCi.LiveMode.list", &[]);
        assert!(body.contains("<params></params>"));
    }

    #[test]
    fn test_encode_double_and_false() {
        let body = encode_call("m", &[Value::from(2.5), Value::from(false)]);
        assert!(body.contains("<double>2.5</double>"));
        assert!(body.contains("<boolean>0</boolean>"));
    }

    #[test]
    fn test_encode_nested_values() {
        let mut members = BTreeMap::new();
        members.insert("sName".to_string(), Value::from("cam"));
        let body = encode_call(
            "m",
            &[Value::Array(vec![Value::Struct(members), Value::Nil])],
        );
        assert!(body.contains(
            "<array><data><value><struct><member><name>sName</name><value><string>cam</string></value></member></struct></value><value><nil/></value></data></array>"
        ));
    }

    #[test]
    fn test_decode_scalar_types() {
        assert_eq!(
            decode_response(&response("<int>42</int>")).unwrap(),
            Value::Int(42)
        );
        assert_eq!(
            decode_response(&response("<i4>-3</i4>")).unwrap(),
            Value::Int(-3)
        );
        assert_eq!(
            decode_response(&response("<boolean>1</boolean>")).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            decode_response(&response("<double>1.25</double>")).unwrap(),
            Value::Double(1.25)
        );
        assert_eq!(
            decode_response(&response("<string>a &lt; b</string>")).unwrap(),
            Value::String("a < b".to_string())
        );
        assert_eq!(
            decode_response(&response("<nil/>")).unwrap(),
            Value::Nil
        );
    }

    #[test]
    fn test_decode_untyped_value_is_string() {
        assert_eq!(
            decode_response(&response("Video Stream")).unwrap(),
            Value::String("Video Stream".to_string())
        );
    }

    #[test]
    fn test_decode_empty_string_element() {
        assert_eq!(
            decode_response(&response("<string/>")).unwrap(),
            Value::String(String::new())
        );
    }

    #[test]
    fn test_decode_array_of_structs() {
        let body = response(
            "<array><data>\
             <value><struct>\
               <member><name>sName</name><value><string>UC480</string></value></member>\
               <member><name>nIdDoc</name><value><int>3</int></value></member>\
             </struct></value>\
             <value><struct>\
               <member><name>sName</name><value>not connected</value></member>\
             </struct></value>\
             </data></array>",
        );
        let value = decode_response(&body).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("sName").and_then(Value::as_str), Some("UC480"));
        assert_eq!(items[0].get("nIdDoc").and_then(Value::as_i64), Some(3));
        assert_eq!(
            items[1].get("sName").and_then(Value::as_str),
            Some("not connected")
        );
    }

    #[test]
    fn test_decode_whitespace_between_elements() {
        let body = "<?xml version=\"1.0\"?>\n<methodResponse>\n  <params>\n    <param>\n      <value>\n        <int>5</int>\n      </value>\n    </param>\n  </params>\n</methodResponse>\n";
        assert_eq!(decode_response(body).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_decode_empty_params_is_nil() {
        let body = "<?xml version=\"1.0\"?><methodResponse><params/></methodResponse>";
        assert_eq!(decode_response(body).unwrap(), Value::Nil);
    }

    #[test]
    fn test_decode_fault() {
        let body = "<?xml version=\"1.0\"?><methodResponse><fault><value><struct>\
            <member><name>faultCode</name><value><int>4</int></value></member>\
            <member><name>faultString</name><value><string>Too many parameters.</string></value></member>\
            </struct></value></fault></methodResponse>";
        match decode_response(body) {
            Err(RpcError::Fault { code, message }) => {
                assert_eq!(code, 4);
                assert_eq!(message, "Too many parameters.");
            }
            other => panic!("Expected fault, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_wrong_root() {
        let result = decode_response("<html><body>nope</body></html>");
        assert!(matches!(result, Err(RpcError::MalformedResponse(_))));
    }

    #[test]
    fn test_decode_rejects_bad_integer() {
        let result = decode_response(&response("<int>four</int>"));
        assert!(matches!(result, Err(RpcError::MalformedResponse(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_document() {
        let result = decode_response("<methodResponse><params><param><value><int>1</int>");
        assert!(result.is_err());
    }
}
