//! Markup bindings
//!
//! Two binding kinds are scanned out of freshly rendered markup: `model`
//! attributes (two-way value binding to a dotted state path) and the
//! standard HTML event attributes (`onclick="save(name, 2)"`). Event
//! expressions are parsed into a method name plus argument sources; each
//! argument is either a state field path or a literal. Methods must be
//! declared in the component's binding table - there is no free-form
//! expression evaluation.

use mote_dom::NodeId;
use serde_json::Value;

use crate::state::ControllerState;

/// The full standard set of HTML event attributes scanned for bindings
pub const EVENT_ATTRIBUTES: &[&str] = &[
    "onclick",
    "ondblclick",
    "onmousedown",
    "onmousemove",
    "onmouseout",
    "onmouseover",
    "onmouseup",
    "onkeydown",
    "onkeypress",
    "onkeyup",
    "onabort",
    "onbeforeunload",
    "onerror",
    "onload",
    "onresize",
    "onscroll",
    "onunload",
    "onblur",
    "onchange",
    "onfocus",
    "onreset",
    "onselect",
    "onsubmit",
    "oncontextmenu",
    "oninput",
    "oninvalid",
    "onsearch",
    "ondrag",
    "ondragend",
    "ondragenter",
    "ondragleave",
    "ondragover",
    "ondragstart",
    "ondrop",
    "oncopy",
    "oncut",
    "onpaste",
    "onwheel",
    "ontouchcancel",
    "ontouchend",
    "ontouchmove",
    "ontouchstart",
];

/// An argument source in an event expression
#[derive(Debug, Clone, PartialEq)]
pub enum ArgExpr {
    /// Resolved against controller state at dispatch time
    Field(String),
    /// Fixed value parsed from the expression
    Literal(Value),
}

/// A bound event handler discovered in rendered markup
#[derive(Debug, Clone)]
pub struct EventBinding {
    pub node: NodeId,
    /// Event attribute name (`"onclick"`, ...)
    pub event: String,
    pub method: String,
    pub args: Vec<ArgExpr>,
}

/// A two-way value binding discovered in rendered markup
#[derive(Debug, Clone)]
pub struct ModelBinding {
    pub node: NodeId,
    /// Dotted controller-state path
    pub path: String,
}

/// Parse `save(name, 2)` into a method name and argument sources.
/// Returns `None` for expressions that are not a plain call form.
pub fn parse_event_expr(expr: &str) -> Option<(String, Vec<ArgExpr>)> {
    let expr = expr.trim();
    let (name, rest) = match expr.find('(') {
        Some(open) => {
            let close = expr.rfind(')')?;
            if close < open || !expr[close + 1..].trim().is_empty() {
                return None;
            }
            let inner = expr[open + 1..close].trim();
            // plain call form only: no nested calls, no statements
            if inner.contains('(') || inner.contains(')') || inner.contains(';') {
                return None;
            }
            (expr[..open].trim(), inner)
        }
        None => (expr, ""),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let args = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(|token| parse_arg(token.trim())).collect()
    };
    Some((name.to_string(), args))
}

fn parse_arg(token: &str) -> ArgExpr {
    if let Some(value) = parse_literal(token) {
        ArgExpr::Literal(value)
    } else {
        ArgExpr::Field(token.to_string())
    }
}

fn parse_literal(token: &str) -> Option<Value> {
    if token.len() >= 2 {
        let quoted = (token.starts_with('\'') && token.ends_with('\''))
            || (token.starts_with('"') && token.ends_with('"'));
        if quoted {
            return Some(Value::String(token[1..token.len() - 1].to_string()));
        }
    }
    match token {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "null" => return Some(Value::Null),
        _ => {}
    }
    if let Ok(n) = token.parse::<i64>() {
        return Some(Value::from(n));
    }
    if let Ok(f) = token.parse::<f64>() {
        return Some(Value::from(f));
    }
    None
}

/// Resolve argument sources against state. Unresolvable fields yield
/// `Null` rather than raising (best-effort binding).
pub fn resolve_args(state: &ControllerState, args: &[ArgExpr]) -> Vec<Value> {
    args.iter()
        .map(|arg| match arg {
            ArgExpr::Literal(value) => value.clone(),
            ArgExpr::Field(path) => state.get_path(path).cloned().unwrap_or(Value::Null),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse_event_expr("save"), Some(("save".into(), vec![])));
        assert_eq!(parse_event_expr("save()"), Some(("save".into(), vec![])));
    }

    #[test]
    fn test_parse_mixed_args() {
        let (name, args) = parse_event_expr("update(user.name, 'hi', 2, true)").unwrap();
        assert_eq!(name, "update");
        assert_eq!(
            args,
            vec![
                ArgExpr::Field("user.name".into()),
                ArgExpr::Literal(json!("hi")),
                ArgExpr::Literal(json!(2)),
                ArgExpr::Literal(json!(true)),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_non_call() {
        assert_eq!(parse_event_expr("alert('x'); steal()"), None);
        assert_eq!(parse_event_expr(""), None);
        assert_eq!(parse_event_expr("a b(c)"), None);
    }

    #[test]
    fn test_resolve_args() {
        let mut state = ControllerState::new();
        state.set("user", json!({ "name": "Ada" }));

        let args = vec![
            ArgExpr::Field("user.name".into()),
            ArgExpr::Field("missing.path".into()),
            ArgExpr::Literal(json!(7)),
        ];
        assert_eq!(
            resolve_args(&state, &args),
            vec![json!("Ada"), Value::Null, json!(7)]
        );
    }
}
