//! Canonical one-line rendering of bindings.
//!
//! ```text
//! retries : int
//! printf :: string -> ...{} => int
//! now :: time.Time
//! exit :: ()
//! ```
//!
//! Values use a single colon, functions a double colon. Error messages embed
//! these strings, so the grammar must stay stable.

use twig_core::{Dynamic, ReturnType, Signature};

/// Name of the error return kind.
const ERROR_NAME: &str = "error";

/// Render `name` bound to `value`.
pub fn format(name: &str, value: &Dynamic) -> String {
    match value.as_function() {
        Some(func) => format_signature(name, func.signature()),
        None => format!("{name} : {}", value.type_name()),
    }
}

/// Render a function signature.
pub fn format_signature(name: &str, signature: &Signature) -> String {
    let mut out = String::from(name);
    out.push_str(" :: ");

    let mut params: Vec<String> = signature
        .params
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    if let Some(element) = signature.variadic {
        params.push(format!("...{}", element.name()));
    }
    if !params.is_empty() {
        out.push_str(&params.join(" -> "));
        out.push_str(" => ");
    }

    out.push_str(&format_returns(&signature.returns));
    out
}

fn format_returns(returns: &[ReturnType]) -> String {
    match returns {
        [] | [ReturnType::Error] => "()".to_string(),
        [ReturnType::Value(v)] => v.name().to_string(),
        [ReturnType::Value(v), ReturnType::Error] => v.name().to_string(),
        // Not a bindable function; list everything
        other => other
            .iter()
            .map(return_name)
            .collect::<Vec<_>>()
            .join(" -> "),
    }
}

fn return_name(ret: &ReturnType) -> &'static str {
    match ret {
        ReturnType::Value(v) => v.name(),
        ReturnType::Error => ERROR_NAME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twig_core::{ParamType, interfaces, tags};

    fn exact(tag: twig_core::TypeTag) -> ParamType {
        ParamType::Exact(tag)
    }

    #[test]
    fn values_use_single_colon() {
        assert_eq!(format("a", &Dynamic::Bool(true)), "a : bool");
        assert_eq!(format("a", &Dynamic::Int(10)), "a : int");
        assert_eq!(format("a", &Dynamic::Float64(1.0)), "a : float64");
        assert_eq!(format("a", &Dynamic::Void), "a : nil");
    }

    #[test]
    fn zero_params() {
        assert_eq!(format_signature("a", &Signature::new()), "a :: ()");
        let now = Signature::new().returns(ReturnType::Value(exact(tags::INT64)));
        assert_eq!(format_signature("a", &now), "a :: int64");
    }

    #[test]
    fn error_only_returns_unit() {
        let sig = Signature::new()
            .param(exact(tags::STRING))
            .param(exact(tags::LIST))
            .returns(ReturnType::Error);
        assert_eq!(format_signature("name", &sig), "name :: string -> []{} => ()");
    }

    #[test]
    fn variadic_last() {
        let sig = Signature::new()
            .param(exact(tags::STRING))
            .variadic(ParamType::Implements(interfaces::ANYTHING))
            .returns(ReturnType::Value(exact(tags::INT)))
            .returns(ReturnType::Error);
        assert_eq!(format_signature("a", &sig), "a :: string -> ...{} => int");
    }

    #[test]
    fn invalid_returns_are_listed() {
        let sig = Signature::new()
            .param(exact(tags::INT))
            .returns(ReturnType::Error)
            .returns(ReturnType::Value(exact(tags::INT)));
        assert_eq!(format_signature("a", &sig), "a :: int => error -> int");
    }
}
