//! Identifier naming for generated Rust code.

/// Strict and reserved Rust keywords.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Converts a string to snake_case.
///
/// Runs of capitals are kept together as one word, so `MDEntryPx` becomes
/// `md_entry_px` and `ID` becomes `id`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else if c.is_alphanumeric() || c == '_' {
            result.push(c);
        } else {
            result.push('_');
        }
    }

    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == '.' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Makes a name usable as an identifier.
///
/// Keywords become raw identifiers, or get a trailing `_` where raw
/// identifiers are not allowed. A leading digit gets a `_` prefix.
#[must_use]
pub fn escape_ident(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        return format!("{name}_");
    }
    if KEYWORDS.contains(&name) {
        return format!("r#{name}");
    }
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{name}");
    }
    name.to_string()
}

/// Field identifier for a property name.
#[must_use]
pub fn field_ident(property: &str) -> String {
    escape_ident(&to_snake_case(property))
}

/// Type identifier for a declared type name.
#[must_use]
pub fn type_ident(name: &str) -> String {
    escape_ident(&to_pascal_case(name))
}

/// Function identifier for an entity set accessor.
#[must_use]
pub fn accessor_ident(entity_set: &str) -> String {
    escape_ident(&format!("{}_collection", to_snake_case(entity_set)))
}

/// Module identifier for a directory name.
#[must_use]
pub fn module_ident(segment: &str) -> String {
    escape_ident(&to_snake_case(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("UserName"), "user_name");
        assert_eq!(to_snake_case("clOrdId"), "cl_ord_id");
        assert_eq!(to_snake_case("symbol"), "symbol");
        assert_eq!(to_snake_case("MDEntryPx"), "md_entry_px");
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("Feature1"), "feature1");
        assert_eq!(to_snake_case("my-service"), "my_service");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("message_header"), "MessageHeader");
        assert_eq!(to_pascal_case("Person"), "Person");
        assert_eq!(to_pascal_case("order-type"), "OrderType");
    }

    #[test]
    fn test_escape_ident() {
        assert_eq!(escape_ident("type"), "r#type");
        assert_eq!(escape_ident("match"), "r#match");
        assert_eq!(escape_ident("self"), "self_");
        assert_eq!(escape_ident("Self"), "Self_");
        assert_eq!(escape_ident("2fa"), "_2fa");
        assert_eq!(escape_ident("name"), "name");
    }

    #[test]
    fn test_derived_identifiers() {
        assert_eq!(field_ident("Type"), "r#type");
        assert_eq!(field_ident("HomeAddress"), "home_address");
        assert_eq!(type_ident("PersonGender"), "PersonGender");
        assert_eq!(accessor_ident("People"), "people_collection");
        assert_eq!(accessor_ident("PlanItems"), "plan_items_collection");
        assert_eq!(accessor_ident("2020Sales"), "_2020_sales_collection");
        assert_eq!(module_ident("trippin-model"), "trippin_model");
        assert_eq!(module_ident("crate"), "crate_");
    }
}
