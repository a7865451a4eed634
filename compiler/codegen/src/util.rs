// codegen/src/util.rs

//! Case conversion and identifier helpers for the generated surface.

/// Convert a schema name (snake_case or camelCase) to PascalCase.
pub fn pascal_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut upper_next = true;
    for c in input.chars() {
        if c == '_' || c == '-' {
            upper_next = true;
            continue;
        }
        if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a PascalCase or camelCase name to snake_case.
pub fn snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut result = String::with_capacity(input.len() + 4);

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev_lower = chars.get(i - 1).is_some_and(|p| p.is_lowercase());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || next_lower {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }

    result
}

/// Build the flat wrapper type name for a scoped declaration.
///
/// Nested declarations live in a single flat namespace per output file, so
/// `["User", "Profile"]` becomes `UserProfile`.
pub fn wrapper_ident(segments: &[String]) -> String {
    segments.iter().map(|s| pascal_case(s)).collect()
}

/// Build the module path the original bindings use for a scoped declaration:
/// enclosing message names become snake_case modules, the declaration itself
/// keeps its PascalCase name (`["User", "Profile"]` → `user::Profile`).
pub fn source_path(segments: &[String]) -> String {
    let Some((last, scope)) = segments.split_last() else {
        return String::new();
    };
    let mut path: Vec<String> = scope.iter().map(|s| snake_case(s)).collect();
    path.push(pascal_case(last));
    path.join("::")
}

/// Sanitizes schema identifiers to be valid Rust identifiers.
pub fn sanitize_ident(name: &str) -> String {
    match name {
        "type" => "r#type".to_string(),
        "self" => "self_".to_string(),
        "super" => "super_".to_string(),
        "crate" => "crate_".to_string(),
        _ => {
            let sanitized = name.replace('-', "_");
            sanitized.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect()
        }
    }
}

/// Field identifier in the generated wrapper surface.
pub fn field_ident(name: &str) -> String { sanitize_ident(&snake_case(name)) }

/// Last segment of a module path or file path, extension dropped.
pub fn base_name(name: &str) -> String {
    let name = name.rsplit(['/', ':']).next().unwrap_or(name);
    match name.rfind('.') {
        Some(i) => name[..i].to_string(),
        None => name.to_string(),
    }
}

/// File stem of a schema path (`myapp/user.proto` → `user`).
pub fn file_stem(path: &str) -> String { base_name(path) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("display_name"), "DisplayName");
        assert_eq!(pascal_case("user"), "User");
        assert_eq!(pascal_case("User"), "User");
        assert_eq!(pascal_case("user_id_2"), "UserId2");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("DisplayName"), "display_name");
        assert_eq!(snake_case("userID"), "user_id");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("HTTPServer"), "http_server");
    }

    #[test]
    fn test_wrapper_ident() {
        let segments = vec!["User".to_string(), "Profile".to_string()];
        assert_eq!(wrapper_ident(&segments), "UserProfile");
        assert_eq!(wrapper_ident(&["User".to_string()]), "User");
    }

    #[test]
    fn test_source_path() {
        let segments = vec!["User".to_string(), "Profile".to_string()];
        assert_eq!(source_path(&segments), "user::Profile");
        assert_eq!(source_path(&["User".to_string()]), "User");
        let deep =
            vec!["Outer".to_string(), "Inner".to_string(), "Leaf".to_string()];
        assert_eq!(source_path(&deep), "outer::inner::Leaf");
    }

    #[test]
    fn test_sanitize_ident() {
        assert_eq!(sanitize_ident("type"), "r#type");
        assert_eq!(sanitize_ident("my-field"), "my_field");
        assert_eq!(sanitize_ident("ok_name"), "ok_name");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("myapp/user.proto"), "user");
        assert_eq!(base_name("wrapgen_runtime"), "wrapgen_runtime");
        assert_eq!(base_name("std::collections"), "collections");
    }
}
