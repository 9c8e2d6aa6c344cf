//! Positional path templating for endpoint strings.

/// Replace positional `{0}`, `{1}`, … tokens in an endpoint template.
///
/// Inputs without curly-bracket tokens pass through unchanged, as do tokens
/// with no matching parameter.
pub fn expand_path_params(path: &str, params: &[&str]) -> String {
    if path.is_empty() || !path.contains('{') || !path.contains('}') {
        return path.to_string();
    }

    let mut expanded = path.to_string();
    for (index, param) in params.iter().enumerate() {
        let token = format!("{{{index}}}");
        if expanded.contains(&token) {
            expanded = expanded.replace(&token, param);
        }
    }
    expanded
}
