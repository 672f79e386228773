use std::sync::OnceLock;

use regex::Regex;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Matches `{{ env.VAR }}` and `{{ env.VAR | default("fallback") }}`
    // Group 1: the scoped key (e.g. `env.VAR_NAME`)
    // Group 2: optional default value inside default("...")
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// Supports an optional fallback via `{{ env.VAR | default("fallback") }}`;
/// when the variable is unset the fallback substitutes instead of the load
/// failing. Comment lines pass through untouched so commented-out secrets
/// never break a load.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            output.push_str(&expand_line(line)?);
        }
    }

    // Preserve trailing newline if present
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut result = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in placeholder_re().captures_iter(line) {
        let overall = captures.get(0).expect("group 0 is the whole match");
        let key = captures.get(1).map_or("", |m| m.as_str());
        let fallback = captures.get(2).map(|m| m.as_str());

        result.push_str(&line[cursor..overall.start()]);

        let var_name = match key.strip_prefix("env.") {
            Some(name) if !name.contains('.') => name,
            _ => return Err(format!("only variables scoped with 'env.' are supported: `{key}`")),
        };

        match std::env::var(var_name) {
            Ok(value) => result.push_str(&value),
            Err(_) => match fallback {
                Some(default) => result.push_str(default),
                None => return Err(format!("environment variable not found: `{var_name}`")),
            },
        }

        cursor = overall.end();
    }

    result.push_str(&line[cursor..]);
    Ok(result)
}
