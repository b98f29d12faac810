// Shared prompt fragments.
// Each module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting pieces.

/// Persona preamble shared by the recruiting prompts.
pub const HIRING_ASSISTANT_PERSONA: &str =
    "You are a Hiring Assistant tasked with generating comprehensive job descriptions.";

/// Fills `{name}` placeholders in a single pass over `template`.
///
/// Substituted values are never rescanned, so recruiter text containing a
/// placeholder name is copied through literally. Braces that do not enclose a
/// known name (JSON examples in a prompt, for instance) are left as they are.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match known {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_substitutes_every_occurrence() {
        let out = fill_template("{a} and {b}, again {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and y, again x");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let out = fill_template("{first} / {second}", &[("first", "{second}"), ("second", "B")]);
        assert_eq!(out, "{second} / B");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let template = "Reply as {\n  \"tool\": \"name\"\n} for {who}";
        let out = fill_template(template, &[("who", "Jane")]);
        assert_eq!(out, "Reply as {\n  \"tool\": \"name\"\n} for Jane");
        assert_eq!(fill_template("open { only", &[]), "open { only");
    }
}
