// ── Placeholder rendering ──
//
// Personalization is literal token substitution: `{{key}}` becomes the
// mapped value. There is no template language here: no escaping, no
// conditionals, no loops, and no recursive expansion of substituted
// values.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

// Keys never contain braces, so nested or unbalanced braces fall
// outside the token and stay untouched.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid"));

/// Replace every `{{key}}` token that has a mapping in `customizations`.
///
/// Tokens whose key is absent from the map are left verbatim. The scan
/// is a single left-to-right pass over `template`, so substituted
/// values are never rescanned and map ordering is unobservable in the
/// output.
pub fn render(template: &str, customizations: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            customizations
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}
