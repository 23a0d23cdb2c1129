use crate::argument::ResolvedSettings;
use crate::argument::help::display_value;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid token regex"));

/// Replace every `{{key}}` token whose key is a known setting. Unknown keys and spaced
/// `{{ key }}` forms stay as written.
pub fn substitute_settings<'a>(content: &'a str, settings: &ResolvedSettings) -> Cow<'a, str> {
    TOKEN.replace_all(content, |caps: &Captures| match settings.get(&caps[1]) {
        Some(value) => display_value(value),
        None => caps[0].to_string(),
    })
}
