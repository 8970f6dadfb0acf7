//! Display helpers for server identifiers.

/// Uppercase the first character.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `send_message` → `Send Message`.
pub fn pretty(name: &str) -> String {
    name.split('_').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// `req:channel:id` → `Channel Id`. The first segment is a namespace.
pub fn pretty_setting(name: &str) -> String {
    name.split(':')
        .skip(1)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Label for a field, falling back to the raw name for un-namespaced keys.
pub fn field_label(name: &str) -> String {
    let label = pretty_setting(name);
    if label.is_empty() {
        pretty(name)
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty() {
        assert_eq!(pretty("send_message"), "Send Message");
        assert_eq!(pretty("discord"), "Discord");
        assert_eq!(pretty(""), "");
    }

    #[test]
    fn test_pretty_setting_drops_namespace() {
        assert_eq!(pretty_setting("req:channel:id"), "Channel Id");
        assert_eq!(pretty_setting("plain"), "");
        assert_eq!(field_label("plain"), "Plain");
        assert_eq!(field_label("req:message"), "Message");
    }
}
