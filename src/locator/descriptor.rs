use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([\w-]+)").unwrap());
// `name` must start the selector or the attribute; `data-name=` and `username=` are not names
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|[\[\s,])name\s*=\s*["']?([\w-]+)["']?"#).unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([A-Za-z][\w-]*)").unwrap());

/// Which attribute pattern a selector was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    Id,
    Name,
    Opaque,
}

/// Structured view of an original selector string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorDescriptor {
    pub kind: DescriptorKind,

    /// Id or name token; for `Opaque`, the normalized selector
    pub value: String,

    /// Leading tag token, e.g. `input` in `input#amount`
    pub tag_hint: Option<String>,

    /// Normalized form of the whole selector, used for content matching
    pub key: String,
}

impl SelectorDescriptor {
    /// Decompose a selector. Never fails; unrecognized shapes become `Opaque`.
    pub fn parse(selector: &str) -> Self {
        let key = normalize_key(selector);
        let tag_hint = TAG_RE
            .captures(selector)
            .map(|caps| caps[1].to_ascii_lowercase());

        let (kind, value) = if let Some(caps) = ID_RE.captures(selector) {
            (DescriptorKind::Id, caps[1].to_string())
        } else if let Some(caps) = NAME_RE.captures(selector) {
            (DescriptorKind::Name, caps[1].to_string())
        } else {
            (DescriptorKind::Opaque, key.clone())
        };

        Self {
            kind,
            value,
            tag_hint,
            key,
        }
    }

    /// Whether the selector names an id or a name attribute
    pub fn is_attribute_based(&self) -> bool {
        matches!(self.kind, DescriptorKind::Id | DescriptorKind::Name)
    }
}

/// Strip every non-word character (anything but alphanumerics and `_`)
pub fn normalize_key(raw: &str) -> String {
    raw.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let desc = SelectorDescriptor::parse("#amount");
        assert_eq!(desc.kind, DescriptorKind::Id);
        assert_eq!(desc.value, "amount");
        assert_eq!(desc.tag_hint, None);
        assert_eq!(desc.key, "amount");
    }

    #[test]
    fn test_parse_id_with_tag() {
        let desc = SelectorDescriptor::parse("input#amount");
        assert_eq!(desc.kind, DescriptorKind::Id);
        assert_eq!(desc.value, "amount");
        assert_eq!(desc.tag_hint.as_deref(), Some("input"));
        assert_eq!(desc.key, "inputamount");
    }

    #[test]
    fn test_parse_name_quoting() {
        for selector in [
            r#"[name="category"]"#,
            "[name='category']",
            "[name=category]",
            r#"select[name = "category"]"#,
        ] {
            let desc = SelectorDescriptor::parse(selector);
            assert_eq!(desc.kind, DescriptorKind::Name, "{}", selector);
            assert_eq!(desc.value, "category", "{}", selector);
        }
    }

    #[test]
    fn test_name_suffixed_attributes_are_not_names() {
        for selector in [r#"[data-name="amount"]"#, "[username=x]", "input[fullname='a']"] {
            let desc = SelectorDescriptor::parse(selector);
            assert_eq!(desc.kind, DescriptorKind::Opaque, "{}", selector);
        }

        let desc = SelectorDescriptor::parse(r#"form [name="q"], [name="r"]"#);
        assert_eq!(desc.kind, DescriptorKind::Name);
        assert_eq!(desc.value, "q");

        let desc = SelectorDescriptor::parse("name=amount");
        assert_eq!(desc.kind, DescriptorKind::Name);
        assert_eq!(desc.value, "amount");
    }

    #[test]
    fn test_id_takes_precedence_over_name() {
        let desc = SelectorDescriptor::parse(r#"#form [name="q"]"#);
        assert_eq!(desc.kind, DescriptorKind::Id);
        assert_eq!(desc.value, "form");
    }

    #[test]
    fn test_parse_opaque() {
        let desc = SelectorDescriptor::parse("button[type='submit']");
        assert_eq!(desc.kind, DescriptorKind::Opaque);
        assert_eq!(desc.value, "buttontypesubmit");
        assert_eq!(desc.tag_hint.as_deref(), Some("button"));
        assert!(!desc.is_attribute_based());
    }

    #[test]
    fn test_parse_opaque_may_be_empty() {
        let desc = SelectorDescriptor::parse("*");
        assert_eq!(desc.kind, DescriptorKind::Opaque);
        assert_eq!(desc.value, "");
        assert_eq!(desc.key, "");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(".btn-primary > span"), "btnprimaryspan");
        assert_eq!(normalize_key("amount_usd"), "amount_usd");
        assert_eq!(normalize_key("Montant (€)"), "Montant");
    }
}
