use crate::dom::ElementNode;

/// Coarse control category of an element, e.g. `input.number` or `button.submit`.
///
/// Deterministic in the element's tag and `type` attribute; registry records
/// store the same strings.
pub fn classify(element: &ElementNode) -> String {
    let tag = element.tag_name.to_ascii_lowercase();
    match tag.as_str() {
        "input" => {
            let input_type = element.input_type().unwrap_or("text").to_lowercase();
            format!("input.{}", input_type)
        }
        "button" => {
            let is_submit = element
                .input_type()
                .is_some_and(|t| t.eq_ignore_ascii_case("submit"));
            if is_submit {
                "button.submit".to_string()
            } else {
                "button".to_string()
            }
        }
        _ => element.tag_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defaults_to_text() {
        assert_eq!(classify(&ElementNode::new("input")), "input.text");
    }

    #[test]
    fn test_input_type_lowercased() {
        let el = ElementNode::new("input").with_attribute("type", "NUMBER");
        assert_eq!(classify(&el), "input.number");
    }

    #[test]
    fn test_buttons() {
        let submit = ElementNode::new("button").with_attribute("type", "Submit");
        let plain = ElementNode::new("button").with_attribute("type", "button");
        let untyped = ElementNode::new("button");

        assert_eq!(classify(&submit), "button.submit");
        assert_eq!(classify(&plain), "button");
        assert_eq!(classify(&untyped), "button");
    }

    #[test]
    fn test_other_tags_verbatim() {
        assert_eq!(classify(&ElementNode::new("select")), "select");
        assert_eq!(classify(&ElementNode::new("textarea")), "textarea");
        assert_eq!(classify(&ElementNode::new("a")), "a");
    }
}
