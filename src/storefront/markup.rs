// HTML and CSS for the welcome modal

use super::ModalContent;

pub const MODAL_ELEMENT_ID: &str = "welcome-modal";

pub const MODAL_STYLES: &str = r#".welcome-modal {
  display: none;
  position: fixed;
  top: 0;
  left: 0;
  width: 100%;
  height: 100%;
  background-color: rgba(0,0,0,0.5);
  z-index: 9999;
}
.welcome-modal-content {
  background-color: white;
  margin: 15% auto;
  padding: 20px;
  width: 80%;
  max-width: 500px;
  border-radius: 8px;
  text-align: center;
}
.welcome-modal button {
  padding: 10px 20px;
  background-color: #000;
  color: white;
  border: none;
  border-radius: 4px;
  cursor: pointer;
  margin-top: 15px;
}
.welcome-modal button:hover {
  opacity: 0.8;
}"#;

/// Markup handed to a render port. The modal starts hidden via its stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalMarkup {
    pub element_id: &'static str,
    pub html: String,
    pub styles: &'static str,
}

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_markup(content: &ModalContent) -> ModalMarkup {
    let html = format!(
        concat!(
            r#"<div id="{id}" class="welcome-modal">"#,
            r#"<div class="welcome-modal-content">"#,
            "<h2>{title}</h2>",
            "<p>{content}</p>",
            r#"<button type="button" data-welcome-modal-close>{button}</button>"#,
            "</div></div>"
        ),
        id = MODAL_ELEMENT_ID,
        title = escape_html(&content.title),
        content = escape_html(&content.content),
        button = escape_html(&content.button_text),
    );

    ModalMarkup {
        element_id: MODAL_ELEMENT_ID,
        html,
        styles: MODAL_STYLES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
        assert_eq!(escape_html("Welcome!"), "Welcome!");
    }

    #[test]
    fn test_render_markup_escapes_settings() {
        let markup = render_markup(&ModalContent {
            title: "<b>Sale</b>".to_string(),
            content: "Hi!".to_string(),
            button_text: "Shop now".to_string(),
        });

        assert_eq!(markup.element_id, "welcome-modal");
        assert!(markup.html.starts_with(r#"<div id="welcome-modal" class="welcome-modal">"#));
        assert!(markup.html.contains("<h2>&lt;b&gt;Sale&lt;/b&gt;</h2>"));
        assert!(markup.html.contains("<p>Hi!</p>"));
        assert!(markup.html.contains(">Shop now</button>"));
        assert!(markup.styles.contains("display: none"));
    }
}
