//! Lead email rendering
//!
//! Builds the HTML document relayed to the operator: a title from the
//! submission type, a received timestamp, and one table row per payload field.
//! All user-supplied text is escaped; form data must never inject markup.

use chrono::Local;
use serde_json::{Map, Value};

/// Escape the HTML-significant characters in user-supplied text.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// Strings render bare; everything else keeps its JSON form.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render the notification document for one lead.
pub fn render_lead(kind: &str, payload: &Map<String, Value>) -> String {
    let received = Local::now().format("%d %b %Y, %H:%M:%S");

    let mut rows = String::new();
    for (field, value) in payload {
        rows.push_str("      <tr><th align=\"left\">");
        rows.push_str(&escape_html(field));
        rows.push_str("</th><td>");
        rows.push_str(&escape_html(&field_text(value)));
        rows.push_str("</td></tr>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>{title}</title></head>
  <body style="font-family: Arial, sans-serif; color: #333;">
    <h2 style="border-bottom: 2px solid #667eea; padding-bottom: 5px;">{title}</h2>
    <p>Received: {received}</p>
    <table border="1" cellpadding="8" cellspacing="0" style="border-collapse: collapse;">
{rows}    </table>
  </body>
</html>"#,
        title = escape_html(kind),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().expect("object").clone()
    }

    #[test]
    fn test_escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_script_tag_never_renders_raw() {
        let fields = payload(json!({"name": "<script>alert(1)</script>"}));
        let html = render_lead("Admission Enquiry", &fields);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_field_keys_are_escaped_too() {
        let fields = payload(json!({"<b>k</b>": "v"}));
        let html = render_lead("Lead", &fields);
        assert!(html.contains("&lt;b&gt;k&lt;/b&gt;"));
        assert!(!html.contains("<b>k</b>"));
    }

    #[test]
    fn test_title_carries_submission_type() {
        let html = render_lead("Certificate Request", &Map::new());
        assert!(html.contains("<h2 style=\"border-bottom: 2px solid #667eea; padding-bottom: 5px;\">Certificate Request</h2>"));
        assert!(html.contains("Received: "));
    }

    #[test]
    fn test_one_row_per_field() {
        let fields = payload(json!({"name": "Asha", "phone": "9999999999", "course": "Tally"}));
        let html = render_lead("Admission", &fields);
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains("<th align=\"left\">name</th><td>Asha</td>"));
    }

    #[test]
    fn test_non_string_values_render_in_json_form() {
        let fields = payload(json!({"fees": 2000, "paid": false}));
        let html = render_lead("Payment", &fields);
        assert!(html.contains("<td>2000</td>"));
        assert!(html.contains("<td>false</td>"));
    }
}
