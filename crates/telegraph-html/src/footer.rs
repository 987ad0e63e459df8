//! Attribution footer appended to every page

use serde::Deserialize;

use crate::sanitize::escape_attr;

/// Attribution footer settings.
///
/// Deserializes from the `[footer]` config table; every field falls back to
/// the bot's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Footer {
    pub service_name: String,
    pub service_url: String,
    /// Userscript that works around image anti-hotlinking
    pub hotlink_script_url: String,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            service_name: "RSStT".into(),
            service_url: "https://github.com/Rongronggg9/RSS-to-Telegram-Bot".into(),
            hotlink_script_url: "https://greasyfork.org/scripts/432923".into(),
        }
    }
}

impl Footer {
    /// Render the footer markup, with a trailing "Source" link when the
    /// entry has one.
    pub fn render(&self, source: Option<&str>) -> String {
        let mut out = String::from("<br><br>Generated by ");
        push_link(&mut out, &self.service_url, &self.service_name);
        out.push_str(". The copyright belongs to the source site.<br>");
        out.push_str(
            "If images cannot be loaded properly due to anti-hotlinking, please consider install ",
        );
        push_link(&mut out, &self.hotlink_script_url, "this userscript");
        out.push('.');

        if let Some(link) = source.filter(|l| !l.is_empty()) {
            out.push_str("<br><br>");
            push_link(&mut out, link, "Source");
        }
        out
    }
}

fn push_link(out: &mut String, href: &str, label: &str) {
    out.push_str("<a href=\"");
    escape_attr(href, out);
    out.push_str("\">");
    out.push_str(label);
    out.push_str("</a>");
}
