//! Feed entry to `Document` composition

use telegraph_api::{AccountProfile, Document};

use crate::footer::Footer;
use crate::sanitize::sanitize;

/// One feed item as handed over by the bot.
#[derive(Debug, Clone, Default)]
pub struct FeedEntry {
    pub title: Option<String>,
    /// Raw entry markup, sanitized during composition
    pub html: String,
    pub link: Option<String>,
    pub feed_title: Option<String>,
    pub author: Option<String>,
}

/// Build the page for `entry`.
///
/// Pages are credited to the feed (plus the entry author when the feed title
/// does not already mention it) and link back to the entry. Entries from an
/// untitled feed are credited to `profile` instead.
pub fn compose(entry: &FeedEntry, footer: &Footer, profile: &AccountProfile) -> Document {
    let link = non_empty(&entry.link);

    let (author_name, author_url) = match non_empty(&entry.feed_title) {
        Some(feed_title) => {
            let mut name = feed_title.to_string();
            if let Some(author) = non_empty(&entry.author)
                && !feed_title.contains(author)
            {
                name.push_str(&format!(" ({author})"));
            }
            (name, link.unwrap_or_default().to_string())
        }
        None => (profile.author_name.clone(), profile.author_url.clone()),
    };

    let title = non_empty(&entry.title)
        .map(str::to_string)
        .unwrap_or_else(|| profile.author_name.clone());

    let mut content = sanitize(&entry.html);
    content.push_str(&footer.render(link));

    Document {
        title,
        author_name,
        author_url,
        content,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> FeedEntry {
        FeedEntry {
            title: Some("Release notes".into()),
            html: r#"<div class="post"><p>Hello <span>world</span></p></div>"#.into(),
            link: Some("https://blog.example.com/release".into()),
            feed_title: Some("Example Blog".into()),
            author: Some("Alice".into()),
        }
    }

    #[test]
    fn credits_feed_and_author() {
        let doc = compose(&entry(), &Footer::default(), &AccountProfile::default());
        assert_eq!(doc.title, "Release notes");
        assert_eq!(doc.author_name, "Example Blog (Alice)");
        assert_eq!(doc.author_url, "https://blog.example.com/release");
        assert!(doc.content.starts_with("<p>Hello world</p><br><br>Generated by"));
        assert!(doc.content.ends_with(">Source</a>"));
    }

    #[test]
    fn author_already_in_feed_title_is_not_repeated() {
        let mut e = entry();
        e.feed_title = Some("Alice's Notes".into());
        let doc = compose(&e, &Footer::default(), &AccountProfile::default());
        assert_eq!(doc.author_name, "Alice's Notes");
    }

    #[test]
    fn untitled_feed_falls_back_to_profile() {
        let e = FeedEntry {
            html: "<p>body</p>".into(),
            ..FeedEntry::default()
        };
        let profile = AccountProfile::default();
        let doc = compose(&e, &Footer::default(), &profile);
        assert_eq!(doc.title, profile.author_name);
        assert_eq!(doc.author_name, profile.author_name);
        assert_eq!(doc.author_url, profile.author_url);
        assert!(!doc.content.contains("Source"));
    }

    #[test]
    fn feed_without_link_has_empty_author_url() {
        let mut e = entry();
        e.link = None;
        let doc = compose(&e, &Footer::default(), &AccountProfile::default());
        assert_eq!(doc.author_url, "");
    }

    #[test]
    fn empty_title_uses_profile_name() {
        let mut e = entry();
        e.title = Some(String::new());
        let doc = compose(&e, &Footer::default(), &AccountProfile::default());
        assert_eq!(doc.title, AccountProfile::default().author_name);
    }
}
