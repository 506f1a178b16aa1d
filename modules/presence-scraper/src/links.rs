// Page-wide platform link discovery.
//
// Candidates come from metadata (meta tags, rel links, JSON-LD sameAs) and
// anchors. Anchors are ranked by the section they sit in. A candidate counts
// only if it resolves against the base URL and normalizes for its platform.
// Per platform the best-ranked candidate wins, document order breaks ties.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

use presence_common::{LinkSource, Platform, PlatformLink};

use crate::identifier;

static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta[content]").expect("valid selector"));
static REL_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("link[href]").expect("valid selector"));
static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

const REL_PROFILE: &[&str] = &["me", "author", "publisher", "canonical"];

/// Platform → best link found on one page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveredLinks {
    links: BTreeMap<Platform, PlatformLink>,
}

impl DiscoveredLinks {
    pub fn get(&self, platform: Platform) -> Option<&PlatformLink> {
        self.links.get(&platform)
    }

    pub fn url(&self, platform: Platform) -> Option<&str> {
        self.links.get(&platform).map(|l| l.url.as_str())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformLink> {
        self.links.values()
    }

    /// Every known platform, with `None` where no link was found.
    pub fn url_map(&self) -> BTreeMap<Platform, Option<String>> {
        Platform::ALL
            .into_iter()
            .map(|p| (p, self.url(p).map(str::to_string)))
            .collect()
    }

    fn offer(&mut self, candidate: PlatformLink) {
        match self.links.get(&candidate.platform) {
            Some(existing) if existing.source <= candidate.source => {}
            _ => {
                self.links.insert(candidate.platform, candidate);
            }
        }
    }
}

/// Find social platform links in a page. Never fails: anything that cannot
/// be parsed or resolved is simply not found.
pub fn discover_platform_links(html: &str, base_url: &str) -> DiscoveredLinks {
    let base = Url::parse(base_url).ok();
    let document = Html::parse_document(html);
    let mut found = DiscoveredLinks::default();

    let mut consider = |raw: &str, source: LinkSource| {
        if let Some(link) = classify(raw, base.as_ref(), source) {
            found.offer(link);
        }
    };

    for meta in document.select(&META) {
        let el = meta.value();
        let key = el.attr("property").or(el.attr("name")).unwrap_or_default();
        let Some(content) = el.attr("content") else {
            continue;
        };
        // Twitter card tags name an account, with or without the "@".
        if matches!(key, "twitter:site" | "twitter:creator") {
            let handle = content.trim().trim_start_matches('@');
            if !handle.is_empty() && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                consider(&format!("https://x.com/{handle}"), LinkSource::Metadata);
                continue;
            }
        }
        consider(content, LinkSource::Metadata);
    }

    for link in document.select(&REL_LINK) {
        let el = link.value();
        let rel = el.attr("rel").unwrap_or_default().to_ascii_lowercase();
        if !rel.split_whitespace().any(|r| REL_PROFILE.contains(&r)) {
            continue;
        }
        if let Some(href) = el.attr("href") {
            consider(href, LinkSource::Metadata);
        }
    }

    for script in document.select(&JSON_LD) {
        let text: String = script.text().collect();
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
            continue;
        };
        let mut same_as = Vec::new();
        collect_same_as(&value, &mut same_as);
        for url in same_as {
            consider(&url, LinkSource::Metadata);
        }
    }

    for anchor in document.select(&ANCHOR) {
        if let Some(href) = anchor.value().attr("href") {
            consider(href, detect_section(&anchor));
        }
    }

    found
}

fn classify(raw: &str, base: Option<&Url>, source: LinkSource) -> Option<PlatformLink> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') || raw.starts_with("javascript:") || raw.starts_with("mailto:") {
        return None;
    }

    let resolved = match base {
        Some(base) => base.join(raw).ok()?,
        None => Url::parse(raw).ok()?,
    };
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    let platform = Platform::from_host(resolved.host_str()?)?;
    identifier::normalize(platform, resolved.as_str()).ok()?;

    Some(PlatformLink {
        platform,
        url: resolved.to_string(),
        source,
    })
}

/// `sameAs` values anywhere in a JSON-LD document, including inside `@graph`.
fn collect_same_as(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, v) in map {
                if key == "sameAs" {
                    match v {
                        serde_json::Value::String(s) => out.push(s.clone()),
                        serde_json::Value::Array(items) => {
                            out.extend(items.iter().filter_map(|i| i.as_str().map(str::to_string)))
                        }
                        _ => {}
                    }
                } else {
                    collect_same_as(v, out);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter().for_each(|i| collect_same_as(i, out)),
        _ => {}
    }
}

/// Walk up the ancestors to find which part of the page an anchor lives in.
fn detect_section(element: &ElementRef) -> LinkSource {
    let mut current = element.parent();
    while let Some(node) = current {
        if let Some(el) = ElementRef::wrap(node) {
            let value = el.value();
            match value.name() {
                "nav" | "header" => return LinkSource::Navigation,
                "footer" => return LinkSource::Footer,
                _ => {}
            }
            if value.attr("role") == Some("navigation") {
                return LinkSource::Navigation;
            }
            let marker = format!(
                "{} {}",
                value.attr("class").unwrap_or_default(),
                value.attr("id").unwrap_or_default()
            )
            .to_ascii_lowercase();
            if marker.contains("social") || marker.contains("footer") {
                return LinkSource::Footer;
            }
        }
        current = node.parent();
    }
    LinkSource::Body
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.org/";

    #[test]
    fn og_url_and_footer_links() {
        let html = r#"<html><head>
            <meta property="og:url" content="https://www.facebook.com/exampleorg">
        </head><body>
            <p>Welcome</p>
            <footer>
              <a href="https://instagram.com/exampleorg">IG</a>
              <a href="https://www.linkedin.com/company/exampleorg">LinkedIn</a>
              <a href="https://www.youtube.com/@exampleorg">YouTube</a>
              <a href="https://www.tiktok.com/@exampleorg">TikTok</a>
              <a href="https://www.threads.net/@exampleorg">Threads</a>
              <a href="https://bsky.app/profile/exampleorg.bsky.social">BlueSky</a>
            </footer>
        </body></html>"#;

        let links = discover_platform_links(html, BASE);
        assert_eq!(links.len(), 6);
        assert_eq!(links.get(Platform::Facebook).unwrap().source, LinkSource::Metadata);
        assert_eq!(links.get(Platform::Instagram).unwrap().source, LinkSource::Footer);
        assert!(links.get(Platform::Twitter).is_none());

        let map = links.url_map();
        assert_eq!(map.len(), 7);
        assert_eq!(map[&Platform::Twitter], None);
        assert_eq!(map[&Platform::TikTok].as_deref(), Some("https://www.tiktok.com/@exampleorg"));
    }

    #[test]
    fn all_platforms_found() {
        let html = r#"<body>
            <a href="https://bsky.app/profile/org.bsky.social">a</a>
            <a href="https://www.tiktok.com/@org">b</a>
            <a href="https://www.youtube.com/channel/UCBJycsmduvYEL83R_U4JriQ">c</a>
            <a href="https://x.com/org">d</a>
            <a href="https://www.instagram.com/org/">e</a>
            <a href="https://www.facebook.com/org">f</a>
            <a href="https://www.threads.net/@org">g</a>
        </body>"#;
        let links = discover_platform_links(html, BASE);
        assert!(links.url_map().values().all(Option::is_some));
    }

    #[test]
    fn no_links_means_every_platform_absent() {
        let links = discover_platform_links("<html><body><p>Nothing here</p></body></html>", BASE);
        assert!(links.is_empty());
        assert!(links.url_map().values().all(Option::is_none));
    }

    #[test]
    fn malformed_markup_does_not_fail() {
        let html = r#"<div><a href="https://twitter.com/org">x<footer><a href=>broken"#;
        let links = discover_platform_links(html, "not a url");
        assert_eq!(links.url(Platform::Twitter), Some("https://twitter.com/org"));
    }

    #[test]
    fn navigation_beats_earlier_body_anchor() {
        let html = r#"<body>
            <p><a href="https://www.instagram.com/body_account">body</a></p>
            <nav><a href="https://www.instagram.com/nav_account">nav</a></nav>
        </body>"#;
        let links = discover_platform_links(html, BASE);
        let ig = links.get(Platform::Instagram).unwrap();
        assert_eq!(ig.source, LinkSource::Navigation);
        assert!(ig.url.contains("nav_account"));
    }

    #[test]
    fn first_match_wins_within_a_section() {
        let html = r#"<footer>
            <a href="https://x.com/first">1</a>
            <a href="https://x.com/second">2</a>
        </footer>"#;
        let links = discover_platform_links(html, BASE);
        assert_eq!(links.url(Platform::Twitter), Some("https://x.com/first"));
    }

    #[test]
    fn social_container_counts_as_footer() {
        let html = r#"<main><div class="social-icons"><a href="https://x.com/org">x</a></div></main>"#;
        let links = discover_platform_links(html, BASE);
        assert_eq!(links.get(Platform::Twitter).unwrap().source, LinkSource::Footer);
    }

    #[test]
    fn twitter_site_meta_and_json_ld() {
        let html = r#"<head>
            <meta name="twitter:site" content="@exampleorg">
            <script type="application/ld+json">
              {"@context":"https://schema.org","@graph":[{"@type":"Organization",
               "sameAs":["https://www.youtube.com/@exampleorg","https://www.instagram.com/exampleorg"]}]}
            </script>
        </head>"#;
        let links = discover_platform_links(html, BASE);
        assert_eq!(links.url(Platform::Twitter), Some("https://x.com/exampleorg"));
        assert_eq!(links.get(Platform::YouTube).unwrap().source, LinkSource::Metadata);
        assert!(links.get(Platform::Instagram).is_some());
    }

    #[test]
    fn twitter_card_handle_without_at() {
        let html = r#"<head>
            <meta name="twitter:creator" content="exampleorg">
        </head>"#;
        let links = discover_platform_links(html, BASE);
        assert_eq!(links.url(Platform::Twitter), Some("https://x.com/exampleorg"));
        assert_eq!(links.get(Platform::Twitter).unwrap().source, LinkSource::Metadata);

        let html = r#"<meta name="twitter:site" content="https://twitter.com/otherorg">"#;
        let links = discover_platform_links(html, BASE);
        assert_eq!(links.url(Platform::Twitter), Some("https://twitter.com/otherorg"));
    }

    #[test]
    fn share_and_post_links_are_not_profiles() {
        let html = r#"<body>
            <a href="https://twitter.com/intent/tweet?text=hi">share</a>
            <a href="https://www.facebook.com/sharer/sharer.php?u=x">share</a>
            <a href="https://www.instagram.com/p/Cx9abc/">post</a>
        </body>"#;
        let links = discover_platform_links(html, BASE);
        assert!(links.is_empty());
    }

    #[test]
    fn relative_links_resolve_against_base() {
        let html = r#"<a href="//www.tiktok.com/@org">tt</a>"#;
        let links = discover_platform_links(html, BASE);
        assert_eq!(links.url(Platform::TikTok), Some("https://www.tiktok.com/@org"));
    }
}
