// Identifier normalization: raw profile URLs and bare handles → canonical
// per-platform identifiers. Pure functions, no I/O.
//
// Canonical forms, per platform:
//   BlueSky    handle, lowercase, no "@"  ("name.bsky.social", "example.org"), or a DID kept verbatim.
//              A bare name without a dot gets ".bsky.social". A non-bsky domain root is a custom-domain handle.
//   TikTok     "@handle", lowercase.
//   YouTube    "@handle" lowercase, channel ID "UC…" verbatim, or legacy/custom name verbatim.
//   Twitter/X  handle, lowercase, no "@".
//   Instagram  handle, lowercase, no "@".
//   Facebook   numeric profile/page ID, or vanity name lowercase.
//   Threads    "@handle", lowercase.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use presence_common::{CanonicalIdentifier, Platform, ScrapeError};

static YT_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[A-Za-z0-9_.\-]{3,30}$").expect("valid regex"));
static YT_CHANNEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UC[A-Za-z0-9_\-]{22}$").expect("valid regex"));
static YT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{1,100}$").expect("valid regex"));
static TWITTER_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("valid regex"));
static INSTAGRAM_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]{1,30}$").expect("valid regex"));
static TIKTOK_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]{2,24}$").expect("valid regex"));
static FACEBOOK_VANITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9.\-]{2,50}$").expect("valid regex"));
static NUMERIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5,20}$").expect("valid regex"));
static BSKY_HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]([a-z0-9\-]{0,61}[a-z0-9])?\.)+[a-z]([a-z0-9\-]{0,61}[a-z0-9])?$")
        .expect("valid regex")
});
static BSKY_DID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^did:(plc|web):[A-Za-z0-9._:%\-]+$").expect("valid regex"));

// Non-profile path segments.
const YOUTUBE_RESERVED: &[&str] = &[
    "watch", "playlist", "results", "feed", "shorts", "embed", "live", "channel", "c", "user",
    "hashtag", "premium", "gaming", "account", "about", "t", "redirect", "attribution_link",
    "kids", "music", "signin",
];
const TWITTER_RESERVED: &[&str] = &[
    "intent", "share", "hashtag", "search", "i", "home", "explore", "settings", "login", "signup",
    "messages", "notifications", "compose", "tos", "privacy", "widgets",
];
const INSTAGRAM_RESERVED: &[&str] = &[
    "p", "reel", "reels", "stories", "explore", "accounts", "tv", "s", "share", "direct",
    "about", "developer", "legal",
];
const FACEBOOK_RESERVED: &[&str] = &[
    "photo", "photos", "sharer", "share", "events", "groups", "watch", "marketplace", "login",
    "dialog", "plugins", "hashtag", "help", "policies", "privacy", "tr", "gaming", "reel",
];
const THREADS_RESERVED: &[&str] = &["login", "search", "intent", "t"];

/// Host prefixes that never change which account a URL refers to.
const HOST_PREFIXES: &[&str] = &["www.", "m.", "mobile.", "web."];

/// A raw input split into the parts the per-platform rules look at.
#[derive(Debug)]
enum Input {
    Url {
        host: String,
        segments: Vec<String>,
        query: Vec<(String, String)>,
    },
    Bare(String),
}

fn parse_input(raw: &str) -> Option<Input> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !looks_like_url(trimmed) {
        return Some(Input::Bare(trimmed.trim_end_matches('/').to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let url = Url::parse(&with_scheme).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    let mut host = url.host_str()?.to_ascii_lowercase();
    for prefix in HOST_PREFIXES {
        if let Some(rest) = host.strip_prefix(prefix) {
            host = rest.to_string();
            break;
        }
    }

    let segments = url
        .path_segments()
        .map(|segs| {
            segs.filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let query = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    Some(Input::Url {
        host,
        segments,
        query,
    })
}

fn looks_like_url(s: &str) -> bool {
    if s.contains("://") || s.starts_with("www.") {
        return true;
    }
    if s.starts_with('@') || s.starts_with("did:") {
        return false;
    }
    let head = s.split(['/', '?', '#']).next().unwrap_or(s);
    Platform::from_host(head).is_some()
}

fn on_platform(host: &str, platform: Platform) -> bool {
    Platform::from_host(host) == Some(platform)
}

fn query_value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn reserved(list: &[&str], segment: &str) -> bool {
    list.contains(&segment.to_ascii_lowercase().as_str())
}

/// Normalize a profile URL or bare handle into the platform's canonical identifier.
/// Fails with `UnrecognizedFormat` when the input matches no known shape.
pub fn normalize(platform: Platform, raw: &str) -> Result<CanonicalIdentifier, ScrapeError> {
    let value = parse_input(raw).and_then(|input| match platform {
        Platform::Bluesky => bluesky(&input),
        Platform::TikTok => at_handle(&input, Platform::TikTok, &TIKTOK_HANDLE, &[]),
        Platform::YouTube => youtube(&input),
        Platform::Twitter => twitter(&input),
        Platform::Instagram => instagram(&input),
        Platform::Facebook => facebook(&input),
        Platform::Threads => at_handle(&input, Platform::Threads, &INSTAGRAM_HANDLE, THREADS_RESERVED),
    });

    value
        .map(|v| CanonicalIdentifier::new(platform, v, raw))
        .ok_or_else(|| ScrapeError::unrecognized(platform, raw))
}

/// Which platform a URL points at. Bare handles are ambiguous and yield
/// `None`, except for unmistakable BlueSky handles and DIDs.
pub fn detect_platform(raw: &str) -> Option<Platform> {
    match parse_input(raw)? {
        Input::Url { host, .. } => Platform::from_host(&host),
        Input::Bare(s) => {
            let lower = s.trim_start_matches('@').to_ascii_lowercase();
            (lower.ends_with(".bsky.social") || BSKY_DID.is_match(&lower))
                .then_some(Platform::Bluesky)
        }
    }
}

/// The canonical public profile URL for an identifier. Normalizing it again
/// yields the same identifier.
pub fn profile_url(id: &CanonicalIdentifier) -> String {
    let v = id.as_str();
    match id.platform {
        Platform::Bluesky => format!("https://bsky.app/profile/{v}"),
        Platform::TikTok => format!("https://www.tiktok.com/{v}"),
        Platform::YouTube if YT_CHANNEL_ID.is_match(v) => {
            format!("https://www.youtube.com/channel/{v}")
        }
        Platform::YouTube => format!("https://www.youtube.com/{v}"),
        Platform::Twitter => format!("https://x.com/{v}"),
        Platform::Instagram => format!("https://www.instagram.com/{v}/"),
        Platform::Facebook if NUMERIC_ID.is_match(v) => {
            format!("https://www.facebook.com/profile.php?id={v}")
        }
        Platform::Facebook => format!("https://www.facebook.com/{v}"),
        Platform::Threads => format!("https://www.threads.net/{v}"),
    }
}

// --- Per-platform rules ---

fn youtube(input: &Input) -> Option<String> {
    match input {
        Input::Bare(s) => {
            if s.starts_with('@') {
                youtube_handle(s)
            } else if YT_CHANNEL_ID.is_match(s) {
                Some(s.clone())
            } else {
                YT_NAME.is_match(s).then(|| s.clone())
            }
        }
        Input::Url { host, segments, .. } => {
            if !on_platform(host, Platform::YouTube) {
                return None;
            }
            let first = segments.first()?;
            if first.starts_with('@') {
                return youtube_handle(first);
            }
            match (first.as_str(), segments.get(1)) {
                ("c", Some(name)) | ("user", Some(name)) => {
                    YT_NAME.is_match(name).then(|| name.clone())
                }
                ("channel", Some(id)) => YT_CHANNEL_ID.is_match(id).then(|| id.clone()),
                (name, _) if !reserved(YOUTUBE_RESERVED, name) => {
                    YT_NAME.is_match(name).then(|| name.to_string())
                }
                _ => None,
            }
        }
    }
}

fn youtube_handle(s: &str) -> Option<String> {
    YT_HANDLE.is_match(s).then(|| s.to_lowercase())
}

fn twitter(input: &Input) -> Option<String> {
    let candidate = match input {
        Input::Bare(s) => s.strip_prefix('@').unwrap_or(s).to_string(),
        Input::Url {
            host,
            segments,
            query,
        } => {
            if !on_platform(host, Platform::Twitter) {
                return None;
            }
            let first = segments.first()?;
            if first.eq_ignore_ascii_case("intent") {
                // twitter.com/intent/follow?screen_name=handle
                query_value(query, "screen_name")?.to_string()
            } else if reserved(TWITTER_RESERVED, first) {
                return None;
            } else {
                first.strip_prefix('@').unwrap_or(first).to_string()
            }
        }
    };
    TWITTER_HANDLE
        .is_match(&candidate)
        .then(|| candidate.to_lowercase())
}

fn instagram(input: &Input) -> Option<String> {
    let candidate = match input {
        Input::Bare(s) => s.strip_prefix('@').unwrap_or(s),
        Input::Url { host, segments, .. } => {
            if !on_platform(host, Platform::Instagram) {
                return None;
            }
            let first = segments.first()?;
            if reserved(INSTAGRAM_RESERVED, first) {
                return None;
            }
            first.as_str()
        }
    };
    INSTAGRAM_HANDLE
        .is_match(candidate)
        .then(|| candidate.to_lowercase())
}

/// Platforms whose profile paths are `/@handle` and whose canonical form keeps the "@".
fn at_handle(input: &Input, platform: Platform, pattern: &Regex, reserved_segments: &[&str]) -> Option<String> {
    let candidate = match input {
        Input::Bare(s) => s.strip_prefix('@').unwrap_or(s),
        Input::Url { host, segments, .. } => {
            if !on_platform(host, platform) {
                return None;
            }
            let first = segments.first()?;
            if reserved(reserved_segments, first) {
                return None;
            }
            first.strip_prefix('@')?
        }
    };
    pattern
        .is_match(candidate)
        .then(|| format!("@{}", candidate.to_lowercase()))
}

fn facebook(input: &Input) -> Option<String> {
    match input {
        Input::Bare(s) => facebook_segment(s),
        Input::Url {
            host,
            segments,
            query,
        } => {
            if !on_platform(host, Platform::Facebook) {
                return None;
            }
            let first = segments.first()?;
            match first.to_ascii_lowercase().as_str() {
                "profile.php" => query_value(query, "id")
                    .filter(|id| NUMERIC_ID.is_match(id))
                    .map(str::to_string),
                // facebook.com/pages/<name>/<id> and facebook.com/people/<name>/<id>
                "pages" | "people" => segments[1..]
                    .iter()
                    .rev()
                    .find(|s| NUMERIC_ID.is_match(s))
                    .cloned(),
                seg if reserved(FACEBOOK_RESERVED, seg) || seg.ends_with(".php") => None,
                _ => facebook_segment(first),
            }
        }
    }
}

fn facebook_segment(s: &str) -> Option<String> {
    if NUMERIC_ID.is_match(s) {
        return Some(s.to_string());
    }
    if s.ends_with(".php") || !s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    FACEBOOK_VANITY.is_match(s).then(|| s.to_lowercase())
}

fn bluesky(input: &Input) -> Option<String> {
    match input {
        Input::Bare(s) => bluesky_actor(s),
        Input::Url { host, segments, .. } => {
            if on_platform(host, Platform::Bluesky) {
                match (segments.first().map(String::as_str), segments.get(1)) {
                    (Some("profile"), Some(actor)) => bluesky_actor(actor),
                    _ => None,
                }
            } else if segments.is_empty() && Platform::from_host(host).is_none() {
                // Custom-domain handle: the domain root is the account.
                BSKY_HANDLE.is_match(host).then(|| host.clone())
            } else {
                None
            }
        }
    }
}

fn bluesky_actor(s: &str) -> Option<String> {
    let s = s.strip_prefix('@').unwrap_or(s);
    if BSKY_DID.is_match(s) {
        return Some(s.to_string());
    }
    let lower = s.to_ascii_lowercase();
    let handle = if lower.contains('.') {
        lower
    } else {
        format!("{lower}.bsky.social")
    };
    BSKY_HANDLE.is_match(&handle).then_some(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_common::ScrapeErrorKind;

    fn norm(platform: Platform, raw: &str) -> String {
        normalize(platform, raw)
            .unwrap_or_else(|e| panic!("{raw} should normalize: {e}"))
            .value
    }

    fn rejects(platform: Platform, raw: &str) {
        let err = normalize(platform, raw).expect_err(raw);
        assert_eq!(err.kind, ScrapeErrorKind::UnrecognizedFormat, "{raw}");
        assert_eq!(err.platform, Some(platform));
    }

    // --- YouTube ---

    #[test]
    fn youtube_known_shapes() {
        assert_eq!(norm(Platform::YouTube, "https://www.youtube.com/@mkbhd"), "@mkbhd");
        assert_eq!(norm(Platform::YouTube, "https://youtube.com/c/Veritasium"), "Veritasium");
        assert_eq!(
            norm(Platform::YouTube, "https://www.youtube.com/channel/UCBJycsmduvYEL83R_U4JriQ"),
            "UCBJycsmduvYEL83R_U4JriQ"
        );
        assert_eq!(norm(Platform::YouTube, "https://www.youtube.com/user/CGPGrey"), "CGPGrey");
    }

    #[test]
    fn youtube_tabs_after_identifier_are_ignored() {
        assert_eq!(norm(Platform::YouTube, "https://www.youtube.com/@mkbhd/videos"), "@mkbhd");
        assert_eq!(norm(Platform::YouTube, "m.youtube.com/c/Veritasium/featured"), "Veritasium");
    }

    #[test]
    fn youtube_handles_are_case_insensitive() {
        assert_eq!(norm(Platform::YouTube, "youtube.com/@MKBHD"), "@mkbhd");
    }

    #[test]
    fn youtube_non_channel_paths_rejected() {
        rejects(Platform::YouTube, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        rejects(Platform::YouTube, "https://www.youtube.com/channel/not-a-channel-id");
        rejects(Platform::YouTube, "https://www.youtube.com/");
        rejects(Platform::YouTube, "https://vimeo.com/someone");
    }

    // --- Twitter/X ---

    #[test]
    fn twitter_and_x_hosts_agree() {
        for raw in [
            "https://twitter.com/GrantOrg",
            "https://x.com/grantorg/",
            "http://www.twitter.com/grantorg",
            "mobile.twitter.com/grantorg",
            "@GrantOrg",
            "grantorg",
            "https://x.com/grantorg/status/1234567890",
            "https://twitter.com/intent/follow?screen_name=grantorg",
        ] {
            assert_eq!(norm(Platform::Twitter, raw), "grantorg", "{raw}");
        }
    }

    #[test]
    fn twitter_reserved_paths_rejected() {
        rejects(Platform::Twitter, "https://twitter.com/intent/tweet?text=hello");
        rejects(Platform::Twitter, "https://twitter.com/share?url=x");
        rejects(Platform::Twitter, "https://x.com/hashtag/climate");
        rejects(Platform::Twitter, "this handle is far too long");
    }

    // --- Instagram ---

    #[test]
    fn instagram_profile_shapes() {
        assert_eq!(
            norm(Platform::Instagram, "https://www.instagram.com/CommunityAidNetworkMN/"),
            "communityaidnetworkmn"
        );
        assert_eq!(norm(Platform::Instagram, "@mn.food_shelf"), "mn.food_shelf");
        assert_eq!(norm(Platform::Instagram, "instagram.com/mn.food_shelf?hl=en"), "mn.food_shelf");
    }

    #[test]
    fn instagram_post_urls_rejected() {
        rejects(Platform::Instagram, "https://www.instagram.com/p/DUPMIPgkVkr/");
        rejects(Platform::Instagram, "https://www.instagram.com/reel/ABC123/");
        rejects(Platform::Instagram, "https://www.instagram.com/");
    }

    // --- TikTok / Threads ---

    #[test]
    fn tiktok_keeps_at_prefix() {
        assert_eq!(norm(Platform::TikTok, "https://www.tiktok.com/@MyHandle"), "@myhandle");
        assert_eq!(norm(Platform::TikTok, "https://www.tiktok.com/@myhandle/video/123"), "@myhandle");
        assert_eq!(norm(Platform::TikTok, "myhandle"), "@myhandle");
        assert_eq!(norm(Platform::TikTok, "@myhandle"), "@myhandle");
    }

    #[test]
    fn tiktok_paths_without_at_rejected() {
        rejects(Platform::TikTok, "https://www.tiktok.com/discover/food");
        rejects(Platform::TikTok, "https://vm.tiktok.com/ZMabc123/");
    }

    #[test]
    fn threads_both_domains() {
        assert_eq!(norm(Platform::Threads, "https://www.threads.net/@grant.org"), "@grant.org");
        assert_eq!(norm(Platform::Threads, "https://threads.com/@Grant.Org"), "@grant.org");
        assert_eq!(norm(Platform::Threads, "@grant.org"), "@grant.org");
        rejects(Platform::Threads, "https://www.threads.net/login");
    }

    // --- Facebook ---

    #[test]
    fn facebook_vanity_and_numeric_shapes() {
        assert_eq!(
            norm(Platform::Facebook, "https://www.facebook.com/CommunityAidNetworkMN"),
            "communityaidnetworkmn"
        );
        assert_eq!(norm(Platform::Facebook, "https://fb.com/communityaidnetworkmn/"), "communityaidnetworkmn");
        assert_eq!(
            norm(Platform::Facebook, "https://www.facebook.com/profile.php?id=100064526874425"),
            "100064526874425"
        );
        assert_eq!(
            norm(Platform::Facebook, "https://www.facebook.com/pages/Some-Org/123456789012"),
            "123456789012"
        );
        assert_eq!(
            norm(Platform::Facebook, "https://www.facebook.com/people/Some-Person/100012345678/"),
            "100012345678"
        );
    }

    #[test]
    fn facebook_non_profile_paths_rejected() {
        rejects(Platform::Facebook, "https://www.facebook.com/sharer/sharer.php?u=https://x.org");
        rejects(Platform::Facebook, "https://www.facebook.com/events/123456");
        rejects(Platform::Facebook, "https://www.facebook.com/profile.php");
        rejects(Platform::Facebook, "https://www.facebook.com/pages/NoNumericId");
    }

    // --- BlueSky ---

    #[test]
    fn bluesky_profile_shapes() {
        assert_eq!(
            norm(Platform::Bluesky, "https://bsky.app/profile/Someone.bsky.social"),
            "someone.bsky.social"
        );
        assert_eq!(norm(Platform::Bluesky, "@someone.bsky.social"), "someone.bsky.social");
        assert_eq!(norm(Platform::Bluesky, "someone"), "someone.bsky.social");
        assert_eq!(
            norm(Platform::Bluesky, "https://bsky.app/profile/did:plc:z72i7hdynmk6r22z27h6tvur"),
            "did:plc:z72i7hdynmk6r22z27h6tvur"
        );
    }

    #[test]
    fn bluesky_domain_root_is_custom_handle() {
        assert_eq!(norm(Platform::Bluesky, "https://www.grantorg.org/"), "grantorg.org");
        assert_eq!(norm(Platform::Bluesky, "grantorg.org"), "grantorg.org");
        rejects(Platform::Bluesky, "https://grantorg.org/about");
        rejects(Platform::Bluesky, "https://bsky.app/");
        rejects(Platform::Bluesky, "https://twitter.com/");
    }

    // --- Cross-cutting properties ---

    #[test]
    fn empty_and_garbage_inputs_rejected() {
        for platform in Platform::ALL {
            rejects(platform, "");
            rejects(platform, "   ");
            rejects(platform, "ftp://files.example.com/x");
        }
    }

    #[test]
    fn wrong_platform_url_rejected() {
        rejects(Platform::Instagram, "https://x.com/grantorg");
        rejects(Platform::Twitter, "https://www.instagram.com/grantorg");
        rejects(Platform::TikTok, "https://www.threads.net/@grantorg");
    }

    #[test]
    fn www_and_trailing_slash_do_not_matter() {
        let cases = [
            (Platform::YouTube, "https://www.youtube.com/@mkbhd", "https://youtube.com/@mkbhd/"),
            (Platform::Twitter, "https://www.x.com/grantorg", "https://x.com/grantorg/"),
            (Platform::Instagram, "https://www.instagram.com/grantorg", "instagram.com/grantorg/"),
            (Platform::Facebook, "https://www.facebook.com/grantorg", "https://facebook.com/grantorg/"),
            (Platform::TikTok, "https://www.tiktok.com/@grantorg", "tiktok.com/@grantorg/"),
            (Platform::Threads, "https://www.threads.net/@grantorg", "threads.net/@grantorg/"),
            (Platform::Bluesky, "https://bsky.app/profile/grantorg.bsky.social", "bsky.app/profile/grantorg.bsky.social/"),
        ];
        for (platform, a, b) in cases {
            assert_eq!(normalize(platform, a).unwrap(), normalize(platform, b).unwrap(), "{a} vs {b}");
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let cases = [
            (Platform::YouTube, "https://www.youtube.com/@mkbhd"),
            (Platform::YouTube, "https://youtube.com/c/Veritasium"),
            (Platform::YouTube, "https://www.youtube.com/channel/UCBJycsmduvYEL83R_U4JriQ"),
            (Platform::YouTube, "https://www.youtube.com/user/CGPGrey"),
            (Platform::Twitter, "https://twitter.com/GrantOrg"),
            (Platform::Instagram, "https://instagram.com/grant.org"),
            (Platform::TikTok, "https://tiktok.com/@grant.org"),
            (Platform::Threads, "https://threads.net/@grant.org"),
            (Platform::Facebook, "https://facebook.com/GrantOrg"),
            (Platform::Facebook, "https://facebook.com/profile.php?id=100064526874425"),
            (Platform::Bluesky, "https://bsky.app/profile/grant.bsky.social"),
            (Platform::Bluesky, "https://bsky.app/profile/did:plc:z72i7hdynmk6r22z27h6tvur"),
        ];
        for (platform, raw) in cases {
            let first = normalize(platform, raw).unwrap();
            let again = normalize(platform, first.as_str()).unwrap();
            assert_eq!(first, again, "{raw}");
            let via_url = normalize(platform, &profile_url(&first)).unwrap();
            assert_eq!(first, via_url, "profile_url round trip for {raw}");
        }
    }

    #[test]
    fn raw_input_kept_for_diagnostics() {
        let id = normalize(Platform::YouTube, " https://www.youtube.com/@mkbhd ").unwrap();
        assert_eq!(id.raw, " https://www.youtube.com/@mkbhd ");
    }

    #[test]
    fn detect_platform_from_urls() {
        assert_eq!(detect_platform("https://www.youtube.com/@mkbhd"), Some(Platform::YouTube));
        assert_eq!(detect_platform("x.com/grantorg"), Some(Platform::Twitter));
        assert_eq!(detect_platform("someone.bsky.social"), Some(Platform::Bluesky));
        assert_eq!(detect_platform("did:plc:z72i7hdynmk6r22z27h6tvur"), Some(Platform::Bluesky));
        assert_eq!(detect_platform("@grantorg"), None);
        assert_eq!(detect_platform("https://linkedin.com/company/grantorg"), None);
    }
}
