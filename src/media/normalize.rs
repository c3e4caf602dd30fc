use anyhow::{Context, Result};
use tracing::debug;
use url::Url;

use super::{classify::classify, types::EmbedTarget};
use crate::utils::strip_query;

/// Base used to resolve relative references when no page location is known.
pub const DEFAULT_BASE_URL: &str = "http://localhost/";

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";
const VIMEO_PLAYER: &str = "https://player.vimeo.com/video/";
const DRIVE_FILE: &str = "https://drive.google.com/file/d/";

/// Rewrites media references into embeddable URLs.
///
/// References are resolved against `base` (the page location), so relative
/// paths like `assets/reel.mp4` parse fine and simply pass through.
#[derive(Debug, Clone)]
pub struct Normalizer {
    base: Url,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
        }
    }
}

impl Normalizer {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn from_base(base: &str) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("Invalid base URL: {}", base))?;
        Ok(Self::new(base))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Returns the embed form of `raw`, or `raw` itself when it cannot be
    /// parsed or no provider rule applies. Applying this to its own output
    /// yields the same string.
    pub fn normalize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let url = match self.base.join(raw) {
            Ok(url) => url,
            Err(e) => {
                debug!("Leaving unparseable media reference as-is ({}): {}", e, raw);
                return raw.to_string();
            }
        };

        rewrite(raw, &url).unwrap_or_else(|| raw.to_string())
    }

    /// Normalizes `raw` and classifies the result, so the kind always
    /// describes the URL that will actually be loaded.
    pub fn resolve(&self, raw: &str) -> EmbedTarget {
        let url = self.normalize(raw);
        EmbedTarget {
            kind: classify(&url),
            url,
        }
    }
}

/// Normalizes against [`DEFAULT_BASE_URL`].
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}

fn rewrite(raw: &str, url: &Url) -> Option<String> {
    let host = url.host_str()?;

    if host.contains("youtu.be") {
        let path = url.path();
        let id = path.strip_prefix('/').unwrap_or(path);
        return Some(format!("{YOUTUBE_EMBED}{id}"));
    }

    if host.contains("youtube.com") {
        if let Some(embed) = youtube(raw, url) {
            return Some(embed);
        }
    }

    if host.contains("vimeo.com") {
        if let Some(embed) = vimeo(raw, url) {
            return Some(embed);
        }
    }

    if host.contains("drive.google.com") {
        return drive(raw, url);
    }

    None
}

fn youtube(raw: &str, url: &Url) -> Option<String> {
    if url.path().contains("/embed/") {
        return Some(strip_query(raw).to_string());
    }

    let v = url
        .query_pairs()
        .find_map(|(key, value)| (key == "v").then(|| value.into_owned()))
        .filter(|v| !v.is_empty());
    if let Some(v) = v {
        return Some(format!("{YOUTUBE_EMBED}{}", urlencoding::encode(&v)));
    }

    url.path()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(|id| format!("{YOUTUBE_EMBED}{id}"))
}

// Numeric ids win over trailing privacy hashes: `/123/abcdef` embeds 123.
fn vimeo(raw: &str, url: &Url) -> Option<String> {
    if url.path().contains("/video/") {
        return Some(strip_query(raw).to_string());
    }

    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
    let id = segments
        .iter()
        .rev()
        .find(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .or_else(|| segments.last())?;

    Some(format!("{VIMEO_PLAYER}{id}"))
}

fn drive(raw: &str, url: &Url) -> Option<String> {
    if let Some(start) = raw.find("/file/d/") {
        let rest = &raw[start + "/file/d/".len()..];
        let id = rest.split(['/', '?', '#']).next().unwrap_or("");
        if !id.is_empty() {
            return Some(format!("{DRIVE_FILE}{id}/preview"));
        }
    }

    let id: String = url
        .query_pairs()
        .find_map(|(key, value)| (key == "id").then(|| value.into_owned()))?
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if id.is_empty() {
        None
    } else {
        Some(format!("{DRIVE_FILE}{id}/preview"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    const SAMPLES: &[&str] = &[
        "https://youtu.be/abc123",
        "https://youtu.be/abc123?t=42",
        "https://www.youtube.com/watch?v=abc123&t=5",
        "https://www.youtube.com/watch?v=abc%3Fx",
        "https://www.youtube.com/watch?v=abc%23x",
        "https://www.youtube.com/embed/abc123?autoplay=1",
        "https://www.youtube.com/shorts/abc123",
        "https://vimeo.com/123456",
        "https://vimeo.com/123456/",
        "https://vimeo.com/123456/abcdef0123",
        "https://vimeo.com/channels/staffpicks/123456",
        "https://player.vimeo.com/video/123456?h=abc",
        "https://drive.google.com/file/d/XYZ/view?usp=sharing",
        "https://drive.google.com/open?id=XYZ_-9",
        "https://drive.google.com/uc?export=download&id=XYZ",
        "https://drive.google.com/drive/folders",
        "assets/show_reel.mp4",
        "https://cdn.example.com/reel.mp4?v=2",
        "not a url",
        "",
    ];

    #[test]
    fn test_normalize_examples() {
        assert_eq!(
            normalize("https://youtu.be/abc123"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            normalize("https://www.youtube.com/watch?v=abc123&t=5"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            normalize("https://vimeo.com/123456"),
            "https://player.vimeo.com/video/123456"
        );
        assert_eq!(
            normalize("https://drive.google.com/file/d/XYZ/view?usp=sharing"),
            "https://drive.google.com/file/d/XYZ/preview"
        );
        assert_eq!(normalize("not a url"), "not a url");
    }

    #[test]
    fn test_normalize_youtube_variants() {
        assert_eq!(
            normalize("https://www.youtube.com/embed/abc123?autoplay=1"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            normalize("https://www.youtube.com/shorts/abc123"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            normalize("https://www.youtube.com/watch?v=abc%3Fx"),
            "https://www.youtube.com/embed/abc%3Fx"
        );
        assert_eq!(
            normalize("https://www.youtube.com/"),
            "https://www.youtube.com/"
        );
    }

    #[test]
    fn test_normalize_vimeo_ids() {
        assert_eq!(
            normalize("https://vimeo.com/123456/"),
            "https://player.vimeo.com/video/123456"
        );
        assert_eq!(
            normalize("https://vimeo.com/123456/abcdef0123"),
            "https://player.vimeo.com/video/123456"
        );
        assert_eq!(
            normalize("https://vimeo.com/channels/staffpicks/123456"),
            "https://player.vimeo.com/video/123456"
        );
        assert_eq!(
            normalize("https://player.vimeo.com/video/123456?h=abc"),
            "https://player.vimeo.com/video/123456"
        );
        assert_eq!(normalize("https://vimeo.com/"), "https://vimeo.com/");
    }

    #[test]
    fn test_normalize_drive_variants() {
        assert_eq!(
            normalize("https://drive.google.com/open?id=XYZ_-9"),
            "https://drive.google.com/file/d/XYZ_-9/preview"
        );
        assert_eq!(
            normalize("https://drive.google.com/uc?export=download&id=XYZ"),
            "https://drive.google.com/file/d/XYZ/preview"
        );
        assert_eq!(
            normalize("https://drive.google.com/drive/folders"),
            "https://drive.google.com/drive/folders"
        );
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("assets/show_reel.mp4"), "assets/show_reel.mp4");
        assert_eq!(
            normalize("https://cdn.example.com/reel.mp4?v=2"),
            "https://cdn.example.com/reel.mp4?v=2"
        );
        assert_eq!(normalize("http://[::1"), "http://[::1");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for sample in SAMPLES {
            let once = normalize(sample);
            let twice = normalize(&once);
            assert_eq!(once, twice, "normalize not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_relative_reference_uses_base() {
        let normalizer = Normalizer::from_base("https://www.youtube.com/channel/").unwrap();
        assert_eq!(
            normalizer.normalize("/watch?v=abc123"),
            "https://www.youtube.com/embed/abc123"
        );
    }

    #[test]
    fn test_from_base_rejects_relative_base() {
        assert!(Normalizer::from_base("not a base").is_err());
    }

    #[test]
    fn test_resolve_pairs_kind_and_url() {
        let target = Normalizer::default().resolve("https://youtu.be/abc123");
        assert_eq!(target.kind, MediaKind::YouTube);
        assert_eq!(target.url, "https://www.youtube.com/embed/abc123");
    }

    #[test]
    fn test_resolve_classifies_the_embed_url() {
        let target = Normalizer::default().resolve("https://drive.google.com/uc?id=ABC&name=clip.mp4");
        assert_eq!(target.kind, MediaKind::CloudDrive);
        assert_eq!(target.url, "https://drive.google.com/file/d/ABC/preview");

        let target = Normalizer::default().resolve("assets/show_reel.mp4");
        assert_eq!(target.kind, MediaKind::DirectFile);
        assert_eq!(target.url, "assets/show_reel.mp4");
    }
}
