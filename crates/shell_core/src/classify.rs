use std::fmt;

/// URI prefixes that belong to another installed application.
pub const EXTERNAL_SCHEMES: &[&str] = &[
    "tel:",
    "mailto:",
    "sms:",
    "smsto:",
    "mms:",
    "whatsapp:",
    "viber:",
    "skype:",
    "tg:",
    "facetime:",
    "facetime-audio:",
    "fb:",
    "fb-messenger:",
    "instagram:",
    "twitter:",
    "youtube:",
    "vnd.youtube:",
    "spotify:",
    "geo:",
    "maps:",
    "comgooglemaps:",
    "waze:",
    "intent:",
    "market:",
    "https://wa.me/",
];

/// File extensions that are fetched to local storage instead of rendered.
pub const DOWNLOAD_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "jpg", "jpeg", "png", "gif", "mp3", "mp4",
    "zip", "rar",
];

/// Extensions that go to the media gallery once downloaded.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

const BLOB_SCHEME: &str = "blob:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    UnsupportedBlobContent,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::UnsupportedBlobContent => write!(f, "unsupported blob content"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    Continue,
    Download(String),
    OpenExternally(String),
    Block(BlockReason),
}

/// Maps a navigation URL to what the host should do with it.
///
/// External schemes win over everything else, then `blob:` URLs, then the
/// download extension list (matched on the path, ignoring case).
pub fn classify(url: &str) -> RoutingDecision {
    let candidate = url.trim();
    if EXTERNAL_SCHEMES
        .iter()
        .any(|scheme| starts_with_ignore_case(candidate, scheme))
    {
        return RoutingDecision::OpenExternally(url.to_string());
    }
    if starts_with_ignore_case(candidate, BLOB_SCHEME) {
        return RoutingDecision::Block(BlockReason::UnsupportedBlobContent);
    }
    if let Some(ext) = file_extension(&url_path(candidate)) {
        if DOWNLOAD_EXTENSIONS.contains(&ext.as_str()) {
            return RoutingDecision::Download(url.to_string());
        }
    }
    RoutingDecision::Continue
}

/// Lowercased extension of the last segment of `path`, if any.
pub fn file_extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn is_image_filename(filename: &str) -> bool {
    file_extension(filename).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn url_path(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) if !parsed.cannot_be_a_base() => parsed.path().to_string(),
        _ => strip_query_and_fragment(url).to_string(),
    }
}

fn strip_query_and_fragment(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
