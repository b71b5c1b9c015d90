// src/client/candidates.rs

use url::Url;

use super::ClientConfig;

/// Ordered, de-duplicated list of base URLs to try.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    bases: Vec<String>,
}

impl Candidates {
    /// Remote default, then the page origin, then extra bases, then local defaults.
    pub fn from_config(config: &ClientConfig) -> Self {
        let ordered = std::iter::once(config.remote_base.as_str())
            .chain(config.origin.as_deref())
            .chain(config.extra_bases.iter().map(String::as_str))
            .chain(config.local_bases.iter().map(String::as_str));

        Self::from_bases(ordered)
    }

    /// Keeps the first occurrence of each base. Blank and non-http(s) entries are dropped.
    pub fn from_bases<I, S>(bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for base in bases {
            let Some(base) = normalize(base.as_ref()) else {
                continue;
            };
            if !out.contains(&base) {
                out.push(base);
            }
        }
        Self { bases: out }
    }

    pub fn bases(&self) -> &[String] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(trimmed.to_string()),
        _ => {
            tracing::warn!("Ignoring candidate base that is not an http(s) URL: {}", raw);
            None
        }
    }
}
