use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Registry host prefix accepted (and dropped) in front of a repository path
pub const REGISTRY_HOST: &str = "nvcr.io";

pub const DEFAULT_TAG: &str = "latest";

/// Repository and tag of a container image on the NGC registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub repository: String,
    pub tag: String,
}

impl ImageReference {
    /// Parse an image URI such as `nvcr.io/nvidia/tensorrt:24.03-py3`
    ///
    /// A leading `https://` or `http://` scheme and the `nvcr.io/` host are
    /// stripped. The remainder is split on `:` into repository and tag; when it
    /// does not contain exactly one `:` the whole remainder is taken as the
    /// repository and the tag defaults to `latest`. Nothing is validated here,
    /// a bogus repository just makes the registry calls fail.
    pub fn parse(raw: &str) -> Self {
        let mut uri = raw;
        if let Some(rest) = uri.strip_prefix("https://") {
            uri = rest;
        }
        if let Some(rest) = uri.strip_prefix("http://") {
            uri = rest;
        }
        if let Some(rest) = uri
            .strip_prefix(REGISTRY_HOST)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            uri = rest;
        }

        let parts: Vec<&str> = uri.split(':').collect();
        match parts.as_slice() {
            [repository, tag] => Self {
                repository: repository.to_string(),
                tag: tag.to_string(),
            },
            _ => Self {
                repository: uri.to_string(),
                tag: DEFAULT_TAG.to_string(),
            },
        }
    }

    /// Scope requested from the registry token endpoint
    pub fn pull_scope(&self) -> String {
        format!("repository:{}:pull", self.repository)
    }
}

impl FromStr for ImageReference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(raw: &str) -> (String, String) {
        let image = ImageReference::parse(raw);
        (image.repository, image.tag)
    }

    #[test]
    fn test_parse_registry_prefixed_with_tag() {
        assert_eq!(
            parts("nvcr.io/nvidia/tensorrt:24.03-py3"),
            ("nvidia/tensorrt".to_string(), "24.03-py3".to_string())
        );
    }

    #[test]
    fn test_parse_scheme_without_tag_defaults_to_latest() {
        assert_eq!(
            parts("https://nvcr.io/nvidia/tensorrt"),
            ("nvidia/tensorrt".to_string(), "latest".to_string())
        );
        assert_eq!(
            parts("http://nvcr.io/nvidia/tensorrt"),
            ("nvidia/tensorrt".to_string(), "latest".to_string())
        );
    }

    #[test]
    fn test_parse_bare_repository() {
        assert_eq!(
            parts("nvidia/tensorrt:latest"),
            ("nvidia/tensorrt".to_string(), "latest".to_string())
        );
    }

    #[test]
    fn test_parse_other_host_is_kept() {
        // Only the NGC host is stripped
        assert_eq!(
            parts("docker.io/library/ubuntu"),
            ("docker.io/library/ubuntu".to_string(), "latest".to_string())
        );
    }

    #[test]
    fn test_parse_multiple_colons_passes_through() {
        let image = ImageReference::parse("localhost:5000/app:v1");
        assert_eq!(image.repository, "localhost:5000/app:v1");
        assert_eq!(image.tag, "latest");
    }

    #[test]
    fn test_display_and_scope() {
        let image: ImageReference = "nvcr.io/nim/meta/llama3:1.0".parse().unwrap();
        assert_eq!(image.to_string(), "nim/meta/llama3:1.0");
        assert_eq!(image.pull_scope(), "repository:nim/meta/llama3:pull");
    }
}
