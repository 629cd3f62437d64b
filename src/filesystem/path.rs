use derive_more::Display;

/// A normalized absolute path: `/` or `/seg1/seg2`, never with a trailing
/// or doubled slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct AbsolutePath(String);

impl AbsolutePath {
    pub fn root() -> Self {
        AbsolutePath(String::from("/"))
    }

    fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let joined = segments
            .into_iter()
            .fold(String::new(), |mut acc, segment| {
                acc.push('/');
                acc.push_str(segment);
                acc
            });

        if joined.is_empty() {
            Self::root()
        } else {
            AbsolutePath(joined)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// The directory one level up, or `None` for the root.
    pub fn parent(&self) -> Option<AbsolutePath> {
        if self.is_root() {
            return None;
        }
        let segments = self.segments().collect::<Vec<_>>();
        Some(Self::from_segments(
            segments[..segments.len() - 1].iter().copied(),
        ))
    }

    /// Appends a single entry name. The name is taken verbatim.
    pub fn join(&self, name: &str) -> AbsolutePath {
        Self::from_segments(self.segments().chain(std::iter::once(name)))
    }

    /// Resolves `path` against `self` as the working directory.
    ///
    /// Absolute input only has its slashes normalized; `.` and `..` are
    /// interpreted for relative input alone, and `..` at the root stays
    /// at the root.
    pub fn resolve(&self, path: Option<&str>) -> AbsolutePath {
        let Some(path) = path.filter(|path| !path.is_empty()) else {
            return self.clone();
        };

        if path.starts_with('/') {
            return Self::from_segments(path.split('/').filter(|segment| !segment.is_empty()));
        }

        let mut segments = self.segments().collect::<Vec<_>>();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            match segment {
                ".." => {
                    segments.pop();
                }
                "." => {}
                other => segments.push(other),
            }
        }

        Self::from_segments(segments)
    }
}

impl Default for AbsolutePath {
    fn default() -> Self {
        Self::root()
    }
}

impl AsRef<str> for AbsolutePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Resolves `path` against the working directory `cwd`.
pub fn resolve(path: Option<&str>, cwd: &AbsolutePath) -> AbsolutePath {
    cwd.resolve(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn cwd(path: &str) -> AbsolutePath {
        AbsolutePath::root().resolve(Some(path))
    }

    #[rstest]
    #[case(None, "/home", "/home")]
    #[case(Some(""), "/var", "/var")]
    #[case(Some("/"), "/home", "/")]
    #[case(Some("///"), "/home", "/")]
    #[case(Some("/tmp/"), "/", "/tmp")]
    #[case(Some("//a//b///"), "/", "/a/b")]
    #[case(Some("/a/../b"), "/", "/a/../b")]
    #[case(Some("docs"), "/home", "/home/docs")]
    #[case(Some("./docs/./notes"), "/home", "/home/docs/notes")]
    #[case(Some(".."), "/home/user", "/home")]
    #[case(Some("../.."), "/home/user", "/")]
    #[case(Some("../../../.."), "/home/user", "/")]
    #[case(Some(".."), "/", "/")]
    #[case(Some("a//b/"), "/", "/a/b")]
    #[case(Some("../var/log"), "/home", "/var/log")]
    fn resolve_normalizes_against_cwd(
        #[case] input: Option<&str>,
        #[case] current: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(resolve(input, &cwd(current)).as_str(), expected);
    }

    #[rstest]
    #[case("..")]
    #[case("a/b/../c")]
    #[case("/x//y/")]
    #[case("./.")]
    #[case("/a/../b")]
    #[case("deep/er/..")]
    fn resolve_is_idempotent(#[case] input: &str) {
        let current = cwd("/home/user");
        let once = resolve(Some(input), &current);
        let twice = resolve(Some(once.as_str()), &current);
        assert_eq!(once, twice);
    }

    #[test]
    fn root_has_no_segments_and_no_parent() {
        let root = AbsolutePath::root();
        assert!(root.is_root());
        assert_eq!(root.segments().count(), 0);
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn parent_drops_last_segment() {
        assert_eq!(cwd("/a/b/c").parent(), Some(cwd("/a/b")));
        assert_eq!(cwd("/a").parent(), Some(AbsolutePath::root()));
    }

    #[test]
    fn join_appends_one_segment() {
        assert_eq!(AbsolutePath::root().join("tmp").as_str(), "/tmp");
        assert_eq!(cwd("/home").join("user").as_str(), "/home/user");
    }

    #[test]
    fn displays_as_plain_string() {
        assert_eq!(cwd("/var/log").to_string(), "/var/log");
    }
}
