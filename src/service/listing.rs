//! Data handed to the renderer when a directory is requested.
//!
//! Every `location` in this module is a percent-encoded URL path rooted at
//! `/`, ready to be used as a link. Names are for display only and may have
//! been converted lossily when the filesystem name is not UTF-8.

/// One child of the listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Directory { name: String, location: String },
    File { name: String, location: String, size: u64 },
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Directory { name, .. } | Entry::File { name, .. } => name,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Entry::Directory { location, .. } | Entry::File { location, .. } => location,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory { .. })
    }

    /// Size in bytes, directories have none.
    pub fn size(&self) -> Option<u64> {
        match self {
            Entry::Directory { .. } => None,
            Entry::File { size, .. } => Some(*size),
        }
    }
}

/// Link to an ancestor of the listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Breadcrumb {
    /// The served root, always the first crumb.
    Home,
    Directory { name: String, location: String },
}

impl Breadcrumb {
    pub fn name(&self) -> &str {
        match self {
            Breadcrumb::Home => "home",
            Breadcrumb::Directory { name, .. } => name,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Breadcrumb::Home => "/",
            Breadcrumb::Directory { location, .. } => location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Name of the listed directory on disk.
    pub name: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub directories: Vec<Entry>,
    pub files: Vec<Entry>,
    pub is_root: bool,
}

impl DirectoryListing {
    /// Total number of children, both lists together.
    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ancestors of the decoded `path` from the root outwards. The last segment is
/// the directory being listed and gets no crumb; the root itself has none at
/// all.
pub fn breadcrumbs(path: &[u8]) -> Vec<Breadcrumb> {
    let segments = segments(path).collect::<Vec<_>>();

    let Some((_, ancestors)) = segments.split_last() else {
        return Vec::new();
    };

    let mut crumbs = Vec::with_capacity(segments.len());
    crumbs.push(Breadcrumb::Home);

    let mut location = String::from("/");
    for segment in ancestors {
        location.push_str(&urlencoding::encode_binary(segment));
        location.push('/');
        crumbs.push(Breadcrumb::Directory {
            name: String::from_utf8_lossy(segment).into_owned(),
            location: location.clone(),
        });
    }

    crumbs
}

/// URL of the child with raw file name `name` inside the directory whose URL
/// is `base`.
pub fn join_location(base: &str, name: &[u8]) -> String {
    let name = urlencoding::encode_binary(name);
    let mut location = String::with_capacity(base.len() + name.len() + 1);

    location.push_str(base);
    if !location.ends_with('/') {
        location.push('/');
    }
    location.push_str(&name);

    location
}

/// Percent-encodes every segment of a decoded path, keeping the separators.
pub fn encode_path(path: &[u8]) -> String {
    path.split(|byte| *byte == b'/')
        .map(urlencoding::encode_binary)
        .collect::<Vec<_>>()
        .join("/")
}

fn segments(path: &[u8]) -> impl Iterator<Item = &[u8]> {
    path.split(|byte| *byte == b'/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crumb(name: &str, location: &str) -> Breadcrumb {
        Breadcrumb::Directory {
            name: name.into(),
            location: location.into(),
        }
    }

    #[test]
    fn root_has_no_breadcrumbs() {
        assert!(breadcrumbs(b"/").is_empty());
    }

    #[test]
    fn first_level_only_links_home() {
        assert_eq!(breadcrumbs(b"/foo"), vec![Breadcrumb::Home]);
        assert_eq!(breadcrumbs(b"/foo/"), vec![Breadcrumb::Home]);
    }

    #[test]
    fn nested_breadcrumbs_accumulate() {
        assert_eq!(
            breadcrumbs(b"/foo/bar"),
            vec![Breadcrumb::Home, crumb("foo", "/foo/")]
        );

        assert_eq!(
            breadcrumbs(b"/a/b/c/d"),
            vec![
                Breadcrumb::Home,
                crumb("a", "/a/"),
                crumb("b", "/a/b/"),
                crumb("c", "/a/b/c/"),
            ]
        );
    }

    #[test]
    fn breadcrumb_locations_are_encoded() {
        assert_eq!(
            breadcrumbs(b"/my docs/caf\xe9/x"),
            vec![
                Breadcrumb::Home,
                crumb("my docs", "/my%20docs/"),
                crumb("caf\u{FFFD}", "/my%20docs/caf%E9/"),
            ]
        );
    }

    #[test]
    fn home_points_at_root() {
        assert_eq!(Breadcrumb::Home.location(), "/");
        assert_eq!(Breadcrumb::Home.name(), "home");
    }

    #[test]
    fn join_location_in_url_space() {
        assert_eq!(join_location("/", b"a.txt"), "/a.txt");
        assert_eq!(join_location("/docs", b"a.txt"), "/docs/a.txt");
        assert_eq!(join_location("/docs/", b"a b.txt"), "/docs/a%20b.txt");
        assert_eq!(join_location("/", b"caf\xe9.txt"), "/caf%E9.txt");
    }

    #[test]
    fn encode_path_keeps_separators() {
        assert_eq!(encode_path(b"/"), "/");
        assert_eq!(encode_path(b"/a b/c.txt"), "/a%20b/c.txt");
        assert_eq!(encode_path(b"/caf\xe9"), "/caf%E9");
    }

    #[test]
    fn entry_accessors() {
        let directory = Entry::Directory {
            name: "src".into(),
            location: "/src".into(),
        };
        let file = Entry::File {
            name: "main.rs".into(),
            location: "/main.rs".into(),
            size: 12,
        };

        assert!(directory.is_directory());
        assert!(!file.is_directory());
        assert_eq!(directory.size(), None);
        assert_eq!(file.size(), Some(12));
        assert_eq!(file.name(), "main.rs");
        assert_eq!(directory.location(), "/src");
    }
}
