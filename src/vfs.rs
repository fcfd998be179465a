//! In-memory file tree.
//!
//! The desktop has no access to the host filesystem.  Everything it reads,
//! the configuration file included, lives in a [`VirtualFs`].  Paths are
//! absolute and `/`-separated; empty components and `.` are ignored.

use std::collections::BTreeMap;

/// Where the desktop looks for its configuration.
pub const CONFIG_PATH: &str = "/home/user/.config/HackerLand.hk";

/// The configuration file shipped in the default tree.
pub const USER_CONFIG_TEXT: &str = "\
! HackerLand Configuration File
! Location: ~/.config/HackerLand.hk

[metadata]
-> name => HackerLand Defaults
-> version => 1.0

[theme]
-> border_active => #d946ef
-> border_inactive => #1e293b
-> blur_strength => 20px
-> gap_size => 16
-> outer_padding => 32
-> active_opacity => 1
-> inactive_opacity => 0.8
-> accent_color => #d946ef
-> bar_bg => #020617cc

[wallpaper]
-> url => https://images.unsplash.com/photo-1620641788421-7a1c342ea42e?q=80&w=1974&auto=format&fit=crop
-> overlay_opacity => 0.3

[animation]
-> duration => 0.4
-> stiffness => 120

[general]
-> font_family => JetBrains Mono
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    File(Vec<u8>),
    Dir(BTreeMap<String, Node>),
}

impl Node {
    fn empty_dir() -> Self {
        Node::Dir(BTreeMap::new())
    }

    /// Turn this node into a directory if it is a file.
    fn ensure_dir(&mut self) -> &mut BTreeMap<String, Node> {
        if let Node::File(_) = self {
            *self = Node::empty_dir();
        }
        match self {
            Node::Dir(children) => children,
            Node::File(_) => unreachable!("file nodes were replaced above"),
        }
    }
}

/// A tree of directories and byte files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFs {
    root: Node,
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::new()
    }
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|c| !c.is_empty() && *c != ".")
}

impl VirtualFs {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            root: Node::empty_dir(),
        }
    }

    /// The tree the desktop boots with: the user's home directory with its
    /// configuration file and a few documents, plus `/etc/motd`.
    pub fn with_defaults() -> Self {
        let mut fs = Self::new();
        fs.write(CONFIG_PATH, USER_CONFIG_TEXT.as_bytes().to_vec());
        fs.write(
            "/home/user/documents/manifesto.txt",
            b"Information wants to be free.".to_vec(),
        );
        fs.write(
            "/home/user/documents/todo.txt",
            b"- Build new kernel\n- Hack the planet".to_vec(),
        );
        fs.mkdir("/home/user/projects");
        fs.mkdir("/home/user/downloads");
        fs.write("/etc/motd", b"Have a lot of fun...".to_vec());
        fs
    }

    fn lookup(&self, path: &str) -> Option<&Node> {
        let mut node = &self.root;
        for name in components(path) {
            match node {
                Node::Dir(children) => node = children.get(name)?,
                Node::File(_) => return None,
            }
        }
        Some(node)
    }

    /// Walk to the directory at `path`, creating missing directories and
    /// replacing any file that is in the way.
    fn dir_mut(&mut self, path: &str) -> &mut BTreeMap<String, Node> {
        let mut node = &mut self.root;
        for name in components(path) {
            node = node
                .ensure_dir()
                .entry(name.to_string())
                .or_insert_with(Node::empty_dir);
        }
        node.ensure_dir()
    }

    /// Contents of the file at `path`.  `None` if there is no such file or
    /// the path names a directory.
    pub fn read(&self, path: &str) -> Option<&[u8]> {
        match self.lookup(path)? {
            Node::File(bytes) => Some(bytes),
            Node::Dir(_) => None,
        }
    }

    /// Write `contents` to `path`, creating parent directories as needed.
    /// Writing to the root is ignored.
    pub fn write(&mut self, path: &str, contents: Vec<u8>) {
        let parts: Vec<&str> = components(path).collect();
        let Some((name, parents)) = parts.split_last() else {
            return;
        };
        let parent = self.dir_mut(&parents.join("/"));
        parent.insert(name.to_string(), Node::File(contents));
    }

    /// Create the directory at `path` and its parents.
    pub fn mkdir(&mut self, path: &str) {
        self.dir_mut(path);
    }

    /// Whether anything exists at `path`.
    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Entry names of the directory at `path`, sorted.  Directories get a
    /// trailing `/`.
    pub fn list(&self, path: &str) -> Option<Vec<String>> {
        match self.lookup(path)? {
            Node::Dir(children) => Some(
                children
                    .iter()
                    .map(|(name, node)| match node {
                        Node::Dir(_) => format!("{}/", name),
                        Node::File(_) => name.clone(),
                    })
                    .collect(),
            ),
            Node::File(_) => None,
        }
    }
}
