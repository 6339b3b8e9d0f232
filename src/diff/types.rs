/// File name used when a `diff --git` header cannot be parsed.
pub const UNKNOWN_FILE: &str = "unknown";

/// Classification of a line inside a file block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `diff --git`, `index`, `---`, `+++` and extended git metadata lines.
    Header,
    /// `@@ -a,b +c,d @@` hunk position markers.
    HunkHeader,
    /// Added, removed and context lines. The only kind that is truncated.
    Content,
}

/// One file's block within a unified diff.
///
/// Lines are kept in their original order (terminators included) so an
/// untruncated segment can be written back byte-for-byte.
#[derive(Debug, Clone)]
pub struct FileSegment<'a> {
    /// New-side path from the `diff --git` header, or [`UNKNOWN_FILE`].
    pub file_name: String,
    lines: Vec<(LineKind, &'a str)>,
}

impl<'a> FileSegment<'a> {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: LineKind, line: &'a str) {
        self.lines.push((kind, line));
    }

    /// All lines in original order.
    pub fn lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().map(|(_, line)| *line)
    }

    fn lines_of(&self, kind: LineKind) -> impl Iterator<Item = &'a str> + '_ {
        self.lines
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, line)| *line)
    }

    pub fn header_lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines_of(LineKind::Header)
    }

    pub fn hunk_header_lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines_of(LineKind::HunkHeader)
    }

    pub fn content_lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines_of(LineKind::Content)
    }

    pub fn content_len(&self) -> usize {
        self.content_lines().count()
    }
}

/// A piece of a segmented diff, in stream order.
#[derive(Debug, Clone)]
pub enum DiffBlock<'a> {
    /// Material outside any file block (leading blank lines, banners).
    Other(&'a str),
    File(FileSegment<'a>),
}

/// Head/tail window chosen for an over-budget file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub head: usize,
    pub tail: usize,
    pub hidden: usize,
}

/// Per-file outcome of a truncation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub file_name: String,
    /// Content lines in the original block.
    pub content_lines: usize,
    /// `None` when the block was emitted unchanged.
    pub window: Option<Window>,
}

impl FileSummary {
    pub fn is_truncated(&self) -> bool {
        self.window.is_some()
    }
}

/// Result of running the truncation engine over a whole diff.
#[derive(Debug, Clone)]
pub struct TruncatedDiff {
    pub text: String,
    pub files: Vec<FileSummary>,
}

impl TruncatedDiff {
    pub fn truncated_files(&self) -> impl Iterator<Item = &FileSummary> {
        self.files.iter().filter(|f| f.is_truncated())
    }
}
