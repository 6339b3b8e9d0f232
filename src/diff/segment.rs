use std::mem;

use super::types::{DiffBlock, FileSegment, LineKind, UNKNOWN_FILE};

const DIFF_HEADER: &str = "diff --git ";

/// Segmentation state. The open segment is owned by the state that is
/// accumulating it.
enum State<'a> {
    BeforeAnyFile,
    InHeader(FileSegment<'a>),
    InHunkBody(FileSegment<'a>),
}

impl<'a> State<'a> {
    fn into_segment(self) -> Option<FileSegment<'a>> {
        match self {
            State::BeforeAnyFile => None,
            State::InHeader(segment) | State::InHunkBody(segment) => Some(segment),
        }
    }
}

/// Split a unified diff into ordered blocks.
///
/// Every input line lands in exactly one block, and line terminators are
/// kept, so concatenating the lines of all blocks reproduces `diff` exactly.
pub fn segment(diff: &str) -> Vec<DiffBlock<'_>> {
    let mut blocks = Vec::new();
    let mut state = State::BeforeAnyFile;

    for line in diff.split_inclusive('\n') {
        let bare = strip_terminator(line);

        if bare.starts_with(DIFF_HEADER) {
            if let Some(done) = mem::replace(&mut state, State::BeforeAnyFile).into_segment() {
                blocks.push(DiffBlock::File(done));
            }
            let file_name = parse_diff_header(bare)
                .map(|(_, new)| new)
                .unwrap_or(UNKNOWN_FILE);
            let mut segment = FileSegment::new(file_name);
            segment.push(LineKind::Header, line);
            state = State::InHeader(segment);
            continue;
        }

        state = match state {
            State::BeforeAnyFile => {
                blocks.push(DiffBlock::Other(line));
                State::BeforeAnyFile
            }
            State::InHeader(mut segment) => {
                if bare.starts_with("@@") {
                    segment.push(LineKind::HunkHeader, line);
                    State::InHunkBody(segment)
                } else {
                    // index/---/+++ and extended metadata (mode, rename, similarity)
                    segment.push(LineKind::Header, line);
                    State::InHeader(segment)
                }
            }
            State::InHunkBody(mut segment) => {
                let kind = if is_file_header(bare) {
                    LineKind::Header
                } else if bare.starts_with("@@") {
                    LineKind::HunkHeader
                } else {
                    LineKind::Content
                };
                segment.push(kind, line);
                State::InHunkBody(segment)
            }
        };
    }

    if let Some(done) = state.into_segment() {
        blocks.push(DiffBlock::File(done));
    }

    blocks
}

fn is_file_header(line: &str) -> bool {
    line.starts_with("index ") || line.starts_with("+++") || line.starts_with("---")
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Parse `diff --git a/<old> b/<new>` into `(old, new)`.
///
/// Splits at the last ` b/`, so an old path containing spaces stays whole.
/// Both paths must be non-empty.
pub fn parse_diff_header(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(DIFF_HEADER)?.strip_prefix("a/")?;
    let split = rest.rfind(" b/")?;
    let old = &rest[..split];
    let new = &rest[split + " b/".len()..];
    if old.is_empty() || new.is_empty() {
        return None;
    }
    Some((old, new))
}
