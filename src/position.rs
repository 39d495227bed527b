//! Position virtualization: opaque in-process handles on one side, portable
//! `(filename, offset)` pairs on the other.
//!
//! A [`FileSet`] owns every file of a session. Files occupy contiguous,
//! non-overlapping base ranges in a single global offset space, so a handle
//! identifies both its file and its offset within it. Handles are meaningless
//! outside the `FileSet` that produced them; the decoder always re-hosts
//! positions into a fresh, session-local set.

/// Opaque position handle. `NO_POS` (zero) is the "no position" sentinel;
/// every real handle is `>= 1`.
pub type Pos = u32;

/// The "no position" sentinel.
pub const NO_POS: Pos = 0;

/// Capacity reserved for a file the decoder registers lazily, where the real
/// size is unknown. Offsets beyond it miss (degrade to `NO_POS`).
const LAZY_FILE_SIZE: u32 = 1 << 26;

/// A fully resolved source position.
///
/// `line`/`column` are 1-based and only available when the owning file has a
/// line table (i.e. it went through the lexer); they are 0 otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    pub filename: String,
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line > 0 {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        } else if !self.filename.is_empty() {
            write!(f, "{}:{}", self.filename, self.offset)
        } else {
            f.write_str("-")
        }
    }
}

/// One registered source file: a name, a base handle and a size.
#[derive(Debug, Clone)]
pub struct File {
    name: String,
    base: u32,
    size: u32,
    /// Byte offsets of line starts; `lines[0] == 0` once the first line is
    /// recorded. Empty for lazily registered files.
    lines: Vec<u32>,
}

impl File {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Handle for a byte offset within this file; `NO_POS` if out of range.
    pub fn pos(&self, offset: u32) -> Pos {
        if offset > self.size {
            return NO_POS;
        }
        self.base + offset
    }

    /// Offset within this file of a handle owned by it.
    pub fn offset(&self, pos: Pos) -> u32 {
        debug_assert!(pos >= self.base && pos <= self.base + self.size);
        pos - self.base
    }

    /// Records the start offset of a new line. Offsets must be strictly
    /// increasing; anything else is ignored.
    pub fn add_line(&mut self, offset: u32) {
        if offset <= self.size && self.lines.last().map_or(true, |&last| last < offset) {
            self.lines.push(offset);
        }
    }

    /// 1-based line and column for an offset, or `(0, 0)` without line data.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        if self.lines.is_empty() {
            return (0, 0);
        }
        let line = match self.lines.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (line as u32 + 1, offset - self.lines[line] + 1)
    }

    fn contains(&self, pos: Pos) -> bool {
        pos >= self.base && pos <= self.base + self.size
    }
}

/// A session-local position index.
///
/// The encoder borrows the set built while parsing; the decoder constructs
/// its own fresh set and registers files lazily as their names appear in the
/// wire tree. Sets are never shared between sessions.
#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<File>,
    next_base: u32,
}

impl FileSet {
    pub fn new() -> Self {
        FileSet {
            files: Vec::new(),
            next_base: 1,
        }
    }

    /// Registers a file of known size and returns its index.
    ///
    /// On base-space exhaustion the file is still registered but gets no
    /// usable range, so its positions resolve to `NO_POS` (best effort, not
    /// an error).
    pub fn add_file(&mut self, name: &str, size: u32) -> usize {
        let base = self.next_base;
        let exhausted = u32::MAX - base < size;
        let size = if exhausted { 0 } else { size };
        self.next_base = base.saturating_add(size).saturating_add(1);
        self.files.push(File {
            name: name.to_string(),
            base,
            size,
            lines: Vec::new(),
        });
        self.files.len() - 1
    }

    /// Looks up a file by name, registering it with the default lazy
    /// capacity if it is new. Used by the decoder.
    pub fn lookup_or_register(&mut self, name: &str) -> usize {
        if let Some(i) = self.files.iter().position(|f| f.name == name) {
            return i;
        }
        self.add_file(name, LAZY_FILE_SIZE)
    }

    pub fn file(&self, index: usize) -> &File {
        &self.files[index]
    }

    pub fn file_mut(&mut self, index: usize) -> &mut File {
        &mut self.files[index]
    }

    /// The file owning a handle, if any.
    pub fn file_of(&self, pos: Pos) -> Option<&File> {
        if pos == NO_POS {
            return None;
        }
        // Bases are strictly increasing; find the last file whose base is
        // <= pos, then confirm the range.
        let i = self.files.partition_point(|f| f.base <= pos);
        if i == 0 {
            return None;
        }
        let f = &self.files[i - 1];
        f.contains(pos).then_some(f)
    }

    /// Portable form of a handle: owning file name plus offset within it.
    /// `None` for the sentinel and for handles no registered file owns.
    pub fn position(&self, pos: Pos) -> Option<Position> {
        let f = self.file_of(pos)?;
        let offset = f.offset(pos);
        let (line, column) = f.line_col(offset);
        Some(Position {
            filename: f.name.clone(),
            offset,
            line,
            column,
        })
    }

    /// Offset-within-file of a handle; layout queries in the printer only
    /// need the offset, not the full position.
    pub fn offset_of(&self, pos: Pos) -> Option<u32> {
        self.file_of(pos).map(|f| f.offset(pos))
    }

    /// Re-hosts a portable `(filename, offset)` pair into this set,
    /// registering the file on first sight. Out-of-range offsets miss.
    pub fn pos_for(&mut self, filename: &str, offset: u32) -> Pos {
        let i = self.lookup_or_register(filename);
        self.files[i].pos(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_get_disjoint_ranges() {
        let mut fset = FileSet::new();
        let a = fset.add_file("a.go", 10);
        let b = fset.add_file("b.go", 5);
        let pa = fset.file(a).pos(3);
        let pb = fset.file(b).pos(3);
        assert_ne!(pa, pb);
        assert_eq!(fset.file_of(pa).unwrap().name(), "a.go");
        assert_eq!(fset.file_of(pb).unwrap().name(), "b.go");
    }

    #[test]
    fn position_round_trips_through_portable_form() {
        let mut fset = FileSet::new();
        let i = fset.add_file("x.go", 100);
        let pos = fset.file(i).pos(42);
        let p = fset.position(pos).unwrap();
        assert_eq!((p.filename.as_str(), p.offset), ("x.go", 42));

        let mut fresh = FileSet::new();
        let rehosted = fresh.pos_for(&p.filename, p.offset);
        assert_ne!(rehosted, NO_POS);
        assert_eq!(fresh.position(rehosted).unwrap().offset, 42);
    }

    #[test]
    fn sentinel_resolves_to_nothing() {
        let fset = FileSet::new();
        assert!(fset.position(NO_POS).is_none());
        assert!(fset.file_of(NO_POS).is_none());
    }

    #[test]
    fn lazy_registration_misses_beyond_capacity() {
        let mut fset = FileSet::new();
        let ok = fset.pos_for("big.go", 7);
        assert_ne!(ok, NO_POS);
        let miss = fset.pos_for("big.go", u32::MAX - 1);
        assert_eq!(miss, NO_POS);
    }

    #[test]
    fn line_table_answers_line_col() {
        let mut fset = FileSet::new();
        let i = fset.add_file("l.go", 30);
        let f = fset.file_mut(i);
        f.add_line(0);
        f.add_line(10);
        f.add_line(20);
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(9), (1, 10));
        assert_eq!(f.line_col(10), (2, 1));
        assert_eq!(f.line_col(25), (3, 6));
    }
}
