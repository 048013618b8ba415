use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Kinds of code entities known to the entity database and reported by the
/// cursor navigator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    File,
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
    Interface,
    Function,
    Method,
    Variable,
    Property,
    Typedef,
    Macro,
    #[default]
    Unknown,
}

#[allow(clippy::should_implement_trait)]
impl EntityKind {
    /// Returns the string representation of this entity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::File => "file",
            EntityKind::Namespace => "namespace",
            EntityKind::Class => "class",
            EntityKind::Struct => "struct",
            EntityKind::Union => "union",
            EntityKind::Enum => "enum",
            EntityKind::Interface => "interface",
            EntityKind::Function => "function",
            EntityKind::Method => "method",
            EntityKind::Variable => "variable",
            EntityKind::Property => "property",
            EntityKind::Typedef => "typedef",
            EntityKind::Macro => "macro",
            EntityKind::Unknown => "unknown",
        }
    }

    /// Parses a string into an `EntityKind`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<EntityKind> {
        match s {
            "file" => Some(EntityKind::File),
            "namespace" => Some(EntityKind::Namespace),
            "class" => Some(EntityKind::Class),
            "struct" => Some(EntityKind::Struct),
            "union" => Some(EntityKind::Union),
            "enum" => Some(EntityKind::Enum),
            "interface" => Some(EntityKind::Interface),
            "function" => Some(EntityKind::Function),
            "method" => Some(EntityKind::Method),
            "variable" => Some(EntityKind::Variable),
            "property" => Some(EntityKind::Property),
            "typedef" => Some(EntityKind::Typedef),
            "macro" => Some(EntityKind::Macro),
            "unknown" => Some(EntityKind::Unknown),
            _ => None,
        }
    }

    /// Function and method are interchangeable when matching a cursor element
    /// against the catalog; so are class and struct.
    pub fn is_compatible_with(&self, other: &EntityKind) -> bool {
        use EntityKind::*;
        self == other
            || matches!(
                (self, other),
                (Function, Method) | (Method, Function) | (Class, Struct) | (Struct, Class)
            )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known code entity, as stored by the entity database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub kind: EntityKind,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub line: u32,
}

/// The symbol whose usages are being searched for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSymbol {
    /// Graph node id of the symbol; edges point at it.
    pub unique_name: String,
    /// Short name, used for the fallback search.
    pub name: String,
    /// Fully-qualified display name, e.g. `Widget::Draw`.
    pub long_name: String,
}

impl SourceSymbol {
    pub fn new(
        unique_name: impl Into<String>,
        name: impl Into<String>,
        long_name: impl Into<String>,
    ) -> Self {
        Self {
            unique_name: unique_name.into(),
            name: name.into(),
            long_name: long_name.into(),
        }
    }
}

/// The code element found under the cursor after a navigation jump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorElement {
    pub name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub kind: EntityKind,
    /// Full path of the document containing the element.
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub line: u32,
}

/// One entry of a search result list, read for the duration of a slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub text: String,
    /// Icon code reported by the host; it encodes the reference category.
    pub category: u16,
    #[serde(default)]
    pub still_computing: bool,
}

impl ListEntry {
    pub fn new(text: impl Into<String>, category: u16) -> Self {
        Self {
            text: text.into(),
            category,
            still_computing: false,
        }
    }

    pub fn computing(text: impl Into<String>, category: u16) -> Self {
        Self {
            still_computing: true,
            ..Self::new(text, category)
        }
    }

    /// Whether this entry is a placeholder for results not yet produced,
    /// either flagged by the host or recognizable from its text.
    pub fn is_pending(&self, markers: &[String]) -> bool {
        self.still_computing || markers.iter().any(|m| self.text.contains(m.as_str()))
    }
}

/// Criteria for a symbol search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub term: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
    /// Expand each hit into its reference occurrences.
    pub include_references: bool,
}

impl SearchCriteria {
    /// Case-sensitive, whole-word search that includes references.
    pub fn references_to(term: &str) -> Self {
        Self {
            term: term.to_string(),
            case_sensitive: true,
            whole_word: true,
            include_references: true,
        }
    }
}

/// Flags controlling how a name in an [`EntitySearchRequest`] is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchFlags(u8);

impl MatchFlags {
    pub const NONE: MatchFlags = MatchFlags(0);
    pub const MATCH_CASE: MatchFlags = MatchFlags(1);
    pub const MATCH_WORD: MatchFlags = MatchFlags(1 << 1);
    /// The query contains the catalog entry.
    pub const WORD_CONTAINS_DB: MatchFlags = MatchFlags(1 << 2);
    /// The catalog entry contains the query.
    pub const DB_CONTAINS_WORD: MatchFlags = MatchFlags(1 << 3);

    pub fn contains(self, other: MatchFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MatchFlags {
    type Output = MatchFlags;

    fn bitor(self, rhs: MatchFlags) -> MatchFlags {
        MatchFlags(self.0 | rhs.0)
    }
}

/// A lookup against the entity database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySearchRequest {
    pub name: String,
    pub name_flags: MatchFlags,
    /// Qualified name constraint; empty means unconstrained.
    pub long_name: String,
    pub long_name_flags: MatchFlags,
    pub kind: EntityKind,
    pub file_path: String,
    pub line: u32,
}

impl EntitySearchRequest {
    /// Builds the precise lookup for an element under the cursor.
    pub fn for_element(element: &CursorElement) -> Self {
        Self {
            name: element.name.clone(),
            name_flags: MatchFlags::MATCH_CASE | MatchFlags::MATCH_WORD,
            long_name: element.long_name.clone(),
            long_name_flags: MatchFlags::MATCH_CASE
                | MatchFlags::WORD_CONTAINS_DB
                | MatchFlags::DB_CONTAINS_WORD,
            kind: element.kind,
            file_path: element.file_path.clone(),
            line: element.line,
        }
    }

    /// The same lookup with the qualified-name constraint removed.
    pub fn widened(&self) -> Self {
        Self {
            long_name: String::new(),
            ..self.clone()
        }
    }

    pub fn has_long_name(&self) -> bool {
        !self.long_name.is_empty()
    }
}

/// Cursor position in a document, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPosition {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

/// Handle to an open document in the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentHandle {
    pub path: String,
    pub id: u64,
}

/// Lifecycle of the reference searcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchState {
    /// A session may be advanced.
    Idle,
    /// A slice is running; any further `advance` is refused.
    SlicingInProgress,
    /// No session, or the last one drained or failed to launch.
    #[default]
    Exhausted,
}

/// Outcome of one processing slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceReport {
    /// No item or occurrence was left pending.
    pub is_complete: bool,
    /// Occurrences navigated to and handed to the linker.
    pub linked: usize,
    /// Occurrences dropped because of their category.
    pub ignored: usize,
    /// The slice stopped early because its time budget ran out.
    pub timed_out: bool,
}

/// What linking a single occurrence produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Nothing recognizable under the cursor.
    NoElement,
    /// The database had no entity for the element, even after widening.
    NoMatch,
    Linked {
        entity_id: String,
        /// `false` when the graph already had the edge.
        edge_added: bool,
        /// The match came from the lookup without the qualified name.
        widened: bool,
    },
}

/// Status reported to the user at the end of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Narration {
    Completed,
    LimitReached,
}

impl fmt::Display for Narration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Narration::Completed => write!(f, "Search completed."),
            Narration::LimitReached => write!(
                f,
                "Search hasn't completed because the slice limit was reached. Please try again."
            ),
        }
    }
}
