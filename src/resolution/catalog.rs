use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::{RefGraphError, Result};
use crate::host::EntityDatabase;
use crate::types::*;

/// In-memory entity database.
///
/// Entities are indexed by short name; the qualified name, kind, file and line
/// of a request only filter and rank the candidates found under that name.
#[derive(Debug, Default)]
pub struct EntityCatalog {
    entities: Vec<Entity>,
    /// Indices into `entities`, grouped by lowercase short name.
    name_index: HashMap<String, Vec<usize>>,
    /// Number of requests served.
    lookup_count: Cell<usize>,
}

impl EntityCatalog {
    pub fn new(entities: Vec<Entity>) -> Self {
        let mut catalog = Self::default();
        for entity in entities {
            catalog.insert(entity);
        }
        catalog
    }

    /// Loads a catalog from a JSON array of entities.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let entities: Vec<Entity> =
            serde_json::from_str(&contents).map_err(|e| RefGraphError::Fixture {
                message: format!("failed to parse entity catalog: {e}"),
                path: path.display().to_string(),
            })?;
        Ok(Self::new(entities))
    }

    pub fn insert(&mut self, entity: Entity) {
        let index = self.entities.len();
        self.name_index
            .entry(entity.name.to_lowercase())
            .or_default()
            .push(index);
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn lookup_count(&self) -> usize {
        self.lookup_count.get()
    }

    fn candidates<'a>(&'a self, request: &'a EntitySearchRequest) -> Vec<&'a Entity> {
        let exact = request.name_flags.contains(MatchFlags::MATCH_WORD);
        let indices: Vec<usize> = if exact {
            self.name_index
                .get(&request.name.to_lowercase())
                .cloned()
                .unwrap_or_default()
        } else {
            (0..self.entities.len()).collect()
        };

        indices
            .into_iter()
            .map(|i| &self.entities[i])
            .filter(|e| name_matches(&e.name, &request.name, request.name_flags))
            .filter(|e| {
                !request.has_long_name()
                    || long_name_matches(&e.long_name, &request.long_name, request.long_name_flags)
            })
            .collect()
    }
}

impl EntityDatabase for EntityCatalog {
    fn search(&self, request: &EntitySearchRequest) -> Option<Entity> {
        self.lookup_count.set(self.lookup_count.get() + 1);
        let candidates = self.candidates(request);
        find_best_match(request, &candidates).cloned()
    }
}

fn fold(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

/// Matches a short name: whole string with `MATCH_WORD`, substring otherwise.
fn name_matches(entry: &str, query: &str, flags: MatchFlags) -> bool {
    let case_sensitive = flags.contains(MatchFlags::MATCH_CASE);
    let entry = fold(entry, case_sensitive);
    let query = fold(query, case_sensitive);
    if flags.contains(MatchFlags::MATCH_WORD) {
        entry == query
    } else {
        entry.contains(&query)
    }
}

/// Matches a qualified name by containment in either allowed direction.
/// Without a containment flag only equality is accepted.
fn long_name_matches(entry: &str, query: &str, flags: MatchFlags) -> bool {
    if entry.is_empty() {
        return false;
    }
    let case_sensitive = flags.contains(MatchFlags::MATCH_CASE);
    let entry = fold(entry, case_sensitive);
    let query = fold(query, case_sensitive);

    let word_contains_db = flags.contains(MatchFlags::WORD_CONTAINS_DB);
    let db_contains_word = flags.contains(MatchFlags::DB_CONTAINS_WORD);
    if !word_contains_db && !db_contains_word {
        return entry == query;
    }
    (word_contains_db && query.contains(&entry)) || (db_contains_word && entry.contains(&query))
}

/// Scores candidate entities for a request and returns the best one.
///
/// Scoring heuristics:
/// - Same file as the request: +100
/// - Line proximity (same file only): +20 - (line_distance / 10)
/// - Compatible kind: +25
/// - Exact qualified name: +50
///
/// Ties keep the earliest inserted entity.
fn find_best_match<'a>(request: &EntitySearchRequest, candidates: &[&'a Entity]) -> Option<&'a Entity> {
    let mut best_score = i64::MIN;
    let mut best: Option<&'a Entity> = None;

    for &entity in candidates {
        let mut score: i64 = 0;

        if !request.file_path.is_empty() && same_file(&entity.file_path, &request.file_path) {
            score += 100;

            let distance = entity.line.abs_diff(request.line);
            let proximity = 20_i64.saturating_sub(i64::from(distance) / 10);
            score += proximity.max(0);
        }

        if request.kind != EntityKind::Unknown && entity.kind.is_compatible_with(&request.kind) {
            score += 25;
        }

        if request.has_long_name() && entity.long_name == request.long_name {
            score += 50;
        }

        if score > best_score {
            best_score = score;
            best = Some(entity);
        }
    }

    best
}

/// Paths from the host are absolute while catalog paths may be relative to
/// the project root; a suffix match on path components is enough.
fn same_file(entry: &str, document: &str) -> bool {
    let entry = entry.replace('\\', "/");
    let document = document.replace('\\', "/");
    if entry.is_empty() {
        return false;
    }
    entry == document
        || document.ends_with(&format!("/{}", entry.trim_start_matches("./")))
        || entry.ends_with(&format!("/{}", document))
}
