use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::audit::AuditSummary;
use crate::error::DedupError;
use crate::evaluate::Evaluation;

/// Record identifier. Dense and 1-based in input order.
pub type RecordId = u32;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single restaurant row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Validated record sequence with an explicit id -> position index.
///
/// Blocking translates ids recovered from soundex blocks back into
/// positions; that only works when ids are dense and 1-based, so the
/// invariant is checked here once instead of at every lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<Record>,
    positions: HashMap<RecordId, usize>,
}

impl Catalog {
    pub fn new(records: Vec<Record>) -> Result<Self, DedupError> {
        let mut positions = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            // u64: positions past RecordId::MAX are an id violation, not an overflow.
            let expected = position as u64 + 1;
            if u64::from(record.id) != expected {
                return Err(DedupError::InvalidIdentifier {
                    position,
                    expected,
                    found: record.id,
                });
            }
            positions.insert(record.id, position);
        }
        Ok(Self { records, positions })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.position(id).map(|pos| &self.records[pos])
    }

    /// Give up the record buffer (the merger mutates it in place).
    pub fn into_parts(self) -> (Vec<Record>, HashMap<RecordId, usize>) {
        (self.records, self.positions)
    }
}

/// Pre-loaded records and gold-standard pairs for one run.
pub struct DedupInput {
    pub records: Vec<Record>,
    pub gold: Vec<CandidatePair>,
}

// ---------------------------------------------------------------------------
// Candidate pairs
// ---------------------------------------------------------------------------

/// Ordered pair of ids: `id1` was encountered first in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidatePair {
    pub id1: RecordId,
    pub id2: RecordId,
}

impl CandidatePair {
    pub fn new(id1: RecordId, id2: RecordId) -> Self {
        Self { id1, id2 }
    }
}

/// Ids sharing one phonetic code. Only built for groups of two or more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundexBlock {
    pub code: String,
    /// Ascending.
    pub ids: Vec<RecordId>,
}

/// Append-only list of confirmed pairs for one strategy run.
#[derive(Debug, Clone, Default)]
pub struct DuplicateAggregate {
    pairs: Vec<CandidatePair>,
    seen: HashSet<CandidatePair>,
}

impl DuplicateAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: CandidatePair) {
        self.seen.insert(pair);
        self.pairs.push(pair);
    }

    /// Exact ordered-pair membership.
    pub fn contains(&self, pair: &CandidatePair) -> bool {
        self.seen.contains(pair)
    }

    pub fn pairs(&self) -> &[CandidatePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Name, address and city all equal.
    ExactFields,
    /// Phone equal.
    PhoneExact,
    /// Soundex blocking on the name plus a residual similarity scan.
    FieldMatching,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Self::ExactFields, Self::PhoneExact, Self::FieldMatching];

    /// Heading used in the human-readable report.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ExactFields => "Exact same value: name, street and city",
            Self::PhoneExact => "Exact same value: phone",
            Self::FieldMatching => "Field matching techniques",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactFields => write!(f, "exact_fields"),
            Self::PhoneExact => write!(f, "phone_exact"),
            Self::FieldMatching => write!(f, "field_matching"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub strategy: Strategy,
    pub detected: usize,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub strategy: Strategy,
    pub pairs_applied: usize,
    pub records_before: usize,
    pub records_after: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupResult {
    pub meta: DedupMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditSummary>,
    pub reports: Vec<StrategyReport>,
    pub merge: MergeSummary,
    #[serde(skip)]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}
