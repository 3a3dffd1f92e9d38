use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::domain::{MatchId, PlayerId, RawCounters};

/// Statistical categories a player holds a best-ever record in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    Serve,
    ServeError,
    ServeAce,
    Reception,
    PositiveReception,
    ReceptionError,
    Spike,
    SpikePoint,
    BlockAmount,
    Dig,
}

impl RecordCategory {
    pub const ALL: [RecordCategory; 10] = [
        RecordCategory::Serve,
        RecordCategory::ServeError,
        RecordCategory::ServeAce,
        RecordCategory::Reception,
        RecordCategory::PositiveReception,
        RecordCategory::ReceptionError,
        RecordCategory::Spike,
        RecordCategory::SpikePoint,
        RecordCategory::BlockAmount,
        RecordCategory::Dig,
    ];

    /// Field name, also used as the storage column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordCategory::Serve => "serve",
            RecordCategory::ServeError => "serve_error",
            RecordCategory::ServeAce => "serve_ace",
            RecordCategory::Reception => "reception",
            RecordCategory::PositiveReception => "positive_reception",
            RecordCategory::ReceptionError => "reception_error",
            RecordCategory::Spike => "spike",
            RecordCategory::SpikePoint => "spike_point",
            RecordCategory::BlockAmount => "block_amount",
            RecordCategory::Dig => "dig",
        }
    }

    pub fn value(&self, counters: &RawCounters) -> u32 {
        match self {
            RecordCategory::Serve => counters.serve,
            RecordCategory::ServeError => counters.serve_error,
            RecordCategory::ServeAce => counters.serve_ace,
            RecordCategory::Reception => counters.reception,
            RecordCategory::PositiveReception => counters.positive_reception,
            RecordCategory::ReceptionError => counters.reception_error,
            RecordCategory::Spike => counters.spike,
            RecordCategory::SpikePoint => counters.spike_point,
            RecordCategory::BlockAmount => counters.block_amount,
            RecordCategory::Dig => counters.dig,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best value in one category and the match it was set in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub amount: u32,
    #[serde(rename = "match")]
    pub match_id: Option<MatchId>,
}

/// A player's best-ever values, one slot per [`RecordCategory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    entries: [RecordEntry; 10],
}

impl PlayerRecord {
    /// Fresh record: every category at zero with no match attached.
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            entries: [RecordEntry::default(); 10],
        }
    }

    pub fn from_entries(player_id: PlayerId, entries: [RecordEntry; 10]) -> Self {
        Self { player_id, entries }
    }

    pub fn entry(&self, category: RecordCategory) -> RecordEntry {
        self.entries[category.index()]
    }

    pub fn entries(&self) -> impl Iterator<Item = (RecordCategory, RecordEntry)> + '_ {
        RecordCategory::ALL.iter().map(move |&category| (category, self.entry(category)))
    }

    /// Folds one performance into the record and returns the categories it broke.
    ///
    /// Only a strictly greater value replaces the stored one, so on a tie the
    /// match that reached the value first keeps the record.
    pub fn apply(&mut self, match_id: MatchId, counters: &RawCounters) -> Vec<RecordCategory> {
        let mut broken = Vec::new();

        for category in RecordCategory::ALL {
            let value = category.value(counters);
            let slot = &mut self.entries[category.index()];
            if value > slot.amount {
                *slot = RecordEntry {
                    amount: value,
                    match_id: Some(match_id),
                };
                broken.push(category);
            }
        }

        broken
    }
}

/// Serialized as a flat map of category name to `{amount, match}`.
impl Serialize for PlayerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(RecordCategory::ALL.len()))?;
        for (category, entry) in self.entries() {
            map.serialize_entry(category.as_str(), &entry)?;
        }
        map.end()
    }
}
