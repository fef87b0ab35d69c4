pub mod profile;
pub mod schema;

pub use profile::{Availability, BookmakerProfile, Condition, ConditionOp, DateKeyRule};
pub use schema::{FieldSpec, FieldType, FieldValue, RawRecord, Record, Schema};

use anyhow::{anyhow, Result};

const BUILTIN_IDS: [&str; 4] = ["stoiximan", "novibet", "pamestoixima", "fonbet"];

/// Lookup table of bookmaker profiles. Adding a bookmaker means adding a
/// profile constructor and listing it here.
pub struct BookmakerRegistry {
    profiles: Vec<BookmakerProfile>,
}

impl BookmakerRegistry {
    pub fn new(excluded_markets: &[String]) -> Self {
        let profiles = [
            profile::stoiximan(),
            profile::novibet(),
            profile::pamestoixima(),
            profile::fonbet(),
        ]
        .into_iter()
        .map(|p| p.with_excluded_markets(excluded_markets))
        .collect();

        Self { profiles }
    }

    pub fn is_known(id: &str) -> bool {
        BUILTIN_IDS.contains(&id)
    }

    pub fn get(&self, id: &str) -> Option<&BookmakerProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Profiles in the order requested, failing on the first unknown id.
    pub fn resolve(&self, ids: &[String]) -> Result<Vec<&BookmakerProfile>> {
        ids.iter()
            .map(|id| {
                self.get(id)
                    .ok_or_else(|| anyhow!("Unknown bookmaker: {}", id))
            })
            .collect()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}
