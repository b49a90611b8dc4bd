//! Externally supplied reference rosters.
//!
//! Priority-module lists and operator profile rosters are loaded reference
//! data, not compiled-in constants, so the same sampler serves any roster
//! without code changes.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::rosters as keys;
use crate::errors::AuditError;
use crate::types::{ModuleName, OperatorId};

/// Reference rosters for one deployment: priority modules plus named
/// operator profile sets.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Rosters {
    /// Category modules that receive guaranteed first-pass coverage.
    #[serde(default)]
    pub priority_modules: Vec<ModuleName>,
    /// Named operator rosters, keyed by profile-set name (`set_a`, `set_b`).
    #[serde(default)]
    pub profile_sets: HashMap<String, Vec<OperatorId>>,
}

/// Which operator roster a coverage run samples against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileSet {
    /// The first roster only.
    SetA,
    /// The second roster only.
    SetB,
    /// The union of both rosters.
    Union,
}

impl Rosters {
    /// Load rosters from a JSON reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, AuditError> {
        serde_json::from_reader(reader).map_err(|err| AuditError::Roster(err.to_string()))
    }

    /// Load rosters from a JSON file on disk.
    pub fn from_json_path(path: &Path) -> Result<Self, AuditError> {
        Self::from_json_reader(BufReader::new(File::open(path)?))
    }

    fn named(&self, name: &str) -> Result<&[OperatorId], AuditError> {
        self.profile_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| AuditError::Roster(format!("profile set '{name}' is not defined")))
    }

    /// Resolve a profile-set choice to an operator allow-set.
    pub fn operators(&self, set: ProfileSet) -> Result<HashSet<OperatorId>, AuditError> {
        let mut operators: HashSet<OperatorId> = HashSet::new();
        match set {
            ProfileSet::SetA => operators.extend(self.named(keys::SET_A)?.iter().cloned()),
            ProfileSet::SetB => operators.extend(self.named(keys::SET_B)?.iter().cloned()),
            ProfileSet::Union => {
                operators.extend(self.named(keys::SET_A)?.iter().cloned());
                operators.extend(self.named(keys::SET_B)?.iter().cloned());
            }
        }
        Ok(operators)
    }
}
