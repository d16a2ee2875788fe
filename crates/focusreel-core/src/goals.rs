//! Learning goals.
//!
//! A goal is a user-defined topic bucket that searches and accrued watch
//! time are attributed to. The list is small by design (at most
//! [`MAX_GOALS`]) and persists as one JSON array.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::storage::KvStore;

pub const GOALS_KEY: &str = "goals";

/// Upper bound on concurrent goals.
pub const MAX_GOALS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningGoal {
    pub id: String,
    pub label: String,
    /// Search query this goal maps to.
    pub query: String,
}

pub struct GoalBook<'s> {
    store: &'s dyn KvStore,
}

impl<'s> GoalBook<'s> {
    pub fn new(store: &'s dyn KvStore) -> Self {
        Self { store }
    }

    /// All goals in insertion order. Missing or corrupt state is an empty
    /// list, never an error.
    pub fn list(&self) -> Vec<LearningGoal> {
        let raw = match self.store.get(GOALS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "goal list unreadable, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(goals) => goals,
            Err(e) => {
                warn!(error = %e, "goal list corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<LearningGoal> {
        self.list().into_iter().find(|g| g.id == id)
    }

    /// Create a goal. Label and query must be non-empty after trimming and
    /// the list must be below [`MAX_GOALS`].
    pub fn add(&self, label: &str, query: &str) -> Result<LearningGoal> {
        let label = label.trim();
        let query = query.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyField { field: "label" }.into());
        }
        if query.is_empty() {
            return Err(ValidationError::EmptyField { field: "query" }.into());
        }

        let mut goals = self.list();
        if goals.len() >= MAX_GOALS {
            return Err(ValidationError::GoalLimitReached { max: MAX_GOALS }.into());
        }

        let goal = LearningGoal {
            id: Uuid::new_v4().to_string(),
            label: label.to_string(),
            query: query.to_string(),
        };
        goals.push(goal.clone());
        self.save(&goals)?;
        Ok(goal)
    }

    /// Remove a goal by id. Returns whether anything was removed. Accrued
    /// progress for the goal is left in the ledger untouched.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut goals = self.list();
        let before = goals.len();
        goals.retain(|g| g.id != id);
        if goals.len() == before {
            return Ok(false);
        }
        self.save(&goals)?;
        Ok(true)
    }

    fn save(&self, goals: &[LearningGoal]) -> Result<()> {
        let json = serde_json::to_string(goals)?;
        self.store.set(GOALS_KEY, &json)?;
        Ok(())
    }
}
