use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A member of the department roster.
///
/// Professors are supplied externally at startup and form a closed set: there
/// is no add/remove at runtime, and ids are opaque stable strings chosen by
/// whoever maintains the roster file (e.g. `"p1"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: String,
    pub name: String,
}

/// The fixed, ordered list of professors sharing the board.
///
/// Read-only to the rest of the system. The store deliberately does not
/// re-validate acting professor ids against the roster; the login gate is the
/// only place a roster lookup happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub professors: Vec<Professor>,
}

impl Roster {
    /// Load a roster from a JSON file of `[{ "id": ..., "name": ... }, ...]`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file {}", path.display()))?;
        let professors: Vec<Professor> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse roster file {}", path.display()))?;
        Ok(Self { professors })
    }

    /// The built-in department roster, used when no roster file is given.
    pub fn default_department() -> Self {
        let professors = [
            ("p1", "Prof. Kim"),
            ("p2", "Prof. Lee"),
            ("p3", "Prof. Park"),
            ("p4", "Prof. Choi"),
            ("p5", "Prof. Jung"),
        ]
        .into_iter()
        .map(|(id, name)| Professor {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect();
        Self { professors }
    }

    pub fn get(&self, id: &str) -> Option<&Professor> {
        self.professors.iter().find(|p| p.id == id)
    }
}
