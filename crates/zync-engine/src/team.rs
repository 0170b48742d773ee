//! Team roster cache with optional JSON persistence.
//!
//! Holds the team's [`Employee`] records in the order they were added. The
//! [`Roster`] built from them is memoized and dropped whenever a member is added or
//! removed; every successful change is written back to the backing file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::roster::{Employee, EmployeeId, Roster};

#[derive(Debug, Default, Serialize, Deserialize)]
struct TeamFile {
    members: Vec<Employee>,
}

#[derive(Debug, Default)]
pub struct RosterCache {
    members: Vec<Employee>,
    path: Option<PathBuf>,
    roster: Option<Roster>,
}

impl RosterCache {
    /// An unpersisted cache seeded with `members`.
    ///
    /// # Errors
    /// Returns `ZyncError::InvalidInput` when two members share an id or a member's
    /// working-hour rule is invalid.
    pub fn in_memory(members: Vec<Employee>) -> Result<Self> {
        check_members(&members)?;
        Ok(Self {
            members,
            path: None,
            roster: None,
        })
    }

    /// Load the team stored at `path`, or start empty when the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let members = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let file: TeamFile = serde_json::from_str(&raw)?;
            check_members(&file.members)?;
            debug!(path = %path.display(), members = file.members.len(), "loaded team");
            file.members
        } else {
            Vec::new()
        };

        Ok(Self {
            members,
            path: Some(path),
            roster: None,
        })
    }

    /// Load the team stored at `path`; when there is none, seed it from `fetch` and
    /// persist the result.
    pub fn load_or_insert_with<F>(path: impl AsRef<Path>, fetch: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Vec<Employee>>,
    {
        let path = path.as_ref();
        if path.exists() {
            return Self::open(path);
        }
        let members = fetch()?;
        check_members(&members)?;
        let cache = Self {
            members,
            path: Some(path.to_path_buf()),
            roster: None,
        };
        cache.save()?;
        Ok(cache)
    }

    pub fn members(&self) -> &[Employee] {
        &self.members
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn is_member(&self, id: EmployeeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add `employee` unless their id is already on the team.
    ///
    /// Returns `Ok(false)` and leaves the cache untouched for a duplicate.
    pub fn add(&mut self, employee: Employee) -> Result<bool> {
        if self.is_member(employee.id) {
            warn!(employee = %employee.id, name = %employee.name, "already a team member");
            return Ok(false);
        }
        employee.validate()?;
        self.members.push(employee);
        self.invalidate();
        self.save()?;
        Ok(true)
    }

    /// Returns `Ok(false)` when `id` was not on the team.
    pub fn remove(&mut self, id: EmployeeId) -> Result<bool> {
        let before = self.members.len();
        self.members.retain(|m| m.id != id);
        if self.members.len() == before {
            return Ok(false);
        }
        self.invalidate();
        self.save()?;
        Ok(true)
    }

    /// The team as a [`Roster`], rebuilt after any change.
    ///
    /// # Errors
    /// Returns `ZyncError::InvalidInput` when the team is empty.
    pub fn roster(&mut self) -> Result<&Roster> {
        let roster = match self.roster.take() {
            Some(roster) => roster,
            None => Roster::new(self.members.iter().map(|m| m.id))?,
        };
        let roster: &Roster = self.roster.insert(roster);
        Ok(roster)
    }

    /// Write the team to the backing file, if any.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = TeamFile {
            members: self.members.clone(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    fn invalidate(&mut self) {
        self.roster = None;
    }
}

fn check_members(members: &[Employee]) -> Result<()> {
    for member in members {
        member.validate()?;
    }
    if !members.is_empty() {
        Roster::new(members.iter().map(|m| m.id))?;
    }
    Ok(())
}
