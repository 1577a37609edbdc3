use std::collections::BTreeMap;

use crate::domain::Role;
use crate::types::db::user;

/// Lightweight view over the full user list used to answer the questions the
/// role-transition rules depend on: who the active managers are, who reports
/// to whom, and what role a user currently holds.
pub struct UserDirectory {
    entries: Vec<DirectoryEntry>,
}

#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub id: i32,
    pub role: Role,
    pub is_active: bool,
    pub reports_to: Option<i32>,
}

impl UserDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    /// Build a directory from database rows. Rows whose role column fails to
    /// parse are skipped; they cannot participate in any transition.
    pub fn from_models(models: &[user::Model]) -> Self {
        let entries = models
            .iter()
            .filter_map(|m| {
                let role = m.role.parse::<Role>().ok()?;
                Some(DirectoryEntry {
                    id: m.id,
                    role,
                    is_active: m.is_active,
                    reports_to: m.reports_to,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn role_of(&self, id: i32) -> Option<Role> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.role)
    }

    /// Active managers, ordered by id. The first entry is the default
    /// target for subordinate reassignment.
    pub fn active_managers(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .entries
            .iter()
            .filter(|e| e.role == Role::Manager && e.is_active)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn active_managers_excluding(&self, excluded: i32) -> Vec<i32> {
        self.active_managers()
            .into_iter()
            .filter(|id| *id != excluded)
            .collect()
    }

    /// Employees whose `reports_to` points at the given manager.
    pub fn subordinates_of(&self, manager_id: i32) -> Vec<i32> {
        self.entries
            .iter()
            .filter(|e| e.role == Role::Employee && e.reports_to == Some(manager_id))
            .map(|e| e.id)
            .collect()
    }
}

/// Outcome of evaluating a requested role change before any mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleChangeDecision {
    /// The change can be submitted as-is.
    Proceed,

    /// Zero managers exist and the actor is promoting a customer to
    /// employee; the actor should be offered to create the first manager
    /// instead. Declining aborts with no submission.
    SuggestManagerInstead,

    /// The change must not happen; the reason is shown to the actor.
    Blocked(String),

    /// The change needs additional input (a reporting manager and/or a
    /// complete subordinate reassignment) before it can be submitted.
    NeedsReassignment(ReassignmentPlan),
}

/// Input the actor must supply before a transition that detaches employees
/// from their manager (or attaches the target to one) can be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ReassignmentPlan {
    /// Employees currently reporting to the target, all of whom must be
    /// mapped to one of `available_manager_ids`.
    pub subordinate_ids: Vec<i32>,

    /// Managers that can absorb subordinates or supervise the target.
    /// Invariant: non-empty.
    pub available_manager_ids: Vec<i32>,

    /// The target's new role is `employee`, so a reporting manager must be
    /// chosen for the target as well.
    pub requires_reporting_manager: bool,
}

impl ReassignmentPlan {
    /// First available manager; the default for every unfilled selection.
    pub fn default_manager_id(&self) -> i32 {
        self.available_manager_ids[0]
    }

    /// Every subordinate mapped to the default manager.
    pub fn default_assignments(&self) -> BTreeMap<i32, i32> {
        let default = self.default_manager_id();
        self.subordinate_ids.iter().map(|id| (*id, default)).collect()
    }

    /// Defaults merged with actor-edited overrides; an override always wins
    /// over the default for the same subordinate. Overrides for users that
    /// are not subordinates of the target are ignored.
    pub fn merged_assignments(&self, overrides: &BTreeMap<i32, i32>) -> BTreeMap<i32, i32> {
        let mut merged = self.default_assignments();
        for (subordinate, manager) in overrides {
            if merged.contains_key(subordinate) {
                merged.insert(*subordinate, *manager);
            }
        }
        merged
    }
}

/// Evaluate whether `actor_role` may change `target_id`'s role to `new_role`
/// given the current user population.
///
/// This is the single source of truth for the transition rules; the HTTP
/// layer exposes it as a preview and re-runs it on submission.
pub fn decide(
    actor_role: Role,
    target_id: i32,
    new_role: Role,
    directory: &UserDirectory,
) -> RoleChangeDecision {
    // Single-admin system: the admin role is never assignable.
    if new_role == Role::Admin {
        return RoleChangeDecision::Blocked(
            "Cannot create additional administrators. Only one admin is allowed in the system."
                .to_string(),
        );
    }

    match actor_role {
        Role::Admin => {}
        Role::Manager => {
            return RoleChangeDecision::Blocked(
                "Managers are not allowed to change user roles.".to_string(),
            );
        }
        _ => {
            return RoleChangeDecision::Blocked(
                "Only administrators can change user roles.".to_string(),
            );
        }
    }

    let current = match directory.role_of(target_id) {
        Some(role) => role,
        None => return RoleChangeDecision::Blocked("User not found.".to_string()),
    };

    if current == Role::Admin {
        return RoleChangeDecision::Blocked(
            "The administrator's role cannot be changed.".to_string(),
        );
    }

    if current == new_role {
        return RoleChangeDecision::Proceed;
    }

    match (current, new_role) {
        (Role::Customer, Role::Employee) => {
            // Every employee needs a reporting manager.
            let managers = directory.active_managers();
            if managers.is_empty() {
                RoleChangeDecision::SuggestManagerInstead
            } else {
                RoleChangeDecision::NeedsReassignment(ReassignmentPlan {
                    subordinate_ids: vec![],
                    available_manager_ids: managers,
                    requires_reporting_manager: true,
                })
            }
        }
        (Role::Manager, new_role) => {
            let others = directory.active_managers_excluding(target_id);
            let subordinates = directory.subordinates_of(target_id);

            if others.is_empty() {
                if !subordinates.is_empty() {
                    RoleChangeDecision::Blocked(
                        "Cannot demote the last manager while employees still report to them."
                            .to_string(),
                    )
                } else if new_role == Role::Employee {
                    RoleChangeDecision::Blocked(
                        "Cannot demote to employee: no other manager is available to report to."
                            .to_string(),
                    )
                } else {
                    RoleChangeDecision::Proceed
                }
            } else if !subordinates.is_empty() || new_role == Role::Employee {
                RoleChangeDecision::NeedsReassignment(ReassignmentPlan {
                    subordinate_ids: subordinates,
                    available_manager_ids: others,
                    requires_reporting_manager: new_role == Role::Employee,
                })
            } else {
                RoleChangeDecision::Proceed
            }
        }
        // Remaining transitions (employee -> customer, employee -> manager,
        // customer -> manager) only need a plain confirmation.
        _ => RoleChangeDecision::Proceed,
    }
}
