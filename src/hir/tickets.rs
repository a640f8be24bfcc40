//! Tickets tracking the implementation of requirements.
//!
//! Ticket files are parsed by the host; this module only stores the records
//! per source and summarizes them per requirement.

use std::sync::Arc;

use indexmap::IndexMap;

use super::index::SymbolIndex;
use super::symbols::SymbolKind;

/// Implementation status of one ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TicketStatus {
    Pending,
    InProgress,
    Complete,
    Obsolete,
}

impl TicketStatus {
    pub fn display(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::InProgress => "in progress",
            TicketStatus::Complete => "complete",
            TicketStatus::Obsolete => "obsolete",
        }
    }
}

/// One ticket record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticket {
    pub id: Arc<str>,
    /// Qualified path of the requirement this ticket implements
    pub reference: Arc<str>,
    pub status: TicketStatus,
    /// Constraints this ticket satisfies, by name or full path
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints_satisfied: Vec<Arc<str>>,
    /// Ticket file the record came from; set on registration
    #[cfg_attr(feature = "serde", serde(default, skip_serializing))]
    pub source: Option<Arc<str>>,
}

impl Ticket {
    pub fn new(id: impl Into<Arc<str>>, reference: impl Into<Arc<str>>, status: TicketStatus) -> Self {
        Self {
            id: id.into(),
            reference: reference.into(),
            status,
            constraints_satisfied: Vec::new(),
            source: None,
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<Arc<str>>) -> Self {
        self.constraints_satisfied.push(constraint.into());
        self
    }

    fn satisfies(&self, constraint_name: &str, constraint_path: &str) -> bool {
        self.constraints_satisfied
            .iter()
            .any(|c| c.as_ref() == constraint_name || c.as_ref() == constraint_path)
    }
}

/// All known tickets, keyed by the source they were loaded from.
#[derive(Clone, Debug, Default)]
pub struct TicketStore {
    by_source: IndexMap<Arc<str>, Vec<Ticket>>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tickets of one source.
    pub fn set_tickets(&mut self, source: &str, tickets: Vec<Ticket>) {
        let source: Arc<str> = Arc::from(source);
        let tickets = tickets
            .into_iter()
            .map(|mut ticket| {
                ticket.source = Some(source.clone());
                ticket
            })
            .collect();
        self.by_source.insert(source, tickets);
    }

    /// Drop a source. Returns whether it was known.
    pub fn remove_tickets(&mut self, source: &str) -> bool {
        self.by_source.shift_remove(source).is_some()
    }

    pub fn tickets_in_source(&self, source: &str) -> &[Ticket] {
        self.by_source
            .get(source)
            .map(|t| t.as_slice())
            .unwrap_or_default()
    }

    /// Tickets referencing a requirement path.
    pub fn tickets_for(&self, path: &str) -> Vec<&Ticket> {
        self.all_tickets()
            .filter(|t| t.reference.as_ref() == path)
            .collect()
    }

    pub fn all_tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.by_source.values().flatten()
    }

    pub fn sources(&self) -> impl Iterator<Item = &Arc<str>> {
        self.by_source.keys()
    }

    /// True once any ticket source has been registered, even an empty one.
    pub fn has_sources(&self) -> bool {
        !self.by_source.is_empty()
    }
}

/// Satisfaction of one constraint of a requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintStatus {
    pub path: Arc<str>,
    pub satisfied: bool,
}

/// Ticket summary for one requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequirementStatus {
    pub path: Arc<str>,
    /// Aggregated status; `None` when no ticket references the requirement
    pub status: Option<TicketStatus>,
    /// Ids of the tickets referencing the requirement
    pub tickets: Vec<Arc<str>>,
    pub constraints: Vec<ConstraintStatus>,
}

impl RequirementStatus {
    pub fn satisfied_count(&self) -> usize {
        self.constraints.iter().filter(|c| c.satisfied).count()
    }

    pub fn is_complete(&self) -> bool {
        self.status == Some(TicketStatus::Complete)
            && self.constraints.iter().all(|c| c.satisfied)
    }
}

/// Combine ticket states. Obsolete tickets only count when nothing else does.
fn aggregate(statuses: &[TicketStatus]) -> Option<TicketStatus> {
    let active: Vec<_> = statuses
        .iter()
        .copied()
        .filter(|s| *s != TicketStatus::Obsolete)
        .collect();
    if active.is_empty() {
        return (!statuses.is_empty()).then_some(TicketStatus::Obsolete);
    }
    if active.iter().all(|s| *s == TicketStatus::Complete) {
        Some(TicketStatus::Complete)
    } else if active.iter().any(|s| *s != TicketStatus::Pending) {
        Some(TicketStatus::InProgress)
    } else {
        Some(TicketStatus::Pending)
    }
}

/// Summarize the tickets of a requirement. `None` if `path` is not a
/// known requirement.
pub fn requirement_status(
    index: &SymbolIndex,
    store: &TicketStore,
    path: &str,
) -> Option<RequirementStatus> {
    let requirement = index
        .get_symbol(path)?
        .iter()
        .find(|s| s.kind == SymbolKind::Requirement)?;

    let tickets = store.tickets_for(path);
    let live: Vec<_> = tickets
        .iter()
        .filter(|t| t.status != TicketStatus::Obsolete)
        .collect();
    let statuses: Vec<_> = tickets.iter().map(|t| t.status).collect();

    let mut constraints: Vec<ConstraintStatus> = index
        .get_symbols_by_kind(SymbolKind::Constraint)
        .into_iter()
        .filter(|c| c.parent_path() == Some(path))
        .map(|c| ConstraintStatus {
            path: c.path.clone(),
            satisfied: live.iter().any(|t| t.satisfies(&c.name, &c.path)),
        })
        .collect();
    constraints.dedup_by(|a, b| a.path == b.path);

    Some(RequirementStatus {
        path: requirement.path.clone(),
        status: aggregate(&statuses),
        tickets: tickets.iter().map(|t| t.id.clone()).collect(),
        constraints,
    })
}
