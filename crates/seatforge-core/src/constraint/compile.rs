//! Validation and compilation of constraint entries into index-based rules.

use std::collections::{HashMap, HashSet};

use super::{
    Constraint, ConstraintEntry, ConstraintIssue, ConstraintKind, DistanceAnchor, IssueCode,
    FIXED_HARD_WEIGHT,
};
use crate::domain::{GuestId, SeatingProblem};

/// A guest pinned to a seat for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatPin {
    pub guest: usize,
    pub table: usize,
    pub seat: u32,
}

impl SeatPin {
    pub fn new(guest: usize, table: usize, seat: u32) -> Self {
        Self { guest, table, seat }
    }
}

/// Resolved reference point of a distance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Guest(usize),
    Table(usize),
}

/// A constraint with every reference resolved to problem indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    SameTable {
        members: Vec<usize>,
    },
    AvoidSameTable {
        pairs: Vec<(usize, usize)>,
    },
    TableCapacity {
        tables: Vec<usize>,
    },
    VipFront {
        guests: Vec<usize>,
        zone: String,
    },
    GroupTogether {
        members: Vec<usize>,
    },
    DistributeGroup {
        members: Vec<usize>,
        min_per_table: Option<u32>,
    },
    LockSeat {
        pins: Vec<SeatPin>,
    },
    ZonePreference {
        guest: usize,
        zones: Vec<String>,
    },
    MaxDistance {
        guest: usize,
        anchor: Anchor,
        max: f64,
    },
}

impl Rule {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Rule::SameTable { .. } => ConstraintKind::SameTable,
            Rule::AvoidSameTable { .. } => ConstraintKind::AvoidSameTable,
            Rule::TableCapacity { .. } => ConstraintKind::TableCapacity,
            Rule::VipFront { .. } => ConstraintKind::VipFront,
            Rule::GroupTogether { .. } => ConstraintKind::GroupTogether,
            Rule::DistributeGroup { .. } => ConstraintKind::DistributeGroup,
            Rule::LockSeat { .. } => ConstraintKind::LockSeat,
            Rule::ZonePreference { .. } => ConstraintKind::ZonePreference,
            Rule::MaxDistance { .. } => ConstraintKind::MaxDistance,
        }
    }

    /// Guests this rule reads, in rule order (may repeat).
    pub fn guests(&self) -> Vec<usize> {
        match self {
            Rule::SameTable { members }
            | Rule::GroupTogether { members }
            | Rule::DistributeGroup { members, .. } => members.clone(),
            Rule::AvoidSameTable { pairs } => pairs.iter().flat_map(|&(a, b)| [a, b]).collect(),
            Rule::TableCapacity { .. } => Vec::new(),
            Rule::VipFront { guests, .. } => guests.clone(),
            Rule::LockSeat { pins } => pins.iter().map(|p| p.guest).collect(),
            Rule::ZonePreference { guest, .. } => vec![*guest],
            Rule::MaxDistance { guest, anchor, .. } => match anchor {
                Anchor::Guest(other) => vec![*guest, *other],
                Anchor::Table(_) => vec![*guest],
            },
        }
    }

    /// Tables this rule names explicitly.
    pub fn tables(&self) -> Vec<usize> {
        match self {
            Rule::TableCapacity { tables } => tables.clone(),
            Rule::LockSeat { pins } => pins.iter().map(|p| p.table).collect(),
            Rule::MaxDistance {
                anchor: Anchor::Table(table),
                ..
            } => vec![*table],
            _ => Vec::new(),
        }
    }
}

/// A validated rule ready for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledConstraint {
    /// Position of the source entry, `None` when synthesized.
    pub index: Option<usize>,
    pub id: Option<String>,
    pub hard: bool,
    pub weight: f64,
    pub rule: Rule,
}

impl CompiledConstraint {
    pub fn kind(&self) -> ConstraintKind {
        self.rule.kind()
    }

    fn synthesized(rule: Rule) -> Self {
        Self {
            index: None,
            id: None,
            hard: true,
            weight: FIXED_HARD_WEIGHT,
            rule,
        }
    }
}

/// Guests and tables an entry refers to, limited to those that exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    pub guests: Vec<usize>,
    pub tables: Vec<usize>,
}

impl Constraint {
    /// Resolves the references of this constraint against `problem`,
    /// silently skipping the ones that do not exist. Zone rules refer to
    /// every table in their zones.
    pub fn references(&self, problem: &SeatingProblem) -> References {
        let guest = |id: &str| problem.guest_idx(id);
        let table = |id: &str| problem.table_idx(id);
        let mut refs = References::default();
        match self {
            Constraint::SameTable { members, .. } => {
                refs.guests = members.iter().filter_map(|g| guest(g.as_str())).collect();
            }
            Constraint::AvoidSameTable { pairs, .. } => {
                refs.guests = pairs
                    .iter()
                    .flat_map(|(a, b)| [guest(a.as_str()), guest(b.as_str())])
                    .flatten()
                    .collect();
            }
            Constraint::TableCapacity { table_id } => match table_id {
                Some(id) => refs.tables.extend(table(id.as_str())),
                None => refs.tables = (0..problem.table_count()).collect(),
            },
            Constraint::VipFront {
                guests,
                priority_zone,
                ..
            } => {
                refs.guests = guests.iter().filter_map(|g| guest(g.as_str())).collect();
                refs.tables = zone_tables(problem, |zone| zone == priority_zone);
            }
            Constraint::GroupTogether { group, .. } | Constraint::DistributeGroup { group, .. } => {
                refs.guests = problem.group_members(group);
            }
            Constraint::LockSeat { assignments } => {
                for lock in assignments {
                    refs.guests.extend(guest(lock.guest_id.as_str()));
                    refs.tables.extend(table(lock.table_id.as_str()));
                }
            }
            Constraint::ZonePreference {
                guest: g, zones, ..
            } => {
                refs.guests.extend(guest(g.as_str()));
                refs.tables = zone_tables(problem, |zone| zones.iter().any(|z| z == zone));
            }
            Constraint::MaxDistance {
                guest: g, anchor, ..
            } => {
                refs.guests.extend(guest(g.as_str()));
                match anchor {
                    DistanceAnchor::Guest(other) => refs.guests.extend(guest(other.as_str())),
                    DistanceAnchor::Table(t) => refs.tables.extend(table(t.as_str())),
                }
            }
        }
        refs
    }
}

fn zone_tables(problem: &SeatingProblem, matches: impl Fn(&str) -> bool) -> Vec<usize> {
    problem
        .tables()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.zone.as_deref().is_some_and(&matches))
        .map(|(i, _)| i)
        .collect()
}

/// The constraints in effect for one run.
///
/// Always contains one synthesized `TABLE_CAPACITY` rule covering every
/// table, and a single `LOCK_SEAT` rule holding every pin when any exist.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<CompiledConstraint>,
    pins: Vec<SeatPin>,
    issues: Vec<ConstraintIssue>,
}

enum PinOutcome {
    Added,
    Duplicate,
    Conflict(SeatPin),
}

#[derive(Default)]
struct PinBook {
    pins: Vec<SeatPin>,
    by_seat: HashMap<(usize, u32), usize>,
    by_guest: HashMap<usize, usize>,
}

impl PinBook {
    fn add(&mut self, pin: SeatPin) -> PinOutcome {
        let seat_owner = self.by_seat.get(&(pin.table, pin.seat)).copied();
        let guest_seat = self.by_guest.get(&pin.guest).copied();
        match (seat_owner, guest_seat) {
            (None, None) => {
                self.by_seat.insert((pin.table, pin.seat), self.pins.len());
                self.by_guest.insert(pin.guest, self.pins.len());
                self.pins.push(pin);
                PinOutcome::Added
            }
            (Some(a), Some(b)) if a == b => PinOutcome::Duplicate,
            (Some(existing), _) | (None, Some(existing)) => {
                PinOutcome::Conflict(self.pins[existing])
            }
        }
    }
}

impl ConstraintSet {
    /// Validates `entries` against `problem` and compiles them.
    ///
    /// `synthesized_pins` are seat locks derived from the current seat state
    /// (locked records, occupants of locked tables). They take precedence
    /// over supplied `LOCK_SEAT` entries. Entries with unknown references
    /// or invalid values are excluded and reported through [`issues`].
    ///
    /// [`issues`]: ConstraintSet::issues
    pub fn compile(
        problem: &SeatingProblem,
        entries: &[ConstraintEntry],
        synthesized_pins: &[SeatPin],
    ) -> Self {
        let mut issues = Vec::new();
        let mut constraints = vec![CompiledConstraint::synthesized(Rule::TableCapacity {
            tables: (0..problem.table_count()).collect(),
        })];

        let mut book = PinBook::default();
        for &pin in synthesized_pins {
            book.add(pin);
        }

        let mut seen_ids = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            let kind = entry.constraint.kind();
            let issue = |code: IssueCode, detail: String| ConstraintIssue {
                index,
                id: entry.id.clone(),
                kind,
                code,
                detail,
            };

            if let Some(id) = &entry.id {
                if !seen_ids.insert(id.as_str()) {
                    issues.push(issue(
                        IssueCode::DuplicateConstraint,
                        format!("constraint id {id} already used"),
                    ));
                }
            }

            let constraint = &entry.constraint;
            let hard = constraint.is_hard();
            let weight = constraint.weight();
            if !hard && !(weight.is_finite() && weight >= 0.0) {
                issues.push(issue(
                    IssueCode::InvalidConstraintValue,
                    format!("weight {weight} must be a non-negative number"),
                ));
                continue;
            }

            match compile_rule(problem, constraint) {
                Ok(Compiled::Rule(rule)) => constraints.push(CompiledConstraint {
                    index: Some(index),
                    id: entry.id.clone(),
                    hard,
                    weight,
                    rule,
                }),
                Ok(Compiled::CoveredByCapacity) => {}
                Ok(Compiled::Locks(pins)) => {
                    for pin in pins {
                        if let PinOutcome::Conflict(existing) = book.add(pin) {
                            issues.push(issue(
                                IssueCode::ConflictingLock,
                                format!(
                                    "lock of {} to {}:{} conflicts with lock of {} to {}:{}",
                                    problem.guest(pin.guest).id,
                                    problem.table(pin.table).id,
                                    pin.seat,
                                    problem.guest(existing.guest).id,
                                    problem.table(existing.table).id,
                                    existing.seat,
                                ),
                            ));
                        }
                    }
                }
                Err((code, detail)) => issues.push(issue(code, detail)),
            }
        }

        let pins = book.pins;
        if !pins.is_empty() {
            constraints.push(CompiledConstraint::synthesized(Rule::LockSeat {
                pins: pins.clone(),
            }));
        }

        Self {
            constraints,
            pins,
            issues,
        }
    }

    pub fn constraints(&self) -> &[CompiledConstraint] {
        &self.constraints
    }

    /// Every seat pin in effect, synthesized pins first.
    pub fn pins(&self) -> &[SeatPin] {
        &self.pins
    }

    pub fn issues(&self) -> &[ConstraintIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Kinds present in this set, in declaration order.
    pub fn kinds(&self) -> Vec<ConstraintKind> {
        let mut present = [false; ConstraintKind::COUNT];
        for c in &self.constraints {
            present[c.kind().index()] = true;
        }
        ConstraintKind::ALL
            .into_iter()
            .filter(|k| present[k.index()])
            .collect()
    }

    /// Zones a greedy placement should prefer for `guest`.
    pub fn preferred_zones(&self, guest: usize) -> Vec<&str> {
        let mut zones = Vec::new();
        for c in &self.constraints {
            match &c.rule {
                Rule::ZonePreference { guest: g, zones: z } if *g == guest => {
                    zones.extend(z.iter().map(String::as_str));
                }
                Rule::VipFront { guests, zone } if guests.contains(&guest) => {
                    zones.push(zone.as_str());
                }
                _ => {}
            }
        }
        zones
    }
}

enum Compiled {
    Rule(Rule),
    Locks(Vec<SeatPin>),
    CoveredByCapacity,
}

type CompileError = (IssueCode, String);

fn unknown(what: &str, id: &str) -> CompileError {
    (
        IssueCode::InvalidConstraintReference,
        format!("unknown {what} {id}"),
    )
}

fn resolve_guests<'a>(
    problem: &SeatingProblem,
    ids: impl IntoIterator<Item = &'a GuestId>,
) -> Result<Vec<usize>, CompileError> {
    let mut out = Vec::new();
    for id in ids {
        let idx = problem
            .guest_idx(id.as_str())
            .ok_or_else(|| unknown("guest", id.as_str()))?;
        if !out.contains(&idx) {
            out.push(idx);
        }
    }
    Ok(out)
}

fn resolve_group(problem: &SeatingProblem, group: &str) -> Result<Vec<usize>, CompileError> {
    let members = problem.group_members(group);
    if members.is_empty() {
        return Err(unknown("group", group));
    }
    Ok(members)
}

fn compile_rule(problem: &SeatingProblem, constraint: &Constraint) -> Result<Compiled, CompileError> {
    let rule = match constraint {
        Constraint::SameTable { members, .. } => Rule::SameTable {
            members: resolve_guests(problem, members)?,
        },
        Constraint::AvoidSameTable { pairs, .. } => {
            let mut resolved = Vec::with_capacity(pairs.len());
            for (a, b) in pairs {
                let a = problem
                    .guest_idx(a.as_str())
                    .ok_or_else(|| unknown("guest", a.as_str()))?;
                let b = problem
                    .guest_idx(b.as_str())
                    .ok_or_else(|| unknown("guest", b.as_str()))?;
                if a != b {
                    resolved.push((a, b));
                }
            }
            Rule::AvoidSameTable { pairs: resolved }
        }
        Constraint::TableCapacity { table_id } => {
            if let Some(id) = table_id {
                problem
                    .table_idx(id.as_str())
                    .ok_or_else(|| unknown("table", id.as_str()))?;
            }
            return Ok(Compiled::CoveredByCapacity);
        }
        Constraint::VipFront {
            guests,
            priority_zone,
            ..
        } => Rule::VipFront {
            guests: resolve_guests(problem, guests)?,
            zone: priority_zone.clone(),
        },
        Constraint::GroupTogether { group, .. } => Rule::GroupTogether {
            members: resolve_group(problem, group)?,
        },
        Constraint::DistributeGroup {
            group,
            min_per_table,
            ..
        } => Rule::DistributeGroup {
            members: resolve_group(problem, group)?,
            min_per_table: min_per_table.filter(|&m| m > 0),
        },
        Constraint::LockSeat { assignments } => {
            let mut pins = Vec::with_capacity(assignments.len());
            for lock in assignments {
                let guest = problem
                    .guest_idx(lock.guest_id.as_str())
                    .ok_or_else(|| unknown("guest", lock.guest_id.as_str()))?;
                let table = problem
                    .table_idx(lock.table_id.as_str())
                    .ok_or_else(|| unknown("table", lock.table_id.as_str()))?;
                if lock.seat_no >= problem.capacity(table) {
                    return Err(unknown(
                        "seat",
                        &format!("{}:{}", lock.table_id, lock.seat_no),
                    ));
                }
                pins.push(SeatPin::new(guest, table, lock.seat_no));
            }
            return Ok(Compiled::Locks(pins));
        }
        Constraint::ZonePreference { guest, zones, .. } => Rule::ZonePreference {
            guest: problem
                .guest_idx(guest.as_str())
                .ok_or_else(|| unknown("guest", guest.as_str()))?,
            zones: zones.clone(),
        },
        Constraint::MaxDistance {
            guest, anchor, max, ..
        } => {
            if !(max.is_finite() && *max >= 0.0) {
                return Err((
                    IssueCode::InvalidConstraintValue,
                    format!("max distance {max} must be a non-negative number"),
                ));
            }
            let guest = problem
                .guest_idx(guest.as_str())
                .ok_or_else(|| unknown("guest", guest.as_str()))?;
            let anchor = match anchor {
                DistanceAnchor::Guest(id) => Anchor::Guest(
                    problem
                        .guest_idx(id.as_str())
                        .ok_or_else(|| unknown("guest", id.as_str()))?,
                ),
                DistanceAnchor::Table(id) => Anchor::Table(
                    problem
                        .table_idx(id.as_str())
                        .ok_or_else(|| unknown("table", id.as_str()))?,
                ),
            };
            Rule::MaxDistance {
                guest,
                anchor,
                max: *max,
            }
        }
    };
    Ok(Compiled::Rule(rule))
}
