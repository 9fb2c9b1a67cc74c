//! Generic set reconciliation
//!
//! Given what the remote side currently has and what the configuration wants,
//! compute which current entries to remove, which desired entries to add and
//! which pairs already correspond. The match predicate decides identity:
//! members match by id or email, phone numbers by id or number, policy
//! entries by access user id.

/// Outcome of [`reconcile`]. Removals are meant to be applied before additions.
#[derive(Debug)]
pub struct Reconciliation<'a, C, D> {
    /// Current entries no desired entry matches
    pub to_remove: Vec<&'a C>,
    /// Desired entries no current entry matches
    pub to_add: Vec<&'a D>,
    /// Desired entries paired with the first current entry they match
    pub retained: Vec<(&'a C, &'a D)>,
}

impl<C, D> Reconciliation<'_, C, D> {
    /// True when applying this reconciliation would issue no remote call
    pub fn is_noop(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}

pub fn reconcile<'a, C, D, F>(
    current: &'a [C],
    desired: &'a [D],
    matches: F,
) -> Reconciliation<'a, C, D>
where
    F: Fn(&C, &D) -> bool,
{
    let to_remove = current
        .iter()
        .filter(|c| !desired.iter().any(|d| matches(*c, d)))
        .collect();

    let mut to_add = Vec::new();
    let mut retained = Vec::new();
    for d in desired {
        match current.iter().find(|c| matches(*c, d)) {
            Some(c) => retained.push((c, d)),
            None => to_add.push(d),
        }
    }

    Reconciliation {
        to_remove,
        to_add,
        retained,
    }
}

/// Key equality where an absent or empty key never matches anything
pub fn same_key(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}
