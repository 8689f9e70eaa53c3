//! Membership rules: who attends a group and who owns it.
//!
//! These are pure functions over the attendee list. Stores persist the result with a
//! conditional write, so the rules never observe a half-applied change.

use thiserror::Error;

use crate::types::Attendee;

/// Owner plus ordered attendee list (unique by email).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Membership {
    pub owner_email: String,
    pub attendees: Vec<Attendee>,
}

/// Result of a join.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The attendee was appended.
    Joined(Membership),
    /// The email was already present; nothing changes.
    AlreadyMember,
}

/// Result of a leave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// At least one attendee remains; the owner may have been reassigned.
    Remaining(Membership),
    /// Nobody remains and the group must be deleted.
    Emptied,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("User is not in this group")]
    NotAMember,
}

impl Membership {
    /// A new group's membership: the founder owns it and is its only attendee.
    pub fn founded_by(founder: Attendee) -> Self {
        Self {
            owner_email: founder.email.clone(),
            attendees: vec![founder],
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.attendees.iter().any(|a| a.email == email)
    }

    /// Append `attendee` unless their email is already present.
    pub fn join(&self, attendee: Attendee) -> JoinOutcome {
        if self.contains(&attendee.email) {
            return JoinOutcome::AlreadyMember;
        }
        let mut next = self.clone();
        next.attendees.push(attendee);
        JoinOutcome::Joined(next)
    }

    /// Remove `email`. A departing owner hands ownership to the earliest remaining
    /// attendee; when nobody is left the group is emptied.
    pub fn leave(&self, email: &str) -> Result<LeaveOutcome, MembershipError> {
        if !self.contains(email) {
            return Err(MembershipError::NotAMember);
        }

        let remaining: Vec<Attendee> = self
            .attendees
            .iter()
            .filter(|a| a.email != email)
            .cloned()
            .collect();

        let Some(first) = remaining.first() else {
            return Ok(LeaveOutcome::Emptied);
        };

        let owner_email = if self.owner_email == email {
            first.email.clone()
        } else {
            self.owner_email.clone()
        };

        Ok(LeaveOutcome::Remaining(Membership {
            owner_email,
            attendees: remaining,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendee(name: &str) -> Attendee {
        Attendee {
            name: name.to_string(),
            email: format!("{}@valenciacollege.edu", name.to_lowercase()),
        }
    }

    fn email(name: &str) -> String {
        format!("{}@valenciacollege.edu", name.to_lowercase())
    }

    fn group_of(names: &[&str]) -> Membership {
        let mut membership = Membership::founded_by(attendee(names[0]));
        for name in &names[1..] {
            match membership.join(attendee(name)) {
                JoinOutcome::Joined(next) => membership = next,
                JoinOutcome::AlreadyMember => panic!("duplicate name in fixture"),
            }
        }
        membership
    }

    #[test]
    fn founder_is_owner_and_sole_attendee() {
        let m = Membership::founded_by(attendee("Ana"));
        assert_eq!(m.owner_email, email("Ana"));
        assert_eq!(m.attendees, vec![attendee("Ana")]);
    }

    #[test]
    fn join_appends_in_order() {
        let m = group_of(&["Ana", "Ben", "Cy"]);
        let emails: Vec<_> = m.attendees.iter().map(|a| a.email.clone()).collect();
        assert_eq!(emails, vec![email("Ana"), email("Ben"), email("Cy")]);
        assert_eq!(m.owner_email, email("Ana"));
    }

    #[test]
    fn join_is_idempotent_by_email() {
        let m = group_of(&["Ana", "Ben"]);
        let again = Attendee {
            name: "Benjamin".to_string(),
            email: email("Ben"),
        };
        assert_eq!(m.join(again), JoinOutcome::AlreadyMember);
    }

    #[test]
    fn non_owner_leave_keeps_owner() {
        let m = group_of(&["Ana", "Ben", "Cy"]);
        let LeaveOutcome::Remaining(next) = m.leave(&email("Ben")).unwrap() else {
            panic!("group should remain");
        };
        assert_eq!(next.owner_email, email("Ana"));
        assert_eq!(next.attendees.len(), 2);
        assert!(!next.contains(&email("Ben")));
    }

    #[test]
    fn owner_leave_promotes_earliest_remaining() {
        let m = group_of(&["Ana", "Ben", "Cy"]);
        let LeaveOutcome::Remaining(next) = m.leave(&email("Ana")).unwrap() else {
            panic!("group should remain");
        };
        assert_eq!(next.owner_email, email("Ben"));
        assert_eq!(next.attendees, vec![attendee("Ben"), attendee("Cy")]);
    }

    #[test]
    fn promoted_owner_need_not_be_first_in_list() {
        // Owner sits in the middle after an earlier handover.
        let m = Membership {
            owner_email: email("Ben"),
            attendees: vec![attendee("Ana"), attendee("Ben"), attendee("Cy")],
        };
        let LeaveOutcome::Remaining(next) = m.leave(&email("Ben")).unwrap() else {
            panic!("group should remain");
        };
        assert_eq!(next.owner_email, email("Ana"));
    }

    #[test]
    fn sole_owner_leave_empties_group() {
        let m = group_of(&["Ana"]);
        assert_eq!(m.leave(&email("Ana")).unwrap(), LeaveOutcome::Emptied);
    }

    #[test]
    fn last_non_owner_leave_also_empties_group() {
        let m = Membership {
            owner_email: email("Ghost"),
            attendees: vec![attendee("Ana")],
        };
        assert_eq!(m.leave(&email("Ana")).unwrap(), LeaveOutcome::Emptied);
    }

    #[test]
    fn leaving_without_membership_fails() {
        let m = group_of(&["Ana", "Ben"]);
        assert_eq!(
            m.leave(&email("Zed")).unwrap_err(),
            MembershipError::NotAMember
        );
    }

    #[test]
    fn owner_always_remains_an_attendee() {
        let mut m = group_of(&["Ana", "Ben", "Cy", "Dee"]);
        for leaver in ["Ana", "Cy", "Ben"] {
            match m.leave(&email(leaver)).unwrap() {
                LeaveOutcome::Remaining(next) => {
                    assert!(next.contains(&next.owner_email));
                    m = next;
                }
                LeaveOutcome::Emptied => panic!("group emptied too early"),
            }
        }
        assert_eq!(m.owner_email, email("Dee"));
        assert_eq!(m.leave(&email("Dee")).unwrap(), LeaveOutcome::Emptied);
    }
}
