//! View models for printing study groups.
//!
//! Everything the terminal shows is decided here from the group and the viewer's
//! email; the `render` methods only lay the result out as text.

use std::collections::HashMap;

use pumapal_api::StudyGroupDto;
use pumapal_storage::{CourseKey, MeetingTime};

/// One line of a group's pal list.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberLine {
    pub name: String,
    /// `None` when the viewer is not allowed to see it.
    pub email: Option<String>,
    pub is_owner: bool,
    pub is_viewer: bool,
}

impl MemberLine {
    fn render(&self) -> String {
        let mut line = self.name.clone();
        if self.is_viewer {
            line.push_str(" (you)");
        }
        if self.email.is_some() || self.is_owner {
            line.push_str(" -");
        }
        if let Some(email) = &self.email {
            line.push(' ');
            line.push_str(email);
        }
        if self.is_owner {
            line.push_str(" (Owner)");
        }
        line
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupCard {
    pub id: String,
    pub title: String,
    pub course: String,
    pub campus: String,
    pub date: String,
    pub time: String,
    pub pals: usize,
    /// Only members learn where the group meets.
    pub location: Option<String>,
    pub notes: String,
    pub viewer_is_owner: bool,
    pub viewer_is_member: bool,
    /// Empty for non-members.
    pub members: Vec<MemberLine>,
}

impl GroupCard {
    /// `ordinal` numbers untitled groups of the same course: "COP 2800 Study Group 2".
    pub fn new(group: &StudyGroupDto, ordinal: usize, viewer: Option<&str>) -> Self {
        let viewer_is_owner = viewer.is_some_and(|v| group.is_owner(v));
        let viewer_is_member = viewer_is_owner || viewer.is_some_and(|v| group.is_attendee(v));

        let title = if group.group_title.trim().is_empty() {
            format!("{} Study Group {}", group.course, ordinal)
        } else {
            group.group_title.clone()
        };

        let members = if viewer_is_member {
            group
                .attendees
                .iter()
                .map(|a| {
                    let is_viewer = viewer.is_some_and(|v| a.email.eq_ignore_ascii_case(v));
                    let is_owner = group.is_owner(&a.email);
                    let visible = !is_viewer
                        && (viewer_is_owner || (is_owner && group.show_owner_email));
                    MemberLine {
                        name: a.name.clone(),
                        email: visible.then(|| a.email.clone()),
                        is_owner,
                        is_viewer,
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            id: group.id.clone(),
            title,
            course: group.course.clone(),
            campus: group.campus.to_string(),
            date: group.date.format("%A, %B %-d, %Y").to_string(),
            time: twelve_hour(&group.meeting_time),
            pals: group.attendees.len(),
            location: viewer_is_member.then(|| {
                if group.location.trim().is_empty() {
                    "TBD".to_string()
                } else {
                    group.location.clone()
                }
            }),
            notes: if group.notes.trim().is_empty() {
                "No notes provided".to_string()
            } else {
                group.notes.clone()
            },
            viewer_is_owner,
            viewer_is_member,
            members,
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            self.title.clone(),
            format!("  ID:       {}", self.id),
            format!("  Course:   {}", self.course),
            format!("  Campus:   {}", self.campus),
            format!("  Date:     {}", self.date),
            format!("  Time:     {}", self.time),
            format!("  Pals:     {}", self.pals),
        ];
        if let Some(location) = &self.location {
            lines.push(format!("  Location: {location}"));
        }
        lines.push(format!("  Notes:    {}", self.notes));
        if self.viewer_is_owner {
            lines.push("  ⭐ You own this group".to_string());
        }
        if !self.members.is_empty() {
            lines.push("  Pals:".to_string());
            lines.extend(self.members.iter().map(|m| format!("    - {}", m.render())));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// `18:30` -> `6:30 PM`. Unreadable input is shown as stored.
fn twelve_hour(raw: &str) -> String {
    match MeetingTime::parse(raw) {
        Ok(t) => t.as_naive().format("%-I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// A list of cards in server order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultsView {
    pub cards: Vec<GroupCard>,
}

impl ResultsView {
    pub fn new(groups: &[StudyGroupDto], viewer: Option<&str>) -> Self {
        let mut per_course: HashMap<CourseKey, usize> = HashMap::new();
        let cards = groups
            .iter()
            .map(|g| {
                let n = per_course.entry(CourseKey::of(&g.course)).or_insert(0);
                *n += 1;
                GroupCard::new(g, *n, viewer)
            })
            .collect();
        Self { cards }
    }

    pub fn render(&self) -> String {
        if self.cards.is_empty() {
            return "No study groups match your filters.\n".to_string();
        }
        self.cards
            .iter()
            .map(GroupCard::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pumapal_storage::{Attendee, Campus};

    const OWNER: &str = "olivia@valenciacollege.edu";
    const MEMBER: &str = "max@valenciacollege.edu";
    const STRANGER: &str = "sam@valenciacollege.edu";

    /// West campus, Tuesday 2026-10-20 at 18:30, owned by Olivia with Max as a member.
    pub(crate) fn sample_group() -> StudyGroupDto {
        let ts = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
        StudyGroupDto {
            id: "0192f0c4-0000-7000-8000-000000000001".to_string(),
            course: "COP 2800".to_string(),
            campus: Campus::West,
            location: String::new(),
            notes: String::new(),
            group_title: String::new(),
            meeting_time: "18:30".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            owner_email: OWNER.to_string(),
            attendees: vec![
                Attendee {
                    name: "Olivia".to_string(),
                    email: OWNER.to_string(),
                },
                Attendee {
                    name: "Max".to_string(),
                    email: MEMBER.to_string(),
                },
            ],
            show_owner_email: true,
            created_by: OWNER.to_string(),
            updated_by: OWNER.to_string(),
            created_at: ts,
            updated_at: ts,
            version: 2,
        }
    }

    #[test]
    fn test_card_formats_date_time_and_fallbacks() {
        let card = GroupCard::new(&sample_group(), 1, Some(MEMBER));
        assert_eq!(card.title, "COP 2800 Study Group 1");
        assert_eq!(card.date, "Tuesday, October 20, 2026");
        assert_eq!(card.time, "6:30 PM");
        assert_eq!(card.pals, 2);
        assert_eq!(card.location.as_deref(), Some("TBD"));
        assert_eq!(card.notes, "No notes provided");
    }

    #[test]
    fn test_explicit_title_wins() {
        let mut group = sample_group();
        group.group_title = "Finals cram".to_string();
        let card = GroupCard::new(&group, 3, None);
        assert_eq!(card.title, "Finals cram");
    }

    #[test]
    fn test_stranger_sees_no_location_or_pals() {
        let mut group = sample_group();
        group.location = "Library 2nd floor".to_string();

        let card = GroupCard::new(&group, 1, Some(STRANGER));
        assert!(!card.viewer_is_member);
        assert!(card.location.is_none());
        assert!(card.members.is_empty());

        let text = card.render();
        assert!(!text.contains("Library"));
        assert!(!text.contains("Location"));
    }

    #[test]
    fn test_member_card_layout() {
        let mut group = sample_group();
        group.location = "Library 2nd floor".to_string();
        let card = GroupCard::new(&group, 1, Some(MEMBER));

        let expected = format!(
            "COP 2800 Study Group 1\n\
             \x20 ID:       {}\n\
             \x20 Course:   COP 2800\n\
             \x20 Campus:   West\n\
             \x20 Date:     Tuesday, October 20, 2026\n\
             \x20 Time:     6:30 PM\n\
             \x20 Pals:     2\n\
             \x20 Location: Library 2nd floor\n\
             \x20 Notes:    No notes provided\n\
             \x20 Pals:\n\
             \x20   - Olivia - {} (Owner)\n\
             \x20   - Max (you)\n",
            group.id, OWNER
        );
        assert_eq!(card.render(), expected);
    }

    #[test]
    fn test_owner_sees_every_other_email() {
        let card = GroupCard::new(&sample_group(), 1, Some(OWNER));
        assert!(card.viewer_is_owner);

        let me = &card.members[0];
        assert!(me.is_viewer && me.is_owner);
        assert_eq!(me.email, None);
        assert_eq!(me.render(), "Olivia (you) - (Owner)");

        let max = &card.members[1];
        assert_eq!(max.email.as_deref(), Some(MEMBER));
        assert_eq!(max.render(), format!("Max - {}", MEMBER));

        assert!(card.render().contains("You own this group"));
    }

    #[test]
    fn test_member_sees_owner_email_only_when_shared() {
        let card = GroupCard::new(&sample_group(), 1, Some(MEMBER));
        assert_eq!(card.members[0].email.as_deref(), Some(OWNER));
        assert_eq!(card.members[0].render(), format!("Olivia - {} (Owner)", OWNER));
        assert_eq!(card.members[1].email, None);
        assert_eq!(card.members[1].render(), "Max (you)");

        let mut hidden = sample_group();
        hidden.show_owner_email = false;
        let card = GroupCard::new(&hidden, 1, Some(MEMBER));
        assert_eq!(card.members[0].email, None);
        assert_eq!(card.members[0].render(), "Olivia - (Owner)");
    }

    #[test]
    fn test_viewer_match_ignores_case() {
        let card = GroupCard::new(&sample_group(), 1, Some("MAX@ValenciaCollege.edu"));
        assert!(card.viewer_is_member);
        assert!(card.members[1].is_viewer);
    }

    #[test]
    fn test_ordinals_count_per_course() {
        let a = sample_group();
        let mut b = sample_group();
        b.course = "MAC 1105".to_string();
        let mut c = sample_group();
        c.course = "cop2800".to_string();

        let view = ResultsView::new(&[a, b, c], None);
        let titles: Vec<_> = view.cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "COP 2800 Study Group 1",
                "MAC 1105 Study Group 1",
                "cop2800 Study Group 2",
            ]
        );
    }

    #[test]
    fn test_empty_results_message() {
        let view = ResultsView::new(&[], Some(MEMBER));
        assert_eq!(view.render(), "No study groups match your filters.\n");
    }

    #[test]
    fn test_twelve_hour_edges() {
        assert_eq!(twelve_hour("00:05"), "12:05 AM");
        assert_eq!(twelve_hour("12:00"), "12:00 PM");
        assert_eq!(twelve_hour("09:45"), "9:45 AM");
        assert_eq!(twelve_hour("later"), "later");
    }
}
