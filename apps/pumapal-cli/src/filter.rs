//! Client-side filters over a result list.

use chrono::{Datelike, Weekday};
use clap::ValueEnum;
use pumapal_api::StudyGroupDto;
use pumapal_storage::{Campus, MeetingTime};

use crate::cli::FilterArgs;

/// Part of the day a meeting starts in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TimeOfDay {
    /// 05:00 to 11:59
    Morning,
    /// 12:00 to 17:59
    Afternoon,
    /// 18:00 to 20:59
    Evening,
    /// 21:00 to 04:59
    Night,
}

impl TimeOfDay {
    pub fn of(time: MeetingTime) -> Self {
        match time.minutes_of_day() {
            300..=719 => TimeOfDay::Morning,
            720..=1079 => TimeOfDay::Afternoon,
            1080..=1259 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupFilter {
    pub campus: Option<Campus>,
    pub time: Option<TimeOfDay>,
    pub weekday: Option<Weekday>,
}

impl From<FilterArgs> for GroupFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            campus: args.campus,
            time: args.time,
            weekday: args.day,
        }
    }
}

impl GroupFilter {
    pub fn is_empty(&self) -> bool {
        self.campus.is_none() && self.time.is_none() && self.weekday.is_none()
    }

    pub fn matches(&self, group: &StudyGroupDto) -> bool {
        let campus_ok = self.campus.map_or(true, |c| group.campus == c);
        // A time the client cannot read never lands in a bucket.
        let time_ok = self.time.map_or(true, |wanted| {
            MeetingTime::parse(&group.meeting_time)
                .map(|t| TimeOfDay::of(t) == wanted)
                .unwrap_or(false)
        });
        let day_ok = self.weekday.map_or(true, |d| group.date.weekday() == d);
        campus_ok && time_ok && day_ok
    }

    /// Keep matching groups, preserving order.
    pub fn apply(&self, groups: Vec<StudyGroupDto>) -> Vec<StudyGroupDto> {
        if self.is_empty() {
            return groups;
        }
        groups.into_iter().filter(|g| self.matches(g)).collect()
    }
}
