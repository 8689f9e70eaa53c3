//! Course codes and the whitespace-insensitive search key derived from them.

use std::fmt;

use super::ValidationError;

/// A course code as stored on a group: trimmed and upper-cased, inner spacing kept
/// (`"chm 1045c "` becomes `"CHM 1045C"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CourseCode(String);

impl CourseCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("course"));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn key(&self) -> CourseKey {
        CourseKey::of(&self.0)
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Course code with all whitespace removed and upper-cased.
///
/// Two course strings match in search exactly when their keys are equal, so
/// `"CHM 1045C"`, `"chm1045c"` and `"CHM 1045 C"` all find the same groups.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CourseKey(String);

impl CourseKey {
    /// Key of an already-stored course value.
    pub fn of(course: &str) -> Self {
        Self(
            course
                .chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_uppercase)
                .collect(),
        )
    }

    /// Key of a user search term; blank terms are a caller error.
    pub fn from_query(raw: &str) -> Result<Self, ValidationError> {
        let key = Self::of(raw);
        if key.0.is_empty() {
            return Err(ValidationError::EmptyCourseQuery);
        }
        Ok(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_code_is_trimmed_and_uppercased() {
        let code = CourseCode::parse("  chm1045c ").unwrap();
        assert_eq!(code.as_str(), "CHM1045C");
    }

    #[test]
    fn course_code_keeps_inner_spacing() {
        let code = CourseCode::parse("chm 1045c").unwrap();
        assert_eq!(code.as_str(), "CHM 1045C");
        assert_eq!(code.key().as_str(), "CHM1045C");
    }

    #[test]
    fn blank_course_code_is_missing() {
        assert_eq!(
            CourseCode::parse("   ").unwrap_err(),
            ValidationError::MissingField("course")
        );
    }

    #[test]
    fn query_key_ignores_any_whitespace() {
        let stored = CourseKey::of("CHM 1045C");
        assert_eq!(CourseKey::from_query("CHM1045C").unwrap(), stored);
        assert_eq!(CourseKey::from_query("chm 1045 c").unwrap(), stored);
        assert_eq!(CourseKey::from_query("\tCHM\n1045C ").unwrap(), stored);
    }

    #[test]
    fn query_key_does_not_match_different_course() {
        assert_ne!(
            CourseKey::from_query("CHM1046C").unwrap(),
            CourseKey::of("CHM 1045C")
        );
    }

    #[test]
    fn blank_query_is_rejected() {
        assert_eq!(
            CourseKey::from_query(" \t ").unwrap_err(),
            ValidationError::EmptyCourseQuery
        );
    }
}
