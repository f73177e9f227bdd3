use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};

use super::parse::{parse_completion, parse_date, parse_priority};
use super::{CONTEXT_TAG, DATE_FORMAT, KEYWORD_SEP, PROJECT_TAG};
use crate::error::TodoError;

/// A task priority, one of the letters `A` through `Z`. `A` is the most
/// important and sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(char);

impl Priority {
    pub fn letter(self) -> char {
        self.0
    }
}

impl TryFrom<char> for Priority {
    type Error = TodoError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c.is_ascii_uppercase() {
            Ok(Self(c))
        } else {
            Err(TodoError::InvalidPriority(c))
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// Source of the current date for [`Task::complete`].
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The local wall-clock date.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one date.
#[cfg(test)]
pub struct FixedClock(pub NaiveDate);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// A single line of a todo.txt file.
///
/// The text is authoritative: the header fields are read from it once at
/// construction and the text is returned unchanged by `to_string`. The only
/// way to change a task is [`Task::complete`], which rebuilds it from new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    text: String,
    fields: Vec<String>,
    done: bool,
    priority: Option<Priority>,
    creation_date: Option<NaiveDate>,
    completion_date: Option<NaiveDate>,
}

impl Task {
    /// Builds a task from a line of text. Line breaks become spaces.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into().replace("\r\n", " ").replace('\n', " ");
        let fields = text.split_whitespace().map(str::to_string).collect();

        let (done, rest) = parse_completion(&text);
        let (completion_date, rest) = if done { parse_date(rest) } else { (None, rest) };
        let (priority, rest) = parse_priority(rest);
        let (creation_date, _) = parse_date(rest);

        Self {
            done,
            priority,
            creation_date,
            completion_date,
            fields,
            text,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn creation_date(&self) -> Option<NaiveDate> {
        self.creation_date
    }

    /// The completion date. Always `None` for tasks that are not done.
    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.completion_date
    }

    /// Returns the tags beginning with `marker`, in the order they appear.
    ///
    /// A tag is a whitespace-delimited field whose first character is the
    /// marker and whose last character is a letter, a digit or `_`. Only the
    /// first character is checked against the marker, so `+foo+bar` is a
    /// single tag and `+foo+` is none.
    pub fn tags(&self, marker: char) -> Vec<&str> {
        self.fields
            .iter()
            .map(String::as_str)
            .filter(|f| f.starts_with(marker) && f.chars().next_back().is_some_and(is_tag_end))
            .collect()
    }

    pub fn projects(&self) -> Vec<&str> {
        self.tags(PROJECT_TAG)
    }

    pub fn contexts(&self) -> Vec<&str> {
        self.tags(CONTEXT_TAG)
    }

    /// Whether the task carries `tag`, marker included (`+proj`, `@home`).
    pub fn has_tag(&self, tag: &str) -> bool {
        match tag.chars().next() {
            Some(marker) => self.tags(marker).contains(&tag),
            None => false,
        }
    }

    /// Returns the `key:value` pairs in the task. Fields split at their first
    /// `:`; when a key repeats the last value wins.
    pub fn keywords(&self) -> HashMap<String, String> {
        let mut keywords = HashMap::new();
        for field in &self.fields {
            if let Some((key, value)) = field.split_once(KEYWORD_SEP) {
                keywords.insert(key.to_string(), value.to_string());
            }
        }
        keywords
    }

    /// Marks the task done on the clock's current date. Done tasks are left
    /// alone.
    pub fn complete(&mut self, clock: &impl Clock) {
        if self.done {
            return;
        }
        let today = clock.today().format(DATE_FORMAT);
        let text = if self.text.is_empty() {
            format!("x {}", today)
        } else {
            format!("x {} {}", today, self.text)
        };
        *self = Task::new(text);
    }
}

fn is_tag_end(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Task {
    fn from(text: &str) -> Self {
        Task::new(text)
    }
}

impl From<String> for Task {
    fn from(text: String) -> Self {
        Task::new(text)
    }
}

impl FromStr for Task {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Task::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn p(c: char) -> Option<Priority> {
        Some(Priority::try_from(c).unwrap())
    }

    #[test]
    fn test_header() {
        let cases = [
            ("", false, None, None, None),
            ("x ", true, None, None, None),
            ("x 2012-12-23", true, None, Some(d(2012, 12, 23)), None),
            ("x 2012-12-23 (A)", true, p('A'), Some(d(2012, 12, 23)), None),
            (
                "x 2012-12-23 (A) 2012-12-20",
                true,
                p('A'),
                Some(d(2012, 12, 23)),
                Some(d(2012, 12, 20)),
            ),
            ("2012-12-23 (A) 2012-12-20", false, None, None, Some(d(2012, 12, 23))),
            ("x (A) 2012-12-20", true, p('A'), None, Some(d(2012, 12, 20))),
            (
                "x 2012-12-23 2012-12-20",
                true,
                None,
                Some(d(2012, 12, 23)),
                Some(d(2012, 12, 20)),
            ),
            ("(B) 2013-01-05 Call mom", false, p('B'), None, Some(d(2013, 1, 5))),
        ];

        for (text, done, prio, done_date, add_date) in cases {
            let task = Task::new(text);
            assert_eq!(task.is_done(), done, "done for {:?}", text);
            assert_eq!(task.priority(), prio, "priority for {:?}", text);
            assert_eq!(task.completion_date(), done_date, "completion for {:?}", text);
            assert_eq!(task.creation_date(), add_date, "creation for {:?}", text);
        }
    }

    #[test]
    fn test_not_done_has_no_completion_date() {
        for text in ["2012-12-23 foo", "X 2012-12-23 foo", "x2012-12-23", "(A) x 2012-12-23"] {
            let task = Task::new(text);
            assert!(!task.is_done());
            assert_eq!(task.completion_date(), None);
        }
    }

    #[test]
    fn test_newlines_become_spaces() {
        let task = Task::new("x 2012-12-23\r\nfoo\nbar");
        assert_eq!(task.to_string(), "x 2012-12-23 foo bar");
        assert!(task.is_done());
        assert_eq!(task.completion_date(), Some(d(2012, 12, 23)));
    }

    #[test]
    fn test_tags() {
        let cases: [(&str, char, &[&str]); 8] = [
            ("", '+', &[]),
            ("+foo +bar", '+', &["+foo", "+bar"]),
            ("@foo @bar", '@', &["@foo", "@bar"]),
            ("hello +foo there +bar", '+', &["+foo", "+bar"]),
            ("hello @foo there @bar", '@', &["@foo", "@bar"]),
            ("+foo+ +bar", '+', &["+bar"]),
            ("+foo+bar a+b +", '+', &["+foo+bar"]),
            ("+foo @foo +foo +under_", '+', &["+foo", "+foo", "+under_"]),
        ];
        for (text, marker, expected) in cases {
            assert_eq!(Task::new(text).tags(marker), expected, "text {:?}", text);
        }
    }

    #[test]
    fn test_projects_and_contexts() {
        let task = Task::new("Call +Family @phone about +Trip2013");
        assert_eq!(task.projects(), vec!["+Family", "+Trip2013"]);
        assert_eq!(task.contexts(), vec!["@phone"]);
    }

    #[test]
    fn test_has_tag() {
        let task = Task::new("(A) Review +Proj @ctx +bad+");
        assert!(task.has_tag("+Proj"));
        assert!(task.has_tag("@ctx"));
        assert!(!task.has_tag("+proj"));
        assert!(!task.has_tag("+bad+"));
        assert!(!task.has_tag("@Proj"));
        assert!(!task.has_tag(""));
    }

    #[test]
    fn test_keywords() {
        let task = Task::new("due:2012-12-23 due:2012-12-24");
        let kw = task.keywords();
        assert_eq!(kw.len(), 1);
        assert_eq!(kw["due"], "2012-12-24");

        let kw = Task::new("plain words only").keywords();
        assert!(kw.is_empty());
    }

    #[test]
    fn test_keyword_value_keeps_later_colons() {
        let kw = Task::new("url:http://example.com/x:y plain").keywords();
        assert_eq!(kw.len(), 1);
        assert_eq!(kw["url"], "http://example.com/x:y");
    }

    #[test]
    fn test_keyword_bare_colon() {
        let kw = Task::new("a : b").keywords();
        assert_eq!(kw.len(), 1);
        assert_eq!(kw[""], "");
    }

    #[test]
    fn test_complete() {
        let clock = FixedClock(d(2026, 10, 19));

        let mut task = Task::new("+foo +bar @baz");
        task.complete(&clock);
        assert_eq!(task.to_string(), "x 2026-10-19 +foo +bar @baz");
        assert!(task.is_done());
        assert_eq!(task.completion_date(), Some(d(2026, 10, 19)));
        assert_eq!(task.projects(), vec!["+foo", "+bar"]);
    }

    #[test]
    fn test_complete_empty() {
        let mut task = Task::new("");
        task.complete(&FixedClock(d(2026, 10, 19)));
        assert_eq!(task.to_string(), "x 2026-10-19");
        assert!(task.is_done());
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut task = Task::new("x 2012-12-23 done already");
        let before = task.clone();
        task.complete(&FixedClock(d(2026, 10, 19)));
        assert_eq!(task, before);
        assert_eq!(task.to_string(), "x 2012-12-23 done already");
    }

    #[test]
    fn test_complete_keeps_priority_and_creation_date() {
        let mut task = Task::new("(A) 2012-12-20 Review");
        task.complete(&FixedClock(d(2012, 12, 23)));
        assert_eq!(task.to_string(), "x 2012-12-23 (A) 2012-12-20 Review");
        assert_eq!(task.priority(), p('A'));
        assert_eq!(task.creation_date(), Some(d(2012, 12, 20)));
    }

    #[test]
    fn test_full_line() {
        let task = Task::new("x 2012-12-23 (A) 2012-12-20 Review +Proj @ctx due:2013-01-01");
        assert!(task.is_done());
        assert_eq!(task.completion_date(), Some(d(2012, 12, 23)));
        assert_eq!(task.priority(), p('A'));
        assert_eq!(task.creation_date(), Some(d(2012, 12, 20)));
        assert_eq!(task.tags('+'), vec!["+Proj"]);
        assert_eq!(task.tags('@'), vec!["@ctx"]);

        let kw = task.keywords();
        assert_eq!(kw.len(), 1);
        assert_eq!(kw["due"], "2013-01-01");
    }

    #[test]
    fn test_text_is_verbatim() {
        let line = "  (A)  odd   spacing  ";
        assert_eq!(Task::new(line).to_string(), line);
        assert_eq!(line.parse::<Task>().unwrap().to_string(), line);
    }

    #[test]
    fn test_priority_validation() {
        assert_eq!(Priority::try_from('C').unwrap().letter(), 'C');
        assert_eq!(Priority::try_from('C').unwrap().to_string(), "(C)");
        assert!(matches!(Priority::try_from('c'), Err(TodoError::InvalidPriority('c'))));
        assert!(Priority::try_from('1').is_err());
        assert!(Priority::try_from('Ä').is_err());
        assert!(Priority::try_from('A').unwrap() < Priority::try_from('B').unwrap());
    }
}
