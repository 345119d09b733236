// src/parse/task_input.rs

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::task::{Dependency, Task, TaskId, format_duration, parse_duration};

/// Highest priority expressible with leading `!`.
pub const MAX_PRIORITY: u8 = 5;

static PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!*").expect("priority pattern is valid"));
static DEPENDENCIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bneeds:((?:\d+,?)+)").expect("dependencies pattern is valid")
});
static TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B#((?:\w|-|:)+)\b").expect("tags pattern is valid"));
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B~([0-9a-zA-Z]+)").expect("duration pattern is valid"));
static DEADLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\B>(\d{4}-\d{1,2}-\d{1,2})").expect("deadline pattern is valid")
});

/// Parse one line of user input into a new task.
///
/// ```text
/// !!Title: Description #tag ~2h30m >2017-11-24 needs:1,2
/// ```
///
/// Extractors run in a fixed order, each on what the previous ones left:
/// priority, dependencies, tags, duration, deadline, then title/description.
/// A duration that does not parse rejects the whole input.
pub fn parse(input: &str) -> Result<Task> {
    let mut task = Task::default();

    let rest = extract_priority(input, &mut task);
    let rest = extract_dependencies(&rest, &mut task);
    let rest = extract_tags(&rest, &mut task);
    let rest = extract_duration(&rest, &mut task)?;
    let rest = extract_deadline(&rest, &mut task);
    extract_title(&rest, &mut task);

    debug!(
        title = %task.title,
        priority = task.priority,
        tags = task.tags.len(),
        dependencies = task.dependencies.len(),
        "parsed task input"
    );

    Ok(task)
}

fn extract_priority(s: &str, task: &mut Task) -> String {
    let bangs = PRIORITY_RE.find(s).map(|m| m.len()).unwrap_or(0);
    task.priority = u8::try_from(bangs).unwrap_or(MAX_PRIORITY).min(MAX_PRIORITY);
    PRIORITY_RE.replace(s, "").into_owned()
}

fn extract_dependencies(s: &str, task: &mut Task) -> String {
    let mut seen: Vec<TaskId> = Vec::new();
    for caps in DEPENDENCIES_RE.captures_iter(s) {
        for raw in caps[1].split(',').filter(|raw| !raw.is_empty()) {
            match raw.parse::<TaskId>() {
                Ok(id) if !seen.contains(&id) => seen.push(id),
                Ok(_) => {}
                Err(_) => warn!(entry = %raw, "ignoring out-of-range dependency id"),
            }
        }
    }

    task.dependencies = seen.into_iter().map(Dependency::new).collect();
    DEPENDENCIES_RE.replace_all(s, "").into_owned()
}

fn extract_tags(s: &str, task: &mut Task) -> String {
    task.tags = TAGS_RE
        .captures_iter(s)
        .map(|caps| caps[1].to_string())
        .collect::<BTreeSet<_>>();
    TAGS_RE.replace_all(s, "").into_owned()
}

fn extract_duration(s: &str, task: &mut Task) -> Result<String> {
    let Some(caps) = DURATION_RE.captures(s) else {
        return Ok(s.to_string());
    };

    let duration = parse_duration(&caps[1])?;
    let canonical = format_duration(duration);
    task.duration = (!canonical.is_empty()).then_some(canonical);

    Ok(DURATION_RE.replace_all(s, "").into_owned())
}

fn extract_deadline(s: &str, task: &mut Task) -> String {
    let Some(caps) = DEADLINE_RE.captures(s) else {
        return s.to_string();
    };

    let raw = &caps[1];
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => {
            task.deadline = date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc());
        }
        Err(e) => warn!(date = %raw, error = %e, "ignoring impossible deadline"),
    }

    DEADLINE_RE.replace_all(s, "").into_owned()
}

fn extract_title(s: &str, task: &mut Task) {
    let s = s.trim();
    match s.split_once(':') {
        Some((title, description)) => {
            task.title = title.trim().to_string();
            task.description = description.trim().to_string();
        }
        None => task.title = s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TonightError;
    use chrono::{TimeZone, Utc};

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_every_field() {
        let task = parse("!!Title: Desc #a #b ~2h30m >2017-11-24 needs:1,2").unwrap();

        assert_eq!(task.priority, 2);
        assert_eq!(task.title, "Title");
        assert_eq!(task.description, "Desc");
        assert_eq!(task.tags, tags(&["a", "b"]));
        assert_eq!(task.duration.as_deref(), Some("2h30m"));
        assert_eq!(
            task.deadline,
            Some(Utc.with_ymd_and_hms(2017, 11, 24, 23, 59, 59).unwrap())
        );
        assert_eq!(
            task.dependencies,
            vec![Dependency::new(1), Dependency::new(2)]
        );
    }

    #[test]
    fn title_only() {
        let task = parse("  Buy milk  ").unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");
        assert_eq!(task.priority, 0);
        assert!(task.tags.is_empty());
        assert!(task.dependencies.is_empty());
        assert_eq!(task.duration, None);
        assert_eq!(task.deadline, None);
    }

    #[test]
    fn priority_is_clamped() {
        let task = parse("!!!!!!!!Urgent").unwrap();
        assert_eq!(task.priority, MAX_PRIORITY);
        assert_eq!(task.title, "Urgent");
    }

    #[test]
    fn tags_are_deduplicated_and_case_sensitive() {
        let task = parse("Write #Docs #docs #docs #v1:api #wip-2").unwrap();
        assert_eq!(task.tags, tags(&["Docs", "docs", "v1:api", "wip-2"]));
        assert_eq!(task.title, "Write");
    }

    #[test]
    fn hash_inside_a_word_is_not_a_tag() {
        let task = parse("Learn C# basics").unwrap();
        assert!(task.tags.is_empty());
        assert_eq!(task.title, "Learn C# basics");
    }

    #[test]
    fn dependency_ids_stop_at_first_non_digit() {
        let task = parse("Deploy needs:3,4,3,").unwrap();
        assert_eq!(
            task.dependencies,
            vec![Dependency::new(3), Dependency::new(4)]
        );
        assert_eq!(task.title, "Deploy");

        let task = parse("Deploy needs:3,abc").unwrap();
        assert_eq!(task.dependencies, vec![Dependency::new(3)]);
        assert_eq!(task.title, "Deploy abc");

        let task = parse("Deploy needs:abc").unwrap();
        assert!(task.dependencies.is_empty());
        assert_eq!(task.title, "Deploy needs");
        assert_eq!(task.description, "abc");
    }

    #[test]
    fn dependencies_next_to_punctuation() {
        let task = parse("Deploy (needs:4)").unwrap();
        assert_eq!(task.dependencies, vec![Dependency::new(4)]);
        assert_eq!(task.title, "Deploy ()");

        let task = parse("Fix bug needs:3: check logs").unwrap();
        assert_eq!(task.dependencies, vec![Dependency::new(3)]);
        assert_eq!(task.title, "Fix bug");
        assert_eq!(task.description, "check logs");

        let task = parse("Ship it needs:2#release").unwrap();
        assert_eq!(task.dependencies, vec![Dependency::new(2)]);
        assert_eq!(task.tags, tags(&["release"]));
        assert_eq!(task.title, "Ship it");
    }

    #[test]
    fn duration_is_normalised() {
        let task = parse("Read ~150m").unwrap();
        assert_eq!(task.duration.as_deref(), Some("2h30m"));
    }

    #[test]
    fn invalid_duration_rejects_input() {
        match parse("Read ~forever") {
            Err(TonightError::InvalidDuration(_)) => {}
            other => panic!("expected InvalidDuration, got {other:?}"),
        }
    }

    #[test]
    fn impossible_deadline_is_stripped_and_ignored() {
        let task = parse("Pay rent >2021-02-31").unwrap();
        assert_eq!(task.deadline, None);
        assert_eq!(task.title, "Pay rent");
    }

    #[test]
    fn description_keeps_later_colons() {
        let task = parse("Call Bob: at 10:30 tomorrow").unwrap();
        assert_eq!(task.title, "Call Bob");
        assert_eq!(task.description, "at 10:30 tomorrow");
    }
}
