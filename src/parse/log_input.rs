// src/parse/log_input.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::task::Log;
use crate::types::LogType;

static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(pause|stop|start|resume|done|won['’]t do)\b")
        .expect("keyword pattern is valid")
});
static COMPLETION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)%").expect("completion pattern is valid"));
static FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)/([1-9]\d*)").expect("fraction pattern is valid"));

/// Parse one line of user input into a log entry.
///
/// Recognised prefixes, first match wins:
/// - a keyword: `pause`/`stop` (PAUSE), `start`/`resume` (START),
///   `done` (PROGRESS at 100%), `won't do` (WONT_DO);
/// - `NN%`: PROGRESS at NN%;
/// - `N/M`: PROGRESS at `(N * 100) / M`, integer division.
///
/// Anything else is a COMMENT at 0%. The text after the prefix (and one
/// optional `:`) is the description.
pub fn parse_log(input: &str) -> Log {
    let input = input.trim_start();

    let (log_type, completion, rest) = if let Some(caps) = KEYWORD_RE.captures(input) {
        let (log_type, completion) = keyword_log_type(&caps[1]);
        (log_type, completion, &input[caps[0].len()..])
    } else if let Some(caps) = COMPLETION_RE.captures(input) {
        let completion = parse_saturating(&caps[1]);
        (LogType::Progress, completion, &input[caps[0].len()..])
    } else if let Some(caps) = FRACTION_RE.captures(input) {
        let numerator = parse_saturating(&caps[1]);
        let denominator = parse_saturating(&caps[2]).max(1);
        let completion = numerator.saturating_mul(100) / denominator;
        (LogType::Progress, completion, &input[caps[0].len()..])
    } else {
        (LogType::Comment, 0, input)
    };

    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let completion = u8::try_from(completion.min(100)).unwrap_or(100);

    Log::new(log_type, completion, rest.trim())
}

fn keyword_log_type(keyword: &str) -> (LogType, u64) {
    match keyword {
        "pause" | "stop" => (LogType::Pause, 0),
        "start" | "resume" => (LogType::Start, 0),
        "done" => (LogType::Progress, 100),
        _ => (LogType::WontDo, 0),
    }
}

/// Digits too large for a `u64` saturate; completion is clamped later anyway.
fn parse_saturating(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}
