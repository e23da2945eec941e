//! Plain-text navigation graph descriptions.
//!
//! ```text
//! # comment
//! main MainActivity
//! mode SettingsActivity singleTop
//! MainActivity -> SettingsActivity
//! DetailActivity -> MainActivity : CLEAR_TOP
//! DetailActivity -> MainActivity : 0x04000000
//! A -> B : CLEAR_TOP | SINGLE_TOP
//! ```
//!
//! Every edge line is one launch site. Its flags are OR'ed into one intent
//! flag word and resolved together with the target's launch mode (default
//! `standard`), wherever in the file that mode is declared. Launches that
//! resolve to `invalid` are dropped.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::atg::ActivityTransitionGraph;
use crate::error::ParseError;
use crate::intent::{self, IntentFlags};
use crate::launch::LaunchMode;
use crate::types::Activity;

/// Intent flag names accepted in edge lines, with or without the
/// `FLAG_ACTIVITY_` prefix.
const FLAG_NAMES: [(&str, u32); 11] = [
    ("CLEAR_TOP", intent::FLAG_ACTIVITY_CLEAR_TOP),
    ("REORDER_TO_FRONT", intent::FLAG_ACTIVITY_REORDER_TO_FRONT),
    ("SINGLE_TOP", intent::FLAG_ACTIVITY_SINGLE_TOP),
    ("BROUGHT_TO_FRONT", 0x0040_0000),
    ("CLEAR_TASK", 0x0000_8000),
    ("CLEAR_WHEN_TASK_RESET", 0x0008_0000),
    ("MULTIPLE_TASK", 0x0800_0000),
    ("NEW_TASK", 0x1000_0000),
    ("PREVIOUS_IS_TOP", 0x0100_0000),
    ("RESET_TASK_IF_NEEDED", 0x0020_0000),
    ("TASK_ON_HOME", 0x0000_4000),
];

/// A parsed description.
#[derive(Debug, Clone)]
pub struct ParsedAtg {
    pub main: Activity,
    pub graph: ActivityTransitionGraph,
    /// Launch sites dropped as invalid.
    pub dropped: usize,
}

struct EdgeLine {
    line: usize,
    source: Activity,
    target: Activity,
    flags: Option<IntentFlags>,
}

fn parse_flag(token: &str, line: usize) -> Result<u32, ParseError> {
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).map_err(|e| ParseError::syntax(line, format!("bad flag word '{}': {}", token, e)));
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token
            .parse()
            .map_err(|e| ParseError::syntax(line, format!("bad flag word '{}': {}", token, e)));
    }
    let name = token.strip_prefix("FLAG_ACTIVITY_").unwrap_or(token);
    FLAG_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, word)| word)
        .ok_or_else(|| ParseError::syntax(line, format!("unknown intent flag '{}'", token)))
}

fn parse_edge(body: &str, line: usize) -> Result<EdgeLine, ParseError> {
    let (source, rest) = body
        .split_once("->")
        .ok_or_else(|| ParseError::syntax(line, "expected 'main', 'mode' or 'A -> B'"))?;
    let (target, flags) = match rest.split_once(':') {
        Some((target, flags)) => (target, Some(flags)),
        None => (rest, None),
    };
    let source = source.trim();
    let target = target.trim();
    if source.is_empty() || target.is_empty() {
        return Err(ParseError::syntax(line, "missing activity name"));
    }
    if source.contains(char::is_whitespace) || target.contains(char::is_whitespace) {
        return Err(ParseError::syntax(line, "activity names cannot contain whitespace"));
    }
    let flags = match flags {
        Some(flags) => {
            let mut word = 0;
            for token in flags.split('|') {
                let token = token.trim();
                if token.is_empty() {
                    return Err(ParseError::syntax(line, "empty intent flag"));
                }
                word |= parse_flag(token, line)?;
            }
            Some(IntentFlags::added(word))
        }
        None => None,
    };
    Ok(EdgeLine {
        line,
        source: source.into(),
        target: target.into(),
        flags,
    })
}

/// Parses a navigation graph description.
pub fn parse_atg(text: &str) -> Result<ParsedAtg, ParseError> {
    let mut main: Option<Activity> = None;
    let mut modes: Vec<(Activity, LaunchMode)> = Vec::new();
    let mut edges: Vec<EdgeLine> = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let body = raw.split('#').next().unwrap_or("").trim();
        if body.is_empty() {
            continue;
        }
        let words: Vec<&str> = body.split_whitespace().collect();
        match words[0] {
            "main" if !body.contains("->") => {
                let [_, activity] = words[..] else {
                    return Err(ParseError::syntax(line, "expected 'main <activity>'"));
                };
                if main.is_some() {
                    return Err(ParseError::syntax(line, "main activity declared twice"));
                }
                main = Some(activity.into());
            }
            "mode" if !body.contains("->") => {
                let [_, activity, mode] = words[..] else {
                    return Err(ParseError::syntax(line, "expected 'mode <activity> <launch mode>'"));
                };
                let mode = LaunchMode::from_manifest(mode)
                    .ok_or_else(|| ParseError::syntax(line, format!("unknown launch mode '{}'", mode)))?;
                modes.push((activity.into(), mode));
            }
            _ => edges.push(parse_edge(body, line)?),
        }
    }

    let main = main.ok_or(ParseError::MissingMain)?;
    let mode_of = |activity: &Activity| {
        modes
            .iter()
            .rev()
            .find(|(a, _)| a == activity)
            .map_or(LaunchMode::Standard, |&(_, mode)| mode)
    };

    let mut graph = ActivityTransitionGraph::new();
    graph.node(&main);
    let mut dropped = 0;
    for edge in edges {
        let config = intent::resolve(Some(mode_of(&edge.target)), edge.flags.as_ref());
        if !graph.add_transition(&edge.source, &edge.target, config) {
            debug!("line {}: dropping invalid launch {} -> {}", edge.line, edge.source, edge.target);
            dropped += 1;
        }
    }
    Ok(ParsedAtg { main, graph, dropped })
}

/// Reads and parses a description file.
pub fn read_atg(path: impl AsRef<Path>) -> Result<ParsedAtg, ParseError> {
    let text = fs::read_to_string(path)?;
    parse_atg(&text)
}

impl FromStr for ParsedAtg {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_atg(s)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::launch::LaunchConfiguration as C;

    #[test]
    fn test_parse() {
        let text = "\
# demo app
main Main
mode Settings singleTop

Main -> Settings
Main -> Detail            # plain
Detail -> Main : CLEAR_TOP
Detail -> Main : 0x20000000 | FLAG_ACTIVITY_CLEAR_TOP
Detail -> Settings : NEW_TASK
";
        let parsed = parse_atg(text).unwrap();
        assert_eq!(parsed.main, "Main");
        assert_eq!(parsed.dropped, 1);
        let atg = &parsed.graph;
        assert_eq!(atg.node_count(), 3);
        assert_eq!(atg.edge_count(), 3);

        let main = atg.find("Main").unwrap();
        let settings = atg.find("Settings").unwrap();
        let detail = atg.find("Detail").unwrap();
        assert_eq!(main.index(), 0);
        assert!(atg.edge(main, settings).unwrap().configs.contains(&C::SINGLE_TOP));
        assert!(atg.edge(main, detail).unwrap().configs.contains(&C::STANDARD));
        let back: Vec<C> = atg.edge(detail, main).unwrap().configs.iter().copied().collect();
        assert_eq!(
            back,
            vec![
                C::STANDARD.with(C::FLAG_CLEAR_TOP),
                C::SINGLE_TOP.with(C::FLAG_CLEAR_TOP),
            ]
        );
        assert!(atg.edge(detail, settings).is_none());
    }

    #[test]
    fn test_mode_declared_late() {
        let parsed: ParsedAtg = "main M\nM -> T\nmode T singleTask\n".parse().unwrap();
        assert_eq!(parsed.dropped, 1);
        assert_eq!(parsed.graph.edge_count(), 0);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse_atg("A -> B\n"), Err(ParseError::MissingMain)));

        let err = parse_atg("main A\n\nA => B\n").unwrap_err();
        assert_eq!(err.to_string(), "line 3: expected 'main', 'mode' or 'A -> B'");

        let err = parse_atg("main A\nA -> B : BOGUS\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown intent flag 'BOGUS'");

        let err = parse_atg("main A\nmode A singleWhatever\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown launch mode 'singleWhatever'");

        let err = parse_atg("main A\nmain B\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: main activity declared twice");

        let err = parse_atg("main A\nA -> : CLEAR_TOP\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: missing activity name");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_atg("/nonexistent/astg/input.txt").unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
