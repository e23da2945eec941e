//! Intent flags and their resolution into launch configurations.
//!
//! The navigation-graph builder sees `Intent.addFlags(int)` / `setFlags(int)`
//! calls reaching a launch site. Each observed flag word is classified with
//! [`IntentFlags::from_word`]; words reaching the same intent object are
//! combined with [`IntentFlags::merge`]. Finally [`resolve`] combines the
//! target's manifest launch mode with the merged flags into one
//! [`LaunchConfiguration`].

use std::fmt;

use crate::launch::{LaunchConfiguration, LaunchMode};

/// `Intent.FLAG_ACTIVITY_CLEAR_TOP`.
pub const FLAG_ACTIVITY_CLEAR_TOP: u32 = 0x0400_0000;
/// `Intent.FLAG_ACTIVITY_REORDER_TO_FRONT`.
pub const FLAG_ACTIVITY_REORDER_TO_FRONT: u32 = 0x0002_0000;
/// `Intent.FLAG_ACTIVITY_SINGLE_TOP`.
pub const FLAG_ACTIVITY_SINGLE_TOP: u32 = 0x2000_0000;

/// Flags with task-level effects (`NEW_TASK`, `CLEAR_TASK`, `MULTIPLE_TASK`
/// and the like). Any of them makes the launch unmodeled.
pub const INVALID_FLAG_MASKS: [u32; 8] = [
    0x0040_0000,
    0x0000_8000,
    0x0008_0000,
    0x0800_0000,
    0x1000_0000,
    0x0100_0000,
    0x0020_0000,
    0x0000_4000,
];

/// How the flags were applied to the intent.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FlagsCall {
    AddFlags,
    SetFlags,
}

/// Classified intent flags.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct IntentFlags {
    /// Raw flag word (OR of all merged words).
    pub word: u32,
    pub call: FlagsCall,
    pub invalid: bool,
    /// No recognized flag is set.
    pub empty: bool,
    pub clear_top: bool,
    pub reorder_to_front: bool,
    pub single_top: bool,
}

impl IntentFlags {
    /// Classifies a flag word passed to `addFlags`/`setFlags`.
    pub fn from_word(word: u32, call: FlagsCall) -> Self {
        let mut flags = IntentFlags {
            word,
            call,
            invalid: false,
            empty: true,
            clear_top: false,
            reorder_to_front: false,
            single_top: false,
        };
        if INVALID_FLAG_MASKS.iter().any(|&mask| word & mask != 0) {
            flags.invalid = true;
            flags.empty = false;
            return flags;
        }
        flags.clear_top = word & FLAG_ACTIVITY_CLEAR_TOP != 0;
        flags.reorder_to_front = word & FLAG_ACTIVITY_REORDER_TO_FRONT != 0;
        flags.single_top = word & FLAG_ACTIVITY_SINGLE_TOP != 0;
        flags.empty = !(flags.clear_top || flags.reorder_to_front || flags.single_top);
        flags
    }

    /// Shorthand for `from_word(word, FlagsCall::AddFlags)`.
    pub fn added(word: u32) -> Self {
        Self::from_word(word, FlagsCall::AddFlags)
    }

    /// Combines flags from another flag-setting site reaching the same intent.
    ///
    /// Invalid is absorbing.
    pub fn merge(&mut self, other: &IntentFlags) {
        self.word |= other.word;
        if self.invalid {
            return;
        }
        if other.invalid {
            self.invalid = true;
            self.empty = false;
            self.clear_top = false;
            self.reorder_to_front = false;
            self.single_top = false;
            return;
        }
        self.empty &= other.empty;
        self.clear_top |= other.clear_top;
        self.reorder_to_front |= other.reorder_to_front;
        self.single_top |= other.single_top;
    }

    /// Returns the merge of `self` and `other`.
    #[must_use]
    pub fn merged(mut self, other: &IntentFlags) -> Self {
        self.merge(other);
        self
    }
}

impl fmt::Display for IntentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invalid {
            return write!(f, "invalid (0x{:x})", self.word);
        }
        if self.empty {
            return write!(f, "empty (0x{:x})", self.word);
        }
        let names: Vec<&str> = [
            (self.clear_top, "clearTop"),
            (self.single_top, "singleTop"),
            (self.reorder_to_front, "reorderToFront"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect();
        write!(f, "{} (0x{:x})", names.join(","), self.word)
    }
}

/// Resolves the launch configuration of one launch site.
///
/// - A missing, `singleTask` or `singleInstance` launch mode is invalid.
/// - Without (recognized) flags the launch mode alone decides.
/// - Invalid flags make the whole launch invalid.
/// - Otherwise the launch is `singleTop` if either the launch mode or the
///   flags say so (else `standard`), plus the clear-top / reorder-to-front
///   modifiers.
pub fn resolve(mode: Option<LaunchMode>, flags: Option<&IntentFlags>) -> LaunchConfiguration {
    let mode = match mode {
        Some(mode) if mode.is_modeled() => mode,
        _ => return LaunchConfiguration::INVALID,
    };
    let flags = match flags {
        None => return LaunchConfiguration::from_launch_mode(mode),
        Some(flags) if flags.empty => return LaunchConfiguration::from_launch_mode(mode),
        Some(flags) if flags.invalid => return LaunchConfiguration::INVALID,
        Some(flags) => flags,
    };
    let mut bits = if mode == LaunchMode::SingleTop || flags.single_top {
        LaunchConfiguration::FLAG_SINGLE_TOP
    } else {
        LaunchConfiguration::FLAG_STANDARD
    };
    if flags.clear_top {
        bits |= LaunchConfiguration::FLAG_CLEAR_TOP;
    }
    if flags.reorder_to_front {
        bits |= LaunchConfiguration::FLAG_REORDER_TO_FRONT;
    }
    LaunchConfiguration::new(bits)
}

/// Resolves every intent object that may reach one launch site.
///
/// `None` in `intents` stands for an intent with no flag-setting calls.
pub fn resolve_all<'a>(
    mode: Option<LaunchMode>,
    intents: impl IntoIterator<Item = Option<&'a IntentFlags>>,
) -> Vec<LaunchConfiguration> {
    let mut configs: Vec<LaunchConfiguration> = Vec::new();
    for flags in intents {
        let config = resolve(mode, flags);
        if !configs.contains(&config) {
            configs.push(config);
        }
    }
    configs
}
