//! Launch configurations: how one navigation edge manipulates the back-stack.
//!
//! A [`LaunchConfiguration`] is a small bitset combining a launch mode
//! (`standard` or `singleTop`, exactly one of them) with the task
//! manipulation modifiers `clearTop` and `reorderToFront`. Two extra markers
//! exist: `invalid`, for launches whose semantics are not modeled, and
//! `finish`, tagging the synthetic back-press edges of the stack graph.

use std::fmt;

/// Launch mode declared for an activity in the manifest.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LaunchMode {
    Standard,
    SingleTop,
    SingleTask,
    SingleInstance,
}

impl LaunchMode {
    /// Parses the manifest attribute value.
    pub fn from_manifest(value: &str) -> Option<Self> {
        match value {
            "standard" => Some(LaunchMode::Standard),
            "singleTop" => Some(LaunchMode::SingleTop),
            "singleTask" => Some(LaunchMode::SingleTask),
            "singleInstance" => Some(LaunchMode::SingleInstance),
            _ => None,
        }
    }

    /// Whether launches of an activity with this mode can be modeled on a single back-stack.
    pub const fn is_modeled(self) -> bool {
        matches!(self, LaunchMode::Standard | LaunchMode::SingleTop)
    }
}

impl Default for LaunchMode {
    fn default() -> Self {
        LaunchMode::Standard
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LaunchMode::Standard => "standard",
            LaunchMode::SingleTop => "singleTop",
            LaunchMode::SingleTask => "singleTask",
            LaunchMode::SingleInstance => "singleInstance",
        };
        f.write_str(s)
    }
}

/// Launch semantics of a single navigation, as a tagged bitset.
///
/// # Invariants
///
/// - A well-formed configuration has exactly one of [`STANDARD`](Self::STANDARD)
///   and [`SINGLE_TOP`](Self::SINGLE_TOP) set.
/// - [`INVALID`](Self::INVALID) and [`FINISH`](Self::FINISH) are standalone markers.
///
/// Equality is by flag value.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LaunchConfiguration(u32);

impl LaunchConfiguration {
    pub const FLAG_INVALID: u32 = 0x0002;

    pub const FLAG_STANDARD: u32 = 0x0004;
    pub const FLAG_SINGLE_TOP: u32 = 0x0008;

    pub const FLAG_CLEAR_TOP: u32 = 0x0010;
    pub const FLAG_REORDER_TO_FRONT: u32 = 0x0020;

    pub const FLAG_FINISH: u32 = 0x0040;

    pub const STANDARD: LaunchConfiguration = LaunchConfiguration(Self::FLAG_STANDARD);
    pub const SINGLE_TOP: LaunchConfiguration = LaunchConfiguration(Self::FLAG_SINGLE_TOP);
    pub const INVALID: LaunchConfiguration = LaunchConfiguration(Self::FLAG_INVALID);
    pub const FINISH: LaunchConfiguration = LaunchConfiguration(Self::FLAG_FINISH);

    /// Creates a configuration from raw flags.
    ///
    /// No validation is done here: a malformed combination is only rejected
    /// when a policy tries to use it.
    pub const fn new(flags: u32) -> Self {
        LaunchConfiguration(flags)
    }

    /// Configuration implied by a manifest launch mode alone.
    ///
    /// `singleTask` and `singleInstance` yield [`INVALID`](Self::INVALID).
    pub const fn from_launch_mode(mode: LaunchMode) -> Self {
        match mode {
            LaunchMode::Standard => Self::STANDARD,
            LaunchMode::SingleTop => Self::SINGLE_TOP,
            LaunchMode::SingleTask | LaunchMode::SingleInstance => Self::INVALID,
        }
    }

    pub const fn flags(self) -> u32 {
        self.0
    }

    /// Returns a copy with the given flags added.
    #[must_use]
    pub const fn with(self, flags: u32) -> Self {
        LaunchConfiguration(self.0 | flags)
    }

    pub const fn is_set(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    pub const fn is_invalid(self) -> bool {
        self.is_set(Self::FLAG_INVALID)
    }

    pub const fn is_finish(self) -> bool {
        self.is_set(Self::FLAG_FINISH)
    }

    pub const fn is_standard(self) -> bool {
        self.is_set(Self::FLAG_STANDARD)
    }

    pub const fn is_single_top(self) -> bool {
        self.is_set(Self::FLAG_SINGLE_TOP)
    }

    pub const fn is_clear_top(self) -> bool {
        self.is_set(Self::FLAG_CLEAR_TOP)
    }

    pub const fn is_reorder_to_front(self) -> bool {
        self.is_set(Self::FLAG_REORDER_TO_FRONT)
    }

    /// Whether exactly one launch mode is set and no marker flag is.
    pub const fn is_well_formed(self) -> bool {
        !self.is_invalid() && !self.is_finish() && (self.is_standard() ^ self.is_single_top())
    }

    /// Whether this launch may produce a stack other than a plain push.
    ///
    /// True iff clear-top or reorder-to-front is set, or single-top is set on
    /// a self transition.
    pub const fn is_non_standard(self, self_transition: bool) -> bool {
        self.is_clear_top() || self.is_reorder_to_front() || (self.is_single_top() && self_transition)
    }
}

impl Default for LaunchConfiguration {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl From<LaunchMode> for LaunchConfiguration {
    fn from(mode: LaunchMode) -> Self {
        Self::from_launch_mode(mode)
    }
}

impl fmt::Display for LaunchConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            return f.write_str("invalid");
        }
        if self.is_finish() {
            return f.write_str("finish");
        }
        if !self.is_well_formed() {
            return write!(f, "malformed(0x{:x})", self.0);
        }
        f.write_str(if self.is_standard() { "standard" } else { "singleTop" })?;
        if self.is_clear_top() {
            f.write_str(",clearTop")?;
        }
        if self.is_reorder_to_front() {
            f.write_str(",reorderToFront")?;
        }
        Ok(())
    }
}

impl fmt::Debug for LaunchConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LaunchConfiguration({})", self)
    }
}
