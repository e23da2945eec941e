//! Lifecycle callback sequences.

use std::fmt;

use crate::types::{Activity, Callback};

/// One callback invocation: the receiving activity and the callback.
pub type Call = (Activity, Callback);

/// An ordered sequence of lifecycle callbacks executed during one transition.
///
/// Sequences are built with the consuming [`then`](Self::then) builder and
/// never modified afterwards; [`concat`](Self::concat) makes a new one.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct MethodSequence {
    calls: Vec<Call>,
}

impl MethodSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call.
    #[must_use]
    pub fn then(mut self, activity: &Activity, callback: Callback) -> Self {
        self.calls.push((activity.clone(), callback));
        self
    }

    /// Appends `callbacks`, all on the same activity.
    #[must_use]
    pub fn then_all(mut self, activity: &Activity, callbacks: &[Callback]) -> Self {
        self.calls.extend(callbacks.iter().map(|&c| (activity.clone(), c)));
        self
    }

    /// Returns `self` followed by `other`.
    pub fn concat(&self, other: &MethodSequence) -> Self {
        let mut calls = Vec::with_capacity(self.calls.len() + other.calls.len());
        calls.extend_from_slice(&self.calls);
        calls.extend_from_slice(&other.calls);
        Self { calls }
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Call> {
        self.calls.iter()
    }

    /// Whether `activity` receives `callback` somewhere in the sequence.
    pub fn contains(&self, activity: &str, callback: Callback) -> bool {
        self.calls.iter().any(|(a, c)| a == activity && *c == callback)
    }
}

impl FromIterator<Call> for MethodSequence {
    fn from_iter<T: IntoIterator<Item = Call>>(iter: T) -> Self {
        Self {
            calls: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MethodSequence {
    type Item = &'a Call;
    type IntoIter = std::slice::Iter<'a, Call>;

    fn into_iter(self) -> Self::IntoIter {
        self.calls.iter()
    }
}

impl fmt::Display for MethodSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        for (i, (activity, callback)) in self.calls.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}.{}", activity, callback)?;
        }
        f.write_str(">")
    }
}

impl fmt::Debug for MethodSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodSequence{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build() {
        let a = Activity::from("A");
        let b = Activity::from("B");
        let seq = MethodSequence::new()
            .then(&a, Callback::OnPause)
            .then_all(&b, &[Callback::Init, Callback::OnCreate]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.calls()[0], (a.clone(), Callback::OnPause));
        assert!(seq.contains("B", Callback::OnCreate));
        assert!(!seq.contains("A", Callback::OnCreate));
        assert_eq!(seq.to_string(), "<A.onPause, B.<init>, B.onCreate>");
    }

    #[test]
    fn test_concat() {
        let a = Activity::from("A");
        let first = MethodSequence::new().then(&a, Callback::OnPause);
        let second = MethodSequence::new().then(&a, Callback::OnResume);
        let both = first.concat(&second);
        assert_eq!(both.len(), 2);
        assert_eq!(first.len(), 1);
        assert_eq!(both.to_string(), "<A.onPause, A.onResume>");
    }

    #[test]
    fn test_empty() {
        let seq = MethodSequence::new();
        assert!(seq.is_empty());
        assert_eq!(seq.to_string(), "<>");
    }
}
