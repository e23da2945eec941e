//! The activity back-stack value type.

use std::collections::VecDeque;
use std::fmt;

use crate::types::Activity;

/// An ordered back-stack of activities, top first (index 0 is the top).
///
/// Stacks are plain values: equality and hashing are by content, which is
/// what makes them usable as graph-node keys. The four mutation primitives
/// ([`push`](Self::push), [`pop`](Self::pop), [`clear_top`](Self::clear_top),
/// [`reorder_to_front`](Self::reorder_to_front)) are the only way to change one.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct ActivityStack {
    top_to_bottom: VecDeque<Activity>,
}

impl ActivityStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack holding a single activity, e.g. the main activity.
    pub fn with_root(activity: impl Into<Activity>) -> Self {
        let mut stack = Self::new();
        stack.push(activity);
        stack
    }

    /// Creates a stack from activities listed top to bottom.
    pub fn from_top_to_bottom<I>(activities: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Activity>,
    {
        Self {
            top_to_bottom: activities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn top(&self) -> Option<&Activity> {
        self.top_to_bottom.front()
    }

    /// The activity right below the top, i.e. the one a back press would resume.
    pub fn below_top(&self) -> Option<&Activity> {
        self.top_to_bottom.get(1)
    }

    pub fn get(&self, index: usize) -> Option<&Activity> {
        self.top_to_bottom.get(index)
    }

    pub fn size(&self) -> usize {
        self.top_to_bottom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_to_bottom.is_empty()
    }

    /// Iterates activities from top to bottom.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Activity> + ExactSizeIterator + '_ {
        self.top_to_bottom.iter()
    }

    /// Index of the first (topmost) occurrence of `activity`.
    pub fn find(&self, activity: &str) -> Option<usize> {
        self.top_to_bottom.iter().position(|a| a == activity)
    }

    pub fn contains(&self, activity: &str) -> bool {
        self.find(activity).is_some()
    }

    /// Number of occurrences of `activity`.
    pub fn count(&self, activity: &str) -> usize {
        self.top_to_bottom.iter().filter(|a| *a == activity).count()
    }

    /// Pushes a new instance on top.
    pub fn push(&mut self, activity: impl Into<Activity>) {
        self.top_to_bottom.push_front(activity.into());
    }

    /// Removes and returns the top instance.
    pub fn pop(&mut self) -> Option<Activity> {
        self.top_to_bottom.pop_front()
    }

    /// Discards everything above the topmost occurrence of `activity`,
    /// leaving that occurrence on top.
    ///
    /// Returns `false` and leaves the stack untouched if `activity` is absent.
    pub fn clear_top(&mut self, activity: &str) -> bool {
        match self.find(activity) {
            Some(found) => {
                self.top_to_bottom.drain(..found);
                true
            }
            None => false,
        }
    }

    /// Moves the topmost occurrence of `activity` to the top, keeping the
    /// relative order of everything else.
    ///
    /// Returns `false` and leaves the stack untouched if `activity` is absent.
    pub fn reorder_to_front(&mut self, activity: &str) -> bool {
        let Some(found) = self.find(activity) else {
            return false;
        };
        if let Some(a) = self.top_to_bottom.remove(found) {
            self.top_to_bottom.push_front(a);
        }
        true
    }
}

impl fmt::Display for ActivityStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, a) in self.top_to_bottom.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", a)?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for ActivityStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActivityStack{}", self)
    }
}

impl<A: Into<Activity>> FromIterator<A> for ActivityStack {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        Self::from_top_to_bottom(iter)
    }
}

impl<'a> IntoIterator for &'a ActivityStack {
    type Item = &'a Activity;
    type IntoIter = std::collections::vec_deque::Iter<'a, Activity>;

    fn into_iter(self) -> Self::IntoIter {
        self.top_to_bottom.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn stack(activities: &[&str]) -> ActivityStack {
        ActivityStack::from_top_to_bottom(activities.iter().copied())
    }

    #[test]
    fn test_push_pop() {
        let mut s = ActivityStack::with_root("Main");
        assert_eq!(s.size(), 1);
        s.push("A");
        assert_eq!(s.top().map(Activity::as_str), Some("A"));
        assert_eq!(s.below_top().map(Activity::as_str), Some("Main"));
        assert_eq!(s.size(), 2);
        assert_eq!(s.pop().as_ref().map(Activity::as_str), Some("A"));
        assert_eq!(s, stack(&["Main"]));
        assert_eq!(s.pop().as_ref().map(Activity::as_str), Some("Main"));
        assert!(s.is_empty());
        assert_eq!(s.pop(), None);
        assert_eq!(s.top(), None);
    }

    #[test]
    fn test_find_count() {
        let s = stack(&["A", "B", "A", "Main"]);
        assert_eq!(s.find("A"), Some(0));
        assert_eq!(s.find("B"), Some(1));
        assert_eq!(s.find("Main"), Some(3));
        assert_eq!(s.find("C"), None);
        assert_eq!(s.count("A"), 2);
        assert_eq!(s.count("C"), 0);
    }

    #[test]
    fn test_clear_top() {
        let mut s = stack(&["D", "C", "B", "A", "Main"]);
        assert!(s.clear_top("A"));
        assert_eq!(s, stack(&["A", "Main"]));
    }

    #[test]
    fn test_clear_top_uses_topmost_occurrence() {
        let mut s = stack(&["C", "A", "B", "A", "Main"]);
        assert!(s.clear_top("A"));
        assert_eq!(s, stack(&["A", "B", "A", "Main"]));
    }

    #[test]
    fn test_clear_top_on_top_is_noop() {
        let mut s = stack(&["A", "Main"]);
        assert!(s.clear_top("A"));
        assert_eq!(s, stack(&["A", "Main"]));
    }

    #[test]
    fn test_clear_top_absent() {
        let mut s = stack(&["B", "Main"]);
        assert!(!s.clear_top("A"));
        assert_eq!(s, stack(&["B", "Main"]));
    }

    #[test]
    fn test_reorder_to_front() {
        let mut s = stack(&["C", "B", "A", "Main"]);
        assert!(s.reorder_to_front("A"));
        assert_eq!(s, stack(&["A", "C", "B", "Main"]));

        assert!(s.reorder_to_front("A"));
        assert_eq!(s, stack(&["A", "C", "B", "Main"]));

        assert!(!s.reorder_to_front("X"));
        assert_eq!(s, stack(&["A", "C", "B", "Main"]));
    }

    #[test]
    fn test_reorder_to_front_moves_topmost_only() {
        let mut s = stack(&["B", "A", "C", "A"]);
        assert!(s.reorder_to_front("A"));
        assert_eq!(s, stack(&["A", "B", "C", "A"]));
    }

    #[test]
    fn test_value_identity() {
        let mut s1 = ActivityStack::with_root("Main");
        s1.push("A");
        let s2 = stack(&["A", "Main"]);
        assert_eq!(s1, s2);

        let set: HashSet<ActivityStack> = [s1, s2].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(stack(&["A", "Main"]).to_string(), "[A, Main]");
        assert_eq!(ActivityStack::new().to_string(), "[]");
    }
}
