//! Transition semantics: successor stacks and lifecycle callback sequences.
//!
//! A [`TransitionPolicy`] answers two questions for "the top activity of
//! `current` launches `target` with `config`":
//!
//! - what does the back-stack look like afterwards ([`construct_new_stack`]), and
//! - which lifecycle callbacks run, in which order ([`method_sequence`]).
//!
//! [`DefaultTransitionPolicy`] implements the framework's behavior for every
//! supported flag combination. [`NaiveTransitionPolicy`] ignores all flags and
//! always pushes; it only exists to be compared against the default one.
//!
//! # Callback sequences of the default policy
//!
//! With `a` the current top and `b` the target:
//!
//! | Launch | Sequence |
//! |--------|----------|
//! | standard (or singleTop, `a != b`) | `a.onPause, b.<init>, b.onCreate, b.onStart, b.onResume, a.onStop` |
//! | singleTop, `a == b` | `a.onPause, a.onNewIntent, a.onResume` |
//! | clearTop+standard, `a == b` | standard sequence, then `a.onDestroy` |
//! | clearTop+singleTop, `a == b` | `a.onPause, a.onNewIntent, a.onResume` |
//! | clearTop, `b` below the top | destroy the activities between (bottom first), `a.onPause`, recreate (standard) or resume (singleTop) `b`, `a.onStop, a.onDestroy` |
//! | reorderToFront, `a == b` | `a.onPause, a.onNewIntent, a.onResume` |
//! | reorderToFront, `b` below the top | `a.onPause, b.onNewIntent, b.onRestart, b.onStart, b.onResume, a.onStop` |
//!
//! A clear-top or reorder-to-front launch whose target is not on the stack
//! degrades to the standard sequence.
//!
//! [`construct_new_stack`]: TransitionPolicy::construct_new_stack
//! [`method_sequence`]: TransitionPolicy::method_sequence

use log::debug;

use crate::error::{TransitionError, TransitionResult};
use crate::launch::LaunchConfiguration;
use crate::sequence::MethodSequence;
use crate::stack::ActivityStack;
use crate::types::{Activity, Callback};

/// Semantics of a launch transition.
///
/// Implementations are stateless; `current` is never modified.
pub trait TransitionPolicy {
    /// Short name for reports.
    fn name(&self) -> &'static str;

    /// Returns the stack after the top of `current` launches `target` with `config`.
    fn construct_new_stack(
        &self,
        current: &ActivityStack,
        config: LaunchConfiguration,
        target: &Activity,
    ) -> TransitionResult<ActivityStack>;

    /// Returns the lifecycle callbacks executed by the same transition.
    fn method_sequence(
        &self,
        current: &ActivityStack,
        config: LaunchConfiguration,
        target: &Activity,
    ) -> TransitionResult<MethodSequence>;
}

impl<P: TransitionPolicy + ?Sized> TransitionPolicy for &P {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn construct_new_stack(
        &self,
        current: &ActivityStack,
        config: LaunchConfiguration,
        target: &Activity,
    ) -> TransitionResult<ActivityStack> {
        (**self).construct_new_stack(current, config, target)
    }

    fn method_sequence(
        &self,
        current: &ActivityStack,
        config: LaunchConfiguration,
        target: &Activity,
    ) -> TransitionResult<MethodSequence> {
        (**self).method_sequence(current, config, target)
    }
}

/// `a` starts a fresh instance of `b`.
pub(crate) fn standard_sequence(a: &Activity, b: &Activity) -> MethodSequence {
    MethodSequence::new()
        .then(a, Callback::OnPause)
        .then_all(b, &[Callback::Init, Callback::OnCreate, Callback::OnStart, Callback::OnResume])
        .then(a, Callback::OnStop)
}

/// The running instance `a` receives the new intent.
pub(crate) fn single_top_sequence(a: &Activity) -> MethodSequence {
    MethodSequence::new().then_all(a, &[Callback::OnPause, Callback::OnNewIntent, Callback::OnResume])
}

/// Launch mode part of a configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Mode {
    Standard,
    SingleTop,
}

fn launch_mode(config: LaunchConfiguration) -> TransitionResult<Mode> {
    if config.is_invalid() || config.is_finish() {
        return Err(TransitionError::InvalidConfiguration { config });
    }
    match (config.is_standard(), config.is_single_top()) {
        (true, false) => Ok(Mode::Standard),
        (false, true) => Ok(Mode::SingleTop),
        _ => Err(TransitionError::MalformedConfiguration { config }),
    }
}

/// Android-faithful transition semantics.
#[derive(Debug, Default, Copy, Clone)]
pub struct DefaultTransitionPolicy;

impl TransitionPolicy for DefaultTransitionPolicy {
    fn name(&self) -> &'static str {
        "default"
    }

    fn construct_new_stack(
        &self,
        current: &ActivityStack,
        config: LaunchConfiguration,
        target: &Activity,
    ) -> TransitionResult<ActivityStack> {
        let mode = launch_mode(config)?;
        let top = current.top().ok_or(TransitionError::EmptyStack)?;
        let mut stack = current.clone();

        if config.is_clear_top() {
            // Reorder-to-front is ignored under clear-top. The launch mode only
            // matters for the callbacks: the resulting stack shape is the same.
            if !stack.clear_top(target.as_str()) {
                stack.push(target);
            }
        } else if config.is_reorder_to_front() {
            if !stack.reorder_to_front(target.as_str()) {
                stack.push(target);
            }
        } else if mode == Mode::SingleTop && top == target {
            // The top instance is reused.
        } else {
            stack.push(target);
        }

        Ok(stack)
    }

    fn method_sequence(
        &self,
        current: &ActivityStack,
        config: LaunchConfiguration,
        target: &Activity,
    ) -> TransitionResult<MethodSequence> {
        let mode = launch_mode(config)?;
        let a = current.top().ok_or(TransitionError::EmptyStack)?;
        let b = target;

        if config.is_clear_top() {
            if a == b {
                return Ok(match mode {
                    Mode::Standard => standard_sequence(a, b).then(a, Callback::OnDestroy),
                    Mode::SingleTop => single_top_sequence(a),
                });
            }

            let Some(found) = current.find(b.as_str()) else {
                debug!("clearTop target {} not on {}, plain launch", b, current);
                return Ok(standard_sequence(a, b));
            };

            // Destroy everything strictly between the top and the target,
            // starting from the one right above the target.
            let mut seq = MethodSequence::new();
            for i in (1..found).rev() {
                if let Some(c) = current.get(i) {
                    seq = seq.then(c, Callback::OnDestroy);
                }
            }
            seq = seq.then(a, Callback::OnPause);
            seq = match mode {
                Mode::Standard => seq.then_all(
                    b,
                    &[
                        Callback::OnDestroy,
                        Callback::Init,
                        Callback::OnCreate,
                        Callback::OnStart,
                        Callback::OnResume,
                    ],
                ),
                Mode::SingleTop => seq.then_all(
                    b,
                    &[Callback::OnNewIntent, Callback::OnRestart, Callback::OnStart, Callback::OnResume],
                ),
            };
            return Ok(seq.then_all(a, &[Callback::OnStop, Callback::OnDestroy]));
        }

        if config.is_reorder_to_front() {
            if a == b {
                return Ok(single_top_sequence(a));
            }
            if !current.contains(b.as_str()) {
                debug!("reorderToFront target {} not on {}, plain launch", b, current);
                return Ok(standard_sequence(a, b));
            }
            return Ok(MethodSequence::new()
                .then(a, Callback::OnPause)
                .then_all(
                    b,
                    &[Callback::OnNewIntent, Callback::OnRestart, Callback::OnStart, Callback::OnResume],
                )
                .then(a, Callback::OnStop));
        }

        Ok(match mode {
            Mode::SingleTop if a == b => single_top_sequence(a),
            _ => standard_sequence(a, b),
        })
    }
}

/// Flag-agnostic semantics: every launch pushes a fresh instance.
///
/// Stacks grow without bound on navigation cycles, so runs with this policy
/// rely entirely on the K-limit.
#[derive(Debug, Default, Copy, Clone)]
pub struct NaiveTransitionPolicy;

impl TransitionPolicy for NaiveTransitionPolicy {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn construct_new_stack(
        &self,
        current: &ActivityStack,
        _config: LaunchConfiguration,
        target: &Activity,
    ) -> TransitionResult<ActivityStack> {
        let mut stack = current.clone();
        stack.push(target);
        Ok(stack)
    }

    fn method_sequence(
        &self,
        current: &ActivityStack,
        _config: LaunchConfiguration,
        target: &Activity,
    ) -> TransitionResult<MethodSequence> {
        let a = current.top().ok_or(TransitionError::EmptyStack)?;
        Ok(standard_sequence(a, target))
    }
}
