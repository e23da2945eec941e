//! Identifier and callback types shared by the graphs.
//!
//! An [`Activity`] names a screen class. It is a cheap-to-clone shared string,
//! since the same names are copied into every stack the exploration creates.
//! A [`Callback`] is one of the lifecycle methods the framework invokes on an
//! activity instance during a transition.
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// An activity identifier (fully-qualified class name).
///
/// Two activities are equal iff their names are equal.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Activity(Arc<str>);

impl Activity {
    pub fn new(name: impl AsRef<str>) -> Self {
        Activity(Arc::from(name.as_ref()))
    }

    /// Returns the class name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last segment of a dotted class name, for compact printing.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Debug for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Activity {
    fn from(name: &str) -> Self {
        Activity::new(name)
    }
}

impl From<String> for Activity {
    fn from(name: String) -> Self {
        Activity(Arc::from(name))
    }
}

impl From<&Activity> for Activity {
    fn from(activity: &Activity) -> Self {
        activity.clone()
    }
}

impl Borrow<str> for Activity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Activity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Activity {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Activity {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// A lifecycle callback of `android.app.Activity`.
///
/// [`Callback::Init`] stands for the constructor (`<init>`) and marks the
/// creation of a fresh instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Callback {
    Init,
    OnCreate,
    OnStart,
    OnRestart,
    OnResume,
    OnPause,
    OnStop,
    OnDestroy,
    OnNewIntent,
}

impl Callback {
    pub const ALL: [Callback; 9] = [
        Callback::Init,
        Callback::OnCreate,
        Callback::OnStart,
        Callback::OnRestart,
        Callback::OnResume,
        Callback::OnPause,
        Callback::OnStop,
        Callback::OnDestroy,
        Callback::OnNewIntent,
    ];

    /// Returns the Java method name.
    pub const fn name(self) -> &'static str {
        match self {
            Callback::Init => "<init>",
            Callback::OnCreate => "onCreate",
            Callback::OnStart => "onStart",
            Callback::OnRestart => "onRestart",
            Callback::OnResume => "onResume",
            Callback::OnPause => "onPause",
            Callback::OnStop => "onStop",
            Callback::OnDestroy => "onDestroy",
            Callback::OnNewIntent => "onNewIntent",
        }
    }

    /// Parses a Java method name.
    pub fn from_name(name: &str) -> Option<Self> {
        Callback::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Whether this is the constructor pseudo-callback.
    pub const fn is_init(self) -> bool {
        matches!(self, Callback::Init)
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
