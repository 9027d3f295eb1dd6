//! Dynamic argument lists

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Deref;

/// Positional arguments passed to every handler of an event.
///
/// This is the default argument type of [`Event`](crate::Event). Build it
/// with the [`args!`](crate::args) macro:
///
/// ```rust
/// use unobservable_events::args;
///
/// let args = args![1, "two", 3.0];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[1], "two");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(Vec<Value>);

impl Args {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an argument
    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    /// Consume into the underlying values
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl Deref for Args {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build an [`Args`] list from serializable expressions.
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::from(vec![$($crate::__private::serde_json::json!($value)),+])
    };
}
