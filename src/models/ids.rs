//! Typed identifiers for server-side records.
//!
//! The quiz service hands out plain integer ids. Wrapping them keeps a
//! question id from being passed where an option id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw server id.
            #[must_use]
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Identifier of a quiz.
    QuizId
);
id_type!(
    /// Identifier of a question within a quiz.
    QuestionId
);
id_type!(
    /// Identifier of an answer option within a question.
    OptionId
);
id_type!(
    /// Identifier of one user's attempt at a quiz.
    AttemptId
);
id_type!(
    /// Identifier of a registered user.
    UserId
);
