/// Sensitive is a New Type that keeps secrets such as connection strings and access keys from
/// being displayed unintentionally in logs, reports or debug output. It wraps the original value
/// and overrides the Display and Debug traits.
///
/// The original value is reachable by derefing the wrapper.
pub mod sensitive {
    use serde::{Deserialize, Serialize};

    use std::fmt::{Debug, Display, Formatter};
    use std::ops::Deref;
    use std::str::FromStr;

    pub(crate) const MASK: &str = "******";

    #[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Sensitive<T>(T);

    impl<T> Sensitive<T> {
        pub fn new(value: T) -> Self {
            Self(value)
        }

        pub fn into_inner(self) -> T {
            self.0
        }
    }

    impl<T> Display for Sensitive<T> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", MASK)
        }
    }

    impl<T> Debug for Sensitive<T> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_tuple("Sensitive").field(&MASK).finish()
        }
    }

    impl<T> From<T> for Sensitive<T> {
        fn from(t: T) -> Self {
            Self(t)
        }
    }

    impl From<&str> for Sensitive<String> {
        fn from(s: &str) -> Self {
            Self(s.to_string())
        }
    }

    impl<T: FromStr> FromStr for Sensitive<T> {
        type Err = T::Err;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            T::from_str(s).map(Sensitive)
        }
    }

    impl<T> Deref for Sensitive<T> {
        type Target = T;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }

}
