/// Typed position into the slice of `$t` owned by a `PlanningProblem`, so an
/// order index cannot be used to look up a truck.
#[macro_export]
macro_rules! define_index_newtype {
    ($name:ident, $t:ident) => {
        #[derive(
            serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
        )]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            pub const fn get(self) -> usize {
                self.0
            }

            /// Every index of a collection of `len` elements, in order.
            pub fn range(len: usize) -> impl Iterator<Item = $name> {
                (0..len).map($name)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            fn from(index: $name) -> Self {
                index.0
            }
        }

        impl std::ops::Index<$name> for Vec<$t> {
            type Output = $t;

            fn index(&self, index: $name) -> &$t {
                &self.as_slice()[index]
            }
        }

        impl std::ops::IndexMut<$name> for Vec<$t> {
            fn index_mut(&mut self, index: $name) -> &mut $t {
                &mut self.as_mut_slice()[index]
            }
        }

        impl std::ops::Index<$name> for [$t] {
            type Output = $t;

            fn index(&self, index: $name) -> &$t {
                &self[index.0]
            }
        }

        impl std::ops::IndexMut<$name> for [$t] {
            fn index_mut(&mut self, index: $name) -> &mut $t {
                &mut self[index.0]
            }
        }
    };
}
