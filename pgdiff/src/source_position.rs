use serde::{Deserialize, Serialize};

/// Where an object was defined in its dump, counted in statements.
///
/// A funky type that is always equal to all other positions, so two objects that only differ
/// in where they were defined still compare equal. Use [SourcePosition::index] to order by it.
#[derive(Eq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourcePosition {
    value: usize,
}

impl SourcePosition {
    pub fn new(value: usize) -> Self {
        SourcePosition { value }
    }

    /// The index of the statement that defined the object.
    pub fn index(&self) -> usize {
        self.value
    }

    /// Checks if the value of the position is equal to the value of another position
    pub fn actual_eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq for SourcePosition {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}
