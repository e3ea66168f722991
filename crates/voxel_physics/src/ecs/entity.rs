//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier.
    ///
    /// Generation-checked: a handle to a despawned entity never aliases a
    /// newer entity that reuses its slot.
    pub struct Entity;
}
