use slotmap::new_key_type;

new_key_type! {
    /// Opaque, stable identifier for a node stored in the [`Tree`](crate::Tree)
    /// arena.
    pub struct NodeId;
}
