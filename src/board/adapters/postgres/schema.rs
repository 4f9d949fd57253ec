//! Diesel schema for board persistence.
//!
//! Every collection is stored as documents: a stable identifier column
//! for upsert and reconciliation, with the full aggregate serialized
//! into the payload. Write-through replaces collections wholesale, so
//! no per-field columns are needed.

diesel::table! {
    /// User account documents.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Serialized user account.
        payload -> Jsonb,
    }
}

diesel::table! {
    /// Active task documents, embedded comments and history included.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Serialized task aggregate.
        payload -> Jsonb,
    }
}

diesel::table! {
    /// Notification documents.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Serialized notification.
        payload -> Jsonb,
    }
}

diesel::table! {
    /// Archived task documents.
    archived_tasks (id) {
        /// Identifier of the archived task.
        id -> Uuid,
        /// Serialized archive snapshot.
        payload -> Jsonb,
    }
}

diesel::table! {
    /// Sticky note documents.
    sticky_notes (id) {
        /// Sticky note identifier.
        id -> Uuid,
        /// Serialized sticky note.
        payload -> Jsonb,
    }
}
