//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the migrations exactly; regenerate with
//! `diesel print-schema` after a schema change.

diesel::table! {
    /// Operator accounts with bcrypt password hashes.
    users (id) {
        /// Primary key.
        id -> Uuid,
        /// Unique login name.
        #[max_length = 150]
        username -> Varchar,
        /// Human-readable name.
        #[max_length = 150]
        display_name -> Varchar,
        /// bcrypt hash of the password.
        #[max_length = 128]
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Office directory, auto-populated from record office fields.
    offices (id) {
        /// Primary key.
        id -> Uuid,
        /// Unique office name.
        #[max_length = 255]
        name -> Varchar,
        /// First appearance timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Register entries, numbered year-wise.
    diaries (id) {
        /// Primary key.
        id -> Uuid,
        /// Register year.
        year -> Int4,
        /// Per-year sequence; `(year, sequence)` is unique.
        sequence -> Int4,
        /// Register date.
        diary_date -> Date,
        /// Source office or sender.
        #[max_length = 255]
        received_from -> Varchar,
        /// Sender's own reference.
        #[max_length = 100]
        received_diary_no -> Varchar,
        /// Document kind label.
        #[max_length = 50]
        kind -> Varchar,
        /// Folder count.
        folders -> Int4,
        /// Subject line.
        subject -> Text,
        /// Free remarks.
        remarks -> Text,
        /// Current holder office.
        #[max_length = 255]
        marked_to -> Varchar,
        /// Date of the last movement.
        marked_date -> Nullable<Date>,
        /// Lifecycle status label.
        #[max_length = 50]
        status -> Varchar,
        /// Registering operator.
        created_by -> Uuid,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Movement log; rows cascade with their diary.
    diary_movements (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning diary.
        diary_id -> Uuid,
        /// Denormalised register year.
        year -> Int4,
        /// Denormalised register sequence.
        sequence -> Int4,
        /// Origin office.
        #[max_length = 255]
        from_office -> Varchar,
        /// Destination office.
        #[max_length = 255]
        to_office -> Varchar,
        /// Action label.
        #[max_length = 50]
        action -> Varchar,
        /// When the action happened.
        action_at -> Timestamptz,
        /// Free remarks.
        remarks -> Text,
        /// Recording operator.
        created_by -> Uuid,
        /// Row creation timestamp.
        created_on -> Timestamptz,
    }
}

diesel::joinable!(diary_movements -> diaries (diary_id));

diesel::allow_tables_to_appear_in_same_query!(users, offices, diaries, diary_movements);
