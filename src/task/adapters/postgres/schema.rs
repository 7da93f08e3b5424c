//! Diesel schema for task tracking persistence.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Store-assigned identity.
        id -> Int8,
        /// Unique, normalized email address.
        #[max_length = 320]
        email -> Varchar,
        /// Canonical role name.
        #[max_length = 16]
        role -> Varchar,
        /// Opaque credential hash.
        credential_hash -> Text,
    }
}

diesel::table! {
    /// Projects owned by managers.
    projects (id) {
        /// Store-assigned identity.
        id -> Int8,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional project description.
        #[max_length = 1000]
        description -> Nullable<Varchar>,
        /// Owning user.
        owner_id -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks scoped to a project.
    tasks (id) {
        /// Store-assigned identity.
        id -> Int8,
        /// Task title.
        title -> Text,
        /// Optional task description.
        description -> Nullable<Text>,
        /// Canonical status name.
        #[max_length = 16]
        status -> Varchar,
        /// Canonical priority name.
        #[max_length = 16]
        priority -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Owning project.
        project_id -> Int8,
        /// Optional assigned user.
        assigned_user_id -> Nullable<Int8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(projects -> users (owner_id));
diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(users, projects, tasks);
