//! Table and column names in the Supabase project.

pub mod profile {
    pub const TABLE: &str = "profile";

    pub const EMAIL: &str = "email";
    pub const ONBOARD: &str = "onboard";
}

pub mod feedback {
    pub const TABLE: &str = "feedback";
}

pub mod reports {
    pub const TABLE: &str = "reports";

    pub const ID: &str = "id";
}

pub mod report_likes {
    pub const TABLE: &str = "report_likes";

    pub const REPORT_ID: &str = "report_id";
    pub const COUNTERS: &str = "likes, dislikes, user_liked";
}
