use dioxus::prelude::*;

use agrimarket_common::user::{UserProfile, UserRole};

use super::browser::body_data;

/// Who is logged in, as the host page describes it on `<body>`.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub profile: UserProfile,
}

impl Session {
    pub fn from_page() -> Self {
        let profile = UserProfile::from_dataset(body_data);
        tracing::debug!(
            "Session role={:?} user={:?}",
            profile.role,
            profile.user_id
        );
        Self { profile }
    }

    /// Role for order actions; anyone not known to be a farmer acts as a buyer.
    pub fn acting_role(&self) -> UserRole {
        if self.profile.is_farmer() {
            UserRole::Farmer
        } else {
            UserRole::Buyer
        }
    }
}

pub fn use_session() -> Signal<Session> {
    use_context::<Signal<Session>>()
}
