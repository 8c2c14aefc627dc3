use agrimarket_common::crop::{Crop, CropFilters};
use agrimarket_common::user::UserRole;

use crate::{api_url, connect, register_request, unique_username, TestClient};

/// One logged-in marketplace user with their own cookie jar.
pub struct Participant {
    pub username: String,
    pub role: UserRole,
    pub client: TestClient,
}

impl Participant {
    /// Register a fresh account, which also opens its session.
    pub async fn register(base_url: &str, prefix: &str, role: UserRole, county: &str) -> Self {
        let username = unique_username(prefix);
        let client = connect(base_url);
        let resp = client
            .submit(register_request(&username, role, county))
            .await
            .unwrap_or_else(|e| panic!("Registering {username} failed: {e}"));
        assert!(resp.success, "Registration of {username} rejected: {:?}", resp.message);
        assert_eq!(resp.redirect.as_deref(), Some(role.dashboard_path()));
        tracing::info!("Registered {role} {username}");
        Self {
            username,
            role,
            client,
        }
    }

    /// The listings this participant put up, found by farmer name.
    pub async fn listed_crops(&self) -> Vec<Crop> {
        self.client
            .list_crops(&CropFilters::default())
            .await
            .expect("list crops")
            .into_iter()
            .filter(|c| c.farmer_name == self.username)
            .collect()
    }
}

/// A farmer and a buyer in the same county, both registered on the server
/// under test.
pub struct TestHarness {
    pub base_url: String,
    pub county: String,
    pub farmer: Participant,
    pub buyer: Participant,
}

impl TestHarness {
    pub async fn setup() -> Self {
        tracing_subscriber::fmt::try_init().ok();

        let base_url = api_url();
        let county = "Nakuru".to_string();
        tracing::info!("Running against {base_url}");

        let farmer = Participant::register(&base_url, "farmer", UserRole::Farmer, &county).await;
        let buyer = Participant::register(&base_url, "buyer", UserRole::Buyer, &county).await;

        Self {
            base_url,
            county,
            farmer,
            buyer,
        }
    }
}
