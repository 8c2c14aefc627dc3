#![cfg(feature = "api-tests")]

//! Cumulative marketplace flow against a live server.
//!
//! Steps run in order inside one `#[tokio::test]` and each relies on the
//! state the previous ones left behind. Point `AGRIMARKET_TEST_URL` at the
//! server before running with `--features api-tests`.

use std::time::Duration;

use agrimarket_common::api::ApiError;
use agrimarket_common::crop::{CropFilters, CropId};
use agrimarket_common::endpoints;
use agrimarket_common::form::{SubmitOutcome, NETWORK_FAILURE_TEXT};
use agrimarket_common::market::PriceQuery;
use agrimarket_common::message::OutgoingMessage;
use agrimarket_common::order::{OrderAction, OrderStatus};
use agrimarket_common::payment::{total_with_fee, PaymentRequest};
use agrimarket_common::user::UserRole;

use agrimarket_api_integration::harness::TestHarness;
use agrimarket_api_integration::{connect, make_crop_form, make_order_form, tiny_png, wait_for};

const TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cumulative_market_flow() {
    let h = TestHarness::setup().await;
    let crop_name = format!("Sukuma {}", h.farmer.username);

    println!("── Step 1: farmer lists a crop with a photo ──");
    let mut form = make_crop_form(&crop_name, 120.0, 45.0);
    form.image = Some(tiny_png());
    assert!(form.validate().is_ok());
    let resp = h.farmer.client.add_crop(&form).await.expect("add crop");
    assert!(resp.success);
    assert_eq!(resp.message.as_deref(), Some("Crop added successfully"));

    let listed = h.farmer.listed_crops().await;
    assert_eq!(listed.len(), 1, "farmer should see exactly one own listing");
    let crop = listed[0].clone();
    assert_eq!(crop.name, crop_name);
    assert_eq!(crop.county.as_deref(), Some(h.county.as_str()));
    assert!(crop.image_url().is_some(), "uploaded image should be stored");
    let farmer_id = crop.farmer_id;

    let dashboard = h
        .farmer
        .client
        .load_farmer_dashboard(Some(farmer_id))
        .await
        .expect("farmer dashboard");
    assert!(dashboard.crops.iter().all(|c| c.farmer_id == farmer_id));
    assert_eq!(dashboard.stats().active_crops, dashboard.crops.len());
    assert_eq!(dashboard.stats().total_orders, 0);

    println!("── Step 2: buyer filters see the listing ──");
    let by_search = CropFilters {
        search: crop_name.clone(),
        ..CropFilters::default()
    };
    let found = h.buyer.client.list_crops(&by_search).await.expect("search");
    assert!(found.iter().any(|c| c.id == crop.id));

    let too_cheap = CropFilters {
        search: crop_name.clone(),
        max_price: "10".to_string(),
        ..CropFilters::default()
    };
    let none = h.buyer.client.list_crops(&too_cheap).await.expect("max price");
    assert!(none.is_empty(), "price ceiling below 45 should hide the crop");

    let wrong_category = CropFilters {
        search: crop_name.clone(),
        category: "Fruits".to_string(),
        ..CropFilters::default()
    };
    let none = h
        .buyer
        .client
        .list_crops(&wrong_category)
        .await
        .expect("category");
    assert!(none.is_empty());

    println!("── Step 3: crop details and farmer contact ──");
    let details = h.buyer.client.crop_details(crop.id).await.expect("details");
    assert_eq!(details.farmer_id, farmer_id);
    assert_eq!(details.price_per_unit, 45.0);
    let contact = h.buyer.client.contact_farmer(crop.id).await.expect("contact");
    assert_eq!(contact.farmer_id, farmer_id);
    assert_eq!(contact.farmer_name, h.farmer.username);
    assert_eq!(contact.contact_url, Some(details.contact_path()));

    let missing = h.buyer.client.crop_details(CropId(999_999_999)).await;
    assert!(matches!(missing, Err(ApiError::Http { status: 404, .. })));

    println!("── Step 4: buyer places an order ──");
    let tomorrow = (chrono::Local::now().date_naive() + chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    let order_form = make_order_form(crop.id, 10.0, &tomorrow);
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert!(order_form.validate(details.quantity, &today).is_ok());
    let placed = h
        .buyer
        .client
        .place_order(&order_form)
        .await
        .expect("place order");
    assert!(placed.success);
    assert!(placed.payload.order_id.is_some());

    let too_many = make_order_form(crop.id, 500.0, &tomorrow);
    let rejected = h.buyer.client.place_order(&too_many).await;
    assert_eq!(
        rejected.err(),
        Some(ApiError::Rejected {
            message: Some("Insufficient quantity available".to_string())
        })
    );

    let buyer_orders = h.buyer.client.list_orders().await.expect("buyer orders");
    let order = buyer_orders
        .iter()
        .find(|o| o.crop_name == crop_name)
        .cloned()
        .expect("order visible to buyer");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 450.0);
    assert!(order.actions(UserRole::Buyer).is_empty());

    println!("── Step 5: farmer accepts ──");
    let farmer_orders = h.farmer.client.list_orders().await.expect("farmer orders");
    let incoming = farmer_orders
        .iter()
        .find(|o| o.id == order.id)
        .expect("order visible to farmer");
    assert_eq!(incoming.buyer_name, h.buyer.username);
    assert_eq!(
        incoming.actions(UserRole::Farmer),
        &[OrderAction::Accept, OrderAction::Reject]
    );
    let target = OrderAction::Accept.target_status().expect("accept has a status");
    let resp = h
        .farmer
        .client
        .update_order_status(order.id, target)
        .await
        .expect("accept");
    assert_eq!(resp.message_or(""), "Order status updated successfully");

    let buyer = &h.buyer.client;
    let order_id = order.id;
    let accepted = wait_for(
        || async move {
            buyer
                .list_orders()
                .await
                .ok()?
                .into_iter()
                .find(|o| o.id == order_id && o.status == OrderStatus::Accepted)
        },
        TIMEOUT,
    )
    .await
    .expect("buyer should see the order accepted");
    assert_eq!(accepted.actions(UserRole::Buyer), &[OrderAction::Pay]);

    println!("── Step 6: buyer pays ──");
    let receipt = h
        .buyer
        .client
        .initiate_payment(&PaymentRequest::mpesa(order.id))
        .await
        .expect("payment");
    assert!(receipt.success);
    assert!(!receipt.payload.transaction_id.is_empty());
    assert!((receipt.payload.total_amount - total_with_fee(order.total_amount)).abs() < 1e-6);

    let paid = h.buyer.client.list_orders().await.expect("orders after payment");
    let paid = paid.iter().find(|o| o.id == order.id).expect("paid order");
    assert_eq!(paid.status, OrderStatus::Paid);
    assert!(paid.actions(UserRole::Buyer).is_empty());

    let stranger = h
        .farmer
        .client
        .initiate_payment(&PaymentRequest::mpesa(order.id))
        .await;
    assert_eq!(
        stranger.err(),
        Some(ApiError::Rejected {
            message: Some("Access denied".to_string())
        })
    );

    println!("── Step 7: messaging round trip ──");
    assert!(OutgoingMessage::compose(farmer_id, "   ", None).is_none());
    let hello = OutgoingMessage::compose(
        farmer_id,
        &format!("Is the {crop_name} still fresh?\nhttps://example.test/photo"),
        Some(order.id),
    )
    .expect("non-empty message");
    let resp = h.buyer.client.send_message(&hello).await.expect("send");
    assert!(resp.success);

    let farmer = &h.farmer.client;
    let buyer_name = h.buyer.username.as_str();
    let conversation = wait_for(
        || async move {
            farmer
                .conversations()
                .await
                .ok()?
                .into_iter()
                .find(|c| c.partner_name == buyer_name)
        },
        TIMEOUT,
    )
    .await
    .expect("farmer should see the buyer's conversation");
    assert!(conversation.has_unread());
    assert!(conversation.preview().len() <= 53);

    let thread = h
        .farmer
        .client
        .thread(conversation.partner_id)
        .await
        .expect("thread");
    let last = thread.last().expect("at least one message");
    assert!(!last.is_mine);
    assert_eq!(last.content, hello.content);
    assert!(last.segments().len() >= 3, "text, line break and link");

    let reread = h
        .farmer
        .client
        .conversations()
        .await
        .expect("conversations after reading");
    let reread = reread
        .iter()
        .find(|c| c.partner_id == conversation.partner_id)
        .expect("conversation still listed");
    assert!(!reread.has_unread(), "opening the thread marks it read");

    println!("── Step 8: server-side rejections surface as Rejected ──");
    let result = h.buyer.client.add_crop(&make_crop_form("Not mine", 1.0, 1.0)).await;
    assert_eq!(
        result.err(),
        Some(ApiError::Rejected {
            message: Some("Only farmers can add crops".to_string())
        })
    );
    let outcome = SubmitOutcome::from_result(
        h.farmer
            .client
            .submit(endpoints::place_order(&order_form))
            .await,
    );
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            message: "Only buyers can place orders".to_string()
        }
    );

    println!("── Step 9: reference data ──");
    let counties = h.buyer.client.locations().await.expect("locations");
    tracing::info!("{} counties known", counties.len());
    let prices = h
        .farmer
        .client
        .market_prices(&PriceQuery::for_crop("Maize"))
        .await
        .expect("market prices");
    assert!(prices.iter().all(|p| p.average_price >= 0.0));
}

#[tokio::test]
async fn login_reopens_a_session() {
    let h = TestHarness::setup().await;

    let fresh = connect(&h.base_url);
    let resp = fresh
        .login(&h.farmer.username, &h.farmer.username)
        .await
        .expect("login");
    assert!(resp.success);
    assert_eq!(resp.redirect.as_deref(), Some("/farmer/dashboard"));
    fresh.list_orders().await.expect("session cookie should authorize");

    let wrong = connect(&h.base_url)
        .login(&h.farmer.username, "not the password")
        .await;
    assert_eq!(
        wrong.err(),
        Some(ApiError::Rejected {
            message: Some("Invalid username or password".to_string())
        })
    );
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure() {
    tracing_subscriber::fmt::try_init().ok();

    let client = connect("http://127.0.0.1:9");
    let result = client.list_orders().await;
    assert!(matches!(result, Err(ApiError::Network(_))));

    let outcome = SubmitOutcome::from_result(client.submit(endpoints::list_orders()).await);
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            message: NETWORK_FAILURE_TEXT.to_string()
        }
    );
}
