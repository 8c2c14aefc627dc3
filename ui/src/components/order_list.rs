use dioxus::prelude::*;

use agrimarket_common::currency::format_currency;
use agrimarket_common::dates::format_date;
use agrimarket_common::order::{Order, OrderAction};
use agrimarket_common::payment::{PaymentRequest, PAYMENT_SUCCESS_TEXT};
use agrimarket_common::user::UserRole;

use super::browser::clog;
use super::http::use_market;
use super::shell::use_shell;

/// Run an order-card button: a status update, or payment for `Pay`.
fn use_order_action() -> impl Fn(&Order, OrderAction) + Copy {
    let market = use_market();
    let shell = use_shell();
    let market = use_hook(move || CopyValue::new(market));

    move |order: &Order, action: OrderAction| {
        let id = order.id;
        let market = market.read().clone();
        spawn(async move {
            let result = match action.target_status() {
                Some(status) => market
                    .update_order_status(id, status)
                    .await
                    .map(|resp| resp.message_or("Order status updated successfully")),
                None => market
                    .initiate_payment(&PaymentRequest::mpesa(id))
                    .await
                    .map(|resp| {
                        clog(&format!(
                            "[AGRI] Order {id} paid, transaction {}",
                            resp.payload.transaction_id
                        ));
                        PAYMENT_SUCCESS_TEXT.to_string()
                    }),
            };
            match result {
                Ok(message) => {
                    shell.success(message);
                    shell.request_refresh();
                }
                Err(e) => {
                    let fallback = if action == OrderAction::Pay {
                        "Payment failed"
                    } else {
                        "Failed to update order status"
                    };
                    shell.error(e.toast_text(fallback));
                }
            }
        });
    }
}

#[component]
pub fn OrderList(orders: Vec<Order>, role: UserRole) -> Element {
    let run = use_order_action();

    if orders.is_empty() {
        let message = match role {
            UserRole::Farmer => "No orders received yet.",
            _ => "You haven't placed any orders yet.",
        };
        return rsx! {
            div { class: "text-center py-4 empty-state",
                i { class: "fas fa-shopping-cart fa-3x text-muted mb-3" }
                p { class: "text-muted", "{message}" }
            }
        };
    }

    rsx! {
        div { class: "order-list",
            for order in orders.into_iter() {
                {
                    let (counterpart_label, counterpart) = order.counterpart(role);
                    let counterpart = counterpart.to_string();
                    let total = format_currency(order.total_amount);
                    let created = format_date(&order.created_at);
                    let delivery = order.delivery().map(format_date);
                    let badge_class = order.status.badge_class();
                    let badge = order.status.badge_label();
                    let actions = order.actions(role);
                    rsx! {
                        div { class: "card order-card mb-3",
                            key: "{order.id}",
                            div { class: "card-body d-flex justify-content-between align-items-start",
                                div {
                                    h6 { class: "mb-1", "{order.crop_name}" }
                                    p { class: "mb-1 small", "{counterpart_label}: {counterpart}" }
                                    p { class: "mb-1 small", "Quantity: {order.quantity}" }
                                    p { class: "mb-1 small", "Total: {total}" }
                                    p { class: "mb-1 small text-muted", "Ordered: {created}" }
                                    if let Some(date) = delivery {
                                        p { class: "mb-1 small text-muted", "Delivery: {date}" }
                                    }
                                }
                                div { class: "text-end",
                                    span { class: "{badge_class}", "{badge}" }
                                    div { class: "mt-2 order-actions",
                                        for action in actions.iter().copied() {
                                            {
                                                let order = order.clone();
                                                rsx! {
                                                    button {
                                                        key: "{action.label()}",
                                                        class: "{action.button_class()}",
                                                        onclick: move |_| run(&order, action),
                                                        "{action.label()}"
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
