use dioxus::prelude::*;

use agrimarket_common::currency::format_currency;
use agrimarket_common::dates::format_date;
use agrimarket_common::market::{MarketPrice, PriceQuery, NO_PRICE_DATA};

use super::http::use_market;
use super::shell::use_shell;

/// Price lookup for one of `crop_names`. Nothing is fetched until a crop is
/// chosen.
#[component]
pub fn MarketPrices(crop_names: Vec<String>) -> Element {
    let market = use_market();
    let shell = use_shell();
    let mut selected = use_signal(String::new);

    let prices = use_resource(move || {
        let market = market.clone();
        let crop = selected();
        async move {
            if crop.is_empty() {
                return None;
            }
            match market.market_prices(&PriceQuery::for_crop(crop)).await {
                Ok(prices) => Some(prices),
                Err(e) => {
                    shell.error(e.toast_text("Failed to load market prices"));
                    Some(Vec::new())
                }
            }
        }
    });

    let rows: Option<Vec<MarketPrice>> = prices.read().clone().flatten();

    rsx! {
        div { class: "card market-prices mb-4",
            div { class: "card-header", h5 { class: "mb-0", "Market Prices" } }
            div { class: "card-body",
                select {
                    class: "form-select mb-3",
                    value: "{selected}",
                    onchange: move |evt| selected.set(evt.value()),
                    option { value: "", "Select a crop" }
                    for name in crop_names {
                        option { value: "{name}", "{name}" }
                    }
                }
                match rows {
                    None => rsx! {},
                    Some(rows) if rows.is_empty() => rsx! {
                        p { class: "text-muted", "{NO_PRICE_DATA}" }
                    },
                    Some(rows) => rsx! {
                        table { class: "table table-sm",
                            thead {
                                tr {
                                    th { "Location" }
                                    th { "Average Price" }
                                    th { "Date" }
                                    th { "Source" }
                                }
                            }
                            tbody {
                                for price in rows {
                                    tr {
                                        td { "{price.location}" }
                                        td { "{format_currency(price.average_price)}" }
                                        td { "{format_date(&price.date)}" }
                                        td { "{price.source_label()}" }
                                    }
                                }
                            }
                        }
                    },
                }
            }
        }
    }
}
