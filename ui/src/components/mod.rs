pub mod ajax_form;
pub mod app;
pub mod browser;
pub mod buyer_dashboard;
pub mod config;
pub mod crop_card;
pub mod crop_details;
pub mod farmer_dashboard;
pub mod http;
pub mod image_input;
pub mod market_prices;
pub mod messaging_view;
pub mod order_list;
pub mod order_modal;
pub mod remote_page;
pub mod session;
pub mod shell;
