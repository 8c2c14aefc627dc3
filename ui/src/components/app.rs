use dioxus::prelude::*;

use agrimarket_common::client::MarketClient;
use agrimarket_common::crop::CropId;
use agrimarket_common::user::{UserId, UserRole};

use super::buyer_dashboard::BuyerDashboard;
use super::crop_details::CropDetailsView;
use super::farmer_dashboard::FarmerDashboard;
use super::http::FetchTransport;
use super::messaging_view::MessagingView;
use super::remote_page::{ContentLink, RemoteContent};
use super::session::{use_session, Session};
use super::shell::{use_shell_provider, InstallPrompt, OfflineIndicator, PageLoader, ToastHost};

#[derive(Clone, Debug, PartialEq, Routable)]
pub enum Route {
    #[layout(AppLayout)]
    #[route("/")]
    Home {},
    #[route("/buyer/dashboard")]
    BuyerHome {},
    #[route("/farmer/dashboard")]
    FarmerHome {},
    #[route("/messages")]
    Messages {},
    #[route("/conversation/:partner_id")]
    Conversation { partner_id: u64 },
    #[route("/crop/:id")]
    CropDetails { id: u64 },
    #[route("/:..segments")]
    RemotePage { segments: Vec<String> },
}

impl Route {
    fn dashboard(role: UserRole) -> Self {
        match role {
            UserRole::Farmer => Route::FarmerHome {},
            _ => Route::BuyerHome {},
        }
    }
}

#[component]
pub fn App() -> Element {
    use_shell_provider();
    use_context_provider(|| Signal::new(Session::from_page()));
    use_context_provider(|| MarketClient::new(FetchTransport::from_env()));

    rsx! { Router::<Route> {} }
}

#[component]
fn AppLayout() -> Element {
    let session = use_session();
    let nav = use_navigator();
    let role = session.read().acting_role();
    let dashboard = Route::dashboard(role);

    rsx! {
        div { class: "agrimarket-app",
            OfflineIndicator {}
            header { class: "navbar navbar-expand navbar-dark bg-success",
                div { class: "container",
                    a {
                        class: "navbar-brand",
                        href: "#",
                        onclick: move |evt: MouseEvent| {
                            evt.prevent_default();
                            nav.push(Route::dashboard(role));
                        },
                        i { class: "fas fa-leaf me-1" }
                        "AgriMarket"
                    }
                    nav { class: "navbar-nav",
                        Link { class: "nav-link", to: dashboard, "Dashboard" }
                        Link { class: "nav-link", to: Route::Messages {}, "Messages" }
                        ContentLink { class: "nav-link", href: "/profile", "Profile" }
                        a { class: "nav-link", href: "/logout", "Logout" }
                    }
                }
            }
            InstallPrompt {}
            main { class: "main-content",
                Outlet::<Route> {}
            }
            ToastHost {}
            PageLoader {}
        }
    }
}

/// Route component: sends the user to their role's dashboard.
#[component]
fn Home() -> Element {
    let session = use_session();
    let nav = use_navigator();
    let role = session.read().acting_role();
    use_effect(move || {
        nav.replace(Route::dashboard(role));
    });
    rsx! {}
}

#[component]
fn BuyerHome() -> Element {
    rsx! { BuyerDashboard {} }
}

/// Route component: farmers get their dashboard, everyone else the buyer one.
#[component]
fn FarmerHome() -> Element {
    let session = use_session();
    if session.read().profile.is_farmer() {
        rsx! { FarmerDashboard {} }
    } else {
        rsx! { BuyerDashboard {} }
    }
}

#[component]
fn Messages() -> Element {
    rsx! { MessagingView { initial_partner: None } }
}

/// Route component: messaging view opened on one partner.
#[component]
fn Conversation(partner_id: u64) -> Element {
    rsx! { MessagingView { initial_partner: Some(UserId(partner_id)) } }
}

#[component]
fn CropDetails(id: u64) -> Element {
    rsx! { CropDetailsView { id: CropId(id) } }
}

#[component]
fn RemotePage(segments: Vec<String>) -> Element {
    rsx! { RemoteContent { segments } }
}
