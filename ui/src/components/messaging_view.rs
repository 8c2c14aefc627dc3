use dioxus::prelude::*;

use agrimarket_common::dates::format_date_time;
use agrimarket_common::message::{
    ActiveConversation, Conversation, Message, MessageRefresh, MessageTemplate, OutgoingMessage,
    Segment, ShownThread, QUICK_RESPONSES,
};
use agrimarket_common::user::UserId;

use super::browser;
use super::config::poll_interval;
use super::http::use_market;
use super::shell::use_shell;

/// Conversation list plus the active thread, re-fetched on a fixed timer
/// while a partner is selected. The timer dies with the component.
#[component]
pub fn MessagingView(initial_partner: ReadSignal<Option<UserId>>) -> Element {
    let market = use_market();
    let shell = use_shell();
    let mut active = use_signal(|| ActiveConversation::new(initial_partner()));
    let mut refresh = use_signal(MessageRefresh::default);
    let list_gen = use_memo(move || refresh.read().list);
    let thread_gen = use_memo(move || refresh.read().thread);
    let mut shown = use_signal(ShownThread::default);
    let mut draft = use_signal(String::new);
    let mut crop_name = use_signal(String::new);
    let mut sending = use_signal(|| false);

    // Route changes re-seed the selection.
    use_effect(move || {
        if let Some(partner) = initial_partner() {
            active.write().select(partner);
        }
    });

    let list_market = market.clone();
    let conversations = use_resource(move || {
        let market = list_market.clone();
        let _generation = list_gen();
        async move {
            market.conversations().await.unwrap_or_else(|e| {
                shell.error(e.toast_text("Failed to load conversations"));
                Vec::new()
            })
        }
    });

    let thread_market = market.clone();
    let _thread = use_resource(move || {
        let market = thread_market.clone();
        let partner = active.read().partner();
        let _generation = thread_gen();
        async move {
            let Some(partner) = partner else {
                return;
            };
            match market.thread(partner).await {
                Ok(messages) => shown.write().loaded(partner, messages),
                Err(e) => {
                    tracing::warn!("Thread {partner} fetch failed: {e}");
                    shell.error(e.toast_text("Failed to load messages"));
                }
            }
        }
    });

    use_future(move || async move {
        let period = poll_interval();
        loop {
            browser::sleep(period).await;
            if active.peek().should_poll() {
                refresh.write().poll();
            }
        }
    });

    let send_market = use_hook(|| CopyValue::new(market.clone()));
    let mut send = move || {
        if *sending.peek() {
            return;
        }
        let Some(partner) = active.peek().partner() else {
            return;
        };
        let Some(message) = OutgoingMessage::compose(partner, &draft.peek(), None) else {
            return;
        };
        let market = send_market.read().clone();
        sending.set(true);
        spawn(async move {
            match market.send_message(&message).await {
                Ok(_) => {
                    draft.set(String::new());
                    refresh.write().message_sent();
                }
                Err(e) => shell.error(e.toast_text("Failed to send message")),
            }
            sending.set(false);
        });
    };

    let list: Vec<Conversation> = conversations.read().clone().unwrap_or_default();
    let selected = active.read().partner();
    let messages: Option<Vec<Message>> =
        shown.read().for_partner(selected).map(<[Message]>::to_vec);
    let header = active.read().header_name(&list).to_string();

    rsx! {
        div { class: "messaging-view container py-4",
            div { class: "row",
                div { class: "col-md-4 conversation-list",
                    h4 { "Messages" }
                    if list.is_empty() {
                        p { class: "text-muted", "No conversations yet." }
                    }
                    div { class: "list-group",
                        for conv in list.iter() {
                            {
                                let partner = conv.partner_id;
                                let class = if selected == Some(partner) {
                                    "list-group-item list-group-item-action active"
                                } else {
                                    "list-group-item list-group-item-action"
                                };
                                rsx! {
                                    button {
                                        key: "{partner}",
                                        class: "{class}",
                                        onclick: move |_| active.write().select(partner),
                                        div { class: "d-flex justify-content-between",
                                            span {
                                                strong { "{conv.partner_name}" }
                                                if let Some(role) = conv.partner_role() {
                                                    small { class: "text-muted ms-1", "({role})" }
                                                }
                                            }
                                            if conv.has_unread() {
                                                span { class: "badge bg-danger", "{conv.unread_count}" }
                                            }
                                        }
                                        small { class: "d-block text-truncate", "{conv.preview()}" }
                                        small { class: "text-muted", "{format_date_time(&conv.last_message_time)}" }
                                    }
                                }
                            }
                        }
                    }
                }

                div { class: "col-md-8 conversation",
                    if selected.is_none() {
                        div { class: "text-center text-muted py-5",
                            i { class: "fas fa-comments fa-3x mb-3" }
                            p { "Select a conversation to start messaging" }
                        }
                    } else {
                        div { class: "card",
                            div { class: "card-header", h5 { class: "mb-0 conversation-header", "{header}" } }
                            div { class: "card-body messages-container",
                                match messages {
                                    None => rsx! {
                                        div { class: "text-center py-3",
                                            div { class: "spinner-border text-success", role: "status" }
                                        }
                                    },
                                    Some(messages) => rsx! {
                                        for msg in messages {
                                            MessageBubble { key: "{msg.id.0}", msg }
                                        }
                                    },
                                }
                            }
                            div { class: "card-footer",
                                div { class: "quick-responses mb-2",
                                    for reply in QUICK_RESPONSES {
                                        button {
                                            class: "btn btn-outline-secondary btn-sm me-1 mb-1",
                                            onclick: move |_| draft.set(reply.to_string()),
                                            "{reply}"
                                        }
                                    }
                                }
                                div { class: "message-templates input-group input-group-sm mb-2",
                                    input {
                                        class: "form-control",
                                        placeholder: "Crop name for templates",
                                        value: "{crop_name}",
                                        oninput: move |evt| crop_name.set(evt.value()),
                                    }
                                    for template in MessageTemplate::ALL {
                                        button {
                                            class: "btn btn-outline-success",
                                            disabled: crop_name.read().trim().is_empty(),
                                            onclick: move |_| draft.set(template.render(crop_name.read().trim())),
                                            "{template.label()}"
                                        }
                                    }
                                }
                                div { class: "input-group",
                                    textarea {
                                        class: "form-control message-input",
                                        rows: "2",
                                        placeholder: "Type your message...",
                                        value: "{draft}",
                                        oninput: move |evt| draft.set(evt.value()),
                                        onkeydown: move |evt: KeyboardEvent| {
                                            if evt.key() == Key::Enter && !evt.modifiers().shift() {
                                                evt.prevent_default();
                                                send();
                                            }
                                        },
                                    }
                                    button {
                                        class: "btn btn-success",
                                        disabled: sending(),
                                        onclick: move |_| send(),
                                        i { class: "fas fa-paper-plane" }
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

#[component]
fn MessageBubble(msg: Message) -> Element {
    let class = if msg.is_mine {
        "message message-sent text-end mb-2"
    } else {
        "message message-received mb-2"
    };
    let time = format_date_time(&msg.created_at);

    rsx! {
        div { class: "{class}",
            div { class: "message-content d-inline-block p-2 rounded",
                for (i, segment) in msg.segments().into_iter().enumerate() {
                    match segment {
                        Segment::Text(text) => rsx! { span { key: "{i}", "{text}" } },
                        Segment::Link(url) => rsx! {
                            a {
                                key: "{i}",
                                href: "{url}",
                                target: "_blank",
                                rel: "noopener noreferrer",
                                "{url}"
                            }
                        },
                        Segment::LineBreak => rsx! { br { key: "{i}" } },
                    }
                }
            }
            div { class: "small text-muted",
                if !msg.is_mine {
                    "{msg.sender_name} · "
                }
                "{time}"
                if msg.is_mine && msg.is_read() {
                    i { class: "fas fa-check-double ms-1" }
                }
            }
        }
    }
}
