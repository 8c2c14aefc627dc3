//! Conversations, message threads and message composition.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::order::OrderId;
use crate::user::{UserId, UserRole};

/// How often the open thread is re-fetched.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Characters of the last message shown in the conversation list.
pub const PREVIEW_CHARS: usize = 50;

/// Header name when the partner is not in the conversation list.
pub const UNKNOWN_PARTNER: &str = "User";

pub const QUICK_RESPONSES: [&str; 5] = [
    "Thank you!",
    "Yes, available",
    "Let me check",
    "Can we discuss price?",
    "When do you need it?",
];

/// Server-assigned message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

/// One entry of `GET /api/messages`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conversation {
    pub partner_id: UserId,
    pub partner_name: String,
    #[serde(default)]
    pub partner_type: String,
    #[serde(default)]
    pub last_message: String,
    #[serde(default)]
    pub last_message_time: String,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub last_sender_name: String,
}

impl Conversation {
    pub fn partner_role(&self) -> Option<UserRole> {
        UserRole::parse(&self.partner_type)
    }

    pub fn preview(&self) -> String {
        truncate_preview(&self.last_message, PREVIEW_CHARS)
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// One entry of `GET /api/messages?user_id={id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    #[serde(default)]
    pub sender_name: String,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub is_mine: bool,
    #[serde(default)]
    pub read_at: Option<String>,
}

impl Message {
    pub fn is_read(&self) -> bool {
        self.read_at.as_deref().is_some_and(|r| !r.is_empty())
    }

    pub fn segments(&self) -> Vec<Segment<'_>> {
        segment_content(&self.content)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageThread {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Body of `POST /api/messages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMessage {
    pub receiver_id: UserId,
    pub content: String,
    pub order_id: Option<OrderId>,
}

impl OutgoingMessage {
    /// `None` when the trimmed content is empty; nothing is sent then.
    pub fn compose(receiver_id: UserId, content: &str, order_id: Option<OrderId>) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            receiver_id,
            content: content.to_string(),
            order_id,
        })
    }
}

/// First `max_chars` characters followed by `...`, or the whole message when
/// it already fits.
pub fn truncate_preview(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

/// A piece of rendered message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// Opens in a new tab.
    Link(&'a str),
    LineBreak,
}

static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bhttps?://\S+").expect("valid link regex"));

/// Split content into text, links and line breaks.
pub fn segment_content(content: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    for (i, line) in content.split('\n').enumerate() {
        if i > 0 {
            segments.push(Segment::LineBreak);
        }
        let mut rest = 0;
        for found in LINK_PATTERN.find_iter(line) {
            if found.start() > rest {
                segments.push(Segment::Text(&line[rest..found.start()]));
            }
            segments.push(Segment::Link(found.as_str()));
            rest = found.end();
        }
        if rest < line.len() {
            segments.push(Segment::Text(&line[rest..]));
        }
    }
    segments
}

/// Canned openers, parameterized by crop name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTemplate {
    OrderInquiry,
    DeliveryInquiry,
    QualityInquiry,
    PriceNegotiation,
}

impl MessageTemplate {
    pub const ALL: [MessageTemplate; 4] = [
        MessageTemplate::OrderInquiry,
        MessageTemplate::DeliveryInquiry,
        MessageTemplate::QualityInquiry,
        MessageTemplate::PriceNegotiation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MessageTemplate::OrderInquiry => "Ask availability",
            MessageTemplate::DeliveryInquiry => "Ask about delivery",
            MessageTemplate::QualityInquiry => "Ask about quality",
            MessageTemplate::PriceNegotiation => "Negotiate price",
        }
    }

    pub fn render(self, crop_name: &str) -> String {
        match self {
            MessageTemplate::OrderInquiry => {
                format!("Hi! I'm interested in your {crop_name}. Is it still available?")
            }
            MessageTemplate::DeliveryInquiry => {
                format!("When can you deliver the {crop_name} I ordered?")
            }
            MessageTemplate::QualityInquiry => {
                format!("Can you tell me more about the quality of your {crop_name}?")
            }
            MessageTemplate::PriceNegotiation => {
                format!("Is there any room for negotiation on the price for {crop_name}?")
            }
        }
    }
}

/// The conversation the messaging view currently polls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveConversation {
    partner: Option<UserId>,
}

impl ActiveConversation {
    pub fn new(partner: Option<UserId>) -> Self {
        Self { partner }
    }

    pub fn select(&mut self, partner: UserId) {
        self.partner = Some(partner);
    }

    pub fn partner(&self) -> Option<UserId> {
        self.partner
    }

    /// The poll timer only re-fetches while a thread is open.
    pub fn should_poll(&self) -> bool {
        self.partner.is_some()
    }

    /// Header name: the partner's entry in `conversations`, or "User".
    pub fn header_name<'a>(&self, conversations: &'a [Conversation]) -> &'a str {
        self.partner
            .and_then(|id| conversations.iter().find(|c| c.partner_id == id))
            .map(|c| c.partner_name.as_str())
            .unwrap_or(UNKNOWN_PARTNER)
    }
}

/// Fetch generations for the conversation list and the open thread.
/// Bumping one re-runs the matching fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageRefresh {
    pub list: u64,
    pub thread: u64,
}

impl MessageRefresh {
    /// A sent message changes both the thread and the list preview.
    pub fn message_sent(&mut self) {
        self.list += 1;
        self.thread += 1;
    }

    pub fn poll(&mut self) {
        self.thread += 1;
    }
}

/// The thread on screen. Only a successful fetch replaces it, so a failed
/// poll leaves the last good copy up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShownThread {
    shown: Option<(UserId, Vec<Message>)>,
}

impl ShownThread {
    pub fn loaded(&mut self, partner: UserId, messages: Vec<Message>) {
        self.shown = Some((partner, messages));
    }

    /// Messages for `partner`, or `None` while its first fetch is pending.
    pub fn for_partner(&self, partner: Option<UserId>) -> Option<&[Message]> {
        match &self.shown {
            Some((shown, messages)) if Some(*shown) == partner => Some(messages),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_at_fifty_chars() {
        let short = "Is the maize still available?";
        assert_eq!(truncate_preview(short, PREVIEW_CHARS), short);

        let exact = "a".repeat(50);
        assert_eq!(truncate_preview(&exact, PREVIEW_CHARS), exact);

        let long = "b".repeat(51);
        assert_eq!(
            truncate_preview(&long, PREVIEW_CHARS),
            format!("{}...", "b".repeat(50))
        );
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        let text = "ñ".repeat(60);
        let preview = truncate_preview(&text, PREVIEW_CHARS);
        assert_eq!(preview.chars().count(), 53);
    }

    #[test]
    fn compose_trims_and_skips_empty() {
        assert_eq!(OutgoingMessage::compose(UserId(3), "   \n ", None), None);
        let msg = OutgoingMessage::compose(UserId(3), "  Habari  ", None).unwrap();
        assert_eq!(msg.content, "Habari");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            serde_json::json!({"receiver_id": 3, "content": "Habari", "order_id": null})
        );

        let with_order = OutgoingMessage::compose(UserId(3), "ok", Some(OrderId(8))).unwrap();
        assert_eq!(serde_json::to_value(&with_order).unwrap()["order_id"], 8);
    }

    #[test]
    fn segments_links_and_breaks() {
        let segments = segment_content("See https://example.com/maize?id=1 now\nthanks");
        assert_eq!(
            segments,
            vec![
                Segment::Text("See "),
                Segment::Link("https://example.com/maize?id=1"),
                Segment::Text(" now"),
                Segment::LineBreak,
                Segment::Text("thanks"),
            ]
        );
    }

    #[test]
    fn segments_plain_and_blank_lines() {
        assert_eq!(segment_content("hello"), vec![Segment::Text("hello")]);
        assert_eq!(
            segment_content("a\n\nb"),
            vec![
                Segment::Text("a"),
                Segment::LineBreak,
                Segment::LineBreak,
                Segment::Text("b")
            ]
        );
        assert_eq!(
            segment_content("http://x.co"),
            vec![Segment::Link("http://x.co")]
        );
        assert_eq!(segment_content("ftp://x.co"), vec![Segment::Text("ftp://x.co")]);
    }

    #[test]
    fn templates_mention_the_crop() {
        for template in MessageTemplate::ALL {
            assert!(template.render("Sukuma Wiki").contains("Sukuma Wiki"));
        }
        assert_eq!(
            MessageTemplate::DeliveryInquiry.render("beans"),
            "When can you deliver the beans I ordered?"
        );
    }

    #[test]
    fn decodes_conversations_and_thread() {
        let list: ConversationList = serde_json::from_str(
            r#"{"conversations": [{"partner_id": 4, "partner_name": "amina",
                "partner_type": "farmer", "last_message": "Sawa",
                "last_message_time": "2024-03-02T10:00:00", "unread_count": 2,
                "last_sender_name": "amina"}]}"#,
        )
        .unwrap();
        let conv = &list.conversations[0];
        assert_eq!(conv.partner_role(), Some(UserRole::Farmer));
        assert!(conv.has_unread());

        let thread: MessageThread = serde_json::from_str(
            r#"{"messages": [{"id": 1, "sender_id": 4, "sender_name": "amina",
                "content": "Sawa", "created_at": "2024-03-02T10:00:00",
                "is_mine": false, "read_at": null}]}"#,
        )
        .unwrap();
        assert!(!thread.messages[0].is_read());
        assert!(!thread.messages[0].is_mine);
    }

    #[test]
    fn header_name_falls_back_to_user() {
        let conversations = vec![Conversation {
            partner_id: UserId(4),
            partner_name: "amina".into(),
            partner_type: "farmer".into(),
            last_message: String::new(),
            last_message_time: String::new(),
            unread_count: 0,
            last_sender_name: String::new(),
        }];
        let mut active = ActiveConversation::default();
        assert_eq!(active.header_name(&conversations), UNKNOWN_PARTNER);
        active.select(UserId(4));
        assert_eq!(active.header_name(&conversations), "amina");
        active.select(UserId(5));
        assert_eq!(active.header_name(&conversations), "User");
    }

    #[test]
    fn polling_needs_an_open_thread() {
        let mut active = ActiveConversation::new(None);
        assert!(!active.should_poll());
        active.select(UserId(9));
        assert!(active.should_poll());
        assert!(ActiveConversation::new(Some(UserId(3))).should_poll());
    }

    #[test]
    fn send_refreshes_list_and_thread_but_poll_only_thread() {
        let mut refresh = MessageRefresh::default();
        refresh.poll();
        refresh.poll();
        assert_eq!(refresh, MessageRefresh { list: 0, thread: 2 });

        refresh.message_sent();
        assert_eq!(refresh, MessageRefresh { list: 1, thread: 3 });
    }

    fn message(id: u64, content: &str) -> Message {
        Message {
            id: MessageId(id),
            sender_id: UserId(4),
            sender_name: "amina".into(),
            content: content.into(),
            created_at: "2024-03-02T10:00:00".into(),
            is_mine: false,
            read_at: None,
        }
    }

    #[test]
    fn shown_thread_survives_a_failed_refetch() {
        let mut thread = ShownThread::default();
        assert_eq!(thread.for_partner(Some(UserId(4))), None);

        thread.loaded(UserId(4), vec![message(1, "Sawa")]);
        // A failed poll never calls `loaded`; the old copy stays.
        let shown = thread.for_partner(Some(UserId(4))).expect("thread shown");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].content, "Sawa");

        // A different partner waits for its own first fetch.
        assert_eq!(thread.for_partner(Some(UserId(5))), None);
        assert_eq!(thread.for_partner(None), None);

        thread.loaded(UserId(4), vec![message(1, "Sawa"), message(2, "Asante")]);
        assert_eq!(thread.for_partner(Some(UserId(4))).map(<[Message]>::len), Some(2));
    }
}
