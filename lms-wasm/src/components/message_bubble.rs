use leptos::prelude::*;
use lms_core::timestamp::display_time;
use lms_core::transcript::{Delivery, TranscriptEntry};

/// Сообщение ленты чата. Ассистент слева, пользователь справа.
#[component]
pub(crate) fn MessageBubble(entry: TranscriptEntry) -> impl IntoView {
    let assistant = entry.message.sender.is_assistant();
    let row_class = if assistant {
        "message-row message-assistant"
    } else {
        "message-row message-user"
    };
    let avatar = if assistant { "AI" } else { "You" };
    let time = display_time(entry.message.created_at.as_deref());
    let delivery = match entry.delivery {
        Delivery::Pending => Some(("delivery pending", "Sending...")),
        Delivery::Failed => Some(("delivery failed", "Not delivered")),
        Delivery::Sent => None,
    };

    view! {
        <div class=row_class>
            <div class="avatar">{avatar}</div>
            <div class="bubble">
                <p class="bubble-content">{entry.message.content}</p>
                <span class="bubble-time">{time}</span>
                {delivery.map(|(class, label)| view! { <span class=class>{label}</span> })}
            </div>
        </div>
    }
}
