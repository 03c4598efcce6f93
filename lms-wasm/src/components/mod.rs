pub(crate) mod chat_sidebar;
pub(crate) mod message_bubble;
pub(crate) mod notice_banner;
pub(crate) mod post_card;
pub(crate) mod sign_in;
pub(crate) mod stats_card;
