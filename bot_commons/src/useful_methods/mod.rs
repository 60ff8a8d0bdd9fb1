mod split_msg;
pub use split_msg::*;

use teloxide::types::{Message, User};

pub trait MessageStuff {
    /// Text of the message, or its caption if it's media.
    fn text_full(&self) -> Option<&str>;

    /// Short name for whoever sent this message: their username (without `@`),
    /// or their first name, or the title of the chat it was sent on behalf of.
    fn sender_short_name(&self) -> String;

    /// First name of the sender, or the title of the chat it was sent on behalf of.
    fn sender_first_name(&self) -> String;
}

impl MessageStuff for Message {
    fn text_full(&self) -> Option<&str> {
        self.text().or_else(|| self.caption())
    }

    fn sender_short_name(&self) -> String {
        if let Some(chat) = &self.sender_chat {
            if let Some(username) = chat.username() {
                return username.to_string();
            }
        } else if let Some(user) = &self.from {
            return user_short_name(user).to_string();
        }
        self.sender_first_name()
    }

    fn sender_first_name(&self) -> String {
        if let Some(chat) = &self.sender_chat {
            if let Some(title) = chat.title() {
                return title.to_string();
            }
        } else if let Some(user) = &self.from {
            return user.first_name.clone();
        }
        // Shouldn't happen, but eh.
        "a private sender".to_string()
    }
}

/// Username of the user (without `@`) if they have one, or their first name.
#[must_use]
pub fn user_short_name(user: &User) -> &str {
    user.username.as_deref().unwrap_or(&user.first_name)
}
