//! Test doubles.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;
use teloxide::{
    types::{ChatId, ChatMemberStatus, ChatPermissions, Message, MessageId, UserId},
    ApiError, RequestError,
};

use crate::{moderation::Moderator, warnings::WarningStore};

/// Open a fresh store at `gc_data.json` in a temporary directory.
/// Keep the directory around for as long as the store is used.
pub async fn temp_store(max_warns: u32) -> (TempDir, WarningStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = WarningStore::open(dir.path().join("gc_data.json"), max_warns)
        .await
        .unwrap();
    (dir, store)
}

pub const GROUP: ChatId = ChatId(-1002065680710);

pub fn user_json(id: UserId, first_name: &str) -> Value {
    json!({ "id": id.0, "is_bot": false, "first_name": first_name })
}

fn group_json() -> Value {
    json!({ "id": GROUP.0, "type": "supergroup", "title": "Sussy <Group>" })
}

/// Message in [`GROUP`] with whatever `fields` added on top, as Telegram would send it.
pub fn group_message(from: UserId, fields: Value) -> Message {
    let mut message = json!({
        "message_id": 69,
        "date": 1_700_000_000,
        "chat": group_json(),
        "from": user_json(from, "Amogus"),
    });
    if let (Some(message), Some(fields)) = (message.as_object_mut(), fields.as_object()) {
        message.extend(fields.clone());
    }
    serde_json::from_value(message).unwrap()
}

/// Text message in [`GROUP`].
pub fn group_text(from: UserId, text: &str) -> Message {
    group_message(from, json!({ "text": text }))
}

/// Text message in [`GROUP`] replying to a message of `target`, named "Sus".
pub fn group_reply(from: UserId, text: &str, target: UserId) -> Message {
    group_message(
        from,
        json!({
            "text": text,
            "reply_to_message": {
                "message_id": 42,
                "date": 1_699_999_000,
                "chat": group_json(),
                "from": user_json(target, "Sus"),
                "text": "hi",
            },
        }),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    MemberStatus(UserId),
    RemoveMessage(MessageId),
    Restrict {
        user: UserId,
        permissions: ChatPermissions,
        until: Option<DateTime<Utc>>,
    },
    BanMember(UserId),
    UnbanMember(UserId),
}

/// Pretends to be a chat. Everyone is a plain member unless listed in `admins`.
/// Records every call, and fails moderation actions (not status lookups) when
/// told to, the way Telegram does when the bot lacks rights.
#[derive(Default)]
pub struct FakeModerator {
    admins: Vec<UserId>,
    failing: AtomicBool,
    failing_unban: AtomicBool,
    calls: Mutex<Vec<Call>>,
}

impl FakeModerator {
    pub fn with_admins(admins: &[UserId]) -> Self {
        FakeModerator {
            admins: admins.to_vec(),
            ..Default::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail only unbans, like when the bot lost its rights right after a ban.
    pub fn set_failing_unban(&self, failing: bool) {
        self.failing_unban.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn act(&self, call: Call) -> Result<(), RequestError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            Err(RequestError::Api(ApiError::NotEnoughRightsToRestrict))
        } else {
            Ok(())
        }
    }
}

impl Moderator for FakeModerator {
    async fn member_status(
        &self,
        _chat: ChatId,
        user: UserId,
    ) -> Result<ChatMemberStatus, RequestError> {
        self.calls.lock().unwrap().push(Call::MemberStatus(user));
        Ok(if self.admins.contains(&user) {
            ChatMemberStatus::Administrator
        } else {
            ChatMemberStatus::Member
        })
    }

    async fn remove_message(&self, _chat: ChatId, message: MessageId) -> Result<(), RequestError> {
        self.act(Call::RemoveMessage(message))
    }

    async fn restrict_member(
        &self,
        _chat: ChatId,
        user: UserId,
        permissions: ChatPermissions,
        until: Option<DateTime<Utc>>,
    ) -> Result<(), RequestError> {
        self.act(Call::Restrict {
            user,
            permissions,
            until,
        })
    }

    async fn ban_member(&self, _chat: ChatId, user: UserId) -> Result<(), RequestError> {
        self.act(Call::BanMember(user))
    }

    async fn unban_member(&self, _chat: ChatId, user: UserId) -> Result<(), RequestError> {
        if self.failing_unban.load(Ordering::SeqCst) {
            self.calls.lock().unwrap().push(Call::UnbanMember(user));
            return Err(RequestError::Api(ApiError::NotEnoughRightsToRestrict));
        }
        self.act(Call::UnbanMember(user))
    }
}
