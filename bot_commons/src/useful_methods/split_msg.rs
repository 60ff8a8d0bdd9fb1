use std::future::Future;

use teloxide::{
    payloads::SendMessageSetters,
    requests::Requester,
    sugar::request::{RequestLinkPreviewExt, RequestReplyExt},
    types::{Message, MessageId, ParseMode, Recipient},
    Bot, RequestError,
};

/// Telegram refuses messages longer than this many characters. Byte lengths
/// are never shorter than character lengths, so limiting bytes is good enough.
pub const MAX_MESSAGE_LEN: usize = 4096;

pub trait BotSendHtml {
    /// Send a message with HTML markup and no link previews.
    /// Splits the message into many if it's longer than the character limit,
    /// replying to `reply_to` with the first one.
    fn send_html<'a>(
        &'a self,
        to_where: impl Into<Recipient> + Send,
        text: &'a str,
        reply_to: impl Into<Option<MessageId>> + Send,
    ) -> impl Future<Output = Result<Vec<Message>, RequestError>> + Send;
}

impl BotSendHtml for Bot {
    async fn send_html<'a>(
        &'a self,
        to_where: impl Into<Recipient> + Send,
        text: &'a str,
        reply_to: impl Into<Option<MessageId>> + Send,
    ) -> Result<Vec<Message>, RequestError> {
        let to_where: Recipient = to_where.into();
        let mut reply_to: Option<MessageId> = reply_to.into();
        let mut sent_messages = Vec::new();

        for chunk in SplitByLines::new(text, MAX_MESSAGE_LEN) {
            let mut request = self
                .send_message(to_where.clone(), chunk)
                .parse_mode(ParseMode::Html)
                .disable_link_preview(true);
            if let Some(reply_to) = reply_to.take() {
                request = request.reply_to(reply_to);
            }
            sent_messages.push(request.await?);
        }

        Ok(sent_messages)
    }
}

/// Iterator that splits text into chunks under a specified size in bytes.
///
/// Packs as many whole lines into a chunk as fit. A single line that is too
/// long on its own is cut on a character boundary, without cutting an HTML
/// entity like `&amp;` in half.
pub struct SplitByLines<'a> {
    data: &'a str,
    max_len: usize,
}

impl<'a> SplitByLines<'a> {
    /// # Panics
    /// Panics if a max length of less than 16 is specified, which might not
    /// fit a single character or entity.
    #[must_use]
    pub fn new(data: &'a str, max_len: usize) -> SplitByLines<'a> {
        assert!(max_len >= 16, "Max length is too small");
        SplitByLines { data, max_len }
    }

    /// Byte length of the longest prefix of `line` that fits and can be cut at.
    fn cut_long_line(&self, line: &str) -> usize {
        let mut cut = self.max_len;
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        let head = &line[..cut];
        if let Some(amp) = head.rfind('&') {
            if !head[amp..].contains(';') && amp > 0 {
                cut = amp;
            }
        }
        cut
    }
}

impl<'a> Iterator for SplitByLines<'a> {
    type Item = &'a str;
    fn next(&mut self) -> Option<Self::Item> {
        self.data = self.data.trim_start_matches('\n');
        if self.data.is_empty() {
            return None;
        }

        if self.data.len() <= self.max_len {
            let output = self.data;
            self.data = "";
            return Some(output.trim_end());
        }

        // Find the last newline that still keeps the chunk within the limit.
        let mut limit = self.max_len;
        while !self.data.is_char_boundary(limit) {
            limit -= 1;
        }
        let output_len = match self.data[..limit].rfind('\n') {
            Some(newline) if newline > 0 => newline,
            _ => {
                let first_line = self.data.split('\n').next().unwrap_or(self.data);
                self.cut_long_line(first_line)
            }
        };

        let (output, rest) = self.data.split_at(output_len);
        self.data = rest;
        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::SplitByLines;

    #[test]
    fn short_text_is_one_chunk() {
        let mut splitter = SplitByLines::new("1. hi\n2. hello\n", 4096);
        assert_eq!(splitter.next(), Some("1. hi\n2. hello"));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn packs_whole_lines() {
        let data = "aaaaaaa\nbbbbbbb\nccccccc\nddd";
        let mut splitter = SplitByLines::new(data, 16);
        assert_eq!(splitter.next(), Some("aaaaaaa\nbbbbbbb"));
        assert_eq!(splitter.next(), Some("ccccccc\nddd"));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn cuts_long_lines() {
        let data = "0123456789abcdefXYZ\nshort";
        let mut splitter = SplitByLines::new(data, 16);
        assert_eq!(splitter.next(), Some("0123456789abcdef"));
        assert_eq!(splitter.next(), Some("XYZ\nshort"));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn respects_char_boundaries_and_entities() {
        // Two bytes per letter.
        let data = "ééééééééé&amp;tail";
        let mut splitter = SplitByLines::new(data, 16);
        let first = splitter.next().unwrap();
        assert_eq!(first, "éééééééé");
        assert_eq!(splitter.next(), Some("é&amp;tail"));
        assert_eq!(splitter.next(), None);

        let data = "0123456789ab&amp;cdef";
        let mut splitter = SplitByLines::new(data, 16);
        assert_eq!(splitter.next(), Some("0123456789ab"));
        assert_eq!(splitter.next(), Some("&amp;cdef"));
        assert_eq!(splitter.next(), None);
    }
}
