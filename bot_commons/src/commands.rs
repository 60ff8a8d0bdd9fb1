use teloxide::types::BotCommand;

/// A command the bot understands, as shown in help and in the Telegram command menu.
pub struct CommandInfo {
    /// Command name with the leading `/`, like `/warn`.
    pub callname: &'static str,
    /// Parameters as shown in help, like `[minutes]`. Can be empty.
    pub params: &'static str,
    pub description: &'static str,
}

impl CommandInfo {
    pub fn get_help(&self, mut output: impl std::fmt::Write) -> Result<(), std::fmt::Error> {
        output.write_str(self.callname)?;
        if !self.params.is_empty() {
            output.write_char(' ')?;
            output.write_str(self.params)?;
        }
        if !self.description.is_empty() {
            output.write_str(" - ")?;
            output.write_str(self.description)?;
        }
        Ok(())
    }
}

/// Make a help message listing all of these commands, one per line, under `header`.
#[must_use]
pub fn generate_help(header: &str, commands: &[CommandInfo]) -> String {
    let mut response = String::from(header);
    for command in commands {
        response.push('\n');
        command
            .get_help(&mut response)
            .expect("Writing to a String never fails");
    }
    response
}

/// Make the list of commands to register with [`teloxide::requests::Requester::set_my_commands`].
#[must_use]
pub fn generate_bot_commands(commands: &[CommandInfo]) -> Vec<BotCommand> {
    commands
        .iter()
        .map(|command| BotCommand {
            // Cut off the /
            command: command.callname.trim_start_matches('/').to_string(),
            description: command.description.to_string(),
        })
        .collect()
}

/// A command parsed out of message text.
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// The command, lowercase, with the leading `/` and no `@username`.
    pub callname: String,
    /// Everything after the command, with leading whitespace trimmed.
    pub params: &'a str,
}

impl ParsedCommand<'_> {
    /// First parameter word, if any.
    pub fn first_param(&self) -> Option<&str> {
        self.params.split_whitespace().next()
    }
}

/// Parse a command out of message text.
///
/// If the input is `/Warn@Some_Bot because yes`, the callname is `/warn` and
/// the params are `because yes`. Returns [`None`] if the text is not a command,
/// or if it's a command addressed to a bot other than `bot_username`.
#[must_use]
pub fn parse_command<'a>(text: &'a str, bot_username: &str) -> Option<ParsedCommand<'a>> {
    if !text.starts_with('/') {
        return None;
    }

    let command = text.split_whitespace().next()?;

    if !command.is_ascii() {
        // Telegram commands must be ASCII.
        // See https://core.telegram.org/bots/api#botcommand
        return None;
    }

    let params = text[command.len()..].trim_start();

    let callname = if let Some(username_start) = command.find('@') {
        // Bot names are guaranteed ASCII, so ignore ASCII case specifically.
        if !command[username_start + 1..].eq_ignore_ascii_case(bot_username) {
            // This command is not for us.
            return None;
        }
        &command[..username_start]
    } else {
        command
    };

    if callname.len() < 2 {
        return None;
    }

    Some(ParsedCommand {
        callname: callname.to_ascii_lowercase(),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMANDS: &[CommandInfo] = &[
        CommandInfo {
            callname: "/help",
            params: "",
            description: "show this help",
        },
        CommandInfo {
            callname: "/mute",
            params: "[minutes]",
            description: "mute the replied user",
        },
    ];

    #[test]
    fn plain_command() {
        let parsed = parse_command("/warns", "test_bot").unwrap();
        assert_eq!(parsed.callname, "/warns");
        assert_eq!(parsed.params, "");
        assert_eq!(parsed.first_param(), None);
    }

    #[test]
    fn command_with_params_and_username() {
        let parsed = parse_command("/Mute@Test_Bot   15 please", "test_bot").unwrap();
        assert_eq!(parsed.callname, "/mute");
        assert_eq!(parsed.params, "15 please");
        assert_eq!(parsed.first_param(), Some("15"));

        let parsed = parse_command("/status\nand more", "test_bot").unwrap();
        assert_eq!(parsed.callname, "/status");
        assert_eq!(parsed.params, "and more");
    }

    #[test]
    fn not_our_command() {
        assert_eq!(parse_command("/warn@other_bot", "test_bot"), None);
        assert_eq!(parse_command("hello /warn", "test_bot"), None);
        assert_eq!(parse_command("/", "test_bot"), None);
        assert_eq!(parse_command("/прив", "test_bot"), None);
        assert_eq!(parse_command("", "test_bot"), None);
    }

    #[test]
    fn help_lists_everything() {
        assert_eq!(
            generate_help("Commands:", COMMANDS),
            "Commands:\n/help - show this help\n/mute [minutes] - mute the replied user"
        );
    }

    #[test]
    fn bot_commands_lose_the_slash() {
        let commands = generate_bot_commands(COMMANDS);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].command, "mute");
        assert_eq!(commands[1].description, "mute the replied user");
    }
}
