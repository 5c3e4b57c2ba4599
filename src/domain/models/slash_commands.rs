#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .trim()
            .split(' ')
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        let prefix = args[0].to_string();
        args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_upload()
            || cmd.is_delete()
            || cmd.is_documents()
            || cmd.is_clear()
            || cmd.is_history()
            || cmd.is_sources()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_upload(&self) -> bool {
        return ["/u", "/upload"].contains(&self.command.as_str());
    }

    pub fn is_delete(&self) -> bool {
        return ["/d", "/delete"].contains(&self.command.as_str());
    }

    pub fn is_documents(&self) -> bool {
        return ["/ls", "/docs", "/documents"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return ["/cl", "/clear"].contains(&self.command.as_str());
    }

    pub fn is_history(&self) -> bool {
        return ["/hi", "/history"].contains(&self.command.as_str());
    }

    pub fn is_sources(&self) -> bool {
        return ["/s", "/sources"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    /// First argument as a positive number, `None` when no argument was
    /// given.
    pub fn number_arg(&self) -> Result<Option<usize>> {
        let arg = match self.args.iter().find(|e| return !e.trim().is_empty()) {
            Some(arg) => arg.trim(),
            None => return Ok(None),
        };

        match arg.parse::<usize>() {
            Ok(number) if number > 0 => return Ok(Some(number)),
            _ => bail!(format!("{arg} is not a valid number.")),
        }
    }
}
