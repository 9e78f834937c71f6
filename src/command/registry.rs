use std::collections::HashMap;

use crate::command::builtin::{CommentCommand, EditCommand, OnboardCommand};
use crate::command::{ChunkStream, Command, CommandContext};
use crate::error::CommandError;

/// Name-to-command map. Dispatch only: streams are returned as produced.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    index_by_name: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a registry holding `edit`, `comment` and `onboard`.
    pub fn with_builtins() -> Result<Self, CommandError> {
        let mut registry = Self::new();
        registry.register(EditCommand::command())?;
        registry.register(CommentCommand::command())?;
        registry.register(OnboardCommand::command())?;
        Ok(registry)
    }

    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        if !is_valid_command_name(command.name()) {
            return Err(CommandError::InvalidName {
                name: command.name().to_string(),
            });
        }

        if self.index_by_name.contains_key(command.name()) {
            return Err(CommandError::DuplicateName {
                name: command.name().to_string(),
            });
        }

        let next_index = self.commands.len();
        self.index_by_name
            .insert(command.name().to_string(), next_index);
        tracing::debug!(command = command.name(), "command registered");
        self.commands.push(command);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index_by_name
            .get(name)
            .and_then(|index| self.commands.get(*index))
    }

    /// Registered commands in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Looks up `name` and returns its handler's stream unchanged.
    pub fn execute(&self, name: &str, ctx: CommandContext) -> Result<ChunkStream, CommandError> {
        let command = self.get(name).ok_or_else(|| CommandError::UnknownCommand {
            name: name.to_string(),
        })?;

        tracing::info!(command = name, "executing command");
        Ok(command.run(ctx))
    }

    pub fn help_text(&self) -> String {
        self.commands
            .iter()
            .map(|command| format!("/{} - {}", command.name(), command.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Slash-prefixed user input split into command name and argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub input: String,
}

/// Parses `/name rest of input`. Plain prompts return `None`.
pub fn parse_invocation(input: &str) -> Option<Invocation> {
    let trimmed = input.trim();
    let without_slash = trimmed.strip_prefix('/')?;

    let (name, rest) = match without_slash.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (without_slash, ""),
    };

    Some(Invocation {
        name: name.to_string(),
        input: rest.to_string(),
    })
}

fn is_valid_command_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '-' | '_'))
}

#[cfg(test)]
mod tests {
    use futures_util::{stream, StreamExt};

    use super::*;

    fn fixed(name: &str) -> Command {
        Command::new(name, "test command", |_ctx: CommandContext| -> ChunkStream {
            stream::iter(vec![Ok("chunk".to_string())]).boxed()
        })
    }

    #[test]
    fn register_rejects_duplicate_names() {
        let mut registry = CommandRegistry::new();
        registry.register(fixed("edit")).expect("first edit registers");

        let error = registry
            .register(fixed("edit"))
            .expect_err("duplicate must be rejected");

        assert_eq!(
            error,
            CommandError::DuplicateName {
                name: "edit".to_string()
            }
        );
        assert_eq!(registry.commands().len(), 1);
    }

    #[test]
    fn register_rejects_non_lowercase_identifiers() {
        let mut registry = CommandRegistry::new();

        for name in ["", "Edit", "two words", "/edit"] {
            assert_eq!(
                registry.register(fixed(name)),
                Err(CommandError::InvalidName {
                    name: name.to_string()
                })
            );
        }

        registry
            .register(fixed("write-docs_2"))
            .expect("lowercase with digits and separators is valid");
    }

    #[test]
    fn builtins_register_in_order() {
        let registry = CommandRegistry::with_builtins().expect("builtins never clash");
        let names = registry
            .commands()
            .iter()
            .map(Command::name)
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["edit", "comment", "onboard"]);
        assert!(registry.help_text().contains("/onboard - "));
    }

    #[test]
    fn parse_invocation_splits_name_and_input() {
        assert_eq!(parse_invocation("plain prompt"), None);
        assert_eq!(
            parse_invocation("/comment"),
            Some(Invocation {
                name: "comment".to_string(),
                input: String::new(),
            })
        );
        assert_eq!(
            parse_invocation("  /edit  make it async  "),
            Some(Invocation {
                name: "edit".to_string(),
                input: "make it async".to_string(),
            })
        );
    }
}
