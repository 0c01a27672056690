//! Line-oriented driver standing in for a chat transport.
//!
//! Each input line is one command; every reply is plain text on stdout.
use duel_core::{BattleId, ChatId, PlayerId, SkillChoice};
use duel_runtime::BattleService;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::render;

pub const HELP: &str = "\
commands:
  new <chat> <player> [opponent]     open a battle (seats the opponent if given)
  join <battle> <player>             take the free seat of an open battle
  act <battle> <player> [skill]      lock an action: skill id, list number, or `default`
  status <battle>                    show a battle
  chat <chat>                        show the latest battle of a chat
  seed <battle> <n>                  reseed a battle before its first round
  skills                             list the skill catalog
  help                               show this text
  quit                               exit";

/// Skill argument of `act`, before it is checked against the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkillArg {
    Id(String),
    Number(usize),
    Default,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    New {
        chat: ChatId,
        player: PlayerId,
        opponent: Option<PlayerId>,
    },
    Join {
        battle: BattleId,
        player: PlayerId,
    },
    Act {
        battle: BattleId,
        player: PlayerId,
        skill: SkillArg,
    },
    Status(BattleId),
    Chat(ChatId),
    Seed {
        battle: BattleId,
        seed: u64,
    },
    Skills,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("`{value}` is not a valid {what}")]
    Invalid { what: &'static str, value: String },
}

fn number<T: std::str::FromStr>(value: &str, what: &'static str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::Invalid {
        what,
        value: value.to_string(),
    })
}

fn player(value: &str) -> Result<PlayerId, CommandError> {
    number(value, "player id").map(PlayerId)
}

fn chat(value: &str) -> Result<ChatId, CommandError> {
    number(value, "chat id").map(ChatId)
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name.to_ascii_lowercase().as_str(), args) {
            ("new", [c, p]) => Self::New {
                chat: chat(c)?,
                player: player(p)?,
                opponent: None,
            },
            ("new", [c, p, o]) => Self::New {
                chat: chat(c)?,
                player: player(p)?,
                opponent: Some(player(o)?),
            },
            ("new", _) => return Err(CommandError::Usage("new <chat> <player> [opponent]")),

            ("join", [b, p]) => Self::Join {
                battle: BattleId::from(*b),
                player: player(p)?,
            },
            ("join", _) => return Err(CommandError::Usage("join <battle> <player>")),

            ("act", [b, p, rest @ ..]) if rest.len() <= 1 => Self::Act {
                battle: BattleId::from(*b),
                player: player(p)?,
                skill: match rest.first() {
                    None => SkillArg::Default,
                    Some(s) if s.eq_ignore_ascii_case("default") => SkillArg::Default,
                    Some(s) => match s.parse::<usize>() {
                        Ok(n) => SkillArg::Number(n),
                        Err(_) => SkillArg::Id(s.to_string()),
                    },
                },
            },
            ("act", _) => return Err(CommandError::Usage("act <battle> <player> [skill]")),

            ("status", [b]) => Self::Status(BattleId::from(*b)),
            ("status", _) => return Err(CommandError::Usage("status <battle>")),

            ("chat", [c]) => Self::Chat(chat(c)?),
            ("chat", _) => return Err(CommandError::Usage("chat <chat>")),

            ("seed", [b, n]) => Self::Seed {
                battle: BattleId::from(*b),
                seed: number(n, "seed")?,
            },
            ("seed", _) => return Err(CommandError::Usage("seed <battle> <n>")),

            ("skills", []) => Self::Skills,
            ("help", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Executes commands against a [`BattleService`].
pub struct Repl {
    service: BattleService,
}

impl Repl {
    pub fn new(service: BattleService) -> Self {
        Self { service }
    }

    fn choice(&self, skill: SkillArg) -> SkillChoice {
        match skill {
            SkillArg::Default => SkillChoice::Default,
            SkillArg::Id(id) => SkillChoice::explicit(id),
            SkillArg::Number(n) => match self.service.catalog().by_number(n) {
                Some(skill) => SkillChoice::Explicit(skill.id.clone()),
                None => SkillChoice::explicit(n.to_string()),
            },
        }
    }

    /// Runs one command and renders its reply. `Quit` renders nothing.
    pub async fn execute(&self, command: Command) -> String {
        let service = &self.service;
        let reply = match command {
            Command::New {
                chat,
                player,
                opponent: Some(opponent),
            } => service
                .create_battle(chat, player, opponent)
                .await
                .map(|b| render::battle_created(&b)),
            Command::New {
                chat,
                player,
                opponent: None,
            } => service
                .open_battle(chat, player)
                .await
                .map(|b| render::battle_created(&b)),
            Command::Join { battle, player } => service
                .join_battle(&battle, player)
                .await
                .map(|b| render::battle(service.catalog(), &b)),
            Command::Act {
                battle,
                player,
                skill,
            } => {
                let choice = self.choice(skill);
                service
                    .submit_action(&battle, player, choice)
                    .await
                    .map(|result| render::submission(service.catalog(), &result))
            }
            Command::Status(battle) => service
                .get_status(&battle)
                .await
                .map(|b| render::battle(service.catalog(), &b)),
            Command::Chat(chat) => service
                .battle_for_chat(chat)
                .await
                .map(|battle| match battle {
                    Some(b) => render::battle(service.catalog(), &b),
                    None => format!("no battle in {chat} yet"),
                }),
            Command::Seed { battle, seed } => service
                .reseed(&battle, seed)
                .await
                .map(|b| format!("battle {} reseeded with {}", b.battle_id, b.seed)),
            Command::Skills => Ok(render::skills(service.catalog())),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        };

        reply.unwrap_or_else(|err| {
            tracing::debug!(error = %err, "command failed");
            render::error(&err)
        })
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R>(&self, input: R) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            };
            println!("{}", self.execute(command).await);
        }
        Ok(())
    }
}
