use crate::cli::ChatArgs;
use crate::config::prompt::{ load_prompts, PromptConfig };
use crate::models::chat::{ Message, Role };
use crate::transcript::relay::{ HttpRelayClient, RelayClient };
use crate::transcript::Transcript;
use log::debug;
use std::error::Error;
use std::io::Write;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, BufReader };

const HELP_TEXT: &str = "
/clear        Clear the conversation history
/last         Print the last reply again
/help         Show this help dialogue
/quit         Quit the application
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Send(String),
    Clear,
    Last,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ConsoleCommand::Empty;
        }
        match trimmed {
            "/clear" => ConsoleCommand::Clear,
            "/last" => ConsoleCommand::Last,
            "/help" => ConsoleCommand::Help,
            "/quit" | "/exit" => ConsoleCommand::Quit,
            cmd if cmd.starts_with('/') && !cmd.contains(char::is_whitespace) =>
                ConsoleCommand::Unknown(cmd.to_string()),
            _ => ConsoleCommand::Send(trimmed.to_string()),
        }
    }
}

/// Terminal front end over a [`Transcript`]. Reads one line per turn and prints
/// whatever the turn added to the visible conversation.
pub struct Console<'a, R, W> {
    transcript: Transcript,
    relay: &'a dyn RelayClient,
    input: R,
    output: W,
}

impl<'a, R, W> Console<'a, R, W> where R: AsyncBufRead + Unpin, W: Write {
    pub fn new(transcript: Transcript, relay: &'a dyn RelayClient, input: R, output: W) -> Self {
        Self { transcript, relay, input, output }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        writeln!(self.output, "Groq Chat (type /help for commands)\n")?;
        self.render_from(0)?;

        let mut line = String::new();
        loop {
            write!(self.output, "[{} messages] > ", self.transcript.visible().count())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line).await? == 0 {
                writeln!(self.output)?;
                break;
            }

            match ConsoleCommand::parse(&line) {
                ConsoleCommand::Empty => {}
                ConsoleCommand::Quit => break,
                ConsoleCommand::Help => writeln!(self.output, "{}", HELP_TEXT)?,
                ConsoleCommand::Clear => {
                    self.transcript.reset();
                    writeln!(self.output, "History cleared")?;
                    self.render_from(0)?;
                }
                ConsoleCommand::Last => {
                    match self.transcript.last_reply() {
                        Some(reply) => writeln!(self.output, "{}", reply)?,
                        None => writeln!(self.output, "Nothing to show")?,
                    }
                }
                ConsoleCommand::Unknown(cmd) => {
                    writeln!(self.output, "Unknown command: {} (try /help)", cmd)?;
                }
                ConsoleCommand::Send(text) => {
                    let before = self.transcript.messages().len();
                    writeln!(self.output, "Generating...")?;
                    self.output.flush()?;
                    self.transcript.send(&text, self.relay).await;
                    // The user's own line is already on screen.
                    self.render_from(before + 1)?;
                }
            }
        }
        Ok(())
    }

    fn render_from(&mut self, start: usize) -> std::io::Result<()> {
        let messages = self.transcript.messages().get(start..).unwrap_or_default();
        for message in messages.iter().filter(|m| m.role != Role::System) {
            writeln!(self.output, "{}", format_message(message))?;
        }
        Ok(())
    }
}

pub fn format_message(message: &Message) -> String {
    let who = match message.role {
        Role::User => "You",
        Role::Assistant => "Groq",
        Role::System => "System",
    };
    format!("{}: {}\n", who, message.content)
}

pub async fn run_chat(args: &ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let prompts = match &args.prompts_path {
        Some(path) => load_prompts(path)?,
        None => PromptConfig::default(),
    };
    let relay = HttpRelayClient::new(&args.relay_url)?;
    debug!("Chatting through relay at {}", relay.endpoint());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut console = Console::new(Transcript::new(prompts), &relay, stdin, std::io::stdout());
    console.run().await
}
