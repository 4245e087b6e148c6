//! Line commands for the interactive mode

/// A parsed REPL line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Prices,
    Analyze(String),
    Help,
    Exit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "/prices" | "/p" => Self::Prices,
            "/analyze" | "/a" if !rest.is_empty() => Self::Analyze(rest.to_string()),
            "/analyze" | "/a" => Self::Unknown("usage: /analyze <question>".to_string()),
            "/help" | "/h" => Self::Help,
            "/exit" | "/quit" | "/q" => Self::Exit,
            // Bare text is treated as a question
            _ if !command.starts_with('/') => Self::Analyze(line.to_string()),
            other => Self::Unknown(format!("unknown command: {other}")),
        }
    }
}

pub const HELP: &str = "\
Commands:
  /prices              - Refresh ETH and BTC oracle prices
  /analyze <question>  - Analyze a market question with the held prices
  /help                - Show this help
  /exit                - Exit

Any other text is analyzed as a market question.";
