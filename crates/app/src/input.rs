/// One line typed by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    /// 1-based answer button number.
    Slot(usize),
    /// Answer typed out in full.
    Name(String),
    Region(String),
    Choices(String),
    Reset,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Empty;
        }

        let Some(command) = line.strip_prefix(':') else {
            return match line.parse::<usize>() {
                Ok(slot) => Input::Slot(slot),
                Err(_) => Input::Name(line.to_string()),
            };
        };

        let (verb, arg) = match command.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (command, ""),
        };
        match (verb, arg) {
            ("region", arg) if !arg.is_empty() => Input::Region(arg.to_string()),
            ("choices", arg) if !arg.is_empty() => Input::Choices(arg.to_string()),
            ("reset", _) => Input::Reset,
            ("help" | "h", _) => Input::Help,
            ("quit" | "q", _) => Input::Quit,
            _ => Input::Unknown(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
Type the number of a choice (or the country's name) to guess.
Commands:
  :region <All|Africa|Asia|Europe|North_America|Oceania|South_America>
  :choices <2-8>
  :reset
  :quit";
