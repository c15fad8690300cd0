//! Interactive session commands

/// A line typed at the session prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Search through the debounced search slot
    Search(String),
    /// Replace the queue with the latest results, starting at an index
    Queue(usize),
    /// Resume, or jump to a queue position (1-based on the prompt)
    Play(Option<usize>),
    Pause,
    Toggle,
    Next,
    Prev,
    /// Seek to an absolute position in seconds
    Seek(f64),
    /// Seek forward one step
    Forward,
    /// Seek back one step
    Rewind,
    /// Volume percentage
    Volume(u8),
    Mute,
    Now,
    List,
    Help,
    Quit,
}

impl Command {
    /// Parse a prompt line
    ///
    /// Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "search" | "s" | "/" => {
                if rest.is_empty() {
                    return Err("usage: search <query>".to_string());
                }
                Self::Search(rest.to_string())
            }
            "queue" | "q" => Self::Queue(parse_position(rest)?.unwrap_or(0)),
            "play" | "p" => Self::Play(parse_position(rest)?),
            "pause" => Self::Pause,
            "toggle" | "t" => Self::Toggle,
            "next" | "n" => Self::Next,
            "prev" | "previous" => Self::Prev,
            "seek" => Self::Seek(parse_time(rest)?),
            "ff" => Self::Forward,
            "rw" => Self::Rewind,
            "vol" | "volume" => {
                let level: u8 = rest
                    .parse()
                    .map_err(|_| format!("volume must be 0-100, got '{rest}'"))?;
                if level > 100 {
                    return Err(format!("volume must be 0-100, got {level}"));
                }
                Self::Volume(level)
            }
            "mute" | "m" => Self::Mute,
            "now" => Self::Now,
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };

        Ok(Some(command))
    }
}

/// Optional 1-based position, returned 0-based
fn parse_position(arg: &str) -> Result<Option<usize>, String> {
    if arg.is_empty() {
        return Ok(None);
    }
    match arg.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("expected a track number, got '{arg}'")),
        Ok(n) => Ok(Some(n - 1)),
    }
}

/// Seconds, or `m:ss`
fn parse_time(arg: &str) -> Result<f64, String> {
    let invalid = || format!("expected seconds or m:ss, got '{arg}'");

    if let Some((minutes, seconds)) = arg.split_once(':') {
        let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
        let seconds: u64 = seconds.parse().map_err(|_| invalid())?;
        if seconds >= 60 {
            return Err(invalid());
        }
        return Ok((minutes * 60 + seconds) as f64);
    }

    arg.parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .ok_or_else(invalid)
}

pub const HELP: &str = "\
commands:
  search <query>   search the catalog (s, /)
  queue [n]        queue the latest results, starting at result n
  play [n]         resume, or play queue position n
  pause | toggle   pause / flip play-pause (t)
  next | prev      skip forward / back (n)
  seek <t>         seek to seconds or m:ss
  ff | rw          seek forward / back one step
  vol <0-100>      set volume
  mute             toggle mute (m)
  now              show the current track
  list             show the queue (ls)
  quit             exit";
