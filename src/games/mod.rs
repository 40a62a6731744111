pub mod connect;
pub mod memory;
pub mod puzzle;
pub mod quiz;
pub mod wordsearch;

pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![GameDescriptor {
        name: "connect",
        description: "Connect each device to the sense that uses it",
    },
    GameDescriptor {
        name: "memory",
        description: "Find the matching device card pairs",
    },
    GameDescriptor {
        name: "puzzle",
        description: "Swap tiles until the picture is back in order",
    },
    GameDescriptor {
        name: "wordsearch",
        description: "Find device names hidden in the letter grid",
    },
    GameDescriptor {
        name: "quiz",
        description: "Identify the device from its clue",
    }]
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Level
{
    Easy,
    Medium,
    Hard,
}

impl Level
{
    pub fn from_args(args: &[String]) -> Result<Self, String>
    {
        let mut level = Level::Easy;
        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            if arg == "--level" {
                let value = iter
                    .next()
                    .ok_or_else(|| "Expected value after --level".to_string())?;
                level = parse_level(value)?;
            } else if let Some(rest) = arg.strip_prefix("--level=") {
                level = parse_level(rest)?;
            } else {
                return Err(format!("Unknown option '{arg}'"));
            }
        }
        Ok(level)
    }

    pub fn label(self) -> &'static str
    {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

fn parse_level(value: &str) -> Result<Level, String>
{
    match value {
        "easy" => Ok(Level::Easy),
        "medium" => Ok(Level::Medium),
        "hard" => Ok(Level::Hard),
        other => Err(format!("Unknown level '{other}' (easy, medium or hard)")),
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn level_defaults_to_easy()
    {
        assert_eq!(Level::from_args(&[]).unwrap(), Level::Easy);
    }

    #[test]
    fn level_parses_both_flag_forms()
    {
        let split = vec!["--level".to_string(), "hard".to_string()];
        assert_eq!(Level::from_args(&split).unwrap(), Level::Hard);
        let joined = vec!["--level=medium".to_string()];
        assert_eq!(Level::from_args(&joined).unwrap(), Level::Medium);
    }

    #[test]
    fn level_rejects_unknown_values()
    {
        assert!(Level::from_args(&["--level=extreme".to_string()]).is_err());
        assert!(Level::from_args(&["--wpm=20".to_string()]).is_err());
    }
}
