use std::fmt::Write as _;

use quiz_core::capture::{CaptureInput, CaptureView};
use quiz_core::model::Question;
use quiz_core::Session;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based option number.
    Select(usize),
    Toggle(usize),
    Text(String),
    /// 1-based positions in the current ranking.
    Move(usize, usize),
    Next,
    Previous,
    Submit,
    Retry,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match head {
            "n" if rest.is_empty() => Ok(Self::Next),
            "p" if rest.is_empty() => Ok(Self::Previous),
            "s" if rest.is_empty() => Ok(Self::Submit),
            "r" if rest.is_empty() => Ok(Self::Retry),
            "q" if rest.is_empty() => Ok(Self::Quit),
            "h" | "?" if rest.is_empty() => Ok(Self::Help),
            "t" => number(rest).map(Self::Toggle),
            "x" => Ok(Self::Text(rest.to_owned())),
            "m" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(from), Some(to), None) => Ok(Self::Move(number(from)?, number(to)?)),
                    _ => Err("usage: m <from> <to>".into()),
                }
            }
            _ if rest.is_empty() => number(head).map(Self::Select),
            _ => Err(format!("unknown command: {line}")),
        }
    }

    /// Translate an option or ranking command for the current question.
    pub fn to_input(&self, question: &Question) -> Result<Option<CaptureInput>, String> {
        let option_at = |n: usize| {
            n.checked_sub(1)
                .and_then(|i| question.options().get(i))
                .map(|o| o.id)
                .ok_or_else(|| format!("there is no option {n}"))
        };
        let input = match self {
            Self::Select(n) => CaptureInput::Select(option_at(*n)?),
            Self::Toggle(n) => CaptureInput::Toggle(option_at(*n)?),
            Self::Text(text) => CaptureInput::SetText(text.clone()),
            Self::Move(from, to) => CaptureInput::Move {
                from: from.saturating_sub(1),
                to: to.saturating_sub(1),
            },
            _ => return Ok(None),
        };
        Ok(Some(input))
    }
}

fn number(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a number from 1, got {raw:?}")),
    }
}

pub const HELP: &str = "\
commands:
  <n>        choose option n
  t <n>      toggle option n (multi-select)
  x <text>   set your written answer
  m <i> <j>  move ranked item i to position j
  n / p      next / previous question
  s          finish and submit now
  r          retry a failed submission
  q          quit";

/// Render the current question with the user's pending input.
pub fn render(session: &Session) -> String {
    let Some(question) = session.current_question() else {
        return "The quiz is complete.".into();
    };
    let total = session.catalog().len();
    let position = session.position().map_or(0, |p| p + 1);

    let mut out = format!(
        "\n[{position}/{total}] Question {}: {}\n",
        question.number(),
        question.prompt()
    );
    match session.capture_view() {
        CaptureView::Choice(selected) => {
            for (i, option) in question.options().iter().enumerate() {
                let mark = if selected == Some(option.id) { "(*)" } else { "( )" };
                let _ = writeln!(out, "  {mark} {}. {}", i + 1, option.label);
            }
        }
        CaptureView::Choices(selected) => {
            for (i, option) in question.options().iter().enumerate() {
                let mark = if selected.contains(&option.id) { "[x]" } else { "[ ]" };
                let _ = writeln!(out, "  {mark} {}. {}", i + 1, option.label);
            }
        }
        CaptureView::Text(text) => {
            let _ = writeln!(out, "  > {text}");
        }
        CaptureView::Ranking(order) => {
            for (i, id) in order.iter().enumerate() {
                let label = question.option(*id).map_or("?", |o| o.label.as_str());
                let _ = writeln!(out, "  {}. {label}", i + 1);
            }
        }
        CaptureView::Unsupported => {
            out.push_str("  (this question type is not supported; press n to skip)\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, OptionId, QuestionId, QuestionKind};

    #[test]
    fn parses_every_command() {
        assert_eq!(Command::parse("2"), Ok(Command::Select(2)));
        assert_eq!(Command::parse("t 3"), Ok(Command::Toggle(3)));
        assert_eq!(Command::parse("x  hello there "), Ok(Command::Text("hello there".into())));
        assert_eq!(Command::parse("m 1 3"), Ok(Command::Move(1, 3)));
        assert_eq!(Command::parse("n"), Ok(Command::Next));
        assert_eq!(Command::parse(" p "), Ok(Command::Previous));
        assert_eq!(Command::parse("s"), Ok(Command::Submit));
        assert_eq!(Command::parse("r"), Ok(Command::Retry));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(Command::parse("0").is_err());
        assert!(Command::parse("m 1").is_err());
        assert!(Command::parse("t x").is_err());
        assert!(Command::parse("jump 3").is_err());
    }

    #[test]
    fn option_numbers_map_to_ids() {
        let question = Question::new(
            QuestionId::new(1),
            QuestionKind::SingleSelect,
            1,
            "q",
            vec![
                AnswerOption::new(OptionId::new(7), "a"),
                AnswerOption::new(OptionId::new(9), "b"),
            ],
        )
        .unwrap();
        assert_eq!(
            Command::Select(2).to_input(&question),
            Ok(Some(CaptureInput::Select(OptionId::new(9))))
        );
        assert!(Command::Select(3).to_input(&question).is_err());
        assert_eq!(Command::Next.to_input(&question), Ok(None));
    }
}
