//! Raw text -> [`Command`].
//!
//! Keywords are matched case-insensitively on the first token. Double quotes
//! group words into one token (`job add "Data Engineer" "Acme Corp"`).
//! Note text and reminder messages are cut from the raw line instead, so they
//! keep their quotes and spacing.

use super::{Command, CommandError, JobCommand, NoteCommand};
use crate::service::job_service::JobUpdate;
use crate::service::math::MathOp;
use crate::service::reminder::parse_duration;
use once_cell::sync::Lazy;
use regex::Regex;

static APPLIED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:i\s+)?(?:just\s+)?(?:applied|apply)\s+(?:for|to)\s+(?:an?\s+|the\s+)?(.+?)\s+(?:at|@)\s+(.+?)[.!]?$",
    )
    .expect("valid applied regex")
});
static LIST_JOBS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:show|list)\b.*\b(?:jobs?|applications?)\b").expect("valid list jobs regex")
});

const EXIT_WORDS: &[&str] = &["exit", "quit", "bye", "q"];
const MATH_KEYWORDS: &[&str] = &[
    "add", "subtract", "sub", "multiply", "mul", "divide", "div", "plus", "minus", "times", "+",
    "-", "*", "/",
];

/// Splits a line on whitespace, keeping double-quoted segments together.
pub fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CommandError::InvalidArgument(
            "unterminated quote in input".to_string(),
        ));
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parses one input line. Blank input yields `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Commands that carry free text read the raw line, not tokens.
    if let Some((head, rest)) = split_word(trimmed) {
        match head.to_lowercase().as_str() {
            "note" | "notes" => return Ok(Some(Command::Note(parse_note(rest)?))),
            "remind" => return parse_remind(rest).map(Some),
            _ => {}
        }
    }

    let tokens = tokenize(trimmed)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };
    let keyword = head.to_lowercase();

    let command = match keyword.as_str() {
        word if EXIT_WORDS.contains(&word) && args.is_empty() => Command::Exit,
        word if MATH_KEYWORDS.contains(&word) => parse_math_args(word, args)?,
        "math" => {
            let (op, rest) = args.split_first().ok_or_else(|| usage("math <op> <a> <b>"))?;
            parse_math_args(op, rest)?
        }
        "calc" => parse_calc(&args.join(" "))?,
        "reminders" => match args {
            [] => Command::ListReminders,
            [sub] if sub.eq_ignore_ascii_case("list") => Command::ListReminders,
            _ => return Err(usage("reminders")),
        },
        "cancel" | "forget" => parse_cancel(args)?,
        "job" | "jobs" => Command::Job(parse_job(args)?),
        "history" => parse_history(args)?,
        "help" | "?" => Command::Help {
            topic: args.first().map(|topic| topic.to_lowercase()),
        },
        "version" => Command::Version,
        _ => return translate_free_text(trimmed).map(Some),
    };
    Ok(Some(command))
}

/// First whitespace-delimited word and the untouched remainder.
fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.find(char::is_whitespace) {
        Some(end) => Some((&text[..end], &text[end..])),
        None => Some((text, "")),
    }
}

/// `text` when it is exactly one word.
fn single_word(text: &str) -> Option<String> {
    match split_word(text) {
        Some((word, rest)) if rest.trim().is_empty() => Some(word.to_string()),
        _ => None,
    }
}

fn usage(form: &str) -> CommandError {
    CommandError::InvalidArgument(format!("usage: {form}"))
}

fn parse_number(token: &str) -> Result<f64, CommandError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArgument(format!("`{token}` is not a number")))
}

fn parse_math_args(op: &str, args: &[String]) -> Result<Command, CommandError> {
    let op: MathOp = op.parse()?;
    match args {
        [a, b] => Ok(Command::Math {
            op,
            a: parse_number(a)?,
            b: parse_number(b)?,
        }),
        _ => Err(usage(&format!("{} <a> <b>", op.name()))),
    }
}

/// Tries each operator position until both sides read as numbers, so
/// signs and exponents (`-4 / 2`, `1e-3 * 2`) stay with their operand.
fn parse_calc(expression: &str) -> Result<Command, CommandError> {
    let expression = expression.trim();
    expression
        .char_indices()
        .skip(1)
        .filter(|(_, symbol)| matches!(symbol, '+' | '-' | '*' | '/' | 'x'))
        .find_map(|(at, symbol)| {
            let op = symbol.to_string().parse::<MathOp>().ok()?;
            let a = parse_number(&expression[..at]).ok()?;
            let b = parse_number(&expression[at + symbol.len_utf8()..]).ok()?;
            Some(Command::Math { op, a, b })
        })
        .ok_or_else(|| usage("calc <a> <+|-|*|/> <b>"))
}

/// `remind <message...> <delay>` or `remind <message...> in <delay>`.
fn parse_remind(rest: &str) -> Result<Command, CommandError> {
    const FORM: &str = "remind <message> <delay>";
    let rest = rest.trim();
    let split = rest.rfind(char::is_whitespace).ok_or_else(|| usage(FORM))?;
    let delay = rest[split..].trim_start();
    let mut message = rest[..split].trim_end();
    if let Some(at) = message.rfind(char::is_whitespace) {
        if message[at..].trim_start().eq_ignore_ascii_case("in") {
            message = message[..at].trim_end();
        }
    }
    if message.is_empty() {
        return Err(usage(FORM));
    }

    Ok(Command::Remind {
        message: message.to_string(),
        delay: parse_duration(delay)?,
    })
}

fn parse_cancel(args: &[String]) -> Result<Command, CommandError> {
    let [id] = args else {
        return Err(usage("cancel <reminder-id>"));
    };
    let id = id
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidArgument(format!("`{id}` is not a reminder id")))?;
    Ok(Command::CancelReminder(id))
}

fn parse_note(rest: &str) -> Result<NoteCommand, CommandError> {
    let Some((sub, rest)) = split_word(rest) else {
        return Ok(NoteCommand::List);
    };
    let rest = rest.trim_start();

    match sub.to_lowercase().as_str() {
        "add" | "new" => {
            if rest.is_empty() {
                return Err(usage("note add <text>"));
            }
            Ok(NoteCommand::Add(rest.to_string()))
        }
        "list" | "ls" => Ok(NoteCommand::List),
        "show" | "get" | "read" => single_word(rest)
            .map(NoteCommand::Show)
            .ok_or_else(|| usage("note show <id>")),
        "edit" | "update" => match split_word(rest) {
            Some((id, content)) if !content.trim().is_empty() => Ok(NoteCommand::Edit {
                id: id.to_string(),
                content: content.trim_start().to_string(),
            }),
            _ => Err(usage("note edit <id> <text>")),
        },
        "delete" | "remove" | "rm" => single_word(rest)
            .map(NoteCommand::Delete)
            .ok_or_else(|| usage("note delete <id>")),
        other => Err(CommandError::InvalidArgument(format!(
            "unknown note action `{other}`; try add, list, show, edit or delete"
        ))),
    }
}

fn parse_job(args: &[String]) -> Result<JobCommand, CommandError> {
    let Some((sub, rest)) = args.split_first() else {
        return Ok(JobCommand::List { status: None });
    };

    match sub.to_lowercase().as_str() {
        "add" | "a" => match rest {
            [role, company] => Ok(JobCommand::Add {
                role: role.clone(),
                company: company.clone(),
                status: None,
            }),
            [role, company, status] => Ok(JobCommand::Add {
                role: role.clone(),
                company: company.clone(),
                status: Some(status.clone()),
            }),
            _ => Err(usage("job add \"<role>\" \"<company>\" [status]")),
        },
        "list" | "ls" => match rest {
            [] => Ok(JobCommand::List { status: None }),
            [status] => Ok(JobCommand::List {
                status: Some(status.clone()),
            }),
            _ => Err(usage("job list [status]")),
        },
        "remove" | "rm" | "delete" => match rest {
            [identifier] => Ok(JobCommand::Remove(identifier.clone())),
            _ => Err(usage("job remove <id|index>")),
        },
        "update" | "up" => parse_job_update(rest),
        "help" | "-h" | "--help" => Ok(JobCommand::Help),
        other => Err(CommandError::InvalidArgument(format!(
            "unknown job action `{other}`; try 'job help'"
        ))),
    }
}

fn parse_job_update(args: &[String]) -> Result<JobCommand, CommandError> {
    const FORM: &str = "job update <id|index> [--role r] [--company c] [--status s]";
    let Some((identifier, flags)) = args.split_first() else {
        return Err(usage(FORM));
    };

    let mut update = JobUpdate::default();
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        let slot = match flag.as_str() {
            "--role" | "-r" => &mut update.role,
            "--company" | "-c" => &mut update.company,
            "--status" | "-s" => &mut update.status,
            other => {
                return Err(CommandError::InvalidArgument(format!(
                    "unknown flag `{other}`; usage: {FORM}"
                )))
            }
        };
        let value = iter.next().ok_or_else(|| {
            CommandError::InvalidArgument(format!("flag `{flag}` needs a value"))
        })?;
        *slot = Some(value.clone());
    }

    if update.is_empty() {
        return Err(usage(FORM));
    }
    Ok(JobCommand::Update {
        identifier: identifier.clone(),
        update,
    })
}

fn parse_history(args: &[String]) -> Result<Command, CommandError> {
    match args {
        [] => Ok(Command::History { limit: None }),
        [count] => count
            .parse::<usize>()
            .ok()
            .filter(|value| *value > 0)
            .map(|value| Command::History { limit: Some(value) })
            .ok_or_else(|| {
                CommandError::InvalidArgument(format!("`{count}` is not a positive count"))
            }),
        _ => Err(usage("history [count]")),
    }
}

/// Keyword-based fallback for conversational job input.
fn translate_free_text(line: &str) -> Result<Command, CommandError> {
    let lowered = line.to_lowercase();

    if let Some(caps) = APPLIED_RE.captures(&lowered) {
        let role = caps[1].trim().to_string();
        let company = caps[2].trim().to_string();
        if !role.is_empty() && !company.is_empty() {
            return Ok(Command::Job(JobCommand::Add {
                role,
                company,
                status: None,
            }));
        }
    }

    if LIST_JOBS_RE.is_match(&lowered) {
        return Ok(Command::Job(JobCommand::List { status: None }));
    }

    Err(CommandError::Unrecognized(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_command, tokenize};
    use crate::command::{Command, CommandError, JobCommand, NoteCommand};
    use crate::service::job_service::JobUpdate;
    use crate::service::math::MathOp;
    use chrono::Duration;

    fn parse(line: &str) -> Command {
        parse_command(line)
            .expect("line should parse")
            .expect("line should not be blank")
    }

    #[test]
    fn tokenize_groups_quoted_words() {
        let tokens = tokenize(r#"job add "Data Engineer"  "Acme Corp" offer"#).unwrap();
        assert_eq!(tokens, vec!["job", "add", "Data Engineer", "Acme Corp", "offer"]);
        assert_eq!(tokenize(r#"note add """#).unwrap(), vec!["note", "add", ""]);
        assert!(matches!(
            tokenize(r#"note add "open"#),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn blank_input_is_not_a_command() {
        assert!(parse_command("   ").unwrap().is_none());
    }

    #[test]
    fn math_forms() {
        let expected = Command::Math {
            op: MathOp::Add,
            a: 2.0,
            b: 3.0,
        };
        assert_eq!(parse("add 2 3"), expected);
        assert_eq!(parse("ADD 2 3"), expected);
        assert_eq!(parse("math add 2 3"), expected);
        assert_eq!(parse("+ 2 3"), expected);
        assert_eq!(parse("calc 2 + 3"), expected);
        assert_eq!(parse("calc 2+3"), expected);
        assert_eq!(
            parse("calc -4 / 2"),
            Command::Math {
                op: MathOp::Divide,
                a: -4.0,
                b: 2.0
            }
        );
    }

    #[test]
    fn calc_accepts_every_number_form() {
        assert_eq!(
            parse("calc 1.5e3 + 2"),
            Command::Math {
                op: MathOp::Add,
                a: 1500.0,
                b: 2.0
            }
        );
        assert_eq!(
            parse("calc .5 * 2"),
            Command::Math {
                op: MathOp::Multiply,
                a: 0.5,
                b: 2.0
            }
        );
        assert_eq!(
            parse("calc 1e-3 x 2"),
            Command::Math {
                op: MathOp::Multiply,
                a: 0.001,
                b: 2.0
            }
        );
        assert_eq!(
            parse("calc 2 - -3"),
            Command::Math {
                op: MathOp::Subtract,
                a: 2.0,
                b: -3.0
            }
        );
        for line in ["calc 2 +", "calc two * 3", "calc 2 3", "calc"] {
            assert!(
                matches!(parse_command(line), Err(CommandError::InvalidArgument(_))),
                "`{line}` should be rejected"
            );
        }
    }

    #[test]
    fn math_rejects_bad_operands() {
        for line in ["add two 3", "add 1", "add 1 2 3", "divide inf 2", "math pow 2 3"] {
            assert!(
                matches!(parse_command(line), Err(CommandError::InvalidArgument(_)) | Err(CommandError::Math(_))),
                "`{line}` should be rejected"
            );
        }
    }

    #[test]
    fn remind_forms() {
        assert_eq!(
            parse("remind buy milk 5"),
            Command::Remind {
                message: "buy milk".to_string(),
                delay: Duration::seconds(5)
            }
        );
        assert_eq!(
            parse("remind stand up in 1h30m"),
            Command::Remind {
                message: "stand up".to_string(),
                delay: Duration::minutes(90)
            }
        );
        assert!(matches!(
            parse_command("remind 5"),
            Err(CommandError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_command("remind call mom later"),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn remind_message_keeps_quotes_and_spacing() {
        assert_eq!(
            parse(r#"remind call "Bo"  back in 10m"#),
            Command::Remind {
                message: r#"call "Bo"  back"#.to_string(),
                delay: Duration::minutes(10)
            }
        );
        assert_eq!(
            parse(r#"remind 6" ruler 5"#),
            Command::Remind {
                message: r#"6" ruler"#.to_string(),
                delay: Duration::seconds(5)
            }
        );
    }

    #[test]
    fn reminder_management() {
        assert_eq!(parse("reminders"), Command::ListReminders);
        assert_eq!(parse("cancel #3"), Command::CancelReminder(3));
        assert_eq!(parse("forget 4"), Command::CancelReminder(4));
        assert!(parse_command("cancel soon").is_err());
    }

    #[test]
    fn note_forms() {
        assert_eq!(
            parse(r#"note add "call  the bank" tomorrow"#),
            Command::Note(NoteCommand::Add(r#""call  the bank" tomorrow"#.to_string()))
        );
        assert_eq!(
            parse(r#"NOTE add 6" ruler"#),
            Command::Note(NoteCommand::Add(r#"6" ruler"#.to_string()))
        );
        assert_eq!(parse("notes"), Command::Note(NoteCommand::List));
        assert_eq!(
            parse(r#"note edit abcd  say "hi"  to Bob"#),
            Command::Note(NoteCommand::Edit {
                id: "abcd".to_string(),
                content: r#"say "hi"  to Bob"#.to_string()
            })
        );
        assert!(parse_command("note edit abcd").is_err());
        assert!(parse_command("note show abcd efgh").is_err());
        assert_eq!(
            parse("note rm abcd"),
            Command::Note(NoteCommand::Delete("abcd".to_string()))
        );
        assert!(parse_command("note add").is_err());
        assert!(parse_command("note frobnicate").is_err());
    }

    #[test]
    fn job_forms() {
        assert_eq!(
            parse(r#"job add "Data Engineer" Acme int"#),
            Command::Job(JobCommand::Add {
                role: "Data Engineer".to_string(),
                company: "Acme".to_string(),
                status: Some("int".to_string())
            })
        );
        assert_eq!(
            parse("job update 0 --status offer -c Globex"),
            Command::Job(JobCommand::Update {
                identifier: "0".to_string(),
                update: JobUpdate {
                    role: None,
                    company: Some("Globex".to_string()),
                    status: Some("offer".to_string()),
                }
            })
        );
        assert!(parse_command("job update 0").is_err());
        assert!(parse_command("job update 0 --status").is_err());
    }

    #[test]
    fn free_text_job_translation() {
        assert_eq!(
            parse("I applied for a data engineer at Acme."),
            Command::Job(JobCommand::Add {
                role: "data engineer".to_string(),
                company: "acme".to_string(),
                status: None
            })
        );
        assert_eq!(
            parse("show me my jobs"),
            Command::Job(JobCommand::List { status: None })
        );
    }

    #[test]
    fn unknown_input_is_unrecognized() {
        let err = parse_command("sing me a song").unwrap_err();
        assert!(matches!(err, CommandError::Unrecognized(ref input) if input == "sing me a song"));
    }

    #[test]
    fn exit_words_only_match_alone() {
        assert_eq!(parse("Quit"), Command::Exit);
        assert!(parse_command("quit smoking").is_err());
    }
}
