pub(super) const GENERAL: &str = "\
Commands:
  add|subtract|multiply|divide <a> <b>   arithmetic (also: math <op> <a> <b>, calc 2 * 3)
  remind <message> <delay>               reminder after a delay (30, 45s, 5m, 2h, 1h30m)
  reminders                              list pending reminders
  cancel <id>                            cancel a pending reminder
  note add|list|show|edit|delete ...     manage notes (type 'help note')
  job add|list|update|remove ...         track job applications (type 'help job')
  history [count]                        show recent activity
  version                                show version
  exit                                   leave";

pub(super) const NOTE: &str = "\
Note commands:
  note add <text>          save a new note
  note list                list notes, newest first
  note show <id>           show one note (an id prefix of 4+ characters works)
  note edit <id> <text>    replace a note's text
  note delete <id>         delete a note";

pub(super) const JOB: &str = "\
Job tracker commands:
  job add \"<role>\" \"<company>\" [status]                       add a job
  job list [status]                                           list jobs (optionally by status)
  job remove <id|index>                                       remove a job
  job update <id|index> [--role r] [--company c] [--status s] update a job
Statuses: applied, interviewing, offer, accepted, rejected, withdrawn, todo";

pub(super) const MATH: &str = "\
Math commands:
  add <a> <b>, subtract <a> <b>, multiply <a> <b>, divide <a> <b>
  math <op> <a> <b>     op may be a name or + - * /
  calc <a> <op> <b>     e.g. calc 2.5 * 4";

pub(super) const REMIND: &str = "\
Reminder commands:
  remind <message> <delay>      e.g. remind stretch 10m
  remind <message> in <delay>   e.g. remind call mom in 1h30m
  reminders                     list pending reminders
  cancel <id>                   cancel a reminder
Reminders are checked whenever you enter a command.";

/// Help text for `topic`, falling back to the general list.
pub(super) fn help_text(topic: Option<&str>) -> &'static str {
    match topic {
        Some("note" | "notes") => NOTE,
        Some("job" | "jobs") => JOB,
        Some("math" | "calc") => MATH,
        Some("remind" | "reminder" | "reminders") => REMIND,
        _ => GENERAL,
    }
}
