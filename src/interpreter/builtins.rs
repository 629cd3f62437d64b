use snafu::OptionExt;
use tracing::debug;

use crate::filesystem::FsError;
use crate::session::Session;

use super::error::{
    AlreadyExistsSnafu, CurrentDirUnreachableSnafu, InvalidNameSnafu, IsDirectorySnafu,
    MissingOperandSnafu, NotADirectorySnafu, NotFoundSnafu,
};
use super::{Builtin, EntryKind, ShellError};

/// Shown by `ls` for a directory without entries.
pub const EMPTY_LISTING: &str = "(empty)";

const LISTING_SEPARATOR: &str = "  ";

/// Successful outcome of a builtin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Nothing,
    /// Emitted as a normal line unless empty.
    Text(String),
    LaunchGame,
}

pub fn run(builtin: Builtin, session: &mut Session, args: &[&str]) -> Result<Reply, ShellError> {
    let operand = args.first().copied();
    match builtin {
        Builtin::Pwd => Ok(Reply::Text(session.cwd().to_string())),
        Builtin::Ls => list(session),
        Builtin::Cd => change_directory(session, operand),
        Builtin::Mkdir => make_directory(session, operand),
        Builtin::Touch => touch(session, operand),
        Builtin::Cat => concatenate(session, operand),
        Builtin::Mario => Ok(Reply::LaunchGame),
    }
}

fn list(session: &Session) -> Result<Reply, ShellError> {
    let children = session
        .current_directory()
        .map_err(|_| CurrentDirUnreachableSnafu.build())?;

    if children.is_empty() {
        return Ok(Reply::Text(EMPTY_LISTING.to_string()));
    }
    let names = children.keys().map(String::as_str).collect::<Vec<_>>();
    Ok(Reply::Text(names.join(LISTING_SEPARATOR)))
}

fn change_directory(session: &mut Session, target: Option<&str>) -> Result<Reply, ShellError> {
    let command = Builtin::Cd;
    let typed = target.unwrap_or_default();
    session
        .change_directory(target)
        .map_err(|error| match error {
            FsError::NotADirectory { .. } => NotADirectorySnafu {
                command,
                target: typed,
            }
            .build(),
            _ => NotFoundSnafu {
                command,
                target: typed,
            }
            .build(),
        })?;
    Ok(Reply::Nothing)
}

fn make_directory(session: &mut Session, name: Option<&str>) -> Result<Reply, ShellError> {
    let command = Builtin::Mkdir;
    let entry = EntryKind::Directory;
    let name = name.context(MissingOperandSnafu {
        command,
        operand: "operand",
    })?;

    match session.make_directory(name) {
        Ok(()) => Ok(Reply::Nothing),
        Err(FsError::InvalidName { .. }) => InvalidNameSnafu {
            command,
            entry,
            name,
        }
        .fail(),
        Err(FsError::AlreadyExists { .. }) => AlreadyExistsSnafu {
            command,
            entry,
            name,
        }
        .fail(),
        Err(_) => CurrentDirUnreachableSnafu.fail(),
    }
}

fn touch(session: &mut Session, name: Option<&str>) -> Result<Reply, ShellError> {
    let command = Builtin::Touch;
    let name = name.context(MissingOperandSnafu {
        command,
        operand: "file operand",
    })?;

    match session.make_file(name) {
        Ok(created) => {
            debug!("touch {name}: created {created}");
            Ok(Reply::Nothing)
        }
        Err(FsError::InvalidName { .. }) => InvalidNameSnafu {
            command,
            entry: EntryKind::File,
            name,
        }
        .fail(),
        Err(_) => CurrentDirUnreachableSnafu.fail(),
    }
}

fn concatenate(session: &Session, path: Option<&str>) -> Result<Reply, ShellError> {
    let command = Builtin::Cat;
    let path = path.context(MissingOperandSnafu {
        command,
        operand: "file operand",
    })?;

    match session.read_file(path) {
        Ok(content) => Ok(Reply::Text(content.to_string())),
        Err(FsError::IsDirectory { .. }) => IsDirectorySnafu {
            command,
            target: path,
        }
        .fail(),
        Err(_) => NotFoundSnafu {
            command,
            target: path,
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn run_in(session: &mut Session, builtin: Builtin, args: &[&str]) -> Result<Reply, ShellError> {
        run(builtin, session, args)
    }

    fn text(value: &str) -> Result<Reply, ShellError> {
        Ok(Reply::Text(value.to_string()))
    }

    #[test]
    fn pwd_reports_cursor() {
        let mut session = Session::default();
        assert_eq!(run_in(&mut session, Builtin::Pwd, &[]), text("/"));
        run_in(&mut session, Builtin::Cd, &["var"]).unwrap();
        assert_eq!(run_in(&mut session, Builtin::Pwd, &["ignored"]), text("/var"));
    }

    #[test]
    fn ls_lists_sorted_names() {
        let mut session = Session::default();
        run_in(&mut session, Builtin::Touch, &["b"]).unwrap();
        run_in(&mut session, Builtin::Mkdir, &["a"]).unwrap();
        assert_eq!(
            run_in(&mut session, Builtin::Ls, &["ignored"]),
            text("a  b  home  tmp  var")
        );
    }

    #[test]
    fn ls_marks_empty_directories() {
        let mut session = Session::default();
        run_in(&mut session, Builtin::Mkdir, &["fresh"]).unwrap();
        run_in(&mut session, Builtin::Cd, &["fresh"]).unwrap();
        assert_eq!(run_in(&mut session, Builtin::Ls, &[]), text(EMPTY_LISTING));
    }

    #[rstest]
    #[case(Builtin::Mkdir, "mkdir: missing operand")]
    #[case(Builtin::Touch, "touch: missing file operand")]
    #[case(Builtin::Cat, "cat: missing file operand")]
    fn operand_is_required(#[case] builtin: Builtin, #[case] message: &str) {
        let mut session = Session::default();
        let error = run_in(&mut session, builtin, &[]).unwrap_err();
        assert_eq!(error.to_string(), message);
    }

    #[test]
    fn cd_without_argument_returns_to_root() {
        let mut session = Session::default();
        run_in(&mut session, Builtin::Cd, &["/home"]).unwrap();
        assert_eq!(run_in(&mut session, Builtin::Cd, &[]), Ok(Reply::Nothing));
        assert!(session.cwd().is_root());
    }

    #[test]
    fn cd_reports_typed_operand() {
        let mut session = Session::default();
        run_in(&mut session, Builtin::Touch, &["notes"]).unwrap();
        assert_eq!(
            run_in(&mut session, Builtin::Cd, &["./missing"]).unwrap_err().to_string(),
            "cd: ./missing: No such file or directory"
        );
        assert_eq!(
            run_in(&mut session, Builtin::Cd, &["notes"]).unwrap_err().to_string(),
            "cd: notes: Not a directory"
        );
    }

    #[test]
    fn mkdir_twice_conflicts() {
        let mut session = Session::default();
        run_in(&mut session, Builtin::Mkdir, &["a"]).unwrap();
        assert_eq!(
            run_in(&mut session, Builtin::Mkdir, &["a"]),
            Err(ShellError::AlreadyExists {
                command: Builtin::Mkdir,
                entry: EntryKind::Directory,
                name: "a".into(),
            })
        );
        // touch on the same name leaves the directory alone
        assert_eq!(run_in(&mut session, Builtin::Touch, &["a"]), Ok(Reply::Nothing));
        assert!(session.is_directory("/a"));
    }

    #[rstest]
    #[case(Builtin::Mkdir, "a/b", "mkdir: cannot create directory 'a/b': Invalid name")]
    #[case(Builtin::Mkdir, "..", "mkdir: cannot create directory '..': Invalid name")]
    #[case(Builtin::Touch, ".", "touch: cannot create file '.': Invalid name")]
    #[case(Builtin::Touch, "/etc", "touch: cannot create file '/etc': Invalid name")]
    fn names_must_be_single_segments(
        #[case] builtin: Builtin,
        #[case] name: &str,
        #[case] message: &str,
    ) {
        let mut session = Session::default();
        let before = session.tree().clone();
        let error = run_in(&mut session, builtin, &[name]).unwrap_err();
        assert_eq!(error.to_string(), message);
        assert_eq!(session.tree(), &before);
    }

    #[test]
    fn touch_is_idempotent() {
        let mut session = Session::default();
        run_in(&mut session, Builtin::Touch, &["a"]).unwrap();
        let snapshot = session.tree().clone();
        assert_eq!(run_in(&mut session, Builtin::Touch, &["a"]), Ok(Reply::Nothing));
        assert_eq!(session.tree(), &snapshot);
    }

    #[test]
    fn cat_reads_through_subdirectories() {
        let mut session = Session::default();
        run_in(&mut session, Builtin::Cd, &["home"]).unwrap();
        run_in(&mut session, Builtin::Touch, &["notes"]).unwrap();
        run_in(&mut session, Builtin::Cd, &["/"]).unwrap();
        assert_eq!(run_in(&mut session, Builtin::Cat, &["home/notes"]), text(""));
    }

    #[test]
    fn cat_reports_directories_and_missing_paths() {
        let mut session = Session::default();
        run_in(&mut session, Builtin::Touch, &["notes"]).unwrap();
        assert_eq!(
            run_in(&mut session, Builtin::Cat, &["tmp"]).unwrap_err().to_string(),
            "cat: tmp: Is a directory"
        );
        assert_eq!(
            run_in(&mut session, Builtin::Cat, &["notes/tmp"]).unwrap_err().to_string(),
            "cat: notes/tmp: No such file or directory"
        );
    }

    #[test]
    fn mario_requests_the_game() {
        let mut session = Session::default();
        assert_eq!(run_in(&mut session, Builtin::Mario, &[]), Ok(Reply::LaunchGame));
    }
}
