use derive_more::Display;

/// The fixed set of commands the shell understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Builtin {
    #[display("pwd")]
    Pwd,
    #[display("ls")]
    Ls,
    #[display("cd")]
    Cd,
    #[display("mkdir")]
    Mkdir,
    #[display("touch")]
    Touch,
    #[display("cat")]
    Cat,
    /// Hands input over to the game.
    #[display("mario")]
    Mario,
}

impl Builtin {
    pub const ALL: [Builtin; 7] = [
        Builtin::Pwd,
        Builtin::Ls,
        Builtin::Cd,
        Builtin::Mkdir,
        Builtin::Touch,
        Builtin::Cat,
        Builtin::Mario,
    ];

    /// Exact, case-sensitive lookup by command name.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|builtin| builtin.to_string() == name)
    }
}

/// A tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

impl<'a> CommandLine<'a> {
    /// Splits on runs of whitespace. Blank input yields `None`.
    pub fn parse(input: &'a str) -> Option<Self> {
        let mut tokens = input.split_whitespace();
        let name = tokens.next()?;
        Some(CommandLine {
            name,
            args: tokens.collect(),
        })
    }
}
