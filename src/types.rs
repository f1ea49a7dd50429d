/// Where a bound command-line flag should be placed.
///
/// `Heading` maps to an argument group heading on the top-level command.
/// `SubCommand` routes the flag into a named sub-command, and
/// `SubCommandHeading` does both at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgGroup {
    Heading(String),
    SubCommand(String),
    SubCommandHeading(String, String),
}

/// How a value leaf binds to a command-line flag.
///
/// A leaf carrying one of these is picked up by
/// [`ConfigBlock::initialize_command`](crate::ConfigBlock::initialize_command)
/// and later filled in by
/// [`ConfigBlock::import_matches`](crate::ConfigBlock::import_matches). The
/// spec itself is CLI-framework-free; only the `cli` module (behind the
/// `clap` feature) interprets it.
///
/// With no explicit settings, the flag name derives from the leaf's local
/// key with spaces replaced by hyphens (`"epanet file"` → `--epanet-file`),
/// and the destination id from the flag name with hyphens replaced by
/// underscores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub(crate) flag: Option<String>,
    pub(crate) dest: Option<String>,
    pub(crate) group: Option<ArgGroup>,
    pub(crate) paired_disable: bool,
}

impl ArgumentSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the derived flag name. A leading `--` is accepted and ignored.
    pub fn flag(mut self, flag: &str) -> Self {
        self.flag = Some(flag.trim_start_matches('-').to_string());
        self
    }

    /// Override the destination id used in the parsed-argument namespace.
    pub fn dest(mut self, dest: &str) -> Self {
        self.dest = Some(dest.to_string());
        self
    }

    /// Place the flag under a help heading on the top-level command.
    pub fn group(mut self, heading: &str) -> Self {
        self.group = Some(ArgGroup::Heading(heading.to_string()));
        self
    }

    /// Route the flag into the named sub-command.
    pub fn subcommand(mut self, name: &str) -> Self {
        self.group = Some(ArgGroup::SubCommand(name.to_string()));
        self
    }

    /// Route the flag into the named sub-command under a help heading.
    pub fn subcommand_group(mut self, name: &str, heading: &str) -> Self {
        self.group = Some(ArgGroup::SubCommandHeading(
            name.to_string(),
            heading.to_string(),
        ));
        self
    }

    /// For a presence-style boolean flag, also register a paired
    /// `--disable-<flag>` that sets the leaf to `false`.
    pub fn paired_disable(mut self) -> Self {
        self.paired_disable = true;
        self
    }
}
